//! `Patient`: demographics, with the `deceased[x]` and `multipleBirth[x]` choices.

use crate::datatypes::{ContactPoint, HumanName, Identifier, Meta, Narrative, Reference};
use crate::element::{Boolean, Code, Date, DateTime, Id, Integer, Uri};
use crate::extension::Extension;
use crate::resource::Resource;

fhir_choice! {
    pub enum PatientDeceased {
        Boolean(primitive Boolean),
        DateTime(primitive DateTime),
    }
}

fhir_choice! {
    pub enum PatientMultipleBirth {
        Boolean(primitive Boolean),
        Integer(primitive Integer),
    }
}

fhir_record! {
    /// Demographics of a person receiving care.
    pub struct Patient: "Patient" {
        id: primitive<Id> = "id",
        meta: record<Meta> = "meta",
        implicit_rules: primitive<Uri> = "implicitRules",
        language: primitive<Code> = "language",
        text: record<Narrative> = "text",
        contained: resources<Resource> = "contained",
        extension: records<Extension> = "extension",
        modifier_extension: records<Extension> = "modifierExtension",
        identifier: records<Identifier> = "identifier",
        active: primitive<Boolean> = "active",
        name: records<HumanName> = "name",
        telecom: records<ContactPoint> = "telecom",
        gender: primitive<Code> = "gender",
        birth_date: primitive<Date> = "birthDate",
        deceased: choice<PatientDeceased> = "deceased",
        multiple_birth: choice<PatientMultipleBirth> = "multipleBirth",
        general_practitioner: records<Reference> = "generalPractitioner",
        managing_organization: record<Reference> = "managingOrganization",
    }
}
