//! `Organization`: a grouping of people or services.

use crate::datatypes::{CodeableConcept, ContactPoint, Identifier, Meta, Narrative, Reference};
use crate::element::{Boolean, Code, FhirString, Id, Uri};
use crate::extension::Extension;
use crate::resource::Resource;

fhir_record! {
    pub struct Organization: "Organization" {
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
        type_: records<CodeableConcept> = "type",
        name: primitive<FhirString> = "name",
        alias: primitives<FhirString> = "alias",
        telecom: records<ContactPoint> = "telecom",
        part_of: record<Reference> = "partOf",
    }
}
