//! `Observation` and its `component` backbone.

use crate::datatypes::{
    Annotation, CodeableConcept, Identifier, Meta, Narrative, Period, Quantity, Reference,
};
use crate::element::{Boolean, Code, DateTime, FhirString, Id, Instant, Integer, Time, Uri};
use crate::extension::Extension;
use crate::resource::Resource;

fhir_choice! {
    pub enum ObservationEffective {
        DateTime(primitive DateTime),
        Period(record Period),
        Instant(primitive Instant),
    }
}

fhir_choice! {
    /// `value[x]` of an observation and of its components.
    pub enum ObservationValue {
        Quantity(record Quantity),
        CodeableConcept(record CodeableConcept),
        String(primitive FhirString),
        Boolean(primitive Boolean),
        Integer(primitive Integer),
        Time(primitive Time),
        DateTime(primitive DateTime),
        Period(record Period),
    }
}

fhir_record! {
    /// A measurement or assertion about a subject.
    pub struct Observation: "Observation" {
        id: primitive<Id> = "id",
        meta: record<Meta> = "meta",
        implicit_rules: primitive<Uri> = "implicitRules",
        language: primitive<Code> = "language",
        text: record<Narrative> = "text",
        contained: resources<Resource> = "contained",
        extension: records<Extension> = "extension",
        modifier_extension: records<Extension> = "modifierExtension",
        identifier: records<Identifier> = "identifier",
        status: primitive<Code> = "status",
        category: records<CodeableConcept> = "category",
        code: record<CodeableConcept> = "code",
        subject: record<Reference> = "subject",
        effective: choice<ObservationEffective> = "effective",
        issued: primitive<Instant> = "issued",
        performer: records<Reference> = "performer",
        value: choice<ObservationValue> = "value",
        interpretation: records<CodeableConcept> = "interpretation",
        note: records<Annotation> = "note",
        component: records<ObservationComponent> = "component",
    }
}

fhir_record! {
    /// One part of a multi-component observation.
    pub struct ObservationComponent: "ObservationComponent" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        modifier_extension: records<Extension> = "modifierExtension",
        code: record<CodeableConcept> = "code",
        value: choice<ObservationValue> = "value",
        interpretation: records<CodeableConcept> = "interpretation",
    }
}
