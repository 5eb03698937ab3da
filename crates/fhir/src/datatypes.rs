//! General-purpose datatypes.

use crate::element::{
    Boolean, Canonical, Code, DateTime, Decimal, Element, FhirString, Id, Instant, Markdown,
    PositiveInt, Uri, Xhtml,
};
use crate::extension::Extension;

fhir_record! {
    /// A code from a terminology system.
    pub struct Coding: "Coding" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        system: primitive<Uri> = "system",
        version: primitive<FhirString> = "version",
        code: primitive<Code> = "code",
        display: primitive<FhirString> = "display",
        user_selected: primitive<Boolean> = "userSelected",
    }
}

fhir_record! {
    /// A concept as one or more codings plus free text.
    pub struct CodeableConcept: "CodeableConcept" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        coding: records<Coding> = "coding",
        text: primitive<FhirString> = "text",
    }
}

fhir_record! {
    pub struct Identifier: "Identifier" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        use_: primitive<Code> = "use",
        type_: record<CodeableConcept> = "type",
        system: primitive<Uri> = "system",
        value: primitive<FhirString> = "value",
        period: record<Period> = "period",
        /// Boxed, since a Reference may itself carry an Identifier.
        assigner: record<Box<Reference>> = "assigner",
    }
}

fhir_record! {
    pub struct HumanName: "HumanName" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        use_: primitive<Code> = "use",
        text: primitive<FhirString> = "text",
        family: primitive<FhirString> = "family",
        given: primitives<FhirString> = "given",
        prefix: primitives<FhirString> = "prefix",
        suffix: primitives<FhirString> = "suffix",
        period: record<Period> = "period",
    }
}

fhir_record! {
    pub struct ContactPoint: "ContactPoint" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        system: primitive<Code> = "system",
        value: primitive<FhirString> = "value",
        use_: primitive<Code> = "use",
        rank: primitive<PositiveInt> = "rank",
        period: record<Period> = "period",
    }
}

fhir_record! {
    pub struct Period: "Period" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        start: primitive<DateTime> = "start",
        end: primitive<DateTime> = "end",
    }
}

fhir_record! {
    pub struct Quantity: "Quantity" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        value: primitive<Decimal> = "value",
        comparator: primitive<Code> = "comparator",
        unit: primitive<FhirString> = "unit",
        system: primitive<Uri> = "system",
        code: primitive<Code> = "code",
    }
}

fhir_record! {
    pub struct Reference: "Reference" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        reference: primitive<FhirString> = "reference",
        type_: primitive<Uri> = "type",
        identifier: record<Identifier> = "identifier",
        display: primitive<FhirString> = "display",
    }
}

fhir_choice! {
    pub enum AnnotationAuthor {
        Reference(record Reference),
        String(primitive FhirString),
    }
}

fhir_record! {
    /// A note with optional author and time.
    pub struct Annotation: "Annotation" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        author: choice<AnnotationAuthor> = "author",
        time: primitive<DateTime> = "time",
        text: primitive<Markdown> = "text",
    }
}

fhir_record! {
    pub struct Meta: "Meta" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        version_id: primitive<Id> = "versionId",
        last_updated: primitive<Instant> = "lastUpdated",
        source: primitive<Uri> = "source",
        profile: primitives<Canonical> = "profile",
        security: records<Coding> = "security",
        tag: records<Coding> = "tag",
    }
}

fhir_record! {
    /// Human-readable summary of a resource.
    pub struct Narrative: "Narrative" {
        id: attribute<String> = "id",
        extension: records<Extension> = "extension",
        status: primitive<Code> = "status",
        div: xhtml<Xhtml> = "div",
    }
}

impl Coding {
    pub fn new(system: &str, code: &str) -> Self {
        Self {
            system: Some(crate::primitives::Uri::from(system).into()),
            code: Some(crate::primitives::Code::from(code).into()),
            ..Self::default()
        }
    }
}

impl Reference {
    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(Element::new(reference.into())),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::Choice;
    use crate::record::Record;
    use helios_fhirpath_support::{FhirNode, PrimitiveValue, TypeInfoResult};

    #[test]
    fn test_record_children_in_schema_order() {
        let name = HumanName {
            family: Some("Chalmers".into()),
            given: vec!["Peter".into(), "James".into()],
            ..HumanName::default()
        };
        let names: Vec<_> = name.children(None).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["family", "given", "given"]);

        let given = name.children(Some("given"));
        assert_eq!(given.len(), 2);
        assert_eq!(
            given[1].node.primitive_value(),
            Some(PrimitiveValue::String("James".into()))
        );
    }

    #[test]
    fn test_choice_child_uses_logical_name() {
        let note = Annotation {
            author: Some(AnnotationAuthor::String(Element::new("Dr. Who".to_string()))),
            ..Annotation::default()
        };
        let author = note.children(Some("author"));
        assert_eq!(author.len(), 1);
        assert_eq!(author[0].node.type_info(), TypeInfoResult::fhir("string"));
        assert!(note.children(Some("authorString")).is_empty());
        assert_eq!(AnnotationAuthor::TYPES, &["Reference", "String"]);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Coding::TYPE_NAME, "Coding");
        assert_eq!(<Box<Reference> as Record>::TYPE_NAME, "Reference");
        assert_eq!(
            Coding::new("http://loinc.org", "1234-5").type_info(),
            TypeInfoResult::fhir("Coding")
        );
    }
}
