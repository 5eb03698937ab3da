use helios_fhir::{
    Element, Extension, ExtensionValue, HumanName, Observation, ObservationValue, Organization,
    Patient, PatientDeceased, Quantity, Resource,
};
use helios_serde::json::{from_json_str, to_json_string, to_json_value};
use helios_serde::{ErrorKind, Result, SerdeError};
use rust_decimal_macros::dec;
use serde_json::json;

fn round_trip(input: &str) -> Result<String> {
    let resource: Resource = from_json_str(input)?;
    to_json_string(&resource)
}

#[test]
fn test_primitive_list_with_metadata_gap() -> Result<()> {
    let input = r#"{"resourceType":"Patient","name":[{"given":["A",null],"_given":[null,{"id":"x"}]}]}"#;
    let patient: Patient = from_json_str(input)?;

    let given = &patient.name[0].given;
    assert_eq!(given.len(), 2);
    assert_eq!(given[0].value.as_deref(), Some("A"));
    assert!(!given[0].has_metadata());
    assert_eq!(given[1].value, None);
    assert_eq!(given[1].id.as_deref(), Some("x"));

    assert_eq!(to_json_string(&patient)?, input);
    Ok(())
}

#[test]
fn test_primitive_list_metadata_stays_index_aligned() -> Result<()> {
    let name = HumanName {
        given: vec![
            Element::from("a").with_id("0"),
            Element::from("b"),
            Element::from("c").with_id("2"),
        ],
        ..HumanName::default()
    };
    let patient = Patient {
        name: vec![name],
        ..Patient::default()
    };

    let value = to_json_value(&patient)?;
    assert_eq!(
        value["name"][0],
        json!({
            "given": ["a", "b", "c"],
            "_given": [{"id": "0"}, null, {"id": "2"}]
        })
    );

    let back: Patient = from_json_str(&value.to_string())?;
    assert_eq!(back, patient);
    Ok(())
}

#[test]
fn test_primitive_metadata_with_extension() -> Result<()> {
    let input = r#"{"resourceType":"Patient","birthDate":"1974-12-25","_birthDate":{"id":"bd1","extension":[{"url":"http://example.org/precision","valueString":"day"}]}}"#;
    let patient: Patient = from_json_str(input)?;

    let birth_date = patient.birth_date.as_ref().expect("birthDate");
    assert_eq!(birth_date.value.as_ref().map(|d| d.as_str()), Some("1974-12-25"));
    assert_eq!(birth_date.id.as_deref(), Some("bd1"));
    assert_eq!(birth_date.extension[0].url, "http://example.org/precision");
    assert_eq!(to_json_string(&patient)?, input);
    Ok(())
}

#[test]
fn test_metadata_only_primitive() -> Result<()> {
    let input = r#"{"resourceType":"Patient","_active":{"id":"a1"}}"#;
    let patient: Patient = from_json_str(input)?;
    let active = patient.active.as_ref().expect("active");
    assert_eq!(active.value, None);
    assert_eq!(active.id.as_deref(), Some("a1"));
    assert_eq!(to_json_string(&patient)?, input);
    Ok(())
}

#[test]
fn test_resource_type_may_come_last() -> Result<()> {
    let patient: Patient = from_json_str(r#"{"active":true,"resourceType":"Patient"}"#)?;
    assert_eq!(patient.active.and_then(|a| a.value), Some(true));
    Ok(())
}

#[test]
fn test_choice_value_uses_type_suffix() -> Result<()> {
    let observation = Observation {
        status: Some(Element::new("final".into())),
        value: Some(ObservationValue::Quantity(Quantity {
            value: Some(Element::new(dec!(1.50))),
            unit: Some(Element::from("kg")),
            ..Quantity::default()
        })),
        ..Observation::default()
    };

    let json = to_json_string(&observation)?;
    assert_eq!(
        json,
        r#"{"resourceType":"Observation","status":"final","valueQuantity":{"value":1.50,"unit":"kg"}}"#
    );
    let back: Observation = from_json_str(&json)?;
    assert_eq!(back, observation);
    Ok(())
}

#[test]
fn test_decimal_keeps_trailing_zeros() -> Result<()> {
    let input = r#"{"resourceType":"Observation","status":"final","code":{"text":"Weight"},"valueQuantity":{"value":70.000,"unit":"kg"}}"#;
    assert_eq!(round_trip(input)?, input);
    Ok(())
}

#[test]
fn test_choice_rejects_second_alternative() {
    let input = r#"{"resourceType":"Observation","valueString":"a","valueBoolean":true}"#;
    let err = from_json_str::<Observation>(input).unwrap_err();
    match &err {
        SerdeError::MultipleChoiceValues { type_name, field, .. } => {
            assert_eq!(type_name, "Observation");
            assert_eq!(field, "value");
        }
        other => panic!("expected MultipleChoiceValues, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_choice_rejects_logical_name_and_unknown_suffix() {
    for input in [
        r#"{"resourceType":"Observation","value":"a"}"#,
        r#"{"resourceType":"Observation","valueCoding":{"code":"a"}}"#,
        r#"{"resourceType":"Observation","valuestring":"a"}"#,
    ] {
        let err = from_json_str::<Observation>(input).unwrap_err();
        assert!(
            matches!(err, SerdeError::UnknownMember { .. }),
            "{input}: {err:?}"
        );
    }
}

#[test]
fn test_patient_deceased_choice() -> Result<()> {
    let patient: Patient = from_json_str(r#"{"resourceType":"Patient","deceasedBoolean":false}"#)?;
    assert!(matches!(
        patient.deceased,
        Some(PatientDeceased::Boolean(Element { value: Some(false), .. }))
    ));
    Ok(())
}

#[test]
fn test_unknown_member_rejected() {
    let err = from_json_str::<Resource>(r#"{"resourceType":"Patient","nickname":"Bob"}"#)
        .unwrap_err();
    match err {
        SerdeError::UnknownMember { type_name, member } => {
            assert_eq!(type_name, "Patient");
            assert_eq!(member, "nickname");
        }
        other => panic!("expected UnknownMember, got {other:?}"),
    }
}

#[test]
fn test_unknown_member_in_nested_record() {
    let input = r#"{"resourceType":"Patient","name":[{"family":"Doe","middle":"Q"}]}"#;
    let err = from_json_str::<Patient>(input).unwrap_err();
    assert!(matches!(
        err,
        SerdeError::UnknownMember { ref type_name, ref member } if type_name == "HumanName" && member == "middle"
    ));
}

#[test]
fn test_metadata_object_is_closed() {
    let input = r#"{"resourceType":"Patient","active":true,"_active":{"url":"x"}}"#;
    let err = from_json_str::<Patient>(input).unwrap_err();
    assert!(matches!(
        err,
        SerdeError::UnknownMember { ref type_name, ref member } if type_name == "Element" && member == "url"
    ));
}

#[test]
fn test_metadata_must_be_object() {
    let input = r#"{"resourceType":"Patient","active":true,"_active":"x"}"#;
    let err = from_json_str::<Patient>(input).unwrap_err();
    assert!(matches!(err, SerdeError::InvalidValue { .. }), "{err:?}");
}

#[test]
fn test_metadata_sibling_of_record_rejected() {
    let input = r#"{"resourceType":"Patient","name":[{"family":"Doe"}],"_name":{"id":"n"}}"#;
    let err = from_json_str::<Patient>(input).unwrap_err();
    assert!(matches!(
        err,
        SerdeError::UnknownMember { ref member, .. } if member == "_name"
    ));
}

#[test]
fn test_repeated_member_requires_array() {
    let input = r#"{"resourceType":"Patient","name":{"family":"Doe"}}"#;
    let err = from_json_str::<Patient>(input).unwrap_err();
    match err {
        SerdeError::InvalidValue { type_name, member, message } => {
            assert_eq!(type_name, "Patient");
            assert_eq!(member, "name");
            assert!(message.contains("array"), "{message}");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn test_primitive_wrong_json_type() {
    let err = from_json_str::<Patient>(r#"{"resourceType":"Patient","active":"true"}"#)
        .unwrap_err();
    assert!(matches!(err, SerdeError::InvalidValue { .. }), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::Representation);
}

#[test]
fn test_invalid_lexical_form() {
    let err = from_json_str::<Patient>(r#"{"resourceType":"Patient","birthDate":"25/12/1974"}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Representation);
}

#[test]
fn test_resource_type_errors() {
    assert!(matches!(
        from_json_str::<Resource>(r#"{"active":true}"#),
        Err(SerdeError::MissingResourceType)
    ));
    assert!(matches!(
        from_json_str::<Resource>(r#"{"resourceType":"Spaceship"}"#),
        Err(SerdeError::UnknownResourceType(ref tag)) if tag == "Spaceship"
    ));
    assert!(matches!(
        from_json_str::<Resource>(r#"["Patient"]"#),
        Err(SerdeError::UnexpectedContent { .. })
    ));
}

#[test]
fn test_wrong_resource_type_for_concrete_target() {
    let err = from_json_str::<Patient>(r#"{"resourceType":"Organization","name":"Acme"}"#)
        .unwrap_err();
    match err {
        SerdeError::WrongResourceType { expected, found } => {
            assert_eq!(expected, "Patient");
            assert_eq!(found, "Organization");
        }
        other => panic!("expected WrongResourceType, got {other:?}"),
    }
}

#[test]
fn test_empty_members_are_dropped() -> Result<()> {
    let input = r#"{"resourceType":"Patient","name":[],"identifier":[],"telecom":[{"value":"555"}],"_gender":{}}"#;
    assert_eq!(round_trip(input)?, r#"{"resourceType":"Patient","telecom":[{"value":"555"}]}"#);
    Ok(())
}

#[test]
fn test_null_only_list_entries_are_dropped() -> Result<()> {
    let input = r#"{"resourceType":"Patient","name":[{"given":["A",null,"B"]}]}"#;
    let patient: Patient = from_json_str(input)?;
    assert_eq!(patient.name[0].given.len(), 2);
    assert_eq!(
        to_json_string(&patient)?,
        r#"{"resourceType":"Patient","name":[{"given":["A","B"]}]}"#
    );
    Ok(())
}

#[test]
fn test_contained_resources() -> Result<()> {
    let input = r##"{"resourceType":"Patient","contained":[{"resourceType":"Organization","id":"org1","name":"Acme"}],"managingOrganization":{"reference":"#org1"}}"##;
    let patient: Patient = from_json_str(input)?;

    assert_eq!(patient.contained.len(), 1);
    assert_eq!(patient.contained[0].resource_type(), "Organization");
    assert_eq!(patient.contained[0].id(), Some("org1"));
    assert_eq!(to_json_string(&patient)?, input);
    Ok(())
}

#[test]
fn test_contained_without_resource_type() {
    let input = r#"{"resourceType":"Patient","contained":[{"id":"org1"}]}"#;
    assert!(matches!(
        from_json_str::<Patient>(input),
        Err(SerdeError::MissingResourceType)
    ));
}

#[test]
fn test_nested_extensions() -> Result<()> {
    let organization = Organization {
        name: Some(Element::from("Acme")),
        extension: vec![Extension::nested(
            "http://example.org/address",
            vec![
                Extension::new("city", ExtensionValue::String(Element::from("Springfield"))),
                Extension::new("zip", ExtensionValue::Code(Element::new("12345".into()))),
            ],
        )],
        ..Organization::default()
    };

    let json = to_json_string(&organization)?;
    assert_eq!(
        json,
        r#"{"resourceType":"Organization","extension":[{"url":"http://example.org/address","extension":[{"url":"city","valueString":"Springfield"},{"url":"zip","valueCode":"12345"}]}],"name":"Acme"}"#
    );
    let back: Organization = from_json_str(&json)?;
    assert_eq!(back, organization);
    Ok(())
}

#[test]
fn test_narrative_div_is_a_string() -> Result<()> {
    let input = r#"{"resourceType":"Patient","text":{"status":"generated","div":"<div xmlns=\"http://www.w3.org/1999/xhtml\"><p>Hi</p></div>"}}"#;
    let patient: Patient = from_json_str(input)?;
    let div = patient.text.as_ref().and_then(|t| t.div.as_ref()).expect("div");
    assert_eq!(div.as_str(), r#"<div xmlns="http://www.w3.org/1999/xhtml"><p>Hi</p></div>"#);
    assert_eq!(to_json_string(&patient)?, input);
    Ok(())
}

#[test]
fn test_syntax_error_is_json_error() {
    let err = from_json_str::<Resource>(r#"{"resourceType":"Patient""#).unwrap_err();
    assert!(matches!(err, SerdeError::Json(_)));
}

#[test]
fn test_choice_conflict_after_metadata_only_alternative() {
    let input = r#"{"resourceType":"Observation","_valueBoolean":{},"valueString":"a"}"#;
    let err = from_json_str::<Observation>(input).unwrap_err();
    match &err {
        SerdeError::MultipleChoiceValues { type_name, field, .. } => {
            assert_eq!(type_name, "Observation");
            assert_eq!(field, "value");
        }
        other => panic!("expected MultipleChoiceValues, got {other:?}"),
    }
}

#[test]
fn test_empty_choice_alternative_decodes_to_none() -> Result<()> {
    let observation: Observation =
        from_json_str(r#"{"resourceType":"Observation","_valueBoolean":{}}"#)?;
    assert_eq!(observation.value, None);
    Ok(())
}

#[test]
fn test_extension_requires_url() {
    let input = r#"{"resourceType":"Patient","extension":[{"valueString":"x"}]}"#;
    let err = from_json_str::<Patient>(input).unwrap_err();
    match &err {
        SerdeError::MissingMember { type_name, member } => {
            assert_eq!(type_name, "Extension");
            assert_eq!(member, "url");
        }
        other => panic!("expected MissingMember, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_narrative_div_must_be_a_div_element() {
    for div in [
        r#""<p>x</p>""#,
        r#""<div xmlns=\"http://example.org\">x</div>""#,
        r#""Hi""#,
    ] {
        let input =
            format!(r#"{{"resourceType":"Patient","text":{{"status":"generated","div":{div}}}}}"#);
        let err = from_json_str::<Patient>(&input).unwrap_err();
        assert!(
            matches!(err, SerdeError::InvalidValue { ref member, .. } if member == "div"),
            "{div}: {err:?}"
        );
        assert_eq!(err.kind(), ErrorKind::Representation);
    }
}
