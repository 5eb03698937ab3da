#![cfg(feature = "xml")]

use helios_fhir::{
    Element, Extension, ExtensionValue, Narrative, Observation, Patient, Resource, Xhtml,
};
use helios_serde::xml::{from_xml_reader, from_xml_str, to_xml_string};
use helios_serde::{ErrorKind, Result, SerdeError, from_json_str};

const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[test]
fn test_xml_primitive_with_metadata() -> Result<()> {
    let patient = Patient {
        birth_date: Some(
            Element::new("1974-12-25".into())
                .with_id("bd1")
                .with_extension(Extension::new(
                    "http://example.org/precision",
                    ExtensionValue::String(Element::from("day")),
                )),
        ),
        ..Patient::default()
    };

    let xml = to_xml_string(&patient)?;
    println!("XML output:\n{}", xml);
    assert_eq!(
        xml,
        format!(
            "{DECL}{}",
            r#"<Patient xmlns="http://hl7.org/fhir"><birthDate id="bd1" value="1974-12-25"><extension url="http://example.org/precision"><valueString value="day"/></extension></birthDate></Patient>"#
        )
    );

    let back: Patient = from_xml_str(&xml)?;
    assert_eq!(back, patient);
    Ok(())
}

#[test]
fn test_xml_repeated_primitives_match_json() -> Result<()> {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir">
      <name>
        <given value="A"/>
        <given id="x"/>
      </name>
    </Patient>"#;
    let json = r#"{"resourceType":"Patient","name":[{"given":["A",null],"_given":[null,{"id":"x"}]}]}"#;

    let from_xml: Patient = from_xml_str(xml)?;
    let from_json: Patient = from_json_str(json)?;
    assert_eq!(from_xml, from_json);
    Ok(())
}

#[test]
fn test_xml_element_id_is_an_attribute() -> Result<()> {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><name id="n1"><family value="Doe"/></name></Patient>"#;
    let patient: Patient = from_xml_str(xml)?;
    assert_eq!(patient.name[0].id.as_deref(), Some("n1"));
    assert!(to_xml_string(&patient)?.ends_with(xml));
    Ok(())
}

#[test]
fn test_xml_choice_and_decimal() -> Result<()> {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Observation xmlns="http://hl7.org/fhir">
  <status value="final"/>
  <valueQuantity>
    <value value="70.000"/>
    <unit value="kg"/>
  </valueQuantity>
</Observation>"#;
    let observation: Observation = from_xml_str(xml)?;
    assert_eq!(
        helios_serde::to_json_string(&observation)?,
        r#"{"resourceType":"Observation","status":"final","valueQuantity":{"value":70.000,"unit":"kg"}}"#
    );
    Ok(())
}

#[test]
fn test_xml_contained_resource_is_wrapped() -> Result<()> {
    let json = r##"{"resourceType":"Patient","contained":[{"resourceType":"Organization","id":"org1","name":"Acme"}],"managingOrganization":{"reference":"#org1"}}"##;
    let patient: Patient = from_json_str(json)?;

    let xml = to_xml_string(&patient)?;
    assert!(xml.ends_with(
        r##"<Patient xmlns="http://hl7.org/fhir"><contained><Organization><id value="org1"/><name value="Acme"/></Organization></contained><managingOrganization><reference value="#org1"/></managingOrganization></Patient>"##
    ));

    let back: Patient = from_xml_str(&xml)?;
    assert_eq!(back, patient);
    Ok(())
}

#[test]
fn test_xml_narrative_div_keeps_markup() -> Result<()> {
    let xml = "<Patient xmlns=\"http://hl7.org/fhir\"><text><status value=\"generated\"/>\
        <div xmlns=\"http://www.w3.org/1999/xhtml\">\n  <p>Hi <b>there</b></p>\n</div></text></Patient>";
    let patient: Patient = from_xml_str(xml)?;

    let div = patient.text.as_ref().and_then(|t| t.div.as_ref()).expect("div");
    assert_eq!(
        div.as_str(),
        "<div xmlns=\"http://www.w3.org/1999/xhtml\">\n  <p>Hi <b>there</b></p>\n</div>"
    );

    let written = to_xml_string(&patient)?;
    assert!(written.contains(div.as_str()), "{written}");
    Ok(())
}

#[test]
fn test_xml_div_without_namespace_gets_one() -> Result<()> {
    let json = r#"{"resourceType":"Patient","text":{"status":"generated","div":"<div><p>Hi</p></div>"}}"#;
    let patient: Patient = from_json_str(json)?;
    let xml = to_xml_string(&patient)?;
    assert!(xml.contains(r#"<div xmlns="http://www.w3.org/1999/xhtml"><p>Hi</p></div>"#), "{xml}");
    Ok(())
}

#[test]
fn test_xml_escaped_values_round_trip() -> Result<()> {
    let patient: Patient = from_json_str(
        r#"{"resourceType":"Patient","name":[{"family":"O'Brien & <Sons> \"Ltd\""}]}"#,
    )?;
    let xml = to_xml_string(&patient)?;
    let back: Patient = from_xml_str(&xml)?;
    assert_eq!(back, patient);
    Ok(())
}

#[test]
fn test_xml_comments_and_empty_primitives_ignored() -> Result<()> {
    let xml = r#"<?xml version="1.0"?>
<!-- leading comment -->
<Patient xmlns="http://hl7.org/fhir">
  <!-- inner comment -->
  <active/>
  <gender value="female"/>
</Patient>"#;
    let patient: Patient = from_xml_str(xml)?;
    assert!(patient.active.is_none());
    assert_eq!(patient.gender.and_then(|g| g.value).map(|g| g.to_string()), Some("female".into()));
    Ok(())
}

#[test]
fn test_xml_reader_input() -> Result<()> {
    let xml = br#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/></Patient>"#;
    let resource: Resource = from_xml_reader(&xml[..])?;
    assert_eq!(resource.resource_type(), "Patient");
    Ok(())
}

#[test]
fn test_xml_wrong_root_namespace() {
    let err = from_xml_str::<Patient>(r#"<Patient xmlns="http://example.org/other"/>"#).unwrap_err();
    match err {
        SerdeError::WrongNamespace { element, expected, found } => {
            assert_eq!(element, "Patient");
            assert_eq!(expected, "http://hl7.org/fhir");
            assert_eq!(found, "http://example.org/other");
        }
        other => panic!("expected WrongNamespace, got {other:?}"),
    }

    let err = from_xml_str::<Patient>("<Patient/>").unwrap_err();
    assert!(matches!(err, SerdeError::WrongNamespace { ref found, .. } if found == "(none)"));
}

#[test]
fn test_xml_member_in_foreign_namespace() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><x:active xmlns:x="urn:other" value="true"/></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    assert!(matches!(err, SerdeError::WrongNamespace { ref element, .. } if element == "active"));
}

#[test]
fn test_xml_div_requires_xhtml_namespace() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><text><status value="generated"/><div><p>x</p></div></text></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    assert!(matches!(err, SerdeError::WrongNamespace { ref element, .. } if element == "div"));
}

#[test]
fn test_xml_unknown_attribute_on_primitive() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><active value="true" foo="x"/></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    match err {
        SerdeError::UnknownAttribute { element, attribute } => {
            assert_eq!(element, "active");
            assert_eq!(attribute, "foo");
        }
        other => panic!("expected UnknownAttribute, got {other:?}"),
    }
}

#[test]
fn test_xml_resource_id_is_not_an_attribute() {
    let err = from_xml_str::<Patient>(r#"<Patient xmlns="http://hl7.org/fhir" id="p1"/>"#)
        .unwrap_err();
    assert!(matches!(
        err,
        SerdeError::UnknownAttribute { ref element, ref attribute } if element == "Patient" && attribute == "id"
    ));
}

#[test]
fn test_xml_element_id_is_not_a_child() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><name><id value="n1"/></name></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    assert!(matches!(err, SerdeError::UnexpectedContent { .. }), "{err:?}");
}

#[test]
fn test_xml_unknown_element() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><nickname value="Bob"/></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    assert!(matches!(
        err,
        SerdeError::UnknownMember { ref type_name, ref member } if type_name == "Patient" && member == "nickname"
    ));
}

#[test]
fn test_xml_unknown_child_of_primitive() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"><note/></active></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    assert!(matches!(
        err,
        SerdeError::UnknownMember { ref type_name, ref member } if type_name == "boolean" && member == "note"
    ));
}

#[test]
fn test_xml_duplicate_member() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/><active value="false"/></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    assert!(matches!(
        err,
        SerdeError::DuplicateMember { ref type_name, ref member } if type_name == "Patient" && member == "active"
    ));

    let xml = r#"<Observation xmlns="http://hl7.org/fhir"><valueString value="a"/><valueString value="b"/></Observation>"#;
    let err = from_xml_str::<Observation>(xml).unwrap_err();
    assert!(matches!(err, SerdeError::DuplicateMember { ref member, .. } if member == "valueString"));
}

#[test]
fn test_xml_choice_conflict() {
    let xml = r#"<Observation xmlns="http://hl7.org/fhir"><valueString value="a"/><valueBoolean value="true"/></Observation>"#;
    let err = from_xml_str::<Observation>(xml).unwrap_err();
    match err {
        SerdeError::MultipleChoiceValues { type_name, field, first, second } => {
            assert_eq!(type_name, "Observation");
            assert_eq!(field, "value");
            assert_eq!(first, "valueString");
            assert_eq!(second, "valueBoolean");
        }
        other => panic!("expected MultipleChoiceValues, got {other:?}"),
    }
}

#[test]
fn test_xml_contained_holds_exactly_one_resource() {
    let two = r#"<Patient xmlns="http://hl7.org/fhir"><contained><Organization/><Patient/></contained></Patient>"#;
    assert!(matches!(
        from_xml_str::<Patient>(two),
        Err(SerdeError::UnexpectedContent { .. })
    ));

    let none = r#"<Patient xmlns="http://hl7.org/fhir"><contained/></Patient>"#;
    assert!(matches!(
        from_xml_str::<Patient>(none),
        Err(SerdeError::UnexpectedContent { .. })
    ));
}

#[test]
fn test_xml_unknown_resource_type() {
    let err = from_xml_str::<Resource>(r#"<Spaceship xmlns="http://hl7.org/fhir"/>"#).unwrap_err();
    assert!(matches!(err, SerdeError::UnknownResourceType(ref tag) if tag == "Spaceship"));
}

#[test]
fn test_xml_wrong_resource_type() {
    let err = from_xml_str::<Patient>(r#"<Organization xmlns="http://hl7.org/fhir"/>"#).unwrap_err();
    assert!(matches!(
        err,
        SerdeError::WrongResourceType { ref expected, ref found } if expected == "Patient" && found == "Organization"
    ));
}

#[test]
fn test_xml_content_after_root() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"/><Patient xmlns="http://hl7.org/fhir"/>"#;
    assert!(matches!(
        from_xml_str::<Patient>(xml),
        Err(SerdeError::UnexpectedContent { .. })
    ));
}

#[test]
fn test_xml_invalid_value_attribute() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><active value="yes"/></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Representation);
}

#[test]
fn test_xml_malformed_document() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    assert!(matches!(err, SerdeError::Xml(_)), "{err:?}");
}

#[test]
fn test_xml_choice_conflict_after_empty_alternative() {
    let xml = r#"<Observation xmlns="http://hl7.org/fhir"><valueBoolean/><valueString value="a"/></Observation>"#;
    let err = from_xml_str::<Observation>(xml).unwrap_err();
    assert!(matches!(err, SerdeError::MultipleChoiceValues { .. }), "{err:?}");
}

#[test]
fn test_xml_extension_requires_url() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><extension><valueString value="x"/></extension></Patient>"#;
    let err = from_xml_str::<Patient>(xml).unwrap_err();
    assert!(
        matches!(err, SerdeError::MissingMember { ref member, .. } if member == "url"),
        "{err:?}"
    );
}

#[test]
fn test_xml_writer_rejects_non_div_narrative() {
    let patient = Patient {
        text: Some(Narrative {
            status: Some(Element::new("generated".into())),
            div: Some(Xhtml::new("<p>x</p>")),
            ..Narrative::default()
        }),
        ..Patient::default()
    };
    let err = to_xml_string(&patient).unwrap_err();
    assert!(matches!(err, SerdeError::InvalidValue { .. }), "{err:?}");
}
