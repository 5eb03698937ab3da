use std::fs;

use helios_convert::{ConvertConfig, Format, convert, run};

const PATIENT_JSON: &str = r#"{"resourceType":"Patient","id":"example","name":[{"family":"Chalmers","given":["Peter"]}],"birthDate":"1974-12-25"}"#;

#[test]
fn test_convert_json_file_to_xml_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("patient.json");
    let output = dir.path().join("patient.xml");
    fs::write(&input, PATIENT_JSON)?;

    let config = ConvertConfig {
        input: Some(input),
        output: Some(output.clone()),
        ..Default::default()
    };
    config.validate().map_err(|e| anyhow::anyhow!(e.join("; ")))?;
    let resource = run(&config)?;
    assert_eq!(resource.resource_type(), "Patient");

    let xml = fs::read_to_string(&output)?;
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<id value="example"/>"#));
    assert!(xml.contains(r#"<name><family value="Chalmers"/><given value="Peter"/></name>"#));
    Ok(())
}

#[test]
fn test_convert_xml_back_to_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let xml_path = dir.path().join("patient.xml");
    let json_path = dir.path().join("patient.json");
    fs::write(&xml_path, convert(PATIENT_JSON.as_bytes(), Format::Json, Format::Xml, false)?)?;

    run(&ConvertConfig {
        input: Some(xml_path),
        output: Some(json_path.clone()),
        ..Default::default()
    })?;
    assert_eq!(fs::read_to_string(&json_path)?, PATIENT_JSON);
    Ok(())
}

#[test]
fn test_pretty_json() -> anyhow::Result<()> {
    let pretty = convert(PATIENT_JSON.as_bytes(), Format::Json, Format::Json, true)?;
    assert!(pretty.contains("\n  \"id\": \"example\""));
    Ok(())
}

#[test]
fn test_check_rejects_invalid_input() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("bad.json");
    fs::write(&input, r#"{"resourceType":"Patient","nickname":"Pete"}"#)?;

    let config = ConvertConfig {
        input: Some(input),
        check: true,
        ..Default::default()
    };
    let err = run(&config).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("invalid FHIR json input"), "{message}");
    assert!(message.contains("nickname"), "{message}");
    Ok(())
}

#[test]
fn test_check_writes_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("patient.json");
    let output = dir.path().join("patient.xml");
    fs::write(&input, PATIENT_JSON)?;

    run(&ConvertConfig {
        input: Some(input),
        output: Some(output.clone()),
        check: true,
        ..Default::default()
    })?;
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_missing_input_file() {
    let config = ConvertConfig {
        input: Some("does/not/exist.json".into()),
        ..Default::default()
    };
    let err = run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read"));
}
