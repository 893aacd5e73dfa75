use crate::ConfigLoadError;
use crate::FieldPath;
use crate::StitchPipelineConfig;
use crate::StitchQueryOptions;
use crate::StitchSpec;

#[test]
fn options_deserialize_from_camel_case_json() {
    let options: StitchQueryOptions = serde_json::from_str(r#"{
        "path": ["customerById"],
        "fromStitch": { "path": ["address"] },
        "toStitch": { "selectionSet": "{ id ...PreStitch }" }
    }"#).unwrap();

    assert_eq!(options.path, FieldPath::from(["customerById"]));
    assert_eq!(options.from_stitch, StitchSpec::path(["address"]));
    assert_eq!(options.to_stitch, StitchSpec::selection_set("{ id ...PreStitch }"));
    assert!(options.fragments.is_empty());
}

#[test]
fn omitted_specs_are_noops() {
    let options: StitchQueryOptions =
        serde_json::from_str(r#"{ "path": ["customerById"], "toStitch": {} }"#).unwrap();

    assert!(options.from_stitch.is_noop());
    assert!(options.to_stitch.is_noop());
}

#[test]
fn spec_with_path_and_selection_set_is_rejected() {
    let result = serde_json::from_str::<StitchSpec>(
        r#"{ "path": ["address"], "selectionSet": "{ id }" }"#,
    );
    assert!(result.is_err());
}

#[test]
fn spec_with_unknown_key_is_rejected() {
    let result = serde_json::from_str::<StitchSpec>(r#"{ "fragment": "F" }"#);
    assert!(result.is_err());
}

#[test]
fn spec_serializes_back_to_its_json_form() {
    let json = serde_json::to_value(StitchSpec::path(["address"])).unwrap();
    assert_eq!(json, serde_json::json!({ "path": ["address"] }));

    let json = serde_json::to_value(StitchSpec::Noop).unwrap();
    assert_eq!(json, serde_json::json!({}));
}

#[test]
fn pipeline_config_from_str() {
    let config = StitchPipelineConfig::from_str(r#"{
        "operationName": "customerQuery",
        "transforms": [
            { "path": ["customerById"], "fromStitch": { "path": ["address"] } },
            { "path": ["customerById"], "toStitch": { "selectionSet": "{ id }" } }
        ]
    }"#).unwrap();

    assert_eq!(config.operation_name.as_deref(), Some("customerQuery"));
    assert_eq!(config.transforms.len(), 2);
    assert_eq!(config.transforms[1].to_stitch, StitchSpec::selection_set("{ id }"));
}

#[test]
fn pipeline_config_parse_error() {
    let result = StitchPipelineConfig::from_str(r#"{ "transforms": 1 }"#);
    assert!(matches!(result, Err(ConfigLoadError::ParseError(_))));
}

#[test]
fn pipeline_config_missing_file() {
    let path = std::env::temp_dir().join("libgraphql-stitch-missing-config.json");
    let result = StitchPipelineConfig::from_file(&path);
    assert!(matches!(result, Err(ConfigLoadError::FileReadError(_))));
}
