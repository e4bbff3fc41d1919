use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = LinkGlobsConfig::default();
    assert_eq!(config.match_pattern, "**/*.html");
    assert_eq!(config.encoding, "utf8");
    assert_eq!(config.match_options, MatchOptions::default());
    assert_eq!(
        config.nodes.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["a:href", "img:src", "link:href", "script:src"]
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_loads_defaults() {
    let config = load(None, None::<&()>).expect("Should load default config");
    assert_eq!(config.match_pattern, "**/*.html");
    assert_eq!(config.nodes, NodeDefinition::defaults());
}

#[test]
fn test_custom_toml_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("custom.toml");
    fs::write(
        &path,
        r#"
match = "**/*.def"
encoding = "latin1"

[match_options]
dot = true

[[nodes]]
element = "div"
property = "data-filename"
"#,
    )?;

    let config = load(Some(&path), None::<&()>)?;
    assert_eq!(config.match_pattern, "**/*.def");
    assert_eq!(config.encoding, "latin1");
    assert!(config.match_options.dot);
    assert!(!config.element_match_options.dot);
    assert_eq!(config.nodes, vec![NodeDefinition::new("div", "data-filename")]);
    Ok(())
}

#[test]
fn test_custom_json_file_merges_nested_options() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("custom.json");
    fs::write(&path, r#"{ "element_match_options": { "dot": true, "match_base": true } }"#)?;

    let config = load(Some(&path), None::<&()>)?;
    assert!(config.element_match_options.dot);
    assert!(config.element_match_options.match_base);
    assert_eq!(config.nodes.len(), 4);
    Ok(())
}

#[test]
fn test_camel_case_option_keys() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("custom.json");
    fs::write(
        &path,
        r#"{
            "matchOptions": { "dot": true },
            "elementMatchOptions": { "matchBase": true, "nocase": true },
            "parallel": { "maxThreads": 2 }
        }"#,
    )?;

    let config = load(Some(&path), None::<&()>)?;
    assert!(config.match_options.dot);
    assert!(config.element_match_options.match_base);
    assert!(config.element_match_options.nocase);
    assert!(!config.element_match_options.dot);
    assert_eq!(config.parallel.max_threads, 2);
    Ok(())
}

#[test]
fn test_snake_case_key_wins_over_camel_case() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("custom.yaml");
    fs::write(&path, "matchOptions:\n  dot: true\nmatch_options:\n  dot: false\n  nocase: true\n")?;

    let config = load(Some(&path), None::<&()>)?;
    assert!(!config.match_options.dot);
    assert!(config.match_options.nocase);
    Ok(())
}

#[test]
fn test_missing_custom_file_is_an_error() {
    let result = load(Some(Path::new("does-not-exist.toml")), None::<&()>);
    assert!(result.is_err());
}

#[test]
fn test_cli_overrides_win() -> anyhow::Result<()> {
    let overrides = serde_json::json!({
        "match": "pages/**/*.htm",
        "element_match_options": { "dot": true }
    });
    let config = load(None, Some(overrides))?;
    assert_eq!(config.match_pattern, "pages/**/*.htm");
    assert!(config.element_match_options.dot);
    assert_eq!(config.encoding, "utf8");
    Ok(())
}

#[test]
fn test_node_without_property_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("bad.yaml");
    fs::write(&path, "nodes:\n  - element: div\n")?;

    let err = load(Some(&path), None::<&()>).unwrap_err();
    assert!(err.to_string().contains("missing 'property'"), "{}", err);
    Ok(())
}

#[test]
fn test_validate_rejects_bad_values() {
    let config = LinkGlobsConfig {
        encoding: "klingon".to_string(),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ExpandError::Configuration(_))));

    let config = LinkGlobsConfig {
        nodes: vec![NodeDefinition::new("", "src")],
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ExpandError::Configuration(_))));

    let config = LinkGlobsConfig {
        match_pattern: " ".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_node_definition_from_str() {
    assert_eq!("div:data-src".parse::<NodeDefinition>(), Ok(NodeDefinition::new("div", "data-src")));
    assert_eq!("source/srcset".parse::<NodeDefinition>(), Ok(NodeDefinition::new("source", "srcset")));
    assert!("div".parse::<NodeDefinition>().is_err());
    assert!(":src".parse::<NodeDefinition>().is_err());
}
