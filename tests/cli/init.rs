use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["includes", "ignores", "sourceRoot", "libraries", "excludeFunctions"] {
        assert!(parsed.get(field).is_some(), "Config should have '{field}' field");
    }
    assert_eq!(parsed["libraries"][0], "lodash");

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    let out = run(cmd)?;
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Created .nativizerc.json"));

    assert!(test.root().join(".nativizerc.json").exists());
    let content = test.read_file(".nativizerc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_keeps_existing_config() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".nativizerc.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    let out = run(cmd)?;
    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains(".nativizerc.json already exists"));
    assert_eq!(test.read_file(".nativizerc.json")?, "{}");

    Ok(())
}
