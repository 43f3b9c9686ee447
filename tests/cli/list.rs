use anyhow::Result;

use crate::{CliTest, run};

#[test]
fn test_list_all() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("list");
    let out = run(cmd)?;
    assert_eq!(out.code, Some(0));

    let keys = out
        .stdout
        .lines()
        .find(|line| line.starts_with("keys "))
        .expect("keys is listed");
    assert!(keys.contains("Object.keys"));
    assert!(keys.contains("Object"));
    assert!(out.stdout.contains("function(s)"));

    Ok(())
}

#[test]
fn test_list_category() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.args(["list", "--category", "lang"]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("isArray"));
    assert!(!out.stdout.contains("Object.keys"));

    Ok(())
}

#[test]
fn test_list_unknown_category() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.args(["list", "--category", "Regex"]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("Unknown category 'Regex'"));

    Ok(())
}

#[test]
fn test_list_includes_configured_alternatives() -> Result<()> {
    let test = CliTest::with_file(
        ".nativizerc.json",
        r#"{ "alternatives": { "myHelper": "value.trim()" } }"#,
    )?;

    let mut cmd = test.command();
    cmd.args(["list", "--category", "custom"]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("myHelper"));
    assert!(out.stdout.contains("value.trim()"));

    Ok(())
}
