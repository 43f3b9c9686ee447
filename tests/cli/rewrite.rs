use anyhow::Result;

use crate::{CliTest, run};

#[test]
fn test_rewrite_catalogued_call() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.args(["rewrite", "_.clamp(n, 0, 10)"]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "Math.min(Math.max(n, 0), 10)\n");

    Ok(())
}

#[test]
fn test_rewrite_with_pattern() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.args(["rewrite", "toArray(a, b)", "--pattern", "Array.of"]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "Array.of(a, b)\n");

    Ok(())
}

#[test]
fn test_rewrite_declined() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.args(["rewrite", "_.sortBy(users, ['a', 'b'])"]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("no safe fix for sortBy"));

    Ok(())
}

#[test]
fn test_rewrite_uncatalogued_call() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.args(["rewrite", "_.frobnicate(x)"]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("'frobnicate' is not catalogued; pass --pattern"));

    Ok(())
}
