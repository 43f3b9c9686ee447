use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_reports_library_call() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.js",
        "import _ from 'lodash';\nconst ks = _.keys(o);\n",
    )?;

    let out = run(test.check_command())?;
    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("warning: keys -> Object.keys  prefer-native"));
    assert!(out.stdout.contains("--> ./src/app.js:2:12"));
    assert!(out.stdout.contains("2 | const ks = _.keys(o);"));
    assert!(out.stdout.contains("= note: fix: Object.keys(o)"));
    assert!(out.stdout.contains("1 problems (0 errors, 1 warning)"));

    Ok(())
}

#[test]
fn test_clean_file() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "export const ks = Object.keys({ a: 1 });\n")?;

    let out = run(test.check_command())?;
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Checked 1 source file - no issues found"));

    Ok(())
}

#[test]
fn test_other_modules_are_not_reported() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.js",
        "import _ from 'ramda';\nconst ks = _.keys(o);\n",
    )?;

    let out = run(test.check_command())?;
    assert_eq!(out.code, Some(0));

    Ok(())
}

#[test]
fn test_named_and_method_package_imports() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.ts",
        "import { first } from 'lodash-es';\nimport groupBy from 'lodash.groupby';\n\nfirst(xs);\ngroupBy(users, u => u.role);\n",
    )?;

    let out = run(test.check_command())?;
    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("first -> Array.prototype.at[0]"));
    assert!(out.stdout.contains("--> ./src/app.ts:4:1"));
    assert!(out.stdout.contains("--> ./src/app.ts:5:1"));
    assert!(out.stdout.contains("2 problems (0 errors, 2 warnings)"));

    Ok(())
}

#[test]
fn test_parse_error() -> Result<()> {
    let test = CliTest::with_file("src/broken.js", "const = ;\n")?;

    let out = run(test.check_command())?;
    assert_eq!(out.code, Some(2));
    assert!(out.stdout.contains("parse-error"));
    assert!(out.stdout.contains("--> ./src/broken.js"));
    assert!(out.stderr.contains("1 file(s) could not be parsed"));

    Ok(())
}

#[test]
fn test_json_format() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.js",
        "const _ = require('lodash');\n_.values(o);\n",
    )?;

    let mut cmd = test.check_command();
    cmd.args(["--format", "json"]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(1));

    let json: Value = serde_json::from_str(&out.stdout)?;
    assert_eq!(json["filesChecked"], 1);
    let issue = &json["issues"][0];
    assert_eq!(issue["file"], "./src/app.js");
    assert_eq!(issue["line"], 2);
    assert_eq!(issue["col"], 1);
    assert_eq!(issue["rule"], "prefer-native");
    assert_eq!(issue["function"], "values");
    assert_eq!(issue["fix"], "Object.values(o)");

    Ok(())
}

#[test]
fn test_config_excludes_and_ignores() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".nativizerc.json",
        r#"{
         "ignores": ["**/generated/**"],
         "excludeFunctions": ["keys"]
     }"#,
    )?;
    test.write_file(
        "src/app.js",
        "import _ from 'lodash';\n_.keys(o);\n",
    )?;
    test.write_file(
        "src/generated/api.js",
        "import _ from 'lodash';\n_.values(o);\n",
    )?;

    let out = run(test.check_command())?;
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Checked 1 source file - no issues found"));

    Ok(())
}

#[test]
fn test_source_root_argument() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("web/a.js", "import _ from 'lodash';\n_.keys(o);\n")?;
    test.write_file("other/b.js", "import _ from 'lodash';\n_.keys(o);\n")?;

    let mut cmd = test.check_command();
    cmd.args(["--source-root", "web"]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("1 problems"));
    assert!(!out.stdout.contains("b.js"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("--help");
    let out = run(cmd)?;
    assert_eq!(out.code, Some(0));
    for command in ["check", "fix", "list", "rewrite", "init"] {
        assert!(out.stdout.contains(command), "missing {command} in help");
    }

    Ok(())
}
