use anyhow::Result;
use insta::assert_snapshot;

use crate::{CliTest, run};

const SOURCE: &str = "import _ from 'lodash';

const ks = _.keys(config);
const flat = _.uniq(_.flatten(lists));
const sorted = _.sortBy(users, ['age', 'name']);
";

#[test]
fn test_fix_dry_run_leaves_files() -> Result<()> {
    let test = CliTest::with_file("src/app.js", SOURCE)?;

    let out = run(test.fix_command())?;
    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("--> ./src/app.js:3:12  keys"));
    assert!(out.stdout.contains("- _.keys(config)"));
    assert!(out.stdout.contains("+ Object.keys(config)"));
    assert!(out.stdout.contains("Would rewrite 3 call(s) in 1 file(s)."));
    assert!(out.stdout.contains("Run with --apply to rewrite these calls."));
    assert!(out.stdout.contains("Note: 1 call(s) have no safe automatic rewrite:"));
    assert!(out.stdout.contains("--> ./src/app.js:5:16  sortBy"));

    assert_eq!(test.read_file("src/app.js")?, SOURCE);

    Ok(())
}

#[test]
fn test_fix_apply_rewrites_nested_calls() -> Result<()> {
    let test = CliTest::with_file("src/app.js", SOURCE)?;

    let mut cmd = test.fix_command();
    cmd.arg("--apply");
    let out = run(cmd)?;
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Rewrote 3 call(s) in 1 file(s)."));

    assert_snapshot!(test.read_file("src/app.js")?, @r"
    import _ from 'lodash';

    const ks = Object.keys(config);
    const flat = [...new Set(lists.flat())];
    const sorted = _.sortBy(users, ['age', 'name']);
    ");

    // A second run has nothing left to do.
    let out = run(test.fix_command())?;
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Nothing to rewrite"));

    Ok(())
}

#[test]
fn test_fix_skips_unparsable_files() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/ok.js", "import { keys } from 'lodash';\nkeys(o);\n")?;
    test.write_file("src/broken.js", "const = ;\n")?;

    let mut cmd = test.fix_command();
    cmd.arg("--apply");
    let out = run(cmd)?;
    assert_eq!(out.code, Some(2));
    assert!(out.stdout.contains("parse-error"));
    assert_eq!(
        test.read_file("src/ok.js")?,
        "import { keys } from 'lodash';\nObject.keys(o);\n"
    );
    assert_eq!(test.read_file("src/broken.js")?, "const = ;\n");

    Ok(())
}
