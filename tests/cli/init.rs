use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .tagscoperc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".tagscoperc.json").exists());

    let content = test.read_file(".tagscoperc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["includes"], serde_json::json!(["src"]));
    assert_eq!(parsed["sourceRoot"], "./");
    assert_eq!(parsed["ignoreTestFiles"], true);
    assert_eq!(parsed["plugins"], serde_json::json!(["lit-element"]));

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".tagscoperc.json", "{}")?;

    let output = run(test.command().arg("init"))?;
    assert_eq!(output.code, Some(2));
    assert_eq!(output.stderr, "Error: .tagscoperc.json already exists\n");
    assert_eq!(test.read_file(".tagscoperc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file(
        "src/button.ts",
        "@customElement('x-button')\nexport class Button extends LitElement {}\n",
    )?;

    let output = run(&mut test.discover_command())?;
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("x-button"));

    Ok(())
}
