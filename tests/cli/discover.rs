use anyhow::Result;

use crate::{CliTest, run};

const BUTTON: &str = r#"
import { LitElement } from 'lit';
import './icon';

/**
 * A clickable button.
 * @slot - The label.
 */
@customElement('x-button')
export class Button extends LitElement {
    @property({ reflect: true }) variant = 'primary';
    @property({ type: Boolean }) disabled = false;
    @event({ name: 'x-press' }) press!: CustomEvent<void>;
    focus(): void {}
}
"#;

const ICON: &str = r#"
@customElement('x-icon')
export class Icon {
    @property() name = '';
}
"#;

#[test]
fn test_discover_lists_components() -> Result<()> {
    let test = CliTest::with_file("src/button.ts", BUTTON)?;
    test.write_file("src/icon.ts", ICON)?;

    let output = run(&mut test.discover_command())?;
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);

    let button = output
        .stdout
        .lines()
        .find(|l| l.contains("x-button"))
        .unwrap_or_default();
    assert!(button.contains("Button"));
    assert!(button.contains("button.ts"));
    assert!(button.contains("(2 props, 1 event, 1 method, 1 slot)"));

    let icon_at = output.stdout.find("x-icon").unwrap();
    assert!(output.stdout.find("x-button").unwrap() < icon_at);
    assert!(
        output
            .stdout
            .contains("Discovered 2 components in 2 source files - no issues found")
    );

    Ok(())
}

#[test]
fn test_discover_quiet_skips_component_list() -> Result<()> {
    let test = CliTest::with_file("src/icon.ts", ICON)?;

    let output = run(test.discover_command().arg("--quiet"))?;
    assert_eq!(output.code, Some(0));
    assert!(!output.stdout.contains("Components"));
    assert!(
        output
            .stdout
            .contains("Discovered 1 component in 1 source file")
    );

    Ok(())
}

#[test]
fn test_discover_invalid_tag_name_fails() -> Result<()> {
    let test = CliTest::with_file(
        "src/bad.ts",
        "@customElement('XButton')\nexport class Bad {}\n",
    )?;

    let output = run(&mut test.discover_command())?;
    assert_eq!(output.code, Some(1));
    assert!(
        output
            .stdout
            .contains("error: Tag can not contain upper case characters.  invalid-tag-name")
    );
    assert!(output.stdout.contains("1 problems (1 error, 0 warnings)"));

    Ok(())
}

#[test]
fn test_discover_duplicate_tag_warns_but_succeeds() -> Result<()> {
    let test = CliTest::with_file("src/a.ts", "@customElement('x-dup')\nexport class A {}\n")?;
    test.write_file("src/b.ts", "@customElement('x-dup')\nexport class B {}\n")?;

    let output = run(&mut test.discover_command())?;
    assert_eq!(output.code, Some(0), "stdout: {}", output.stdout);
    assert!(
        output
            .stdout
            .contains("warning: Found 2 components with tagname x-dup")
    );

    Ok(())
}

#[test]
fn test_discover_skips_unparsable_file() -> Result<()> {
    let test = CliTest::with_file("src/icon.ts", ICON)?;
    test.write_file("src/broken.ts", "export class {{{")?;

    let output = run(&mut test.discover_command())?;
    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("parse-error"));
    assert!(output.stdout.contains("x-icon"));
    assert!(
        output
            .stdout
            .contains("warning: 1 file(s) could not be parsed (use -v for details)")
    );

    Ok(())
}

#[test]
fn test_discover_ignores_test_files() -> Result<()> {
    let test = CliTest::with_file("src/icon.ts", ICON)?;
    test.write_file(
        "src/icon.test.ts",
        "@customElement('x-icon-fixture')\nexport class Fixture {}\n",
    )?;

    let output = run(&mut test.discover_command())?;
    assert_eq!(output.code, Some(0));
    assert!(!output.stdout.contains("x-icon-fixture"));

    Ok(())
}

#[test]
fn test_discover_source_root_flag() -> Result<()> {
    let test = CliTest::with_file("web/src/icon.ts", ICON)?;

    let output = run(test.discover_command().args(["--source-root", "web"]))?;
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("x-icon"));

    Ok(())
}

#[test]
fn test_discover_unknown_plugin_is_internal_error() -> Result<()> {
    let test = CliTest::with_file(".tagscoperc.json", r#"{ "plugins": ["stencil"] }"#)?;

    let output = run(&mut test.discover_command())?;
    assert_eq!(output.code, Some(2));
    assert!(output.stderr.starts_with("Error: "));
    assert!(
        output
            .stderr
            .contains("Unknown plugin in 'plugins': \"stencil\"")
    );

    Ok(())
}
