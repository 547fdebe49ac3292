use std::fs;

use anyhow::Result;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use tagscope::core::model::Program;
use tagscope::core::{DiscoverContext, Pipeline};
use tagscope::issues::Rule;
use tagscope::plugins::{LitElementPlugin, PluginFs};

const BASE: &str = r#"
import { LitElement } from 'lit';

export class FormControl extends LitElement {
    /** Submitted field name. */
    @property() name = '';
    @property({ type: Boolean, reflect: true }) disabled = false;
    reset(): void {}
}
"#;

const BUTTON: &str = r#"
import { FormControl } from './base';
import { Icon } from './icon';

/** A form button. */
@customElement('x-button')
export class Button extends FormControl {
    @property() disabled = true;
    @property() label = '';
}
"#;

const ICON: &str = r#"
@customElement('x-icon')
export class Icon {
    @property() glyph = '';
}
"#;

fn pipeline() -> Pipeline {
    Pipeline::new(vec![Box::new(LitElementPlugin)], PluginFs::new("/project"))
}

#[tokio::test]
async fn test_inherited_members_and_dependencies() -> Result<()> {
    let program = Program::from_sources([
        ("src/base.ts", BASE),
        ("src/button.ts", BUTTON),
        ("src/icon.ts", ICON),
    ])?;

    let output = pipeline().run(&program).await?;
    assert!(output.issues.is_empty(), "{:?}", output.issues);

    let tags: Vec<_> = output
        .components
        .iter()
        .map(|c| c.tag_name.as_str())
        .collect();
    assert_eq!(tags, vec!["x-button", "x-icon"]);

    let button = &output.components[0];
    let props: Vec<_> = button.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(props, vec!["disabled", "label", "name"]);

    // Own declaration wins; flags missing on it are filled from the base.
    let disabled = &button.properties[0];
    assert_eq!(disabled.default_value, "true");
    assert!(disabled.reflect);

    let name = &button.properties[2];
    assert_eq!(name.documentation, "Submitted field name.");

    let methods: Vec<_> = button.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["reset"]);

    let deps: Vec<_> = button
        .dependencies
        .iter()
        .map(|d| d.tag_name.as_str())
        .collect();
    assert_eq!(deps, vec!["x-icon"]);
    let icon = &output.components[1];
    let dependents: Vec<_> = icon.dependents
        .iter()
        .map(|d| d.tag_name.as_str())
        .collect();
    assert_eq!(dependents, vec!["x-button"]);

    Ok(())
}

#[tokio::test]
async fn test_runs_are_independent() -> Result<()> {
    let program = Program::from_sources([("src/icon.ts", ICON)])?;
    let mut pipeline = pipeline();

    let first = pipeline.run(&program).await?;
    let second = pipeline.run(&program).await?;
    assert_eq!(first.components.len(), 1);
    assert_eq!(
        first.components[0].properties.len(),
        second.components[0].properties.len()
    );
    assert_eq!(first.issues.len(), second.issues.len());

    Ok(())
}

#[test]
fn test_discover_over_project_directory() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path().canonicalize()?;
    fs::create_dir_all(root.join(".git"))?;
    fs::create_dir_all(root.join("src/forms"))?;
    fs::write(root.join("src/forms/base.ts"), BASE)?;
    fs::write(
        root.join("src/forms/button.ts"),
        BUTTON.replace("'./icon'", "'../icon'"),
    )?;
    fs::write(root.join("src/icon.ts"), ICON)?;
    fs::write(
        root.join("src/icon.stories.ts"),
        "@customElement('x-story')\nexport class Story {}\n",
    )?;
    fs::write(root.join("src/broken.ts"), "export class {{{")?;

    let ctx = DiscoverContext::new(Some(&root), false)?;
    assert_eq!(ctx.files.len(), 4);

    let (program, parse_errors) = ctx.load_program();
    assert_eq!(parse_errors.len(), 1);

    let output = pipeline().run_blocking(&program)?;
    let tags: Vec<_> = output
        .components
        .iter()
        .map(|c| c.tag_name.as_str())
        .collect();
    assert_eq!(tags, vec!["x-button", "x-icon"]);
    assert_eq!(output.components[0].dependencies[0].tag_name, "x-icon");
    assert!(
        output
            .issues
            .iter()
            .all(|i| i.rule() != Rule::DuplicateTagName)
    );

    Ok(())
}
