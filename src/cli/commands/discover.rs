use anyhow::{Result, anyhow};

use super::super::args::DiscoverCommand;
use super::{CommandResult, CommandSummary, DiscoverSummary, helper::finish};
use crate::{
    core::{DiscoverContext, Pipeline},
    issues::Issue,
    plugins::{PluginFs, plugin_by_name},
};

pub fn discover(cmd: DiscoverCommand) -> Result<CommandResult> {
    let ctx = DiscoverContext::new(cmd.common.source_root.as_deref(), cmd.common.verbose)?;

    let plugins = ctx
        .config
        .plugins
        .iter()
        .map(|name| plugin_by_name(name).ok_or_else(|| anyhow!("Unknown plugin: {}", name)))
        .collect::<Result<Vec<_>>>()?;

    let (program, parse_errors) = ctx.load_program();

    let mut pipeline = Pipeline::new(plugins, PluginFs::new(&ctx.root_dir));
    let plugin_names = pipeline
        .plugin_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let output = pipeline.run_blocking(&program)?;

    let mut issues: Vec<Issue> = parse_errors.into_iter().map(Issue::ParseError).collect();
    issues.extend(output.issues);

    Ok(finish(
        CommandSummary::Discover(DiscoverSummary {
            components: output.components,
            plugins: plugin_names,
            quiet: cmd.quiet,
        }),
        issues,
        ctx.files.len(),
    ))
}
