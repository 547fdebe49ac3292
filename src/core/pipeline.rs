//! Discovery run orchestration.
//!
//! One run walks the stages below in order. Plugin stages run plugin by plugin in
//! registration order; `postbuild` and `postlink` are chains, each plugin receiving
//! the previous plugin's output.
//!
//! ```text
//! init → discover → build → postbuild → dedup merge → base link → plugin link
//!      → dependency graph → postlink → sort → validate → transform → destroy
//! ```

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::heritage::build_with_heritage;
use crate::core::meta::{ComponentRecord, HeritageNode, flatten_heritage};
use crate::core::model::{Declaration, SemanticModel};
use crate::core::state::RunState;
use crate::core::{deps, merge, validate};
use crate::issues::{Diagnostics, DiscoveryErrorIssue, Issue};
use crate::plugins::{Plugin, PluginContext, PluginFs, TransformContext};

/// Result of one discovery run.
#[derive(Debug)]
pub struct RunOutput {
    /// Final components, sorted by tag name.
    pub components: Vec<ComponentRecord>,
    pub issues: Vec<Issue>,
}

pub struct Pipeline {
    plugins: Vec<Box<dyn Plugin>>,
    fs: PluginFs,
    state: RunState,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

impl Pipeline {
    pub fn new(plugins: Vec<Box<dyn Plugin>>, fs: PluginFs) -> Self {
        Self {
            plugins,
            fs,
            state: RunState::default(),
        }
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run every stage over `model`.
    ///
    /// Discovery failures of a single unit become issues; every other plugin
    /// failure aborts the run.
    pub async fn run(&mut self, model: &dyn SemanticModel) -> Result<RunOutput> {
        self.state.reset();
        let diagnostics = Diagnostics::new();
        let cx = PluginContext {
            model,
            diagnostics: &diagnostics,
        };

        for plugin in &mut self.plugins {
            let name = plugin.name().to_string();
            plugin
                .init(cx)
                .await
                .with_context(|| format!("plugin `{name}` failed to initialize"))?;
        }

        let mut components = Vec::new();
        for plugin in &self.plugins {
            let discovered = discover(plugin.as_ref(), cx).await;
            components.extend(build(plugin.as_ref(), cx, &discovered).await?);
        }

        for plugin in &self.plugins {
            let start = Instant::now();
            components = plugin
                .postbuild(cx, components)
                .await
                .with_context(|| format!("plugin `{}` failed in postbuild", plugin.name()))?;
            info!(
                plugin = plugin.name(),
                elapsed_ms = elapsed_ms(start),
                "`postbuild`"
            );
        }

        let mut components = merge::dedup_by_tag_name(components, &diagnostics);

        let start = Instant::now();
        for component in &mut components {
            merge::base_link(component);
        }
        info!(elapsed_ms = elapsed_ms(start), "base `link`");

        for plugin in &self.plugins {
            let start = Instant::now();
            for component in &mut components {
                let nodes: Vec<HeritageNode> = flatten_heritage(&component.heritage)
                    .into_iter()
                    .cloned()
                    .collect();
                for node in &nodes {
                    plugin
                        .link(cx, component, node)
                        .await
                        .with_context(|| {
                            format!("plugin `{}` failed to link `{}`", plugin.name(), node.name)
                        })?;
                }
            }
            info!(
                plugin = plugin.name(),
                elapsed_ms = elapsed_ms(start),
                "`link`"
            );
        }

        deps::build_dependency_graph(model, &mut components);

        for plugin in &self.plugins {
            let start = Instant::now();
            components = plugin
                .postlink(cx, components)
                .await
                .with_context(|| format!("plugin `{}` failed in postlink", plugin.name()))?;
            info!(
                plugin = plugin.name(),
                elapsed_ms = elapsed_ms(start),
                "`postlink`"
            );
        }

        merge::sort_components(&mut components);
        validate::validate_components(model, &components, &diagnostics);

        let mut transform_cx = TransformContext {
            fs: &self.fs,
            type_imports: &mut self.state.type_imports,
        };
        for plugin in &self.plugins {
            let start = Instant::now();
            plugin
                .transform(&components, &mut transform_cx)
                .await
                .with_context(|| format!("plugin `{}` failed in transform", plugin.name()))?;
            info!(
                plugin = plugin.name(),
                elapsed_ms = elapsed_ms(start),
                "`transform`"
            );
        }

        for plugin in &mut self.plugins {
            let name = plugin.name().to_string();
            plugin
                .destroy()
                .await
                .with_context(|| format!("plugin `{name}` failed to shut down"))?;
        }

        Ok(RunOutput {
            components,
            issues: diagnostics.into_issues(),
        })
    }

    /// [`Pipeline::run`] on a fresh current-thread runtime.
    pub fn run_blocking(&mut self, model: &dyn SemanticModel) -> Result<RunOutput> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start the pipeline runtime")?;
        runtime.block_on(self.run(model))
    }
}

/// Every unit first; a failing unit is reported and skipped.
async fn discover(plugin: &dyn Plugin, cx: PluginContext<'_>) -> Vec<Declaration> {
    let total = Instant::now();
    let mut discovered = Vec::new();
    for unit in cx.model.compilation_units() {
        let start = Instant::now();
        match plugin.discover(cx, unit).await {
            Ok(declarations) => {
                debug!(
                    plugin = plugin.name(),
                    path = %unit.path,
                    count = declarations.len(),
                    elapsed_ms = elapsed_ms(start),
                    "discovered components"
                );
                discovered.extend(declarations);
            }
            Err(e) => cx.diagnostics.push(DiscoveryErrorIssue {
                file_path: unit.path.clone(),
                plugin: plugin.name().to_string(),
                error: format!("{e:#}"),
            }),
        }
    }
    info!(
        plugin = plugin.name(),
        count = discovered.len(),
        elapsed_ms = elapsed_ms(total),
        "`discover`"
    );
    discovered
}

async fn build(
    plugin: &dyn Plugin,
    cx: PluginContext<'_>,
    discovered: &[Declaration],
) -> Result<Vec<ComponentRecord>> {
    let total = Instant::now();
    let mut components = Vec::new();
    for declaration in discovered {
        let start = Instant::now();
        let built = build_with_heritage(plugin, cx, declaration)
            .await
            .with_context(|| {
                let name = declaration.name();
                format!("plugin `{}` failed to build `{name}`", plugin.name())
            })?;
        let Some(component) = built else {
            continue;
        };
        debug!(
            plugin = plugin.name(),
            tag = %component.tag_name,
            elapsed_ms = elapsed_ms(start),
            "built component metadata"
        );
        components.push(component);
    }
    info!(
        plugin = plugin.name(),
        elapsed_ms = elapsed_ms(total),
        "`build`"
    );
    Ok(components)
}
