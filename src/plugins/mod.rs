//! Pipeline plugins.
//!
//! A plugin hooks into the discovery run lifecycle. Every hook is optional; the
//! pipeline calls them in registration order:
//!
//! `init → discover → build → postbuild → link → postlink → transform → destroy`

pub mod lit_element;

use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use crate::core::meta::{ComponentRecord, HeritageNode};
use crate::core::model::{CompilationUnit, Declaration, SemanticModel};
use crate::core::state::TypeImportRegistry;
use crate::core::utils::normalize_path;
use crate::issues::Diagnostics;

pub use lit_element::LitElementPlugin;

/// Names accepted in the `plugins` config list.
pub const KNOWN_PLUGINS: &[&str] = &[lit_element::NAME];

/// Shared, read-only view of the run handed to plugin hooks.
#[derive(Clone, Copy)]
pub struct PluginContext<'a> {
    pub model: &'a dyn SemanticModel,
    pub diagnostics: &'a Diagnostics,
}

/// Path helpers for transform plugins writing their own output.
#[derive(Debug, Clone)]
pub struct PluginFs {
    cwd: PathBuf,
}

impl PluginFs {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve `path` against the working directory.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        normalize_path(&self.cwd.join(path))
    }

    /// Relative path from the directory `from` to `to`, both resolved first.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tagscope::plugins::PluginFs;
    /// let fs = PluginFs::new("/project");
    /// assert_eq!(fs.resolve_relative_path("dist", "src/button.ts"), "../src/button.ts");
    /// ```
    pub fn resolve_relative_path(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> String {
        let from = self.resolve_path(from);
        let to = self.resolve_path(to);
        let from: Vec<Component<'_>> = from.components().collect();
        let to: Vec<Component<'_>> = to.components().collect();
        let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
        let mut out = PathBuf::new();
        for _ in common..from.len() {
            out.push("..");
        }
        for component in &to[common..] {
            out.push(component.as_os_str());
        }
        out.to_string_lossy().replace('\\', "/")
    }
}

/// What `transform` receives besides the final components.
pub struct TransformContext<'a> {
    pub fs: &'a PluginFs,
    pub type_imports: &'a mut TypeImportRegistry,
}

/// A lifecycle plugin.
///
/// Hooks run on the pipeline's single-threaded runtime, so plugins do not need to
/// be `Send`.
#[async_trait(?Send)]
pub trait Plugin {
    fn name(&self) -> &str;

    async fn init(&mut self, _cx: PluginContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Declarations in `unit` this plugin builds components from.
    async fn discover(
        &self,
        _cx: PluginContext<'_>,
        _unit: &CompilationUnit,
    ) -> Result<Vec<Declaration>> {
        Ok(Vec::new())
    }

    /// Immediate metadata for one declaration. Also called for heritage targets;
    /// `None` means the plugin has nothing to say about the declaration.
    async fn build(
        &self,
        _cx: PluginContext<'_>,
        _declaration: &Declaration,
    ) -> Result<Option<ComponentRecord>> {
        Ok(None)
    }

    async fn postbuild(
        &self,
        _cx: PluginContext<'_>,
        components: Vec<ComponentRecord>,
    ) -> Result<Vec<ComponentRecord>> {
        Ok(components)
    }

    /// Called per component for every node of its flattened heritage tree.
    async fn link(
        &self,
        _cx: PluginContext<'_>,
        _component: &mut ComponentRecord,
        _heritage: &HeritageNode,
    ) -> Result<()> {
        Ok(())
    }

    async fn postlink(
        &self,
        _cx: PluginContext<'_>,
        components: Vec<ComponentRecord>,
    ) -> Result<Vec<ComponentRecord>> {
        Ok(components)
    }

    async fn transform(
        &self,
        _components: &[ComponentRecord],
        _cx: &mut TransformContext<'_>,
    ) -> Result<()> {
        Ok(())
    }

    async fn destroy(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Instantiate a built-in plugin by its config name.
pub fn plugin_by_name(name: &str) -> Option<Box<dyn Plugin>> {
    match name {
        lit_element::NAME => Some(Box::new(LitElementPlugin::default())),
        _ => None,
    }
}
