//! Per-run mutable state handed to transform plugins.
//!
//! Everything here is owned by one pipeline run and cleared by [`RunState::reset`]
//! before the next one starts, so repeated runs in one process never see each
//! other's aliases.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::core::meta::{ComponentRecord, TypeRefLocation, TypeReference};
use crate::core::utils::normalize_path;

/// A type a generated declaration file has to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeImport {
    pub name: String,
    /// Set when another import already took `name`, as `Name$N`.
    pub alias: Option<String>,
    /// Module path, made absolute when the reference was relative.
    pub path: String,
}

/// Deduplicates type imports across all components of a run and assigns
/// collision-free aliases.
#[derive(Debug, Default)]
pub struct TypeImportRegistry {
    name_counts: HashMap<String, usize>,
    seen: HashSet<(String, String)>,
    by_component: HashMap<String, Vec<TypeImport>>,
}

impl TypeImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-global type imports of `component` not yet seen in this run.
    pub fn find_type_imports(&mut self, component: &ComponentRecord) -> Vec<TypeImport> {
        let references = component
            .properties
            .iter()
            .flat_map(|p| &p.type_info.type_references)
            .chain(component.methods.iter().flat_map(|m| &m.type_references))
            .chain(component.events.iter().flat_map(|e| &e.type_info.type_references));

        let mut imports = Vec::new();
        for reference in references {
            let Some(path) = import_path(reference, &component.location.file_path) else {
                continue;
            };
            if !self.seen.insert((path.clone(), reference.name.clone())) {
                continue;
            }
            let alias = self.alias_name(&reference.name);
            imports.push(TypeImport {
                name: reference.name.clone(),
                alias,
                path,
            });
        }
        self.by_component
            .insert(component.tag_name.clone(), imports.clone());
        imports
    }

    fn alias_name(&mut self, name: &str) -> Option<String> {
        match self.name_counts.get_mut(name) {
            Some(count) => {
                let alias = format!("{name}${count}");
                *count += 1;
                Some(alias)
            }
            None => {
                self.name_counts.insert(name.to_string(), 1);
                None
            }
        }
    }

    /// `type_text` with aliased imports of `component` substituted.
    pub fn alias_for(&self, component: &ComponentRecord, type_text: &str) -> String {
        let mut text = type_text.to_string();
        let Some(imports) = self.by_component.get(&component.tag_name) else {
            return text;
        };
        for import in imports {
            if let Some(alias) = &import.alias {
                text = text.replacen(&import.name, alias, 1);
            }
        }
        text
    }

    pub fn reset(&mut self) {
        self.name_counts.clear();
        self.seen.clear();
        self.by_component.clear();
    }
}

fn import_path(reference: &TypeReference, source_file: &str) -> Option<String> {
    let path = match &reference.location {
        TypeRefLocation::Global => return None,
        TypeRefLocation::Local => source_file,
        TypeRefLocation::Import { path } => path.as_str(),
    };
    if !path.starts_with('.') {
        return Some(path.to_string());
    }
    let base = Path::new(source_file).parent().unwrap_or(Path::new(""));
    Some(normalize_path(&base.join(path)).to_string_lossy().replace('\\', "/"))
}

/// State owned by one pipeline run.
#[derive(Debug, Default)]
pub struct RunState {
    pub type_imports: TypeImportRegistry,
}

impl RunState {
    pub fn reset(&mut self) {
        self.type_imports.reset();
    }
}
