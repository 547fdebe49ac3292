//! Dependency graph between discovered components.

use tracing::debug;

use crate::core::meta::{ComponentRecord, ComponentRef};
use crate::core::model::{SemanticModel, UnitId};

/// Link every component to the components whose modules its module imports.
///
/// Each edge is recorded once as a dependency of the importer and once as a
/// dependent of the imported component.
pub fn build_dependency_graph(model: &dyn SemanticModel, components: &mut [ComponentRecord]) {
    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (from, component) in components.iter().enumerate() {
        for target in imported_units(model, component.unit) {
            for (to, other) in components.iter().enumerate() {
                if to != from && other.unit == target && !edges.contains(&(from, to)) {
                    edges.push((from, to));
                }
            }
        }
    }

    for (from, to) in edges {
        let dependency = components[to].to_ref();
        let dependent = components[from].to_ref();
        debug!(from = %dependent.tag_name, to = %dependency.tag_name, "dependency edge");
        push_unique(&mut components[from].dependencies, dependency);
        push_unique(&mut components[to].dependents, dependent);
    }
}

fn imported_units(model: &dyn SemanticModel, unit: UnitId) -> Vec<UnitId> {
    let Some(compilation_unit) = model.unit(unit) else {
        return Vec::new();
    };
    compilation_unit
        .import_sources
        .iter()
        .filter_map(|specifier| model.resolve_module(unit, specifier))
        .filter(|target| *target != unit)
        .collect()
}

fn push_unique(list: &mut Vec<ComponentRef>, entry: ComponentRef) {
    if !list.iter().any(|e| e.tag_name == entry.tag_name) {
        list.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::model::Program;

    fn record(tag: &str, path: &str, unit: UnitId) -> ComponentRecord {
        let mut record = ComponentRecord {
            tag_name: tag.to_string(),
            class_name: tag.to_string(),
            unit,
            ..Default::default()
        };
        record.location.file_path = path.to_string();
        record
    }

    #[test]
    fn test_edges_are_symmetric_and_unique() {
        let program = Program::from_sources([
            ("src/icon.ts", "export class Icon {}\n"),
            (
                "src/button.ts",
                "import './icon';\n\
                 import { Icon } from './icon.js';\n\
                 import { html } from 'lit';\n\
                 export class Button {}\n",
            ),
            ("src/card/index.ts", "import '../button';\nexport class Card {}\n"),
            ("src/page.ts", "import './card';\nimport './missing';\nexport class Page {}\n"),
        ])
        .unwrap();
        let mut components = vec![
            record("x-icon", "src/icon.ts", 0),
            record("x-button", "src/button.ts", 1),
            record("x-card", "src/card/index.ts", 2),
            record("x-page", "src/page.ts", 3),
        ];
        build_dependency_graph(&program, &mut components);

        let tags = |refs: &[ComponentRef]| -> Vec<String> {
            refs.iter().map(|r| r.tag_name.clone()).collect()
        };
        assert_eq!(tags(&components[0].dependencies), Vec::<String>::new());
        assert_eq!(tags(&components[0].dependents), vec!["x-button"]);
        assert_eq!(tags(&components[1].dependencies), vec!["x-icon"]);
        assert_eq!(tags(&components[1].dependents), vec!["x-card"]);
        assert_eq!(tags(&components[3].dependencies), vec!["x-card"]);

        for a in &components {
            for dep in &a.dependencies {
                let b = components
                    .iter()
                    .find(|c| c.tag_name == dep.tag_name)
                    .unwrap();
                let back = b.dependents
                    .iter()
                    .filter(|r| r.tag_name == a.tag_name)
                    .count();
                assert_eq!(back, 1);
            }
        }
    }
}
