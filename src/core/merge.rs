//! Metadata merger.
//!
//! Two folds share one member-level rule: a source member with no same-named
//! counterpart in the target is appended; otherwise the target keeps its values and
//! only backfills falsy flags and empty documentation from the source.
//!
//! - **base link**: a component absorbs its own flattened heritage tree.
//! - **dedup**: records discovered with the same tag name collapse into one.

use std::collections::HashMap;

use crate::core::meta::{
    ComponentRecord, ComponentRef, CssPartRecord, CssPropertyRecord, DocTag, EventRecord,
    HeritageTarget, InterfaceRecord, MethodRecord, MixinRecord, PropertyRecord, flatten_heritage,
};
use crate::issues::{Diagnostics, DuplicateTagNameIssue};

/// A list member that can be matched and backfilled.
pub trait Mergeable: Clone {
    fn merge_key(&self) -> &str;

    fn backfill(&mut self, _source: &Self) {}
}

fn backfill_text(target: &mut String, source: &str) {
    if target.is_empty() && !source.is_empty() {
        *target = source.to_string();
    }
}

impl Mergeable for PropertyRecord {
    fn merge_key(&self) -> &str {
        &self.name
    }

    fn backfill(&mut self, source: &Self) {
        self.reflect |= source.reflect;
        self.required |= source.required;
        self.optional |= source.optional;
        self.readonly |= source.readonly;
        self.internal |= source.internal;
        self.deprecated |= source.deprecated;
        self.is_static |= source.is_static;
        backfill_text(&mut self.documentation, &source.documentation);
    }
}

impl Mergeable for MethodRecord {
    fn merge_key(&self) -> &str {
        &self.name
    }

    fn backfill(&mut self, source: &Self) {
        self.internal |= source.internal;
        self.deprecated |= source.deprecated;
        self.is_static |= source.is_static;
        backfill_text(&mut self.documentation, &source.documentation);
    }
}

impl Mergeable for EventRecord {
    fn merge_key(&self) -> &str {
        &self.name
    }

    fn backfill(&mut self, source: &Self) {
        self.bubbles |= source.bubbles;
        self.composed |= source.composed;
        self.internal |= source.internal;
        self.deprecated |= source.deprecated;
        backfill_text(&mut self.documentation, &source.documentation);
    }
}

impl Mergeable for CssPropertyRecord {
    fn merge_key(&self) -> &str {
        &self.name
    }

    fn backfill(&mut self, source: &Self) {
        backfill_text(&mut self.description, &source.description);
    }
}

impl Mergeable for CssPartRecord {
    fn merge_key(&self) -> &str {
        &self.name
    }

    fn backfill(&mut self, source: &Self) {
        backfill_text(&mut self.description, &source.description);
    }
}

impl Mergeable for DocTag {
    fn merge_key(&self) -> &str {
        &self.name
    }
}

/// Dependencies match by tag name and are never re-merged.
impl Mergeable for ComponentRef {
    fn merge_key(&self) -> &str {
        &self.tag_name
    }
}

/// Fold `source` members into `target`.
pub fn merge_members<T: Mergeable>(target: &mut Vec<T>, source: &[T]) {
    for member in source {
        let key = member.merge_key();
        match target.iter_mut().find(|t| t.merge_key() == key) {
            Some(existing) => existing.backfill(member),
            None => target.push(member.clone()),
        }
    }
}

/// Anything whose member lists can be folded into a component.
pub trait MergeSource {
    fn properties(&self) -> &[PropertyRecord];
    fn methods(&self) -> &[MethodRecord];
    fn doc_tags(&self) -> &[DocTag];

    fn events(&self) -> &[EventRecord] {
        &[]
    }

    fn css_properties(&self) -> &[CssPropertyRecord] {
        &[]
    }

    fn css_parts(&self) -> &[CssPartRecord] {
        &[]
    }

    fn dependencies(&self) -> &[ComponentRef] {
        &[]
    }
}

impl MergeSource for ComponentRecord {
    fn properties(&self) -> &[PropertyRecord] {
        &self.properties
    }

    fn methods(&self) -> &[MethodRecord] {
        &self.methods
    }

    fn doc_tags(&self) -> &[DocTag] {
        &self.doc_tags
    }

    fn events(&self) -> &[EventRecord] {
        &self.events
    }

    fn css_properties(&self) -> &[CssPropertyRecord] {
        &self.css_properties
    }

    fn css_parts(&self) -> &[CssPartRecord] {
        &self.css_parts
    }

    fn dependencies(&self) -> &[ComponentRef] {
        &self.dependencies
    }
}

impl MergeSource for MixinRecord {
    fn properties(&self) -> &[PropertyRecord] {
        &self.properties
    }

    fn methods(&self) -> &[MethodRecord] {
        &self.methods
    }

    fn doc_tags(&self) -> &[DocTag] {
        &self.doc_tags
    }

    fn events(&self) -> &[EventRecord] {
        &self.events
    }

    fn css_properties(&self) -> &[CssPropertyRecord] {
        &self.css_properties
    }

    fn css_parts(&self) -> &[CssPartRecord] {
        &self.css_parts
    }
}

impl MergeSource for InterfaceRecord {
    fn properties(&self) -> &[PropertyRecord] {
        &self.properties
    }

    fn methods(&self) -> &[MethodRecord] {
        &self.methods
    }

    fn doc_tags(&self) -> &[DocTag] {
        &self.doc_tags
    }
}

impl HeritageTarget {
    pub fn as_merge_source(&self) -> &dyn MergeSource {
        match self {
            HeritageTarget::Component(component) => component.as_ref(),
            HeritageTarget::Interface(interface) => interface,
            HeritageTarget::Mixin(mixin) => mixin,
        }
    }
}

/// Fold every member list of `source` into `target`.
pub fn merge_into(target: &mut ComponentRecord, source: &dyn MergeSource) {
    merge_members(&mut target.properties, source.properties());
    merge_members(&mut target.methods, source.methods());
    merge_members(&mut target.events, source.events());
    merge_members(&mut target.css_properties, source.css_properties());
    merge_members(&mut target.css_parts, source.css_parts());
    merge_members(&mut target.doc_tags, source.doc_tags());
    merge_members(&mut target.dependencies, source.dependencies());
}

/// Merge a component's flattened heritage tree (pre-order) into the component.
pub fn base_link(component: &mut ComponentRecord) {
    let heritage = std::mem::take(&mut component.heritage);
    for node in flatten_heritage(&heritage) {
        merge_into(component, node.target.as_merge_source());
    }
    component.heritage = heritage;
}

/// Collapse records sharing a tag name, in discovery order.
///
/// Each later record absorbs the fold of the earlier ones. Records without a tag
/// name pass through untouched.
pub fn dedup_by_tag_name(
    components: Vec<ComponentRecord>,
    diagnostics: &Diagnostics,
) -> Vec<ComponentRecord> {
    let mut groups: Vec<Vec<ComponentRecord>> = Vec::new();
    let mut by_tag: HashMap<String, usize> = HashMap::new();
    for component in components {
        if !component.has_tag_name() {
            groups.push(vec![component]);
            continue;
        }
        match by_tag.get(&component.tag_name) {
            Some(&index) => groups[index].push(component),
            None => {
                by_tag.insert(component.tag_name.clone(), groups.len());
                groups.push(vec![component]);
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|group| {
            if group.len() > 1 {
                diagnostics.push(DuplicateTagNameIssue {
                    tag_name: group[0].tag_name.clone(),
                    locations: group.iter().map(|c| c.location.clone()).collect(),
                });
            }
            let mut records = group.into_iter();
            let first = records.next()?;
            Some(records.fold(first, |merged, mut next| {
                merge_into(&mut next, &merged);
                let mut heritage = merged.heritage;
                for node in std::mem::take(&mut next.heritage) {
                    if !heritage.contains(&node) {
                        heritage.push(node);
                    }
                }
                next.heritage = heritage;
                next
            }))
        })
        .collect()
}

/// Canonical order: members by name, references and components by tag name.
pub fn sort_components(components: &mut [ComponentRecord]) {
    for component in components.iter_mut() {
        component.properties.sort_by(|a, b| a.name.cmp(&b.name));
        component.methods.sort_by(|a, b| a.name.cmp(&b.name));
        component.events.sort_by(|a, b| a.name.cmp(&b.name));
        component.css_properties.sort_by(|a, b| a.name.cmp(&b.name));
        component.css_parts.sort_by(|a, b| a.name.cmp(&b.name));
        component.slots.sort_by(|a, b| a.name.cmp(&b.name));
        component.doc_tags.sort_by(|a, b| a.name.cmp(&b.name));
        component
            .dependencies
            .sort_by(|a, b| a.tag_name.cmp(&b.tag_name));
        component
            .dependents
            .sort_by(|a, b| a.tag_name.cmp(&b.tag_name));
    }
    components.sort_by(|a, b| a.tag_name.cmp(&b.tag_name));
}
