// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Path resolution over record graphs.
//!
//! [`PathResolver`] walks a [`PathSpec`] hop by hop. A hop that lands on a
//! sequence fans out: the next hop is applied to every element and the
//! results are flattened one level. The terminal value is rendered to a
//! string; the only fatal outcome is a path that ends on a structured
//! object with no textual form.

mod path;
mod registry;

pub use path::{Condition, Hop, PathSpec};
pub use registry::{AccessorRegistry, AttributeSource};

use crate::model::{AttrValue, MetadataNode, MetadataRecord};
use std::sync::Arc;
use thiserror::Error;

/// Sentinel stored for "no value".
pub const NULL_VALUE: &str = "null";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("path {path} ends on {type_name}, which has no textual form")]
    UnsupportedType {
        path: String,
        type_name: &'static str,
    },
}

/// Resolves paths through an [`AttributeSource`].
#[derive(Debug)]
pub struct PathResolver<S = AccessorRegistry> {
    source: Arc<S>,
}

impl<S> Clone for PathResolver<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl PathResolver<AccessorRegistry> {
    /// Resolver over the built-in ISO 19115 and Dublin Core declarations.
    pub fn standard() -> Self {
        Self::new(Arc::new(AccessorRegistry::standard()))
    }
}

impl<S: AttributeSource> PathResolver<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// One string per path that produced a value, in path order.
    ///
    /// Paths written for another record kind are skipped, as are paths that
    /// resolve to nothing.
    pub fn resolve_values(
        &self,
        paths: &[PathSpec],
        record: &dyn MetadataRecord,
    ) -> Result<Vec<String>, ResolveError> {
        let mut values = Vec::with_capacity(paths.len());
        for path in paths.iter().filter(|p| p.applies_to(record.kind())) {
            let Some(value) = self.walk(path, record.as_node()) else {
                continue;
            };
            if value.is_empty_sequence() {
                continue;
            }
            values.push(stringify(&value, path)?);
        }
        Ok(values)
    }

    /// Terminal value of `path` starting at `root`, before rendering.
    pub fn walk<'a>(&self, path: &PathSpec, root: &'a dyn MetadataNode) -> Option<AttrValue<'a>> {
        let mut current = AttrValue::Node(root);
        for hop in path.hops() {
            current = match current {
                AttrValue::Sequence(items) => {
                    let mut flattened = Vec::with_capacity(items.len());
                    for item in &items {
                        match self.step(item, &hop.name) {
                            Some(AttrValue::Sequence(inner)) => flattened.extend(inner),
                            Some(value) => flattened.push(value),
                            None => {}
                        }
                    }
                    AttrValue::Sequence(flattened)
                }
                single => self.step(&single, &hop.name)?,
            };

            if let Some(condition) = &hop.condition {
                current = self.keep_matching(current, condition)?;
            }
        }
        Some(current)
    }

    fn step<'a>(&self, value: &AttrValue<'a>, name: &str) -> Option<AttrValue<'a>> {
        match value {
            AttrValue::Node(node) => self.source.attribute(*node, name),
            _ => None,
        }
    }

    fn keep_matching<'a>(&self, value: AttrValue<'a>, condition: &Condition) -> Option<AttrValue<'a>> {
        match value {
            AttrValue::Sequence(items) => Some(AttrValue::Sequence(
                items
                    .into_iter()
                    .filter(|item| self.satisfies(item, condition))
                    .collect(),
            )),
            single => self.satisfies(&single, condition).then_some(single),
        }
    }

    fn satisfies(&self, value: &AttrValue<'_>, condition: &Condition) -> bool {
        let Some(actual) = self.step(value, &condition.attribute) else {
            return false;
        };
        render(&actual)
            .map(|s| s.to_lowercase() == condition.expected.to_lowercase())
            .unwrap_or(false)
    }
}

/// Renders a terminal value, naming `path` if it cannot be rendered.
pub fn stringify(value: &AttrValue<'_>, path: &PathSpec) -> Result<String, ResolveError> {
    render(value).map_err(|type_name| ResolveError::UnsupportedType {
        path: path.to_string(),
        type_name,
    })
}

fn render(value: &AttrValue<'_>) -> Result<String, &'static str> {
    Ok(match value {
        AttrValue::Text(text) => text.to_string(),
        AttrValue::Integer(n) => n.to_string(),
        AttrValue::Decimal(n) => n.to_string(),
        AttrValue::Date(date) => date.format("%Y%m%d").to_string(),
        AttrValue::DateTime(at) => at.format("%Y%m%d").to_string(),
        AttrValue::Code(code) => (*code).to_string(),
        AttrValue::LocalizedText(text) => text.default.clone(),
        AttrValue::Locale(tag) => language_code(tag).to_string(),
        AttrValue::Sequence(items) if items.is_empty() => NULL_VALUE.to_string(),
        AttrValue::Sequence(items) => items
            .iter()
            .map(render)
            .collect::<Result<Vec<_>, _>>()?
            .join(","),
        AttrValue::Node(node) => return Err(node.type_name()),
    })
}

fn language_code(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}
