// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Static attribute declarations keyed by concrete type.

use crate::model::{self, AttrValue, MetadataNode};
use std::any::TypeId;
use std::collections::HashMap;

/// Anything that can answer "what is attribute `name` of this node".
pub trait AttributeSource: Send + Sync {
    fn attribute<'a>(&self, node: &'a dyn MetadataNode, name: &str) -> Option<AttrValue<'a>>;
}

trait ErasedAccessor: Send + Sync {
    fn get<'a>(&self, node: &'a dyn MetadataNode) -> Option<AttrValue<'a>>;
}

struct TypedAccessor<T> {
    get: for<'a> fn(&'a T) -> Option<AttrValue<'a>>,
}

impl<T: MetadataNode> ErasedAccessor for TypedAccessor<T> {
    fn get<'a>(&self, node: &'a dyn MetadataNode) -> Option<AttrValue<'a>> {
        node.as_any().downcast_ref::<T>().and_then(self.get)
    }
}

/// Table of `(type, attribute name) -> accessor`.
///
/// Lookups never fail loudly: an unknown type or attribute is simply
/// "no value", the same as an attribute that is present but unset.
#[derive(Default)]
pub struct AccessorRegistry {
    accessors: HashMap<TypeId, HashMap<&'static str, Box<dyn ErasedAccessor>>>,
}

impl AccessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every ISO 19115 and Dublin Core type declared.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        model::register_iso19115(&mut registry);
        model::register_dublin_core(&mut registry);
        registry
    }

    pub fn register<T: MetadataNode>(
        &mut self,
        name: &'static str,
        get: for<'a> fn(&'a T) -> Option<AttrValue<'a>>,
    ) -> &mut Self {
        self.accessors
            .entry(TypeId::of::<T>())
            .or_default()
            .insert(name, Box::new(TypedAccessor { get }));
        self
    }

    pub fn len(&self) -> usize {
        self.accessors.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AttributeSource for AccessorRegistry {
    fn attribute<'a>(&self, node: &'a dyn MetadataNode, name: &str) -> Option<AttrValue<'a>> {
        let by_name = self.accessors.get(&node.as_any().type_id())?;
        by_name.get(name)?.get(node)
    }
}

impl std::fmt::Debug for AccessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorRegistry")
            .field("types", &self.accessors.len())
            .field("accessors", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Citation, DublinCoreRecord, LocalizedText};

    #[test]
    fn test_lookup_by_concrete_type() {
        let registry = AccessorRegistry::standard();
        let citation = Citation {
            title: LocalizedText::new("Rivers"),
            ..Citation::default()
        };

        let value = registry.attribute(&citation, "title");
        assert!(matches!(value, Some(AttrValue::LocalizedText(t)) if t.default == "Rivers"));
    }

    #[test]
    fn test_same_name_on_other_type_is_independent() {
        let registry = AccessorRegistry::standard();
        let record = DublinCoreRecord::new("dc-1").with_title("Lakes");

        match registry.attribute(&record, "title") {
            Some(AttrValue::Sequence(items)) => assert_eq!(items.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_attribute_is_none() {
        let registry = AccessorRegistry::standard();
        let record = DublinCoreRecord::new("dc-1");
        assert!(registry.attribute(&record, "noSuchThing").is_none());
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = AccessorRegistry::new();
        assert!(registry.is_empty());
        let record = DublinCoreRecord::new("dc-1");
        assert!(registry.attribute(&record, "identifier").is_none());
    }
}
