// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use crate::document::Document;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable view of the index at one generation.
///
/// Documents are kept in natural order (the order they were first added).
/// An ordinal is a document's offset in that order within this snapshot;
/// ordinals are not stable across generations.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    generation: u64,
    entries: Vec<(u64, Arc<Document>)>,
    ordinals: HashMap<String, usize>,
    next_position: u64,
}

impl IndexSnapshot {
    /// Snapshot over stored `(position, document)` pairs.
    pub fn from_stored(generation: u64, mut stored: Vec<(u64, Document)>) -> Self {
        stored.sort_by_key(|(position, _)| *position);
        let next_position = stored.last().map_or(0, |(position, _)| position + 1);
        let entries: Vec<(u64, Arc<Document>)> = stored
            .into_iter()
            .map(|(position, doc)| (position, Arc::new(doc)))
            .collect();
        let mut snapshot = Self {
            generation,
            entries,
            ordinals: HashMap::new(),
            next_position,
        };
        snapshot.reindex();
        snapshot
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn document(&self, ordinal: usize) -> Option<&Document> {
        self.entries.get(ordinal).map(|(_, doc)| doc.as_ref())
    }

    /// Documents in natural order.
    pub fn documents(&self) -> impl ExactSizeIterator<Item = &Document> {
        self.entries.iter().map(|(_, doc)| doc.as_ref())
    }

    pub fn get(&self, identifier: &str) -> Option<&Document> {
        self.ordinal(identifier).and_then(|ordinal| self.document(ordinal))
    }

    pub fn ordinal(&self, identifier: &str) -> Option<usize> {
        self.ordinals.get(identifier).copied()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.ordinals.contains_key(identifier)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, doc)| doc.identifier())
    }

    /// Replaces in place when the identifier exists, else appends.
    /// Returns the document's position.
    pub(crate) fn upsert(&mut self, doc: Arc<Document>) -> u64 {
        if let Some(&ordinal) = self.ordinals.get(doc.identifier()) {
            let position = self.entries[ordinal].0;
            self.entries[ordinal].1 = doc;
            return position;
        }
        let position = self.next_position;
        self.next_position += 1;
        self.ordinals
            .insert(doc.identifier().to_string(), self.entries.len());
        self.entries.push((position, doc));
        position
    }

    pub(crate) fn remove(&mut self, identifier: &str) -> bool {
        let Some(ordinal) = self.ordinals.remove(identifier) else {
            return false;
        };
        self.entries.remove(ordinal);
        self.reindex();
        true
    }

    /// Empties the snapshot. Positions keep counting up.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.ordinals.clear();
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    fn reindex(&mut self) {
        self.ordinals = self
            .entries
            .iter()
            .enumerate()
            .map(|(ordinal, (_, doc))| (doc.identifier().to_string(), ordinal))
            .collect();
    }
}
