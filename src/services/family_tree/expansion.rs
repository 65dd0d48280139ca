//! Mängden expanderade noder

use std::collections::HashSet;

use super::graph::FamilyGraph;

/// Id:n vars direkta barn visas när noden själv är synlig.
///
/// Muteras bara via `toggle` och `expand_ancestors`; layoutmotorn läser den.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    ids: HashSet<String>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Växla medlemskap. Returnerar true om noden nu är expanderad.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Lägg till hela föräldrakedjan ovanför `id`. Returnerar antal nya id:n.
    pub fn expand_ancestors(&mut self, id: &str, graph: &FamilyGraph) -> usize {
        graph
            .ancestors(id)
            .into_iter()
            .filter(|&ancestor| self.ids.insert(graph.get(ancestor).id.clone()))
            .count()
    }
}
