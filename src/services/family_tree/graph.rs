//! Index över släktgrafen: arena av medlemmar med uppslag id → post och förälder → barn

use std::collections::{HashMap, HashSet};

use crate::models::Member;

/// Max antal träffar från `FamilyGraph::search`
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Index till en medlem i grafens arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberIndex(usize);

impl MemberIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Släktgraf byggd från en platt medlemslista.
///
/// Barnlistorna behåller inmatningsordningen. En `parent_id` som pekar på ett
/// okänt id ger inget fel; noden är bara onåbar från roten.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    members: Vec<Member>,
    by_id: HashMap<String, MemberIndex>,
    parents: Vec<Option<MemberIndex>>,
    children: Vec<Vec<MemberIndex>>,
    roots: Vec<MemberIndex>,
    orphans: Vec<MemberIndex>,
    duplicates: usize,
}

impl FamilyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bygg index från medlemslistan, O(n)
    pub fn build(members: Vec<Member>) -> Self {
        let mut graph = Self::default();

        for member in members {
            if graph.by_id.contains_key(&member.id) {
                tracing::warn!("Dubblett av medlems-ID '{}', första posten används", member.id);
                graph.duplicates += 1;
                continue;
            }
            let index = MemberIndex(graph.members.len());
            graph.by_id.insert(member.id.clone(), index);
            graph.members.push(member);
        }

        graph.parents = vec![None; graph.members.len()];
        graph.children = vec![Vec::new(); graph.members.len()];

        for (i, member) in graph.members.iter().enumerate() {
            let index = MemberIndex(i);
            match member.parent_id.as_deref() {
                None => graph.roots.push(index),
                Some(parent_id) => match graph.by_id.get(parent_id) {
                    Some(&parent) => {
                        graph.parents[i] = Some(parent);
                        graph.children[parent.0].push(index);
                    }
                    None => graph.orphans.push(index),
                },
            }
        }

        if !graph.orphans.is_empty() {
            tracing::debug!(
                "{} medlemmar refererar till okända föräldrar",
                graph.orphans.len()
            );
        }

        graph
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, index: MemberIndex) -> &Member {
        &self.members[index.0]
    }

    pub fn find(&self, id: &str) -> Option<MemberIndex> {
        self.by_id.get(id).copied()
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.find(id).map(|index| self.get(index))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn parent(&self, index: MemberIndex) -> Option<MemberIndex> {
        self.parents[index.0]
    }

    /// Direkta barn i inmatningsordning
    pub fn children(&self, index: MemberIndex) -> &[MemberIndex] {
        &self.children[index.0]
    }

    pub fn children_of(&self, id: &str) -> &[MemberIndex] {
        match self.find(id) {
            Some(index) => self.children(index),
            None => &[],
        }
    }

    pub fn has_children(&self, id: &str) -> bool {
        !self.children_of(id).is_empty()
    }

    pub fn roots(&self) -> &[MemberIndex] {
        &self.roots
    }

    /// Medlemmar vars förälder saknas i listan
    pub fn orphans(&self) -> &[MemberIndex] {
        &self.orphans
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Förfäder från närmaste förälder upp till roten.
    /// Avbryter om kedjan går i cirkel.
    pub fn ancestors(&self, id: &str) -> Vec<MemberIndex> {
        let mut out = Vec::new();
        let Some(start) = self.find(id) else {
            return out;
        };

        let mut seen: HashSet<MemberIndex> = HashSet::new();
        seen.insert(start);

        let mut current = self.parent(start);
        while let Some(parent) = current {
            if !seen.insert(parent) {
                tracing::warn!("Cirkulär föräldrakedja vid '{}'", self.get(parent).id);
                break;
            }
            out.push(parent);
            current = self.parent(parent);
        }

        out
    }

    /// Enkel sökning: namn innehåller frågan eller id är exakt lika
    /// (skiftlägesokänsligt). Tom fråga ger inga träffar.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Member> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.members
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&query) || m.id.to_lowercase() == query)
            .take(limit)
            .collect()
    }
}
