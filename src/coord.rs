//! Coordination resolution
//!
//! A coordination is headed by a coordinator token whose coordinands carry the
//! coordinated relation plus the coordinand suffix:
//!
//! ```text
//! misit ─┬─ et (COORD) ─┬─ legatos (OBJ_CO)
//!        │              └─ obsides (OBJ_CO)
//! ```
//!
//! Two complications make this more than a child lookup:
//!
//! - a coordinand may hang below an auxiliary (`cum (AuxP) ─ equis (OBJ_CO)`),
//!   so the auxiliary stands in for it among the coordinator's children;
//! - a single logical coordination may be spread over several coordinators of
//!   the same relation nested directly inside one another (`A, B et C`).
//!
//! All of the coordinator-level queries below return an empty result for a
//! token that is not a coordinator. When two nested coordinators cannot be
//! shown to coordinate different relations (one of them has no recognisable
//! coordinand) they are treated as the same coordination.

use lasso::Spur;
use rustc_hash::FxHashSet;

use crate::store::Treebank;
use crate::token::TokenId;

/// Collect ids, keeping the first occurrence of each
pub(crate) fn collect_unique(ids: impl IntoIterator<Item = TokenId>) -> Vec<TokenId> {
    let mut seen = FxHashSet::default();
    ids.into_iter().filter(|&id| seen.insert(id)).collect()
}

impl Treebank {
    /// Head of `id`, looking through one auxiliary
    pub fn auxiliary_skip_parent(&self, id: TokenId) -> TokenId {
        let parent = self.parent(id);
        if self.is_auxiliary(parent) {
            self.parent(parent)
        } else {
            parent
        }
    }

    /// Children of `id`, with each auxiliary child replaced by its own children
    pub fn auxiliary_skip_children(&self, id: TokenId) -> Vec<TokenId> {
        let mut out = Vec::new();
        for &c in self.children(id) {
            if self.is_auxiliary(c) {
                out.extend_from_slice(self.children(c));
            } else {
                out.push(c);
            }
        }
        collect_unique(out)
    }

    /// The relation a coordinator coordinates (`OBJ` for `OBJ_CO` coordinands)
    pub fn coordinated_relation(&self, id: TokenId) -> Option<&str> {
        self.coordinated_sym(id).map(|sym| self.resolve(sym))
    }

    /// True if `id` is a coordinand of `relation`, or an auxiliary governing one
    pub fn is_co_member(&self, id: TokenId, relation: &str) -> bool {
        self.is_co_member_sym(id, self.lookup(relation))
    }

    /// Coordinators at, below and above `id` that make up one coordination
    pub fn coordination_group(&self, id: TokenId) -> Vec<TokenId> {
        if !self.is_coordinator(id) {
            return Vec::new();
        }
        let mut candidates = self.same_relation_chain_down(id);
        candidates.extend(self.same_relation_chain_up(id));
        candidates.push(id);
        self.same_coordination(id, candidates)
    }

    /// The part of the coordination group at and above `id`
    pub fn coordination_group_up(&self, id: TokenId) -> Vec<TokenId> {
        if !self.is_coordinator(id) {
            return Vec::new();
        }
        let mut candidates = self.same_relation_chain_up(id);
        candidates.push(id);
        self.same_coordination(id, candidates)
    }

    /// The part of the coordination group at and below `id`
    pub fn coordination_group_down(&self, id: TokenId) -> Vec<TokenId> {
        if !self.is_coordinator(id) {
            return Vec::new();
        }
        let mut candidates = self.same_relation_chain_down(id);
        candidates.push(id);
        self.same_coordination(id, candidates)
    }

    /// Children of the coordination group that take part in the coordination
    ///
    /// A coordinand below an auxiliary is reported as the auxiliary.
    pub fn coordinands(&self, id: TokenId) -> Vec<TokenId> {
        let relation = self.coordinated_sym(id);
        let members = self.coordination_group(id);
        collect_unique(members.iter().flat_map(|&m| self.children(m).iter().copied()))
            .into_iter()
            .filter(|&c| self.is_co_member_sym(c, relation))
            .collect()
    }

    /// Like [`Treebank::coordinands`], but reporting the coordinand itself
    /// instead of an auxiliary that wraps it
    pub fn coordinands_aux_stripped(&self, id: TokenId) -> Vec<TokenId> {
        let Some(relation) = self.coordinated_sym(id) else {
            return Vec::new();
        };
        let members = self.coordination_group(id);
        collect_unique(members.iter().flat_map(|&m| self.auxiliary_skip_children(m)))
            .into_iter()
            .filter(|&c| self.coordinand_of(c) == Some(relation))
            .collect()
    }

    /// Children of the coordination (at and above `id`) that depend on the
    /// coordination as a whole rather than taking part in it, looking through
    /// auxiliaries
    pub fn non_coordinated_children(&self, id: TokenId) -> Vec<TokenId> {
        let relation = self.coordinated_sym(id);
        let members = self.coordination_group_up(id);
        collect_unique(members.iter().flat_map(|&m| self.auxiliary_skip_children(m)))
            .into_iter()
            .filter(|&c| relation.is_none() || self.coordinand_of(c) != relation)
            .filter(|&c| !self.is_nested_coordinator(c, relation))
            .collect()
    }

    /// Like [`Treebank::non_coordinated_children`], but over the raw children,
    /// so auxiliaries are reported as themselves
    pub fn non_coordinated_tree_children(&self, id: TokenId) -> Vec<TokenId> {
        let relation = self.coordinated_sym(id);
        let members = self.coordination_group_up(id);
        collect_unique(members.iter().flat_map(|&m| self.children(m).iter().copied()))
            .into_iter()
            .filter(|&c| !self.is_co_member_sym(c, relation))
            .filter(|&c| !self.is_nested_coordinator(c, relation))
            .collect()
    }

    pub(crate) fn coordinated_sym(&self, id: TokenId) -> Option<Spur> {
        if !self.is_coordinator(id) {
            return None;
        }
        self.auxiliary_skip_children(id)
            .into_iter()
            .find_map(|c| self.coordinand_of(c))
    }

    pub(crate) fn is_co_member_sym(&self, id: TokenId, relation: Option<Spur>) -> bool {
        let Some(relation) = relation else {
            return false;
        };
        if self.coordinand_of(id) == Some(relation) {
            return true;
        }
        self.is_auxiliary(id)
            && self
                .children(id)
                .iter()
                .any(|&c| self.coordinand_of(c) == Some(relation))
    }

    /// A coordinator child that continues the same coordination
    fn is_nested_coordinator(&self, id: TokenId, relation: Option<Spur>) -> bool {
        self.is_coordinator(id) && self.coordinated_sym(id) == relation
    }

    /// Keep candidates that coordinate the same relation as `id`, or where
    /// either relation is unknown
    fn same_coordination(&self, id: TokenId, candidates: Vec<TokenId>) -> Vec<TokenId> {
        let relation = self.coordinated_sym(id);
        collect_unique(candidates)
            .into_iter()
            .filter(|&t| {
                let other = self.coordinated_sym(t);
                relation.is_none() || other.is_none() || other == relation
            })
            .collect()
    }
}
