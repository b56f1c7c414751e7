//! Syntactic ("smart") view of a tree
//!
//! The raw tree encodes auxiliaries and coordinators as ordinary nodes. The
//! smart view answers the questions a linguist actually asks: which word does
//! this word depend on, and which words depend on it. Auxiliaries are looked
//! through, and a coordination stands for its coordinands:
//!
//! - a dependent shared by a coordination depends on every coordinand, so it
//!   has several smart parents;
//! - a coordinand depends on whatever the coordination as a whole depends on.

use tracing::debug;

use crate::coord::collect_unique;
use crate::store::Treebank;
use crate::token::{ROOT, TokenId};

impl Treebank {
    /// The syntactic heads of `id`
    ///
    /// `[0]` for a token governed by the root. Empty for an unknown id, and
    /// for a token whose head chain runs into a cycle before reaching a word.
    pub fn smart_parents(&self, id: TokenId) -> Vec<TokenId> {
        if !self.contains(id) {
            return Vec::new();
        }

        let mut walk = self.ancestors_iter(id);
        for p in walk.by_ref() {
            if self.is_coordinator(p) {
                let relation = self.coordinated_sym(p);
                if self.is_co_member_sym(id, relation) {
                    continue;
                }
                return self.coordinands_aux_stripped(p);
            }
            if self.is_auxiliary(p) {
                continue;
            }
            return vec![p];
        }

        if walk.truncated() {
            debug!(token = id, "no smart parent: head chain is cyclic");
            return Vec::new();
        }
        vec![ROOT]
    }

    /// The syntactic dependents of `id`
    ///
    /// For an auxiliary these are the words it links (the coordinands, if it
    /// links a coordination); for a coordinator, its coordinands. Otherwise,
    /// every word of the sentence that has `id` among its smart parents.
    pub fn smart_children(&self, id: TokenId) -> Vec<TokenId> {
        if !self.contains(id) {
            return Vec::new();
        }

        if self.is_auxiliary(id) {
            let children = self.children(id);
            return match children.first() {
                Some(&child) if self.is_coordinator(child) => self.coordinands_aux_stripped(child),
                _ => children.to_vec(),
            };
        }

        if self.is_coordinator(id) {
            return self.coordinands_aux_stripped(id);
        }

        self.sentence_of(id)
            .iter()
            .copied()
            .filter(|&j| !self.is_coordinator(j) && !self.is_auxiliary(j))
            .filter(|&j| self.smart_parents(j).contains(&id))
            .collect()
    }

    /// Every coordinand coordinated with `id`, `id` included
    ///
    /// A token that is not a coordinand is its own only sibling.
    pub fn smart_siblings(&self, id: TokenId) -> Vec<TokenId> {
        let Some(class) = self.class(id) else {
            return Vec::new();
        };
        if !class.markers.coordinand {
            return vec![id];
        }

        let coordinator = self.auxiliary_skip_parent(id);
        let Some(relation) = self.coordinated_sym(coordinator) else {
            return Vec::new();
        };
        let members = self.coordination_group(coordinator);
        collect_unique(members.iter().flat_map(|&m| self.auxiliary_skip_children(m)))
            .into_iter()
            .filter(|&c| self.coordinand_of(c) == Some(relation))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{bank, coordination_bank, nested_bank, sorted};

    #[test]
    fn test_plain_tree() {
        let tb = bank(&[(1, 0, "ROOT"), (2, 1, "SBJ"), (3, 1, "OBJ")]);

        assert_eq!(tb.treetop(2), vec![1]);
        assert_eq!(tb.smart_children(1), vec![2, 3]);
        assert_eq!(tb.smart_parents(2), vec![1]);
        assert_eq!(tb.smart_parents(1), vec![ROOT]);
        assert_eq!(tb.smart_siblings(2), vec![2]);
    }

    #[test]
    fn test_coordinator_is_invisible() {
        let tb = bank(&[(1, 0, "PRED"), (2, 1, "COORD"), (3, 2, "OBJ_CO"), (4, 2, "OBJ_CO")]);

        assert_eq!(tb.smart_children(1), vec![3, 4]);
        assert_eq!(tb.smart_children(2), vec![3, 4]);
        assert_eq!(tb.smart_parents(3), vec![1]);
        assert_eq!(tb.smart_siblings(3), vec![3, 4]);
    }

    #[test]
    fn test_auxiliary_is_skipped() {
        let tb = bank(&[(1, 0, "PRED"), (2, 1, "AuxP"), (3, 2, "OBJ")]);

        assert_eq!(tb.smart_children(1), vec![3]);
        assert_eq!(tb.smart_parents(3), vec![1]);
        assert_eq!(tb.smart_children(2), vec![3]);
    }

    #[test]
    fn test_auxiliary_transparency() {
        let with_aux = bank(&[(1, 0, "PRED"), (2, 1, "AuxP"), (3, 2, "OBJ"), (4, 1, "SBJ")]);
        let without = bank(&[(1, 0, "PRED"), (3, 1, "OBJ"), (4, 1, "SBJ")]);

        assert_eq!(
            sorted(with_aux.smart_children(1)),
            sorted(without.smart_children(1))
        );
    }

    #[test]
    fn test_shared_dependent_has_several_parents() {
        let tb = coordination_bank();

        assert_eq!(tb.smart_parents(8), vec![4, 5]);
        assert_eq!(tb.smart_children(4), vec![8]);
        assert_eq!(tb.smart_children(5), vec![8]);
        assert_eq!(tb.smart_children(1), vec![2, 4, 5, 7]);
        assert_eq!(tb.smart_parents(7), vec![1]);
    }

    #[test]
    fn test_nested_coordination() {
        let tb = nested_bank();

        assert_eq!(tb.smart_parents(4), vec![1]);
        assert_eq!(tb.smart_parents(7), vec![1]);
        assert_eq!(sorted(tb.smart_children(1)), vec![4, 5, 7, 9]);
        assert_eq!(sorted(tb.smart_siblings(7)), vec![4, 5, 7]);
        assert_eq!(sorted(tb.smart_siblings(4)), vec![4, 5, 7]);
        assert_eq!(sorted(tb.smart_parents(8)), vec![4, 5, 7]);
    }

    #[test]
    fn test_auxiliary_over_coordination() {
        // "cum equis et armis": the preposition links a whole coordination
        let tb = bank(&[
            (1, 0, "PRED"),
            (2, 1, "AuxP"),
            (3, 2, "COORD"),
            (4, 3, "ADV_CO"),
            (5, 3, "ADV_CO"),
        ]);

        assert_eq!(tb.smart_children(2), vec![4, 5]);
        assert_eq!(tb.smart_parents(4), vec![1]);
        assert_eq!(tb.smart_children(1), vec![4, 5]);
    }

    #[test]
    fn test_unknown_and_cyclic_tokens() {
        let tb = bank(&[(1, 0, "PRED"), (2, 3, "OBJ"), (3, 2, "AuxP")]);

        assert!(tb.smart_parents(99).is_empty());
        assert!(tb.smart_children(99).is_empty());
        assert!(tb.smart_siblings(99).is_empty());
        // 2 only ever reaches the auxiliary 3, then the cycle
        assert!(tb.smart_parents(2).is_empty());
    }

    #[test]
    fn test_unresolved_coordinator_gives_no_parent() {
        let tb = bank(&[(1, 0, "PRED"), (2, 1, "COORD"), (3, 2, "ATR")]);
        assert!(tb.smart_parents(3).is_empty());
    }
}
