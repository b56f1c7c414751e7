//! Raw head-pointer traversal
//!
//! These walks follow the heads exactly as stored. They make no assumption
//! that the data is a well-formed tree: every upward walk carries a visited
//! set and stops at the first repeated id, and every downward walk is a
//! worklist expansion over a visited set, so cyclic or dangling heads can
//! truncate a result but never hang it.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::store::Treebank;
use crate::token::{ROOT, SentenceId, TokenId};

/// Iterator over the ancestors of a token, nearest first
///
/// Yields raw head ids up to (not including) the root sentinel. A head that
/// names an unknown token is yielded once and ends the walk.
pub struct Ancestors<'a> {
    treebank: &'a Treebank,
    current: TokenId,
    seen: FxHashSet<TokenId>,
    truncated: bool,
}

impl Ancestors<'_> {
    /// True once the walk has been cut short by a head cycle
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

impl Iterator for Ancestors<'_> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        let parent = self.treebank.parent(self.current);
        if parent == ROOT {
            return None;
        }
        if !self.seen.insert(parent) {
            debug!(token = self.current, head = parent, "head cycle, truncating ancestor walk");
            self.current = ROOT;
            self.truncated = true;
            return None;
        }
        self.current = parent;
        Some(parent)
    }
}

impl Treebank {
    /// Head of `id`, or the root sentinel if `id` is unknown
    pub fn parent(&self, id: TokenId) -> TokenId {
        self.head(id).unwrap_or(ROOT)
    }

    pub fn ancestors_iter(&self, id: TokenId) -> Ancestors<'_> {
        let mut seen = FxHashSet::default();
        seen.insert(id);
        Ancestors {
            treebank: self,
            current: id,
            seen,
            truncated: false,
        }
    }

    /// Chain of heads from `id` up to the root, nearest first, without the sentinel
    pub fn ancestors(&self, id: TokenId) -> Vec<TokenId> {
        self.ancestors_iter(id).collect()
    }

    /// Tokens whose head is `id`, in document order
    ///
    /// The root sentinel is not a token and has no children here; use
    /// [`Treebank::roots`] for the top of a sentence.
    pub fn children(&self, id: TokenId) -> &[TokenId] {
        if id == ROOT {
            return &[];
        }
        self.direct_children(id)
    }

    /// All tokens below `id`, breadth first
    pub fn descendants(&self, id: TokenId) -> Vec<TokenId> {
        self.expand_down(id, |_| true)
    }

    /// Tokens attached directly to the root in a sentence
    pub fn roots(&self, sentence_id: SentenceId) -> Vec<TokenId> {
        self.sentence_tokens(sentence_id)
            .iter()
            .copied()
            .filter(|&id| self.parent(id) == ROOT)
            .collect()
    }

    /// Roots of the sentence containing `id`
    pub fn treetop(&self, id: TokenId) -> Vec<TokenId> {
        match self.sentence_id(id) {
            Some(sid) => self.roots(sid),
            None => Vec::new(),
        }
    }

    /// Tokens sharing `id`'s head, `id` included
    pub fn tree_siblings(&self, id: TokenId) -> Vec<TokenId> {
        if !self.contains(id) {
            return Vec::new();
        }
        match self.parent(id) {
            ROOT => self.treetop(id),
            parent => self.children(parent).to_vec(),
        }
    }

    /// Ancestors of `id` for as long as they carry the same relation as `id`
    pub fn same_relation_chain_up(&self, id: TokenId) -> Vec<TokenId> {
        let Some(relation) = self.relation_sym(id) else {
            return Vec::new();
        };
        self.ancestors_iter(id)
            .take_while(|&p| self.relation_sym(p) == Some(relation))
            .collect()
    }

    /// Descendants of `id` reachable through tokens with the same relation as `id`
    pub fn same_relation_chain_down(&self, id: TokenId) -> Vec<TokenId> {
        let Some(relation) = self.relation_sym(id) else {
            return Vec::new();
        };
        self.expand_down(id, |c| self.relation_sym(c) == Some(relation))
    }

    /// Worklist expansion below `id` through children accepted by `keep`
    fn expand_down(&self, id: TokenId, keep: impl Fn(TokenId) -> bool) -> Vec<TokenId> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut queue: VecDeque<TokenId> = self.children(id).iter().copied().collect();

        while let Some(next) = queue.pop_front() {
            if !keep(next) || !seen.insert(next) {
                continue;
            }
            out.push(next);
            queue.extend(self.children(next).iter().copied());
        }

        out
    }
}
