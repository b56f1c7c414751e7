//! Tree diagnostics
//!
//! Checks whether a sentence is shaped the way the coordination and smart-view
//! queries expect. Nothing here repairs a tree; the traversals protect
//! themselves regardless, but results on a defective sentence may be partial.
//!
//! Each check comes in two forms: `check_*` returns the first [`Defect`] found,
//! and the boolean form reports it as a `warn` event and returns `false`.

use thiserror::Error;
use tracing::warn;

use crate::store::Treebank;
use crate::token::{ROOT, SentenceId, Token, TokenId};

/// A structural defect in a sentence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Defect {
    #[error("sentence {sentence} appears to lack a root")]
    MissingRoot { sentence: SentenceId },

    #[error("token {token} in sentence {sentence} has no head")]
    MissingHead { sentence: SentenceId, token: TokenId },

    #[error("token {token} in sentence {sentence} has no relation")]
    MissingRelation { sentence: SentenceId, token: TokenId },

    #[error("token {token} in sentence {sentence} has head {head}, which is not in the sentence")]
    DanglingHead {
        sentence: SentenceId,
        token: TokenId,
        head: TokenId,
    },

    #[error("sentence {sentence} contains a head cycle above token {token}")]
    Cycle { sentence: SentenceId, token: TokenId },

    #[error("auxiliary {token} in sentence {sentence} has {children} children")]
    BranchingAuxiliary {
        sentence: SentenceId,
        token: TokenId,
        children: usize,
    },

    #[error("auxiliary {token} in sentence {sentence} governs auxiliary {child}")]
    StackedAuxiliary {
        sentence: SentenceId,
        token: TokenId,
        child: TokenId,
    },

    #[error("token {token} in sentence {sentence} has malformed relation {label:?}")]
    MalformedLabel {
        sentence: SentenceId,
        token: TokenId,
        label: String,
    },

    #[error("coordinator {token} in sentence {sentence} has no recognisable coordinands")]
    UnresolvedCoordinator { sentence: SentenceId, token: TokenId },
}

fn report(result: Result<(), Defect>) -> bool {
    match result {
        Ok(()) => true,
        Err(defect) => {
            warn!("{}", defect);
            false
        }
    }
}

impl Treebank {
    fn sentence_entries(&self, sentence: SentenceId) -> impl Iterator<Item = &Token> + '_ {
        self.sentence_tokens(sentence)
            .iter()
            .filter_map(|&id| self.get(id))
    }

    /// At least one token attached to the root
    pub fn check_root(&self, sentence: SentenceId) -> Result<(), Defect> {
        if self.sentence_entries(sentence).any(|t| t.head == ROOT) {
            Ok(())
        } else {
            Err(Defect::MissingRoot { sentence })
        }
    }

    /// Every token has a head value
    pub fn check_heads_complete(&self, sentence: SentenceId) -> Result<(), Defect> {
        match self.sentence_entries(sentence).find(|t| !t.head_present) {
            Some(t) => Err(Defect::MissingHead {
                sentence,
                token: t.id,
            }),
            None => Ok(()),
        }
    }

    /// Every token has a relation value
    pub fn check_relations_complete(&self, sentence: SentenceId) -> Result<(), Defect> {
        match self.sentence_entries(sentence).find(|t| !t.relation_present) {
            Some(t) => Err(Defect::MissingRelation {
                sentence,
                token: t.id,
            }),
            None => Ok(()),
        }
    }

    /// Every non-root head names a token of the same sentence
    pub fn check_heads_resolved(&self, sentence: SentenceId) -> Result<(), Defect> {
        let dangling = self.sentence_entries(sentence).find(|t| {
            t.head != ROOT && self.sentence_id(t.head) != Some(sentence)
        });
        match dangling {
            Some(t) => Err(Defect::DanglingHead {
                sentence,
                token: t.id,
                head: t.head,
            }),
            None => Ok(()),
        }
    }

    /// No head chain revisits a token
    pub fn check_acyclic(&self, sentence: SentenceId) -> Result<(), Defect> {
        for &id in self.sentence_tokens(sentence) {
            let mut walk = self.ancestors_iter(id);
            walk.by_ref().for_each(drop);
            if walk.truncated() {
                return Err(Defect::Cycle {
                    sentence,
                    token: id,
                });
            }
        }
        Ok(())
    }

    /// Auxiliaries have at most one child, and that child is not an auxiliary
    pub fn check_auxiliaries_isolated(&self, sentence: SentenceId) -> Result<(), Defect> {
        for t in self.sentence_entries(sentence) {
            if !t.class.markers.auxiliary {
                continue;
            }
            let children = self.children(t.id);
            if children.len() > 1 {
                return Err(Defect::BranchingAuxiliary {
                    sentence,
                    token: t.id,
                    children: children.len(),
                });
            }
            if let Some(&child) = children.iter().find(|&&c| self.is_auxiliary(c)) {
                return Err(Defect::StackedAuxiliary {
                    sentence,
                    token: t.id,
                    child,
                });
            }
        }
        Ok(())
    }

    /// No relation label carries more than one category marker
    pub fn check_labels_well_formed(&self, sentence: SentenceId) -> Result<(), Defect> {
        match self
            .sentence_entries(sentence)
            .find(|t| t.class.markers.count() > 1)
        {
            Some(t) => Err(Defect::MalformedLabel {
                sentence,
                token: t.id,
                label: self.resolve(t.relation).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Every coordinator has a determinable coordinated relation
    pub fn check_coordinators_resolved(&self, sentence: SentenceId) -> Result<(), Defect> {
        match self
            .sentence_entries(sentence)
            .find(|t| t.class.coordinator && self.coordinated_sym(t.id).is_none())
        {
            Some(t) => Err(Defect::UnresolvedCoordinator {
                sentence,
                token: t.id,
            }),
            None => Ok(()),
        }
    }

    pub fn has_root(&self, sentence: SentenceId) -> bool {
        report(self.check_root(sentence))
    }

    pub fn heads_complete(&self, sentence: SentenceId) -> bool {
        report(self.check_heads_complete(sentence))
    }

    pub fn relations_complete(&self, sentence: SentenceId) -> bool {
        report(self.check_relations_complete(sentence))
    }

    pub fn heads_resolved(&self, sentence: SentenceId) -> bool {
        report(self.check_heads_resolved(sentence))
    }

    pub fn acyclic(&self, sentence: SentenceId) -> bool {
        report(self.check_acyclic(sentence))
    }

    pub fn auxiliaries_isolated(&self, sentence: SentenceId) -> bool {
        report(self.check_auxiliaries_isolated(sentence))
    }

    pub fn labels_well_formed(&self, sentence: SentenceId) -> bool {
        report(self.check_labels_well_formed(sentence))
    }

    pub fn coordinators_resolved(&self, sentence: SentenceId) -> bool {
        report(self.check_coordinators_resolved(sentence))
    }

    /// The first defect found by each check, in check order
    pub fn diagnose(&self, sentence: SentenceId) -> Vec<Defect> {
        [
            self.check_root(sentence),
            self.check_heads_complete(sentence),
            self.check_relations_complete(sentence),
            self.check_heads_resolved(sentence),
            self.check_acyclic(sentence),
            self.check_auxiliaries_isolated(sentence),
            self.check_labels_well_formed(sentence),
            self.check_coordinators_resolved(sentence),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    pub fn is_healthy(&self, sentence: SentenceId) -> bool {
        self.diagnose(sentence).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{bank, coordination_bank, nested_bank};
    use crate::token::TokenRecord;

    #[test]
    fn test_healthy_sentences() {
        assert!(coordination_bank().is_healthy(1));
        assert!(nested_bank().is_healthy(1));
    }

    #[test]
    fn test_missing_root() {
        let tb = bank(&[(1, 2, "PRED"), (2, 1, "OBJ")]);

        assert!(!tb.has_root(1));
        assert_eq!(tb.check_root(1), Err(Defect::MissingRoot { sentence: 1 }));
    }

    #[test]
    fn test_unknown_sentence() {
        let tb = bank(&[(1, 0, "PRED")]);

        assert!(!tb.has_root(42));
        assert!(tb.acyclic(42));
        assert!(tb.labels_well_formed(42));
        assert_eq!(tb.diagnose(42), vec![Defect::MissingRoot { sentence: 42 }]);
    }

    #[test]
    fn test_cycle_detected() {
        let tb = bank(&[(1, 0, "PRED"), (2, 3, "OBJ"), (3, 2, "OBJ")]);

        assert!(tb.has_root(1));
        assert!(!tb.acyclic(1));
        assert_eq!(
            tb.check_acyclic(1),
            Err(Defect::Cycle {
                sentence: 1,
                token: 2
            })
        );
        // the walks themselves still terminate
        assert_eq!(tb.ancestors(2), vec![3]);
        assert_eq!(tb.ancestors(3), vec![2]);
    }

    #[test]
    fn test_incomplete_fields() {
        let mut no_head = TokenRecord::new(2, 1, 1, "OBJ");
        no_head.head = None;
        let mut no_relation = TokenRecord::new(3, 1, 1, "ATR");
        no_relation.relation = None;
        let tb = Treebank::new(vec![TokenRecord::new(1, 1, 0, "PRED"), no_head, no_relation])
            .unwrap();

        assert!(!tb.heads_complete(1));
        assert!(!tb.relations_complete(1));
        assert_eq!(
            tb.check_heads_complete(1),
            Err(Defect::MissingHead {
                sentence: 1,
                token: 2
            })
        );
        assert_eq!(
            tb.check_relations_complete(1),
            Err(Defect::MissingRelation {
                sentence: 1,
                token: 3
            })
        );
    }

    #[test]
    fn test_dangling_head() {
        let records = vec![
            TokenRecord::new(1, 1, 0, "PRED"),
            TokenRecord::new(2, 1, 3, "OBJ"),
            TokenRecord::new(3, 2, 0, "PRED"),
            TokenRecord::new(4, 2, 77, "SBJ"),
        ];
        let tb = Treebank::new(records).unwrap();

        assert_eq!(
            tb.check_heads_resolved(1),
            Err(Defect::DanglingHead {
                sentence: 1,
                token: 2,
                head: 3
            })
        );
        assert!(!tb.heads_resolved(2));
    }

    #[test]
    fn test_branching_and_stacked_auxiliaries() {
        let branching = bank(&[(1, 0, "PRED"), (2, 1, "AuxP"), (3, 2, "ADV"), (4, 2, "ATR")]);
        assert!(!branching.auxiliaries_isolated(1));
        assert_eq!(
            branching.check_auxiliaries_isolated(1),
            Err(Defect::BranchingAuxiliary {
                sentence: 1,
                token: 2,
                children: 2
            })
        );

        let stacked = bank(&[(1, 0, "PRED"), (2, 1, "AuxP"), (3, 2, "AuxC"), (4, 3, "ADV")]);
        assert_eq!(
            stacked.check_auxiliaries_isolated(1),
            Err(Defect::StackedAuxiliary {
                sentence: 1,
                token: 2,
                child: 3
            })
        );
    }

    #[test]
    fn test_malformed_labels() {
        let tb = bank(&[(1, 0, "PRED"), (2, 1, "AuxP_CO")]);

        assert!(!tb.labels_well_formed(1));
        assert_eq!(
            tb.check_labels_well_formed(1),
            Err(Defect::MalformedLabel {
                sentence: 1,
                token: 2,
                label: "AuxP_CO".to_string()
            })
        );
    }

    #[test]
    fn test_unresolved_coordinator() {
        let tb = bank(&[(1, 0, "PRED"), (2, 1, "COORD"), (3, 2, "ATR")]);

        assert!(!tb.coordinators_resolved(1));
        assert_eq!(
            tb.diagnose(1),
            vec![Defect::UnresolvedCoordinator {
                sentence: 1,
                token: 2
            }]
        );
    }

    #[test]
    fn test_defect_messages() {
        let defect = Defect::BranchingAuxiliary {
            sentence: 4,
            token: 9,
            children: 3,
        };
        assert_eq!(
            defect.to_string(),
            "auxiliary 9 in sentence 4 has 3 children"
        );
    }
}
