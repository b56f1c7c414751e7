//! Parallel evaluation over sentences
//!
//! Sentences never share tokens, so a corpus-wide query is a map over
//! sentence ids with nothing shared but the read-only treebank.

use rayon::prelude::*;

use crate::store::Treebank;
use crate::token::SentenceId;
use crate::validate::Defect;

impl Treebank {
    /// Evaluate `f` on every sentence in parallel
    ///
    /// Results come back in sentence order regardless of scheduling.
    pub fn par_map_sentences<R, F>(&self, f: F) -> Vec<(SentenceId, R)>
    where
        F: Fn(&Treebank, SentenceId) -> R + Sync + Send,
        R: Send,
    {
        let sentence_ids: Vec<SentenceId> = self.sentence_ids().collect();
        sentence_ids
            .into_par_iter()
            .map(|sid| (sid, f(self, sid)))
            .collect()
    }

    /// Every sentence with at least one defect, in sentence order
    pub fn par_diagnose(&self) -> Vec<(SentenceId, Vec<Defect>)> {
        self.par_map_sentences(|tb, sid| tb.diagnose(sid))
            .into_iter()
            .filter(|(_, defects)| !defects.is_empty())
            .collect()
    }
}
