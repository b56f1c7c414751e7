//! Inverted indices for field lookup
//!
//! Built once alongside the token store. String fields are interned, so the
//! indices are keyed by symbol and a lookup for a string no token uses fails
//! before touching any map.

use lasso::Spur;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::store::Treebank;
use crate::token::{Field, FieldValue, Token, TokenId};

/// Inverted index for token payload fields
#[derive(Debug, Clone, Default)]
pub(crate) struct TreeIndex {
    /// Index by lemma
    by_lemma: FxHashMap<Spur, Vec<TokenId>>,
    /// Index by POS tag
    by_pos: FxHashMap<Spur, Vec<TokenId>>,
    /// Index by dependency relation
    by_relation: FxHashMap<Spur, Vec<TokenId>>,
    /// Index by form
    by_form: FxHashMap<Spur, Vec<TokenId>>,
}

impl TreeIndex {
    /// Build an index over tokens in document order
    pub fn build(tokens: &[Token]) -> Self {
        let mut index = Self::default();

        for token in tokens {
            index.add_token(token);
        }

        index
    }

    fn add_token(&mut self, token: &Token) {
        self.by_lemma.entry(token.lemma).or_default().push(token.id);
        self.by_pos.entry(token.pos).or_default().push(token.id);
        self.by_relation
            .entry(token.relation)
            .or_default()
            .push(token.id);
        self.by_form.entry(token.form).or_default().push(token.id);
    }

    /// Candidates for a string field, `None` for integer fields
    fn get(&self, field: Field, sym: Spur) -> Option<&[TokenId]> {
        let map = match field {
            Field::Lemma => &self.by_lemma,
            Field::Pos => &self.by_pos,
            Field::Relation => &self.by_relation,
            Field::Form => &self.by_form,
            Field::Id | Field::SentenceId | Field::Head => return None,
        };
        Some(map.get(&sym).map(Vec::as_slice).unwrap_or(&[]))
    }
}

impl Treebank {
    /// Tokens with the given surface form
    pub fn with_form(&self, form: &str) -> Vec<TokenId> {
        self.select(Field::Form, form)
    }

    pub fn with_lemma(&self, lemma: &str) -> Vec<TokenId> {
        self.select(Field::Lemma, lemma)
    }

    pub fn with_pos(&self, pos: &str) -> Vec<TokenId> {
        self.select(Field::Pos, pos)
    }

    pub fn with_relation(&self, relation: &str) -> Vec<TokenId> {
        self.select(Field::Relation, relation)
    }

    /// Tokens whose field equals `value`, in document order
    ///
    /// Integer fields compare numerically; a value that is not a number
    /// matches nothing.
    pub fn select(&self, field: Field, value: &str) -> Vec<TokenId> {
        if field.is_numeric() {
            let Ok(wanted) = value.trim().parse::<usize>() else {
                return Vec::new();
            };
            return self
                .ids()
                .filter(|&id| self.field(id, field) == Some(FieldValue::Int(wanted)))
                .collect();
        }

        match self.lookup(value) {
            Some(sym) => self
                .index()
                .get(field, sym)
                .map(<[TokenId]>::to_vec)
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Tokens whose field text contains a match for `pattern`, in document order
    pub fn select_matching(&self, field: Field, pattern: &Regex) -> Vec<TokenId> {
        self.ids()
            .filter(|&id| match self.field(id, field) {
                Some(FieldValue::Text(text)) => pattern.is_match(text),
                Some(FieldValue::Int(n)) => pattern.is_match(&n.to_string()),
                None => false,
            })
            .collect()
    }

    /// The ids from `ids` whose relation is exactly `relation`, in input order
    pub fn filter_relation(&self, relation: &str, ids: &[TokenId]) -> Vec<TokenId> {
        ids.iter()
            .copied()
            .filter(|&id| self.relation(id) == Some(relation))
            .collect()
    }
}
