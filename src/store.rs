//! The token store
//!
//! A [`Treebank`] is built once from a normalized token collection and never
//! changes afterwards. Every query in this crate is a read over it, so a
//! `&Treebank` can be shared freely between threads.
//!
//! All accessors are total: an unknown token id yields `None` (or an empty
//! slice), never a panic. `None` means "no such token"; a token whose relation
//! cell was blank has the relation `Some("")`.

use indexmap::IndexMap;
use lasso::{Rodeo, RodeoReader, Spur};
use rustc_hash::{FxBuildHasher, FxHashMap};
use thiserror::Error;

use crate::index::TreeIndex;
use crate::label::LabelScheme;
use crate::token::{
    Field, FieldValue, ROOT, SentenceId, Token, TokenClass, TokenId, TokenRecord,
};

/// Error while building a treebank from records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store error: duplicate token id {0}")]
    DuplicateId(TokenId),

    #[error("Store error: token id 0 is reserved for the root")]
    ReservedId,
}

/// An immutable, indexed collection of tokens
pub struct Treebank {
    tokens: Vec<Token>,
    positions: FxHashMap<TokenId, usize>,
    /// Direct children by head id, in document order
    children: FxHashMap<TokenId, Vec<TokenId>>,
    /// Sentence membership in document order, sentences in order of first appearance
    sentences: IndexMap<SentenceId, Vec<TokenId>, FxBuildHasher>,
    strings: RodeoReader<Spur, FxBuildHasher>,
    index: TreeIndex,
    scheme: LabelScheme,
}

impl std::fmt::Debug for Treebank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Treebank")
            .field("tokens", &self.tokens.len())
            .field("sentences", &self.sentences.len())
            .field("scheme", &self.scheme)
            .finish()
    }
}

/// Borrowed view of one token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenView<'a> {
    pub id: TokenId,
    pub sentence_id: SentenceId,
    pub head: TokenId,
    pub relation: &'a str,
    pub form: &'a str,
    pub lemma: &'a str,
    pub pos: &'a str,
}

impl Treebank {
    /// Build a treebank using the default (AGDT) label scheme
    pub fn new(records: impl IntoIterator<Item = TokenRecord>) -> Result<Self, StoreError> {
        Self::with_scheme(records, LabelScheme::default())
    }

    /// Build a treebank using a custom label scheme
    ///
    /// Token ids must be unique and non-zero. Heads are taken as given; dangling
    /// or cyclic heads are tolerated here and reported by the validator.
    pub fn with_scheme(
        records: impl IntoIterator<Item = TokenRecord>,
        scheme: LabelScheme,
    ) -> Result<Self, StoreError> {
        let mut rodeo: Rodeo<Spur, FxBuildHasher> = Rodeo::with_hasher(FxBuildHasher);
        let mut tokens = Vec::new();
        let mut positions = FxHashMap::default();
        let mut sentences: IndexMap<SentenceId, Vec<TokenId>, FxBuildHasher> =
            IndexMap::with_hasher(FxBuildHasher);

        for record in records {
            if record.id == ROOT {
                return Err(StoreError::ReservedId);
            }
            if positions.insert(record.id, tokens.len()).is_some() {
                return Err(StoreError::DuplicateId(record.id));
            }

            let relation_str = record.relation.as_deref().unwrap_or("");
            let class = TokenClass {
                markers: scheme.markers(relation_str),
                coordinator: scheme.is_coordinator(relation_str),
                coordinand_of: scheme
                    .coordinand_base(relation_str)
                    .map(|base| rodeo.get_or_intern(base)),
            };

            sentences
                .entry(record.sentence_id)
                .or_default()
                .push(record.id);

            tokens.push(Token {
                id: record.id,
                sentence_id: record.sentence_id,
                head: record.head.unwrap_or(ROOT),
                head_present: record.head.is_some(),
                relation_present: record.relation.is_some(),
                relation: rodeo.get_or_intern(relation_str),
                form: rodeo.get_or_intern(&record.form),
                lemma: rodeo.get_or_intern(&record.lemma),
                pos: rodeo.get_or_intern(&record.pos),
                class,
            });
        }

        let mut children: FxHashMap<TokenId, Vec<TokenId>> = FxHashMap::default();
        for token in &tokens {
            if token.head != ROOT {
                children.entry(token.head).or_default().push(token.id);
            }
        }

        let index = TreeIndex::build(&tokens);

        Ok(Self {
            tokens,
            positions,
            children,
            sentences,
            strings: rodeo.into_reader(),
            index,
            scheme,
        })
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn scheme(&self) -> &LabelScheme {
        &self.scheme
    }

    /// All token ids in document order
    pub fn ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.tokens.iter().map(|t| t.id)
    }

    /// All sentence ids in order of first appearance
    pub fn sentence_ids(&self) -> impl ExactSizeIterator<Item = SentenceId> + '_ {
        self.sentences.keys().copied()
    }

    /// Token ids of a sentence in document order
    pub fn sentence_tokens(&self, sentence_id: SentenceId) -> &[TokenId] {
        self.sentences
            .get(&sentence_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Token ids of the sentence containing `id`
    pub fn sentence_of(&self, id: TokenId) -> &[TokenId] {
        match self.sentence_id(id) {
            Some(sid) => self.sentence_tokens(sid),
            None => &[],
        }
    }

    pub fn token(&self, id: TokenId) -> Option<TokenView<'_>> {
        self.get(id).map(|t| TokenView {
            id: t.id,
            sentence_id: t.sentence_id,
            head: t.head,
            relation: self.resolve(t.relation),
            form: self.resolve(t.form),
            lemma: self.resolve(t.lemma),
            pos: self.resolve(t.pos),
        })
    }

    pub fn relation(&self, id: TokenId) -> Option<&str> {
        self.get(id).map(|t| self.resolve(t.relation))
    }

    pub fn form(&self, id: TokenId) -> Option<&str> {
        self.get(id).map(|t| self.resolve(t.form))
    }

    pub fn lemma(&self, id: TokenId) -> Option<&str> {
        self.get(id).map(|t| self.resolve(t.lemma))
    }

    pub fn pos(&self, id: TokenId) -> Option<&str> {
        self.get(id).map(|t| self.resolve(t.pos))
    }

    pub fn sentence_id(&self, id: TokenId) -> Option<SentenceId> {
        self.get(id).map(|t| t.sentence_id)
    }

    /// Raw head of a token (`Some(0)` for roots and for tokens with a blank head)
    pub fn head(&self, id: TokenId) -> Option<TokenId> {
        self.get(id).map(|t| t.head)
    }

    /// Surface forms of several tokens, `None` in place of unknown ids
    pub fn forms(&self, ids: &[TokenId]) -> Vec<Option<&str>> {
        ids.iter().map(|&id| self.form(id)).collect()
    }

    /// Any named field of a token
    pub fn field(&self, id: TokenId, field: Field) -> Option<FieldValue<'_>> {
        let t = self.get(id)?;
        Some(match field {
            Field::Id => FieldValue::Int(t.id),
            Field::SentenceId => FieldValue::Int(t.sentence_id),
            Field::Head => FieldValue::Int(t.head),
            Field::Relation => FieldValue::Text(self.resolve(t.relation)),
            Field::Lemma => FieldValue::Text(self.resolve(t.lemma)),
            Field::Form => FieldValue::Text(self.resolve(t.form)),
            Field::Pos => FieldValue::Text(self.resolve(t.pos)),
        })
    }

    #[inline]
    pub(crate) fn get(&self, id: TokenId) -> Option<&Token> {
        self.positions.get(&id).map(|&pos| &self.tokens[pos])
    }

    #[inline]
    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    pub(crate) fn resolve(&self, sym: Spur) -> &str {
        self.strings.resolve(&sym)
    }

    /// Symbol for a string, if any token uses it
    #[inline]
    pub(crate) fn lookup(&self, s: &str) -> Option<Spur> {
        self.strings.get(s)
    }

    #[inline]
    pub(crate) fn index(&self) -> &TreeIndex {
        &self.index
    }

    #[inline]
    pub(crate) fn direct_children(&self, id: TokenId) -> &[TokenId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub(crate) fn class(&self, id: TokenId) -> Option<TokenClass> {
        self.get(id).map(|t| t.class)
    }

    #[inline]
    pub(crate) fn relation_sym(&self, id: TokenId) -> Option<Spur> {
        self.get(id).map(|t| t.relation)
    }

    #[inline]
    pub(crate) fn is_auxiliary(&self, id: TokenId) -> bool {
        self.get(id).is_some_and(|t| t.class.markers.auxiliary)
    }

    #[inline]
    pub(crate) fn is_coordinator(&self, id: TokenId) -> bool {
        self.get(id).is_some_and(|t| t.class.coordinator)
    }

    #[inline]
    pub(crate) fn coordinand_of(&self, id: TokenId) -> Option<Spur> {
        self.get(id).and_then(|t| t.class.coordinand_of)
    }
}
