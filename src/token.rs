//! Token data structures
//!
//! A treebank is a flat collection of tokens linked by head pointers. Token ids
//! are unique across the whole collection, so a head id names exactly one token
//! no matter which sentence we are looking at.

use lasso::Spur;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::label::Markers;

/// Unique identifier for a token (unique across the whole treebank)
pub type TokenId = usize;

/// Identifier grouping tokens into sentences
pub type SentenceId = usize;

/// Head value of a token attached directly to the root. Never a real token.
pub const ROOT: TokenId = 0;

/// One row of a normalized token collection, as produced by ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub id: TokenId,
    pub sentence_id: SentenceId,
    /// `None` when the source left the head blank
    pub head: Option<TokenId>,
    /// `None` when the source left the relation blank
    pub relation: Option<String>,
    pub form: String,
    pub lemma: String,
    pub pos: String,
}

impl TokenRecord {
    /// Create a record with a head and relation and empty payload fields
    pub fn new(id: TokenId, sentence_id: SentenceId, head: TokenId, relation: &str) -> Self {
        Self {
            id,
            sentence_id,
            head: Some(head),
            relation: Some(relation.to_string()),
            form: String::new(),
            lemma: String::new(),
            pos: String::new(),
        }
    }

    /// Set the surface form, lemma and part-of-speech tag
    pub fn with_payload(mut self, form: &str, lemma: &str, pos: &str) -> Self {
        self.form = form.to_string();
        self.lemma = lemma.to_string();
        self.pos = pos.to_string();
        self
    }
}

/// A stored token. Strings are interned in the owning treebank.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub id: TokenId,
    pub sentence_id: SentenceId,
    pub head: TokenId,
    pub head_present: bool,
    pub relation_present: bool,
    pub relation: Spur,
    pub form: Spur,
    pub lemma: Spur,
    pub pos: Spur,
    pub class: TokenClass,
}

/// Label classification cached per token at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenClass {
    pub markers: Markers,
    /// Label is exactly the coordinator tag
    pub coordinator: bool,
    /// Base relation when the label is `<base><coordinand suffix>`
    pub coordinand_of: Option<Spur>,
}

/// A named token field, for generic lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    SentenceId,
    Head,
    Relation,
    Lemma,
    Form,
    Pos,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown field name: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts the usual treebank column spellings: `Token_ID`, `word id`,
    /// `Sentence_ID`, `Head`, `Relation`, `Lemma`, `Token`, `Form`, `POS`, `postag`...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | ' ' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "id" | "tokenid" | "wordid" => Ok(Field::Id),
            "sentenceid" | "sentence" | "sid" => Ok(Field::SentenceId),
            "head" => Ok(Field::Head),
            "relation" | "deprel" => Ok(Field::Relation),
            "lemma" => Ok(Field::Lemma),
            "form" | "token" | "word" => Ok(Field::Form),
            "pos" | "postag" | "poscode" => Ok(Field::Pos),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

impl Field {
    /// Integer-valued fields are compared numerically, the rest as text
    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Id | Field::SentenceId | Field::Head)
    }
}

/// Value of a token field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Int(usize),
    Text(&'a str),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!("Token_ID".parse::<Field>().unwrap(), Field::Id);
        assert_eq!("word id".parse::<Field>().unwrap(), Field::Id);
        assert_eq!("Sentence_ID".parse::<Field>().unwrap(), Field::SentenceId);
        assert_eq!("Head".parse::<Field>().unwrap(), Field::Head);
        assert_eq!("relation".parse::<Field>().unwrap(), Field::Relation);
        assert_eq!("Token".parse::<Field>().unwrap(), Field::Form);
        assert_eq!("POS_code".parse::<Field>().unwrap(), Field::Pos);
        assert_eq!("postag".parse::<Field>().unwrap(), Field::Pos);
    }

    #[test]
    fn test_unknown_field() {
        let err = "colour".parse::<Field>().unwrap_err();
        assert_eq!(err, UnknownField("colour".to_string()));
        assert_eq!(err.to_string(), "Unknown field name: colour");
    }

    #[test]
    fn test_record_builder() {
        let record = TokenRecord::new(3, 1, 2, "OBJ").with_payload("arma", "arma", "n-p---na-");
        assert_eq!(record.head, Some(2));
        assert_eq!(record.relation.as_deref(), Some("OBJ"));
        assert_eq!(record.lemma, "arma");
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Int(42).to_string(), "42");
        assert_eq!(FieldValue::Text("ATR").to_string(), "ATR");
    }
}
