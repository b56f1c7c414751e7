//! AGDT-style treebank XML
//!
//! Reads the `<sentence id=...>` / `<word id=... head=... relation=.../>`
//! layout used by the Ancient Greek and Latin Dependency Treebanks. Word
//! attributes map onto [`TokenRecord`] fields (`postag` is the part of
//! speech); any other attribute or element is ignored.

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use tracing::debug;

use crate::bytes::bs_number;
use crate::ingest::{IngestError, normalize, open_source};
use crate::store::Treebank;
use crate::token::{SentenceId, TokenRecord};

#[derive(Parser)]
#[grammar = "agdt_grammar.pest"]
struct AgdtParser;

/// Parse AGDT XML into token records, in document order
///
/// Words outside any sentence get sentence id 0; a `<sentence>` without an id
/// keeps the previous sentence's id. Words without an id are skipped.
pub fn parse_agdt(text: &str) -> Result<Vec<TokenRecord>, IngestError> {
    let mut pairs = AgdtParser::parse(Rule::document, text).map_err(Box::new)?;
    let Some(document) = pairs.next() else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    let mut sentence_id: SentenceId = 0;

    for pair in document.into_inner() {
        match pair.as_rule() {
            Rule::sentence_tag => {
                if let Some(sid) = number_attribute(&pair, "id")? {
                    sentence_id = sid;
                }
            }
            Rule::word_tag => match word(&pair, sentence_id)? {
                Some(record) => records.push(record),
                None => {
                    let (line, _) = pair.line_col();
                    debug!(line, "skipping word without an id");
                }
            },
            _ => {}
        }
    }

    Ok(records)
}

fn word(pair: &Pair<Rule>, sentence_id: SentenceId) -> Result<Option<TokenRecord>, IngestError> {
    let Some(id) = number_attribute(pair, "id")? else {
        return Ok(None);
    };
    let text = |key: &str| attribute(pair, key).map(Cow::into_owned).unwrap_or_default();

    Ok(Some(TokenRecord {
        id,
        sentence_id,
        head: number_attribute(pair, "head")?,
        relation: attribute(pair, "relation")
            .filter(|r| !r.trim().is_empty())
            .map(Cow::into_owned),
        form: text("form"),
        lemma: text("lemma"),
        pos: text("postag"),
    }))
}

/// Decoded value of the first attribute named `key`
fn attribute<'i>(pair: &Pair<'i, Rule>, key: &str) -> Option<Cow<'i, str>> {
    pair.clone()
        .into_inner()
        .filter(|attr| attr.as_rule() == Rule::attribute)
        .find_map(|attr| {
            let mut inner = attr.into_inner();
            let name = inner.next()?;
            let value = inner.next()?;
            (name.as_str() == key).then(|| decode_entities(value.as_str()))
        })
}

fn number_attribute(pair: &Pair<Rule>, key: &str) -> Result<Option<usize>, IngestError> {
    let Some(value) = attribute(pair, key) else {
        return Ok(None);
    };
    bs_number(value.as_bytes()).map_err(|()| {
        let (line, _) = pair.line_col();
        IngestError::Parse {
            line,
            message: format!("Invalid {} attribute: {}", key, value),
        }
    })
}

/// Replace the predefined XML entities and character references
///
/// Unrecognised references are left as written.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                    .and_then(Result::ok)
                    .and_then(char::from_u32),
            }?;
            Some((c, end + 1))
        });

        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

impl Treebank {
    /// Build a treebank from AGDT XML text
    pub fn from_agdt(text: &str) -> Result<Self, IngestError> {
        let records = parse_agdt(text)?;
        Ok(Treebank::new(normalize(records))?)
    }

    /// Build a treebank from an AGDT XML file (optionally gzipped)
    pub fn from_agdt_file(path: &Path) -> Result<Self, IngestError> {
        let mut text = String::new();
        open_source(path)?.read_to_string(&mut text)?;
        Self::from_agdt(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ROOT;

    const CAESAR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- Caesar, De Bello Gallico 1.1 -->
<treebank xml:lang="lat" version="1.5" format="aldt">
  <annotator>
    <short>vgorman</short>
  </annotator>
  <sentence id='1' document_id="urn:cts:latinLit:phi0448.phi001" subdoc="1.1.1">
    <word id='1' form='Gallia' lemma='Gallia' postag='n-s---fn-' head='3' relation='SBJ'/>
    <word id='2' form='est' lemma='sum1' postag='v3spia---' head='3' relation='AuxV'/>
    <word id='3' form='divisa' lemma='divido1' postag='t-srppfn-' head='0' relation='PRED'/>
    <word id='4' form='in' lemma='in1' postag='r--------' head='3' relation='AuxP'/>
    <word id='5' form='partes' lemma='pars1' postag='n-p---fa-' head='4' relation='ADV'/>
    <word id='6' form='tres' lemma='tres1' postag='m-p---fa-' head='5' relation='ATR'/>
  </sentence>
  <sentence id="2">
    <word id="1" form="Belgae" lemma="Belgae1" postag="n-p---mn-" head="2" relation="SBJ_CO"/>
    <word id="2" form="&amp;" lemma="et2" postag="c--------" head="0" relation="COORD"/>
    <word id="3" form="Aquitani" lemma="Aquitani1" postag="n-p---mn-" head="2" relation="SBJ_CO"/>
  </sentence>
</treebank>
"#;

    #[test]
    fn test_parse_words() {
        let records = parse_agdt(CAESAR).unwrap();

        assert_eq!(records.len(), 9);
        assert_eq!(records[0].form, "Gallia");
        assert_eq!(records[0].pos, "n-s---fn-");
        assert_eq!(records[0].head, Some(3));
        assert_eq!(records[0].relation.as_deref(), Some("SBJ"));
        assert_eq!(records[5].sentence_id, 1);
        assert_eq!(records[6].sentence_id, 2);
        assert_eq!(records[7].form, "&");
    }

    #[test]
    fn test_treebank_from_agdt() {
        let tb = Treebank::from_agdt(CAESAR).unwrap();

        assert_eq!(tb.len(), 9);
        let divisa = tb.with_form("divisa")[0];
        let partes = tb.with_form("partes")[0];
        let et = tb.with_form("&")[0];

        assert_eq!(tb.smart_parents(partes), vec![divisa]);
        assert_eq!(tb.smart_parents(divisa), vec![ROOT]);
        assert_eq!(tb.coordinated_relation(et), Some("SBJ"));
        assert_eq!(tb.coordinands(et).len(), 2);
        assert!(tb.is_healthy(2));
    }

    #[test]
    fn test_missing_fields() {
        let xml = "<sentence id='4'><word id='1' form='x'/><word form='stray'/>\
                   <word id='2' head='' relation=''/></sentence>";
        let records = parse_agdt(xml).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].head, None);
        assert_eq!(records[0].relation, None);
        assert_eq!(records[0].lemma, "");
        assert_eq!(records[1].head, None);
        assert_eq!(records[1].relation, None);
    }

    #[test]
    fn test_similar_tag_names_are_skipped() {
        let xml = "<sentences><sentence id='3'><wordlist id='9'/>\
                   <word id='1' head='0' relation='PRED'/></sentence></sentences>";
        let records = parse_agdt(xml).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sentence_id, 3);
    }

    #[test]
    fn test_malformed_word_is_an_error() {
        let err = parse_agdt("<sentence id='1'><word id=1 head=0/></sentence>").unwrap_err();
        assert!(matches!(err, IngestError::Grammar(_)));

        let err = parse_agdt("<sentence id='1'><word id='1'").unwrap_err();
        assert!(matches!(err, IngestError::Grammar(_)));
    }

    #[test]
    fn test_bad_number_attribute() {
        let err = parse_agdt("<sentence id='1'>\n<word id='x1' head='0'/></sentence>").unwrap_err();
        match err {
            IngestError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("id"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("plain"), "plain");
        assert_eq!(decode_entities("a &lt;b&gt; &amp; c"), "a <b> & c");
        assert_eq!(decode_entities("&#955;&#x3bb;"), "λλ");
        assert_eq!(decode_entities("&bogus; & x"), "&bogus; & x");
    }
}
