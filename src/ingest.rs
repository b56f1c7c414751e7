//! Reading token tables
//!
//! Turns delimited token tables (one token per row, a header row naming the
//! columns) into [`TokenRecord`]s, and makes token ids unique across
//! sentences when the source numbers tokens per sentence.
//!
//! Header names are matched loosely, so `word id`, `Token_ID` and `id` all
//! name the id column; unrecognised columns are ignored. Fields are split on a
//! single delimiter byte with no quoting.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::debug;

use crate::agdt::Rule;
use crate::bytes::{bs_fields, bs_number, bs_text};
use crate::store::{StoreError, Treebank};
use crate::token::{Field, ROOT, SentenceId, TokenId, TokenRecord};

/// Error while reading a token source
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("AGDT syntax error: {0}")]
    Grammar(#[from] Box<pest::error::Error<Rule>>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Options for reading a delimited table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    pub delimiter: u8,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl TableOptions {
    pub fn tsv() -> Self {
        Self::default()
    }

    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    sentence_id: usize,
    head: usize,
    relation: usize,
    lemma: Option<usize>,
    form: Option<usize>,
    pos: Option<usize>,
}

impl Columns {
    fn from_header(header: &[u8], delimiter: u8) -> Result<Self, IngestError> {
        let mut found: FxHashMap<Field, usize> = FxHashMap::default();
        for (i, name) in bs_fields(header, delimiter).enumerate() {
            if let Ok(field) = bs_text(name).parse::<Field>() {
                found.entry(field).or_insert(i);
            }
        }

        let required = |field: Field, name: &'static str| {
            found
                .get(&field)
                .copied()
                .ok_or(IngestError::MissingColumn(name))
        };

        Ok(Self {
            id: required(Field::Id, "id")?,
            sentence_id: required(Field::SentenceId, "sentence id")?,
            head: required(Field::Head, "head")?,
            relation: required(Field::Relation, "relation")?,
            lemma: found.get(&Field::Lemma).copied(),
            form: found.get(&Field::Form).copied(),
            pos: found.get(&Field::Pos).copied(),
        })
    }
}

/// Reader that iterates over the token rows of a table
pub struct TableReader<R: BufRead> {
    reader: R,
    columns: Columns,
    delimiter: u8,
    line_num: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> TableReader<R> {
    /// Create a reader, consuming the header row
    pub fn new(mut reader: R, options: TableOptions) -> Result<Self, IngestError> {
        let mut buf = Vec::new();
        let mut line_num = 0;
        loop {
            buf.clear();
            line_num += 1;
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Err(IngestError::MissingColumn("id"));
            }
            if !trim_line(&buf).is_empty() {
                break;
            }
        }
        let columns = Columns::from_header(trim_line(&buf), options.delimiter)?;

        Ok(Self {
            reader,
            columns,
            delimiter: options.delimiter,
            line_num,
            buf,
        })
    }

    fn parse_row(&self, line: &[u8]) -> Result<TokenRecord, IngestError> {
        let cells: Vec<&[u8]> = bs_fields(line, self.delimiter).collect();
        let cell = |i: usize| cells.get(i).copied().unwrap_or(b"");
        let text = |i: Option<usize>| i.map(|i| bs_text(cell(i))).unwrap_or_default();
        let number = |i: usize, what: &str| {
            bs_number(cell(i)).map_err(|()| IngestError::Parse {
                line: self.line_num,
                message: format!("Invalid {}: {}", what, bs_text(cell(i))),
            })
        };

        let id = number(self.columns.id, "id")?.unwrap_or(0);
        let sentence_id = number(self.columns.sentence_id, "sentence id")?.unwrap_or(0);
        let head = number(self.columns.head, "head")?;
        let relation = Some(bs_text(cell(self.columns.relation))).filter(|r| !r.is_empty());

        Ok(TokenRecord {
            id,
            sentence_id,
            head,
            relation,
            form: text(self.columns.form),
            lemma: text(self.columns.lemma),
            pos: text(self.columns.pos),
        })
    }
}

impl TableReader<Cursor<String>> {
    /// Create a reader over in-memory text
    pub fn from_string(text: &str, options: TableOptions) -> Result<Self, IngestError> {
        Self::new(Cursor::new(text.to_string()), options)
    }
}

impl TableReader<Box<dyn BufRead>> {
    /// Create a reader from a file path, decompressing `.gz` files
    pub fn from_file(path: &Path, options: TableOptions) -> Result<Self, IngestError> {
        Self::new(open_source(path)?, options)
    }
}

/// Open a file for reading, decompressing it if the name ends in `.gz`
pub(crate) fn open_source(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for TableReader<R> {
    type Item = Result<TokenRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            self.line_num += 1;
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }

            let line = trim_line(&self.buf);
            if line.is_empty() {
                continue;
            }
            return Some(self.parse_row(line));
        }
    }
}

/// Strip the line terminator
fn trim_line(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Give every token a fresh id, unique across the collection
///
/// Ids become `1..=n` in input order. Heads are rewritten through the
/// `(sentence id, old id)` pairs; a head naming no token of its sentence
/// becomes the root sentinel.
pub fn renumber(records: Vec<TokenRecord>) -> Vec<TokenRecord> {
    let mut mapping: FxHashMap<(SentenceId, TokenId), TokenId> = FxHashMap::default();
    for (i, record) in records.iter().enumerate() {
        mapping
            .entry((record.sentence_id, record.id))
            .or_insert(i + 1);
    }

    records
        .into_iter()
        .enumerate()
        .map(|(i, mut record)| {
            record.head = record.head.map(|head| {
                if head == ROOT {
                    return ROOT;
                }
                mapping
                    .get(&(record.sentence_id, head))
                    .copied()
                    .unwrap_or_else(|| {
                        debug!(
                            sentence = record.sentence_id,
                            token = record.id,
                            head,
                            "head not found in sentence, attaching to root"
                        );
                        ROOT
                    })
            });
            record.id = i + 1;
            record
        })
        .collect()
}

/// Renumber only if ids are not already unique and non-zero
pub fn normalize(records: Vec<TokenRecord>) -> Vec<TokenRecord> {
    let mut seen = FxHashSet::default();
    let unique = records
        .iter()
        .all(|r| r.id != ROOT && seen.insert(r.id));
    if unique {
        records
    } else {
        debug!(tokens = records.len(), "token ids repeat across sentences, renumbering");
        renumber(records)
    }
}

/// Read every record from a token source, stopping at the first error
pub fn read_all<I>(source: I) -> Result<Vec<TokenRecord>, IngestError>
where
    I: IntoIterator<Item = Result<TokenRecord, IngestError>>,
{
    source.into_iter().collect()
}

impl Treebank {
    /// Build a treebank from a delimited table in memory
    pub fn from_table_str(text: &str, options: TableOptions) -> Result<Self, IngestError> {
        let records = read_all(TableReader::from_string(text, options)?)?;
        Ok(Treebank::new(normalize(records))?)
    }

    /// Build a treebank from a delimited table file (optionally gzipped)
    pub fn from_table_file(path: &Path, options: TableOptions) -> Result<Self, IngestError> {
        let records = read_all(TableReader::from_file(path, options)?)?;
        Ok(Treebank::new(normalize(records))?)
    }
}
