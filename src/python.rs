//! Python bindings for depwalk
//!
//! Exposes a read-only `TreeSearch` class over a loaded treebank.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ingest::{IngestError, TableOptions};
use crate::store::{StoreError, Treebank};
use crate::token::{Field, SentenceId, TokenId, UnknownField};

impl From<IngestError> for PyErr {
    fn from(err: IngestError) -> PyErr {
        match err {
            IngestError::Io(e) => PyIOError::new_err(e.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

impl From<StoreError> for PyErr {
    fn from(err: StoreError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<UnknownField> for PyErr {
    fn from(err: UnknownField) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn delimiter_byte(delimiter: &str) -> PyResult<u8> {
    match delimiter.as_bytes() {
        [b] => Ok(*b),
        _ => Err(PyValueError::new_err(format!(
            "delimiter must be a single byte, got {:?}",
            delimiter
        ))),
    }
}

/// A dependency treebank with auxiliary- and coordination-aware navigation.
///
/// Build from AGDT XML text with `TreeSearch(xml)`, or from a delimited
/// table with `TreeSearch.from_table(path)`.
#[pyclass(name = "TreeSearch", frozen)]
pub struct PyTreeSearch {
    inner: Arc<Treebank>,
}

impl PyTreeSearch {
    fn wrap(treebank: Treebank) -> Self {
        Self {
            inner: Arc::new(treebank),
        }
    }
}

#[pymethods]
impl PyTreeSearch {
    #[new]
    fn new(xml: &str) -> PyResult<Self> {
        Ok(Self::wrap(Treebank::from_agdt(xml)?))
    }

    /// Load an AGDT XML file (`.gz` files are decompressed)
    #[staticmethod]
    fn from_agdt_file(path: PathBuf) -> PyResult<Self> {
        Ok(Self::wrap(Treebank::from_agdt_file(&path)?))
    }

    /// Load a delimited token table (`.gz` files are decompressed)
    #[staticmethod]
    #[pyo3(signature = (path, delimiter="\t"))]
    fn from_table(path: PathBuf, delimiter: &str) -> PyResult<Self> {
        let options = TableOptions {
            delimiter: delimiter_byte(delimiter)?,
        };
        Ok(Self::wrap(Treebank::from_table_file(&path, options)?))
    }

    /// Parse a delimited token table held in a string
    #[staticmethod]
    #[pyo3(signature = (text, delimiter="\t"))]
    fn from_table_text(text: &str, delimiter: &str) -> PyResult<Self> {
        let options = TableOptions {
            delimiter: delimiter_byte(delimiter)?,
        };
        Ok(Self::wrap(Treebank::from_table_str(text, options)?))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "<TreeSearch tokens={} sentences={}>",
            self.inner.len(),
            self.inner.sentence_ids().len()
        )
    }

    // Accessors

    fn sentence_ids(&self) -> Vec<SentenceId> {
        self.inner.sentence_ids().collect()
    }

    fn sentence(&self, sentence_id: SentenceId) -> Vec<TokenId> {
        self.inner.sentence_tokens(sentence_id).to_vec()
    }

    fn relation(&self, id: TokenId) -> Option<String> {
        self.inner.relation(id).map(str::to_string)
    }

    fn form(&self, id: TokenId) -> Option<String> {
        self.inner.form(id).map(str::to_string)
    }

    fn lemma(&self, id: TokenId) -> Option<String> {
        self.inner.lemma(id).map(str::to_string)
    }

    fn pos(&self, id: TokenId) -> Option<String> {
        self.inner.pos(id).map(str::to_string)
    }

    fn sentence_id(&self, id: TokenId) -> Option<SentenceId> {
        self.inner.sentence_id(id)
    }

    fn head(&self, id: TokenId) -> Option<TokenId> {
        self.inner.head(id)
    }

    /// Any field by column name (`Token_ID`, `Relation`, `Lemma`, ...), as a string
    fn field(&self, id: TokenId, name: &str) -> PyResult<Option<String>> {
        let field: Field = name.parse()?;
        Ok(self.inner.field(id, field).map(|v| v.to_string()))
    }

    // Selection

    fn with_form(&self, form: &str) -> Vec<TokenId> {
        self.inner.with_form(form)
    }

    fn with_lemma(&self, lemma: &str) -> Vec<TokenId> {
        self.inner.with_lemma(lemma)
    }

    fn with_pos(&self, pos: &str) -> Vec<TokenId> {
        self.inner.with_pos(pos)
    }

    fn with_relation(&self, relation: &str) -> Vec<TokenId> {
        self.inner.with_relation(relation)
    }

    fn select(&self, name: &str, value: &str) -> PyResult<Vec<TokenId>> {
        let field: Field = name.parse()?;
        Ok(self.inner.select(field, value))
    }

    fn select_matching(&self, name: &str, pattern: &str) -> PyResult<Vec<TokenId>> {
        let field: Field = name.parse()?;
        let regex = Regex::new(pattern)
            .map_err(|e| PyValueError::new_err(format!("Invalid pattern: {}", e)))?;
        Ok(self.inner.select_matching(field, &regex))
    }

    fn filter_relation(&self, relation: &str, ids: Vec<TokenId>) -> Vec<TokenId> {
        self.inner.filter_relation(relation, &ids)
    }

    // Topology

    fn parent(&self, id: TokenId) -> TokenId {
        self.inner.parent(id)
    }

    fn ancestors(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.ancestors(id)
    }

    fn children(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.children(id).to_vec()
    }

    fn descendants(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.descendants(id)
    }

    fn roots(&self, sentence_id: SentenceId) -> Vec<TokenId> {
        self.inner.roots(sentence_id)
    }

    fn treetop(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.treetop(id)
    }

    fn tree_siblings(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.tree_siblings(id)
    }

    // Coordination

    fn auxiliary_skip_parent(&self, id: TokenId) -> TokenId {
        self.inner.auxiliary_skip_parent(id)
    }

    fn auxiliary_skip_children(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.auxiliary_skip_children(id)
    }

    fn coordinated_relation(&self, id: TokenId) -> Option<String> {
        self.inner.coordinated_relation(id).map(str::to_string)
    }

    fn coordination_group(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.coordination_group(id)
    }

    fn coordinands(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.coordinands(id)
    }

    fn coordinands_aux_stripped(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.coordinands_aux_stripped(id)
    }

    fn non_coordinated_children(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.non_coordinated_children(id)
    }

    // Smart view

    fn smart_parents(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.smart_parents(id)
    }

    fn smart_children(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.smart_children(id)
    }

    fn smart_siblings(&self, id: TokenId) -> Vec<TokenId> {
        self.inner.smart_siblings(id)
    }

    // Validation

    fn has_root(&self, sentence_id: SentenceId) -> bool {
        self.inner.has_root(sentence_id)
    }

    fn acyclic(&self, sentence_id: SentenceId) -> bool {
        self.inner.acyclic(sentence_id)
    }

    fn auxiliaries_isolated(&self, sentence_id: SentenceId) -> bool {
        self.inner.auxiliaries_isolated(sentence_id)
    }

    fn labels_well_formed(&self, sentence_id: SentenceId) -> bool {
        self.inner.labels_well_formed(sentence_id)
    }

    fn coordinators_resolved(&self, sentence_id: SentenceId) -> bool {
        self.inner.coordinators_resolved(sentence_id)
    }

    fn is_healthy(&self, sentence_id: SentenceId) -> bool {
        self.inner.is_healthy(sentence_id)
    }

    /// Human-readable description of each defect in a sentence
    fn diagnose(&self, sentence_id: SentenceId) -> Vec<String> {
        self.inner
            .diagnose(sentence_id)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// `(sentence_id, [defect, ...])` for every defective sentence.
    ///
    /// Sentences are checked in parallel with the GIL released.
    fn diagnose_all(&self, py: Python<'_>) -> Vec<(SentenceId, Vec<String>)> {
        let inner = Arc::clone(&self.inner);
        py.detach(move || {
            inner
                .par_diagnose()
                .into_iter()
                .map(|(sid, defects)| (sid, defects.iter().map(ToString::to_string).collect()))
                .collect()
        })
    }
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn depwalk(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTreeSearch>()?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;
    Ok(())
}
