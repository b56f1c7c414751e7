//! depwalk: auxiliary- and coordination-aware navigation of dependency treebanks
//!
//! Loads treebanks in which auxiliaries (prepositions, conjunctions linking
//! clauses) and coordinators are ordinary tree nodes, as in the AGDT/Prague
//! annotation style, and answers the syntactically meaningful questions:
//! which words a word really depends on, which words depend on it, and which
//! words it is coordinated with.
//! Core implementation in Rust with optional Python bindings.

// Core modules (leaves first)
pub mod token; // Token records, ids, field names
pub mod label; // Relation label classification
pub mod store; // Immutable indexed token store
pub mod index; // Inverted indices for selection by field value
pub mod topology; // Raw head-pointer traversal with cycle guard
pub mod coord; // Coordination resolution
pub mod smart; // Syntactic parent/children/siblings
pub mod validate; // Structural diagnostics
pub mod batch; // Parallel evaluation over sentences

// Ingestion
pub mod agdt; // AGDT-style XML reader
pub mod bytes;
pub mod ingest; // Delimited tables, id renumbering

#[cfg(test)]
mod fixtures;

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use agdt::parse_agdt;
pub use ingest::{IngestError, TableOptions, TableReader, normalize, renumber};
pub use label::{Category, LabelScheme, Markers, SchemeError};
pub use store::{StoreError, TokenView, Treebank};
pub use token::{Field, FieldValue, ROOT, SentenceId, TokenId, TokenRecord, UnknownField};
pub use topology::Ancestors;
pub use validate::Defect;
