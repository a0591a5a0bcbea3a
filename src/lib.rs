//! Boolean search-query toolkit for systematic literature reviews.
//!
//! The crate is a pure string/struct transformation library: it parses
//! literature-database queries into editable term sequences, serializes
//! them back to canonical syntax, applies structure-preserving edits,
//! tracks named filters, and synthesizes complete search strategies from
//! concept vocabulary. It performs no I/O and holds no shared state;
//! every function returns a new value.

pub mod concepts;
pub mod config;
pub mod filters;
pub mod hedges;
pub mod query;
pub mod state;
pub mod strategy;
pub mod warnings;

pub use concepts::Concept;
pub use config::QueryConfig;
pub use filters::{Filter, FilterCatalog};
pub use hedges::{Hedge, HedgeLibrary, HedgeType};
pub use query::{parse, serialize, validate, TermSequence};
pub use state::QueryBuilderState;
pub use strategy::{synthesize, Strategy, Synthesis};
pub use warnings::{QueryWarning, Severity};

#[cfg(test)]
mod tests;
