//! One explicit value for the interactive query-builder state, with pure
//! reducer-style transitions. The host UI owns persistence and history;
//! this module owns only the transitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::filters::{self, FilterCatalog};
use crate::strategy::Strategy;
use crate::warnings::QueryWarning;

/// Snapshot of the builder: the strategy text the user started from, the
/// current editable query, and which catalog filters are active in it.
/// `applied_filters` is derived from the query text on every transition,
/// never persisted independently.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBuilderState {
    pub base_strategy_query: String,
    pub current_query: String,
    pub applied_filters: BTreeSet<String>,
}

impl QueryBuilderState {
    pub fn new(base_query: impl Into<String>, catalog: &FilterCatalog) -> Self {
        let base = base_query.into();
        Self {
            current_query: base.clone(),
            base_strategy_query: base,
            applied_filters: BTreeSet::new(),
        }
        .synced(catalog)
    }

    /// Adopt a freshly synthesized strategy, discarding local edits.
    pub fn select_strategy(self, strategy: &Strategy, catalog: &FilterCatalog) -> Self {
        Self {
            base_strategy_query: strategy.query.clone(),
            current_query: strategy.query.clone(),
            applied_filters: BTreeSet::new(),
        }
        .synced(catalog)
    }

    /// Replace the editable query text (e.g. after a term edit round-trip).
    pub fn set_query(self, query: impl Into<String>, catalog: &FilterCatalog) -> Self {
        Self {
            current_query: query.into(),
            ..self
        }
        .synced(catalog)
    }

    /// Apply the filter if inactive, retract it if active. Unknown labels
    /// leave the state unchanged and surface the ledger's warning.
    pub fn toggle_filter(
        self,
        catalog: &FilterCatalog,
        label: &str,
    ) -> (Self, Option<QueryWarning>) {
        let active = self.applied_filters.contains(label);
        let (next_query, warning) = if active {
            filters::retract_by_label(&self.current_query, catalog, label)
        } else {
            filters::apply_by_label(&self.current_query, catalog, label)
        };
        (
            Self {
                current_query: next_query,
                ..self
            }
            .synced(catalog),
            warning,
        )
    }

    /// Drop local edits back to the base strategy text.
    pub fn reset(self, catalog: &FilterCatalog) -> Self {
        let base = self.base_strategy_query;
        Self {
            current_query: base.clone(),
            base_strategy_query: base,
            applied_filters: BTreeSet::new(),
        }
        .synced(catalog)
    }

    fn synced(mut self, catalog: &FilterCatalog) -> Self {
        self.applied_filters = filters::applied_labels(&self.current_query, catalog)
            .into_iter()
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_applies_then_retracts() {
        let catalog = FilterCatalog::builtin();
        let state = QueryBuilderState::new("diabetes[Mesh]", &catalog);
        assert!(state.applied_filters.is_empty());

        let (state, warning) = state.toggle_filter(&catalog, "Humans Only");
        assert!(warning.is_none());
        assert_eq!(state.current_query, "diabetes[Mesh] AND humans[Mesh]");
        assert!(state.applied_filters.contains("Humans Only"));

        let (state, warning) = state.toggle_filter(&catalog, "Humans Only");
        assert!(warning.is_none());
        assert_eq!(state.current_query, "diabetes[Mesh]");
        assert!(state.applied_filters.is_empty());
    }

    #[test]
    fn unknown_label_is_reported_and_harmless() {
        let catalog = FilterCatalog::builtin();
        let state = QueryBuilderState::new("diabetes[Mesh]", &catalog);
        let (state, warning) = state.toggle_filter(&catalog, "No Such Filter");
        assert_eq!(state.current_query, "diabetes[Mesh]");
        assert_eq!(warning.unwrap().code, "unknown_filter");
    }

    #[test]
    fn set_query_recomputes_derived_filters() {
        let catalog = FilterCatalog::builtin();
        let state = QueryBuilderState::new("", &catalog);
        let state = state.set_query("asthma[Mesh] AND english[la]", &catalog);
        assert!(state.applied_filters.contains("English Language"));
    }

    #[test]
    fn reset_returns_to_base() {
        let catalog = FilterCatalog::builtin();
        let state = QueryBuilderState::new("copd[Mesh]", &catalog);
        let (state, _) = state.toggle_filter(&catalog, "Adults");
        let state = state.reset(&catalog);
        assert_eq!(state.current_query, "copd[Mesh]");
        assert!(state.applied_filters.is_empty());
    }
}
