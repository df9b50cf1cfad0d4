//! Stateful table view driven by discrete operations.
//!
//! Every external event (build switch, filter edit, coordinate search, page
//! request) enters through [`ViewerEngine::begin_load`],
//! [`ViewerEngine::finish_load`] or [`ViewerEngine::apply`]. Each call leaves
//! the visible set and the page consistent with each other before it returns,
//! so a caller never observes a page number computed against older data.

use crate::{
    compose::{compose_indices, PageState},
    error::{EngineError, ErrorCode},
    filter::FilterState,
    locate::{locate, CoordinateQuery},
    pager::{self, PageItem, PAGE_SIZE},
};
use maneloca_protocol::{BuildVersion, Column, Record};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What to show when a coordinate search finds no enclosing interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// A search without a hit empties the table.
    #[default]
    ShowNothing,
    /// A search without a hit leaves the column-filtered rows visible.
    ShowFiltered,
}

/// Identifies one build request. Only the newest ticket may install data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTicket {
    pub version: BuildVersion,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadOutcome {
    Applied {
        version: BuildVersion,
        record_count: usize,
    },
    /// A newer request was issued after this one; its data was discarded.
    Superseded,
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub query: Option<CoordinateQuery>,
    /// At most one record.
    pub result: Vec<Record>,
}

impl SearchState {
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.result.is_empty()
    }

    pub fn is_miss(&self) -> bool {
        self.query.is_some() && self.result.is_empty()
    }

    pub fn clear(&mut self) {
        self.query = None;
        self.result.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    SetColumnFilter { column: Column, needle: String },
    SetExactMatch { column: Column, exact: bool },
    SetQuickFilter { term: String },
    ClearFilters,
    Locate { chrom: String, pos: i64 },
    LocateQuery { query: String },
    ClearSearch,
    SetPage { page: usize },
    NextPage,
    PreviousPage,
}

impl Operation {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text)
            .map_err(|e| EngineError::invalid_input(format!("Invalid operation JSON: {e}")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpResult {
    pub visible_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub messages: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ViewerEngine {
    version: Option<BuildVersion>,
    records: Arc<Vec<Record>>,
    filters: FilterState,
    search: SearchState,
    visible: Vec<usize>,
    page: PageState,
    generation: u64,
    pending: Option<LoadTicket>,
    no_match_policy: NoMatchPolicy,
}

impl Default for ViewerEngine {
    fn default() -> Self {
        Self::new(NoMatchPolicy::default())
    }
}

impl ViewerEngine {
    pub fn new(no_match_policy: NoMatchPolicy) -> Self {
        Self {
            version: None,
            records: Arc::new(Vec::new()),
            filters: FilterState::default(),
            search: SearchState::default(),
            visible: Vec::new(),
            page: PageState::first(PAGE_SIZE),
            generation: 0,
            pending: None,
            no_match_policy,
        }
    }

    /// Engine with `records` already installed as a completed load.
    pub fn from_records(version: BuildVersion, records: Vec<Record>) -> Self {
        let mut engine = Self::default();
        let ticket = engine.begin_load(version);
        engine.finish_load(ticket, Ok(records));
        engine
    }

    pub fn version(&self) -> Option<BuildVersion> {
        self.version
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn set_no_match_policy(&mut self, policy: NoMatchPolicy) {
        self.no_match_policy = policy;
        self.recompose();
    }

    /// True while the newest requested build has not arrived yet.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible(&self) -> Vec<&Record> {
        self.visible.iter().map(|idx| &self.records[*idx]).collect()
    }

    pub fn current_page_records(&self) -> Vec<&Record> {
        pager::page(&self.visible, self.page.current_page, self.page.page_size)
            .iter()
            .map(|idx| &self.records[*idx])
            .collect()
    }

    pub fn page_numbers(&self) -> Vec<PageItem> {
        pager::page_numbers(self.page.current_page, self.page.total_pages)
    }

    /// Registers a request for `version`. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self, version: BuildVersion) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            version,
            generation: self.generation,
        };
        if let Some(previous) = self.pending.replace(ticket) {
            debug!(
                superseded = previous.generation,
                version = %version,
                "replacing in-flight load"
            );
        }
        info!(version = %version, generation = ticket.generation, "loading build");
        ticket
    }

    /// Installs the result of a load started with `ticket`.
    ///
    /// On success the view is reset in one step: filters cleared, search
    /// cleared, page 1, record set replaced. Failures and stale tickets leave
    /// the current view untouched.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Record>, String>,
    ) -> LoadOutcome {
        if self.pending != Some(ticket) {
            warn!(
                version = %ticket.version,
                generation = ticket.generation,
                "discarding superseded load"
            );
            return LoadOutcome::Superseded;
        }
        self.pending = None;

        match result {
            Ok(records) => {
                self.filters.clear();
                self.search.clear();
                self.page = PageState::first(PAGE_SIZE);
                self.records = Arc::new(records);
                self.version = Some(ticket.version);
                self.recompose();
                info!(
                    version = %ticket.version,
                    records = self.records.len(),
                    "build loaded"
                );
                LoadOutcome::Applied {
                    version: ticket.version,
                    record_count: self.records.len(),
                }
            }
            Err(message) => {
                warn!(version = %ticket.version, %message, "build load failed");
                LoadOutcome::Failed { message }
            }
        }
    }

    pub fn apply(&mut self, op: Operation) -> Result<OpResult, EngineError> {
        if self.version.is_none() {
            return Err(EngineError::new(
                ErrorCode::NotLoaded,
                "No build has been loaded yet",
            ));
        }
        debug!(?op, "applying operation");
        let mut result = OpResult::default();

        match op {
            Operation::SetColumnFilter { column, needle } => {
                if needle.is_empty() {
                    result.messages.push(format!("Cleared filter on {column}"));
                } else {
                    result
                        .messages
                        .push(format!("Filter on {column}: '{needle}'"));
                }
                self.filters.set_needle(column, needle);
                self.restart_paging();
            }
            Operation::SetExactMatch { column, exact } => {
                self.filters.set_exact(column, exact);
                let mode = if exact { "exact" } else { "fuzzy" };
                result.messages.push(format!("{column} uses {mode} matching"));
                self.restart_paging();
            }
            Operation::SetQuickFilter { term } => {
                self.filters.set_quick(term);
                self.restart_paging();
            }
            Operation::ClearFilters => {
                self.filters.clear();
                self.restart_paging();
            }
            Operation::Locate { chrom, pos } => {
                self.run_search(CoordinateQuery::new(chrom, pos), &mut result);
            }
            Operation::LocateQuery { query } => match CoordinateQuery::parse(&query) {
                Some(parsed) => self.run_search(parsed, &mut result),
                None => {
                    self.search.clear();
                    self.recompose();
                }
            },
            Operation::ClearSearch => {
                self.search.clear();
                self.recompose();
            }
            Operation::SetPage { page } => {
                if pager::is_valid_page(page, self.page.total_pages) {
                    self.page.current_page = page;
                } else {
                    let warning = format!(
                        "Page {page} is outside 1..={}; ignored",
                        self.page.total_pages
                    );
                    warn!("{warning}");
                    result.warnings.push(warning);
                }
            }
            Operation::NextPage => {
                if self.page.current_page < self.page.total_pages {
                    self.page.current_page += 1;
                }
            }
            Operation::PreviousPage => {
                if self.page.current_page > 1 {
                    self.page.current_page -= 1;
                }
            }
        }

        result.visible_count = self.visible.len();
        result.current_page = self.page.current_page;
        result.total_pages = self.page.total_pages;
        Ok(result)
    }

    pub fn apply_all<I>(&mut self, ops: I) -> Result<Vec<OpResult>, EngineError>
    where
        I: IntoIterator<Item = Operation>,
    {
        ops.into_iter().map(|op| self.apply(op)).collect()
    }

    fn run_search(&mut self, query: CoordinateQuery, result: &mut OpResult) {
        if !query.is_active() {
            self.search.clear();
            self.recompose();
            return;
        }
        let hit = locate(&self.records, &query.chrom, query.pos).cloned();
        match &hit {
            Some(record) => result.messages.push(format!(
                "{query} is in {} {} ({})",
                record.symbol, record.location, record.chrom
            )),
            None => result
                .warnings
                .push(format!("No interval contains {query}")),
        }
        self.search.query = Some(query);
        self.search.result = hit.into_iter().collect();
        self.restart_paging();
    }

    fn restart_paging(&mut self) {
        self.page.current_page = 1;
        self.recompose();
    }

    fn recompose(&mut self) {
        if self.search.is_miss() && self.no_match_policy == NoMatchPolicy::ShowNothing {
            self.visible.clear();
            self.page = PageState::first(PAGE_SIZE);
            return;
        }
        let (visible, page) = compose_indices(
            &self.records,
            &self.filters,
            &self.search.result,
            self.page.current_page,
            PAGE_SIZE,
        );
        self.visible = visible;
        self.page = page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(version: BuildVersion, n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                let start = (i as i64) * 1000 + 1;
                Record::from_bed_line(
                    &format!(
                        "chr7\t{start}\t{}\texon{}\tGENE{}\tNM_{i}\tENST{i}\t+",
                        start + 999,
                        i % 5,
                        i / 10
                    ),
                    version,
                )
            })
            .collect()
    }

    fn loaded(n: usize) -> ViewerEngine {
        ViewerEngine::from_records(BuildVersion::GRCh37, records(BuildVersion::GRCh37, n))
    }

    #[test]
    fn test_operations_require_a_loaded_build() {
        let mut engine = ViewerEngine::default();
        let err = engine.apply(Operation::NextPage).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotLoaded);
    }

    #[test]
    fn test_load_installs_records_on_page_one() {
        let engine = loaded(45);
        assert_eq!(engine.version(), Some(BuildVersion::GRCh37));
        assert_eq!(engine.visible_len(), 45);
        assert_eq!(engine.page_state().total_pages, 3);
        assert_eq!(engine.page_state().current_page, 1);
        assert_eq!(engine.current_page_records().len(), 20);
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_reload_resets_filters_search_and_page() {
        let mut engine = loaded(45);
        engine
            .apply_all([
                Operation::SetColumnFilter {
                    column: Column::Location,
                    needle: "exon1".to_string(),
                },
                Operation::SetExactMatch {
                    column: Column::Location,
                    exact: true,
                },
                Operation::Locate {
                    chrom: "chr7".to_string(),
                    pos: 1500,
                },
            ])
            .unwrap();
        assert!(!engine.filters().is_empty());
        assert!(!engine.search().is_empty());

        let ticket = engine.begin_load(BuildVersion::GRCh38);
        assert!(engine.is_loading());
        let outcome = engine.finish_load(ticket, Ok(records(BuildVersion::GRCh38, 30)));
        assert_eq!(
            outcome,
            LoadOutcome::Applied {
                version: BuildVersion::GRCh38,
                record_count: 30
            }
        );
        assert!(engine.filters().is_empty());
        assert!(engine.search().is_empty());
        assert_eq!(engine.page_state().current_page, 1);
        assert_eq!(engine.visible_len(), 30);
        assert!(engine
            .visible()
            .iter()
            .all(|r| r.version == BuildVersion::GRCh38));
    }

    #[test]
    fn test_last_version_switch_wins() {
        let mut engine = ViewerEngine::default();
        let first = engine.begin_load(BuildVersion::GRCh37);
        let second = engine.begin_load(BuildVersion::GRCh38);

        let outcome = engine.finish_load(second, Ok(records(BuildVersion::GRCh38, 5)));
        assert!(matches!(outcome, LoadOutcome::Applied { .. }));

        // The slow first request resolves afterwards and must not win.
        let outcome = engine.finish_load(first, Ok(records(BuildVersion::GRCh37, 50)));
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(engine.version(), Some(BuildVersion::GRCh38));
        assert_eq!(engine.visible_len(), 5);
    }

    #[test]
    fn test_stale_result_arriving_first_is_discarded() {
        let mut engine = ViewerEngine::default();
        let first = engine.begin_load(BuildVersion::GRCh37);
        let second = engine.begin_load(BuildVersion::GRCh38);
        assert_eq!(
            engine.finish_load(first, Ok(records(BuildVersion::GRCh37, 50))),
            LoadOutcome::Superseded
        );
        assert!(engine.is_loading());
        assert_eq!(engine.version(), None);
        engine.finish_load(second, Ok(records(BuildVersion::GRCh38, 5)));
        assert_eq!(engine.version(), Some(BuildVersion::GRCh38));
    }

    #[test]
    fn test_failed_load_keeps_previous_view() {
        let mut engine = loaded(45);
        engine
            .apply(Operation::SetPage { page: 2 })
            .unwrap();
        let ticket = engine.begin_load(BuildVersion::GRCh38);
        let outcome = engine.finish_load(ticket, Err("HTTP 404".to_string()));
        assert_eq!(
            outcome,
            LoadOutcome::Failed {
                message: "HTTP 404".to_string()
            }
        );
        assert!(!engine.is_loading());
        assert_eq!(engine.version(), Some(BuildVersion::GRCh37));
        assert_eq!(engine.page_state().current_page, 2);
        assert_eq!(engine.visible_len(), 45);
    }

    #[test]
    fn test_out_of_range_page_is_ignored() {
        let mut engine = loaded(45);
        let res = engine.apply(Operation::SetPage { page: 4 }).unwrap();
        assert_eq!(res.current_page, 1);
        assert_eq!(res.total_pages, 3);
        assert_eq!(res.warnings.len(), 1);

        let res = engine.apply(Operation::SetPage { page: 3 }).unwrap();
        assert_eq!(res.current_page, 3);
        assert_eq!(engine.current_page_records().len(), 5);
    }

    #[test]
    fn test_next_and_previous_stay_in_range() {
        let mut engine = loaded(45);
        engine.apply(Operation::PreviousPage).unwrap();
        assert_eq!(engine.page_state().current_page, 1);
        for _ in 0..5 {
            engine.apply(Operation::NextPage).unwrap();
        }
        assert_eq!(engine.page_state().current_page, 3);
    }

    #[test]
    fn test_filter_edit_returns_to_first_page() {
        let mut engine = loaded(45);
        engine.apply(Operation::SetPage { page: 3 }).unwrap();
        let res = engine
            .apply(Operation::SetColumnFilter {
                column: Column::Symbol,
                needle: "gene".to_string(),
            })
            .unwrap();
        assert_eq!(res.current_page, 1);
        assert_eq!(res.visible_count, 45);
    }

    #[test]
    fn test_locate_narrows_to_the_hit() {
        let mut engine = loaded(45);
        let res = engine
            .apply(Operation::LocateQuery {
                query: "chr7:2500".to_string(),
            })
            .unwrap();
        assert_eq!(res.visible_count, 1);
        assert_eq!(engine.visible()[0].start, Some(2001));

        engine.apply(Operation::ClearSearch).unwrap();
        assert_eq!(engine.visible_len(), 45);
    }

    #[test]
    fn test_unparsable_query_clears_search() {
        let mut engine = loaded(10);
        engine
            .apply(Operation::Locate {
                chrom: "chr7".to_string(),
                pos: 10,
            })
            .unwrap();
        assert_eq!(engine.visible_len(), 1);
        engine
            .apply(Operation::LocateQuery {
                query: "chr7".to_string(),
            })
            .unwrap();
        assert!(engine.search().is_empty());
        assert_eq!(engine.visible_len(), 10);
    }

    #[test]
    fn test_no_match_policy() {
        let mut engine = loaded(10);
        let res = engine
            .apply(Operation::Locate {
                chrom: "chr1".to_string(),
                pos: 10,
            })
            .unwrap();
        assert_eq!(res.visible_count, 0);
        assert_eq!(res.warnings.len(), 1);
        assert!(engine.search().is_miss());

        engine.set_no_match_policy(NoMatchPolicy::ShowFiltered);
        assert_eq!(engine.visible_len(), 10);
    }

    #[test]
    fn test_oversized_position_is_a_miss_not_a_cleared_search() {
        let mut engine = loaded(5);
        engine
            .apply(Operation::LocateQuery {
                query: "chr7:999999999".to_string(),
            })
            .unwrap();
        assert!(engine.search().is_miss());
        assert_eq!(engine.visible_len(), 0);

        let res = engine
            .apply(Operation::LocateQuery {
                query: "chr7:99999999999999999999".to_string(),
            })
            .unwrap();
        assert_eq!(
            engine.search().query,
            Some(CoordinateQuery::new("chr7", i64::MAX))
        );
        assert!(engine.search().is_miss());
        assert_eq!(res.visible_count, 0);
    }

    #[test]
    fn test_search_combines_with_column_filters() {
        let mut engine = loaded(45);
        engine
            .apply(Operation::SetColumnFilter {
                column: Column::Symbol,
                needle: "GENE3".to_string(),
            })
            .unwrap();
        assert_eq!(engine.visible_len(), 10);
        engine
            .apply(Operation::Locate {
                chrom: "chr7".to_string(),
                pos: 1500,
            })
            .unwrap();
        // Hit is GENE0, outside the column filter.
        assert_eq!(engine.visible_len(), 0);
        assert_eq!(engine.page_state().current_page, 1);
    }

    #[test]
    fn test_operation_json() {
        let op = Operation::from_json(r#"{"SetPage":{"page":2}}"#).unwrap();
        assert_eq!(op, Operation::SetPage { page: 2 });
        let op = Operation::from_json(r#"{"SetColumnFilter":{"column":"refseq","needle":"NM_"}}"#)
            .unwrap();
        assert_eq!(
            op,
            Operation::SetColumnFilter {
                column: Column::RefSeq,
                needle: "NM_".to_string()
            }
        );
        let err = Operation::from_json(r#"{"SetColumnFilter":{"column":"gene","needle":"x"}}"#)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
