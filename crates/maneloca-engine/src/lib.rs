//! Headless ManeLoca table engine.
//!
//! The free functions ([`apply_filters`], [`locate`], [`compose`], [`page`])
//! are pure and never touch their inputs. [`ViewerEngine`] owns the mutable
//! view state and applies every external event as a single [`Operation`].

pub mod compose;
pub mod error;
pub mod filter;
pub mod locate;
pub mod pager;
pub mod viewer;

pub use compose::{clamp_page, compose, compose_indices, Composition, PageState};
pub use error::{EngineError, ErrorCode};
pub use filter::{apply_filters, CompiledFilters, FilterState};
pub use locate::{locate, CoordinateQuery};
pub use pager::{page, page_numbers, parse_jump, total_pages, PageItem, PAGE_SIZE};
pub use viewer::{
    LoadOutcome, LoadTicket, NoMatchPolicy, OpResult, Operation, SearchState, ViewerEngine,
};
