//! egui building blocks for the ManeLoca window.
//!
//! Widgets here never touch the engine directly. They report what the user
//! did and leave it to the application to turn that into operations.

pub mod debounce;
pub mod pagination;
pub mod record_table;
pub mod version_switch;

pub use debounce::Debouncer;
pub use pagination::PaginationBar;
pub use record_table::{FilterInputs, RecordTable, TableEvent};
pub use version_switch::version_switch;
