//! Shared machine-readable ManeLoca contracts.
//!
//! Everything here is plain data: the genome build tag, the column catalog,
//! the annotation [`Record`] with its BED line parser, and the route table
//! that maps user-facing paths onto a build.

pub mod build;
pub mod column;
pub mod record;
pub mod route;

pub use build::{BuildVersion, UnknownBuild};
pub use column::{Column, UnknownColumn};
pub use record::{parse_int_prefix, parse_records, Record};
pub use route::{resolve_route, Route};
