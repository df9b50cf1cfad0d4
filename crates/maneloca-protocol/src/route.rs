use crate::BuildVersion;
use serde::{Deserialize, Serialize};

/// Outcome of mapping a user-facing path onto a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub version: BuildVersion,
    /// True when the path did not name a build and the default was substituted.
    pub redirected: bool,
}

/// `/grch37` and `/grch38` select a build; every other path redirects to
/// `default`.
pub fn resolve_route(path: &str, default: BuildVersion) -> Route {
    let segment = path.trim_end_matches('/').trim_start_matches('/');
    match BuildVersion::from_route_segment(segment) {
        Some(version) => Route {
            version,
            redirected: false,
        },
        None => Route {
            version: default,
            redirected: true,
        },
    }
}
