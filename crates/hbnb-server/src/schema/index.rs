//! Status and statistics responses.

use std::collections::BTreeMap;

use serde::Serialize;

/// Response of `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Response of `GET /stats`: live entity count per kind, keyed by the
/// kind's plural name.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct StatsResponse(pub BTreeMap<&'static str, usize>);
