//! Report query and response types not already defined by the reporting layer

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const MAX_TOP_LIMIT: u64 = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TopQuery {
    /// Number of concerts, 1-100 (default 5)
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotalReserved {
    pub total_reserved: i64,
}
