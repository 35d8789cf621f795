//! Concert DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{
    Concert, ConcertDetails, ConcertDraft, ConcertFilter, ConcertPatch, ConcertStatus,
    DomainError, DomainResult,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ConcertDto {
    pub id: i32,
    pub stage_id: i32,
    pub artist_id: i32,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_capacity: i32,
    /// `SCHEDULED`, `CANCELLED` or `DONE`
    pub status: String,
}

impl From<Concert> for ConcertDto {
    fn from(c: Concert) -> Self {
        Self {
            id: c.id,
            stage_id: c.stage_id,
            artist_id: c.artist_id,
            start_at: c.start_at,
            end_at: c.end_at,
            max_capacity: c.max_capacity,
            status: c.status.as_str().to_string(),
        }
    }
}

/// Concert with names and live seat counts from confirmed reservations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConcertDetailsDto {
    #[serde(flatten)]
    pub concert: ConcertDto,
    pub artist: String,
    pub stage: String,
    pub reserved: i64,
    pub remaining: i64,
}

impl From<ConcertDetails> for ConcertDetailsDto {
    fn from(d: ConcertDetails) -> Self {
        let reserved = d.reserved;
        let remaining = d.remaining();
        Self {
            concert: d.concert.into(),
            artist: d.artist_name,
            stage: d.stage_name,
            reserved,
            remaining,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ConcertQuery {
    /// UTC day, `YYYY-MM-DD`
    pub day: Option<String>,
    pub stage_id: Option<i32>,
}

impl ConcertQuery {
    pub fn into_filter(self) -> DomainResult<ConcertFilter> {
        let day = match self.day.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                DomainError::Validation(format!("day must be YYYY-MM-DD, got '{raw}'"))
            })?),
            None => None,
        };
        Ok(ConcertFilter {
            day,
            stage_id: self.stage_id,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateConcertRequest {
    pub stage_id: i32,
    pub artist_id: i32,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[validate(range(min = 0, message = "max_capacity must not be negative"))]
    pub max_capacity: i32,
}

impl From<CreateConcertRequest> for ConcertDraft {
    fn from(r: CreateConcertRequest) -> Self {
        Self {
            stage_id: r.stage_id,
            artist_id: r.artist_id,
            start_at: r.start_at,
            end_at: r.end_at,
            max_capacity: r.max_capacity,
        }
    }
}

/// Omitted fields keep their stored value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateConcertRequest {
    pub stage_id: Option<i32>,
    pub artist_id: Option<i32>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    #[validate(range(min = 0, message = "max_capacity must not be negative"))]
    pub max_capacity: Option<i32>,
}

impl From<UpdateConcertRequest> for ConcertPatch {
    fn from(r: UpdateConcertRequest) -> Self {
        Self {
            stage_id: r.stage_id,
            artist_id: r.artist_id,
            start_at: r.start_at,
            end_at: r.end_at,
            max_capacity: r.max_capacity,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConcertStatusRequest {
    /// `SCHEDULED`, `CANCELLED` or `DONE` (case-insensitive)
    pub status: String,
}

impl ConcertStatusRequest {
    pub fn parse(&self) -> DomainResult<ConcertStatus> {
        match self.status.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Ok(ConcertStatus::Scheduled),
            "CANCELLED" => Ok(ConcertStatus::Cancelled),
            "DONE" => Ok(ConcertStatus::Done),
            other => Err(DomainError::Validation(format!(
                "unknown concert status '{other}'"
            ))),
        }
    }
}
