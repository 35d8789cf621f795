//! Concert domain entity

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{DomainError, DomainResult};

/// Concert lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcertStatus {
    Scheduled,
    Cancelled,
    Done,
}

impl ConcertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Cancelled => "CANCELLED",
            Self::Done => "DONE",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "CANCELLED" => Self::Cancelled,
            "DONE" => Self::Done,
            _ => Self::Scheduled,
        }
    }
}

impl std::fmt::Display for ConcertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled performance of one artist on one stage
#[derive(Debug, Clone, PartialEq)]
pub struct Concert {
    pub id: i32,
    pub stage_id: i32,
    pub artist_id: i32,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    /// Seat capacity, never negative
    pub max_capacity: i32,
    pub status: ConcertStatus,
}

/// Concert fields supplied on create, and the merged result on update.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcertDraft {
    pub stage_id: i32,
    pub artist_id: i32,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_capacity: i32,
}

impl ConcertDraft {
    /// Checks that do not need the catalog: time ordering and capacity sign.
    pub fn validate(&self) -> DomainResult<()> {
        if self.start_at >= self.end_at {
            return Err(DomainError::Validation(
                "start_at must be before end_at".into(),
            ));
        }
        if self.max_capacity < 0 {
            return Err(DomainError::Validation(
                "max_capacity must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Overlay the optional fields of an update on top of a stored concert.
    pub fn merge(current: &Concert, patch: ConcertPatch) -> Self {
        Self {
            stage_id: patch.stage_id.unwrap_or(current.stage_id),
            artist_id: patch.artist_id.unwrap_or(current.artist_id),
            start_at: patch.start_at.unwrap_or(current.start_at),
            end_at: patch.end_at.unwrap_or(current.end_at),
            max_capacity: patch.max_capacity.unwrap_or(current.max_capacity),
        }
    }
}

/// Partial concert update
#[derive(Debug, Clone, Default)]
pub struct ConcertPatch {
    pub stage_id: Option<i32>,
    pub artist_id: Option<i32>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub max_capacity: Option<i32>,
}

/// Concert joined with its artist, stage and confirmed seat count.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcertDetails {
    pub concert: Concert,
    pub artist_name: String,
    pub stage_name: String,
    pub stage_capacity: i32,
    /// Sum of confirmed reservation quantities
    pub reserved: i64,
}

impl ConcertDetails {
    pub fn remaining(&self) -> i64 {
        i64::from(self.concert.max_capacity) - self.reserved
    }

    pub fn is_sold_out(&self) -> bool {
        self.remaining() <= 0
    }
}

/// Listing filter
#[derive(Debug, Clone, Default)]
pub struct ConcertFilter {
    /// Only concerts starting on this UTC day
    pub day: Option<NaiveDate>,
    pub stage_id: Option<i32>,
}

impl ConcertFilter {
    pub fn matches(&self, concert: &Concert) -> bool {
        if let Some(stage_id) = self.stage_id {
            if concert.stage_id != stage_id {
                return false;
            }
        }
        if let Some(day) = self.day {
            if concert.start_at.date_naive() != day {
                return false;
            }
        }
        true
    }
}

/// Half-open interval overlap on the same stage.
pub fn overlaps(a_start: DateTime<Utc>, a_end: DateTime<Utc>, b: &Concert) -> bool {
    a_start < b.end_at && a_end > b.start_at
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn concert() -> Concert {
        let start = Utc.with_ymd_and_hms(2026, 7, 1, 20, 0, 0).unwrap();
        Concert {
            id: 1,
            stage_id: 2,
            artist_id: 3,
            start_at: start,
            end_at: start + Duration::hours(2),
            max_capacity: 100,
            status: ConcertStatus::Scheduled,
        }
    }

    #[test]
    fn draft_rejects_reversed_times() {
        let c = concert();
        let draft = ConcertDraft {
            stage_id: 1,
            artist_id: 1,
            start_at: c.end_at,
            end_at: c.start_at,
            max_capacity: 10,
        };
        assert!(matches!(draft.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn draft_accepts_zero_capacity() {
        let c = concert();
        let draft = ConcertDraft {
            stage_id: 1,
            artist_id: 1,
            start_at: c.start_at,
            end_at: c.end_at,
            max_capacity: 0,
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let c = concert();
        let merged = ConcertDraft::merge(
            &c,
            ConcertPatch {
                max_capacity: Some(50),
                ..Default::default()
            },
        );
        assert_eq!(merged.max_capacity, 50);
        assert_eq!(merged.stage_id, c.stage_id);
        assert_eq!(merged.start_at, c.start_at);
    }

    #[test]
    fn back_to_back_concerts_do_not_overlap() {
        let c = concert();
        assert!(!overlaps(c.end_at, c.end_at + Duration::hours(1), &c));
        assert!(overlaps(c.end_at - Duration::minutes(1), c.end_at + Duration::hours(1), &c));
    }

    #[test]
    fn filter_by_day_and_stage() {
        let c = concert();
        let day = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        assert!(ConcertFilter { day: Some(day), stage_id: Some(2) }.matches(&c));
        assert!(!ConcertFilter { day: Some(day.succ_opt().unwrap()), stage_id: None }.matches(&c));
        assert!(!ConcertFilter { day: None, stage_id: Some(9) }.matches(&c));
    }

    #[test]
    fn remaining_seats_from_details() {
        let details = ConcertDetails {
            concert: concert(),
            artist_name: "Alpha".into(),
            stage_name: "Grande".into(),
            stage_capacity: 1000,
            reserved: 100,
        };
        assert_eq!(details.remaining(), 0);
        assert!(details.is_sold_out());
    }
}
