//! Festival reports
//!
//! Read-only aggregates over a snapshot of concert stats. Only confirmed
//! reservations are counted. Reports are not taken under the ledger locks,
//! so they may lag behind in-flight admissions.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Artist, ConcertDetails, ConcertFilter, DomainResult, RepositoryProvider};

pub const DEFAULT_TOP_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OccupancyRow {
    pub concert_id: i32,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub artist: String,
    pub stage: String,
    pub max_capacity: i32,
    pub reserved: i64,
    pub remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TopConcert {
    pub concert_id: i32,
    pub artist: String,
    pub reserved: i64,
}

/// Capacity/reservation totals over a group of concerts
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FillStats {
    pub concerts: usize,
    pub total_capacity: i64,
    pub total_reserved: i64,
    /// Percentage with two decimals; absent when capacity is zero
    pub fill_rate: Option<f64>,
    pub sold_out: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DayStats {
    pub day: NaiveDate,
    #[serde(flatten)]
    pub stats: FillStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ArtistPerformance {
    pub artist_id: i32,
    pub artist: String,
    pub concerts: usize,
    pub capacity: i64,
    pub reserved: i64,
    pub fill_rate: Option<f64>,
}

/// `100 * reserved / capacity` rounded to two decimals.
pub fn fill_rate(reserved: i64, capacity: i64) -> Option<f64> {
    if capacity <= 0 {
        return None;
    }
    let pct = 100.0 * reserved as f64 / capacity as f64;
    Some((pct * 100.0).round() / 100.0)
}

pub fn occupancy(details: &[ConcertDetails]) -> Vec<OccupancyRow> {
    let mut rows: Vec<_> = details
        .iter()
        .map(|d| OccupancyRow {
            concert_id: d.concert.id,
            start_at: d.concert.start_at,
            end_at: d.concert.end_at,
            artist: d.artist_name.clone(),
            stage: d.stage_name.clone(),
            max_capacity: d.concert.max_capacity,
            reserved: d.reserved,
            remaining: d.remaining(),
        })
        .collect();
    rows.sort_by(|a, b| a.start_at.cmp(&b.start_at).then(a.concert_id.cmp(&b.concert_id)));
    rows
}

/// Most booked concerts; ties broken by earliest id.
pub fn top(details: &[ConcertDetails], limit: usize) -> Vec<TopConcert> {
    let mut rows: Vec<_> = details
        .iter()
        .map(|d| TopConcert {
            concert_id: d.concert.id,
            artist: d.artist_name.clone(),
            reserved: d.reserved,
        })
        .collect();
    rows.sort_by(|a, b| b.reserved.cmp(&a.reserved).then(a.concert_id.cmp(&b.concert_id)));
    rows.truncate(limit);
    rows
}

pub fn fill_stats<'a>(details: impl IntoIterator<Item = &'a ConcertDetails>) -> FillStats {
    let mut stats = FillStats {
        concerts: 0,
        total_capacity: 0,
        total_reserved: 0,
        fill_rate: None,
        sold_out: 0,
    };
    for d in details {
        stats.concerts += 1;
        stats.total_capacity += i64::from(d.concert.max_capacity);
        stats.total_reserved += d.reserved;
        if d.is_sold_out() {
            stats.sold_out += 1;
        }
    }
    stats.fill_rate = fill_rate(stats.total_reserved, stats.total_capacity);
    stats
}

/// Per UTC start day, ascending.
pub fn by_day(details: &[ConcertDetails]) -> Vec<DayStats> {
    let mut days: BTreeMap<NaiveDate, Vec<&ConcertDetails>> = BTreeMap::new();
    for d in details {
        days.entry(d.concert.start_at.date_naive()).or_default().push(d);
    }
    days.into_iter()
        .map(|(day, group)| DayStats {
            day,
            stats: fill_stats(group),
        })
        .collect()
}

/// Every artist, including those without concerts, best performers first.
pub fn by_artist(artists: &[Artist], details: &[ConcertDetails]) -> Vec<ArtistPerformance> {
    let mut rows: Vec<_> = artists
        .iter()
        .map(|artist| {
            let mine = details.iter().filter(|d| d.concert.artist_id == artist.id);
            let stats = fill_stats(mine);
            ArtistPerformance {
                artist_id: artist.id,
                artist: artist.name.clone(),
                concerts: stats.concerts,
                capacity: stats.total_capacity,
                reserved: stats.total_reserved,
                fill_rate: stats.fill_rate,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        // Absent fill rates sort last.
        let rate = match (a.fill_rate, b.fill_rate) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        rate.then(b.reserved.cmp(&a.reserved))
            .then(b.capacity.cmp(&a.capacity))
            .then_with(|| a.artist.cmp(&b.artist))
    });
    rows
}

pub fn total_reserved(details: &[ConcertDetails]) -> i64 {
    details.iter().map(|d| d.reserved).sum()
}

pub struct ReportService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReportService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn snapshot(&self) -> DomainResult<Vec<ConcertDetails>> {
        self.repos
            .concerts()
            .find_details(&ConcertFilter::default())
            .await
    }

    pub async fn occupancy(&self) -> DomainResult<Vec<OccupancyRow>> {
        Ok(occupancy(&self.snapshot().await?))
    }

    pub async fn top(&self, limit: usize) -> DomainResult<Vec<TopConcert>> {
        Ok(top(&self.snapshot().await?, limit))
    }

    pub async fn by_day(&self) -> DomainResult<Vec<DayStats>> {
        Ok(by_day(&self.snapshot().await?))
    }

    pub async fn fill_rate(&self) -> DomainResult<FillStats> {
        Ok(fill_stats(&self.snapshot().await?))
    }

    pub async fn by_artist(&self) -> DomainResult<Vec<ArtistPerformance>> {
        let artists = self.repos.artists().find_all().await?;
        Ok(by_artist(&artists, &self.snapshot().await?))
    }

    pub async fn total_reserved(&self) -> DomainResult<i64> {
        Ok(total_reserved(&self.snapshot().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Concert, ConcertStatus};
    use chrono::{Duration, TimeZone};

    fn details(id: i32, artist_id: i32, day: u32, capacity: i32, reserved: i64) -> ConcertDetails {
        let start = Utc.with_ymd_and_hms(2030, 7, day, 20, 0, 0).unwrap() + Duration::minutes(id as i64);
        ConcertDetails {
            concert: Concert {
                id,
                stage_id: 1,
                artist_id,
                start_at: start,
                end_at: start + Duration::hours(1),
                max_capacity: capacity,
                status: ConcertStatus::Scheduled,
            },
            artist_name: format!("artist-{artist_id}"),
            stage_name: "Main".into(),
            stage_capacity: 1000,
            reserved,
        }
    }

    fn artist(id: i32, name: &str) -> Artist {
        Artist {
            id,
            name: name.into(),
            genre: None,
            bio_short: None,
            links: None,
        }
    }

    #[test]
    fn fill_rate_rounds_to_two_decimals() {
        assert_eq!(fill_rate(1, 3), Some(33.33));
        assert_eq!(fill_rate(2, 3), Some(66.67));
        assert_eq!(fill_rate(5, 0), None);
    }

    #[test]
    fn top_orders_by_reserved_and_limits() {
        let data = vec![
            details(1, 1, 1, 100, 10),
            details(2, 1, 1, 100, 90),
            details(3, 2, 2, 100, 50),
        ];
        let ids: Vec<_> = top(&data, 2).into_iter().map(|t| t.concert_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn by_day_groups_and_counts_sold_out() {
        let data = vec![
            details(1, 1, 1, 100, 100),
            details(2, 1, 1, 100, 50),
            details(3, 2, 2, 0, 0),
        ];
        let days = by_day(&data);
        assert_eq!(days.len(), 2);

        assert_eq!(days[0].stats.concerts, 2);
        assert_eq!(days[0].stats.total_capacity, 200);
        assert_eq!(days[0].stats.total_reserved, 150);
        assert_eq!(days[0].stats.fill_rate, Some(75.0));
        assert_eq!(days[0].stats.sold_out, 1);

        // A zero-capacity concert is sold out with no fill rate.
        assert_eq!(days[1].stats.fill_rate, None);
        assert_eq!(days[1].stats.sold_out, 1);
    }

    #[test]
    fn by_artist_includes_idle_artists_last() {
        let artists = vec![artist(1, "Zed"), artist(2, "Amy"), artist(3, "Idle")];
        let data = vec![
            details(1, 1, 1, 100, 50),
            details(2, 2, 1, 100, 80),
        ];
        let names: Vec<_> = by_artist(&artists, &data).into_iter().map(|a| a.artist).collect();
        assert_eq!(names, vec!["Amy", "Zed", "Idle"]);
    }

    #[test]
    fn overall_totals() {
        let data = vec![details(1, 1, 1, 100, 40), details(2, 2, 2, 300, 60)];
        let stats = fill_stats(&data);
        assert_eq!(stats.concerts, 2);
        assert_eq!(stats.fill_rate, Some(25.0));
        assert_eq!(total_reserved(&data), 100);
        assert_eq!(occupancy(&data)[1].remaining, 240);
    }
}
