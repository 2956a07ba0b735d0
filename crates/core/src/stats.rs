//! Pure aggregation helpers for the dashboard.
//!
//! These are deliberately free of database access so the bucketing and
//! formatting rules can be unit-tested without a pool.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::Timestamp;

/// Per-calendar-day execution counts for the trailing-week breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStat {
    /// Calendar day (UTC), serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub total: i64,
    pub success: i64,
    pub error: i64,
}

/// Number of calendar days covered by [`daily_breakdown`], today included.
pub const TRAILING_DAYS: i64 = 7;

/// Format today's success rate as a percentage string with one decimal.
///
/// Zero executions yield the literal `"0%"` rather than `"0.0%"`, matching
/// the dashboard's empty-state display.
pub fn success_rate(total: i64, success: i64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", success as f64 / total as f64 * 100.0)
}

/// Bucket executions into a 7-day trailing breakdown ending at `today`.
///
/// Returns exactly [`TRAILING_DAYS`] buckets, oldest first, with `today` as
/// the last bucket. Executions outside the window are ignored; statuses
/// other than `success`/`error` count toward `total` only.
pub fn daily_breakdown(today: NaiveDate, executions: &[(Timestamp, String)]) -> Vec<DailyStat> {
    let mut buckets: Vec<DailyStat> = (0..TRAILING_DAYS)
        .rev()
        .map(|offset| DailyStat {
            date: today - chrono::Duration::days(offset),
            total: 0,
            success: 0,
            error: 0,
        })
        .collect();

    let first_day = buckets[0].date;
    for (started_at, status) in executions {
        let day = started_at.date_naive();
        if day < first_day || day > today {
            continue;
        }
        let index = (day - first_day).num_days() as usize;
        let bucket = &mut buckets[index];
        bucket.total += 1;
        match status.as_str() {
            "success" => bucket.success += 1,
            "error" => bucket.error += 1,
            _ => {}
        }
    }

    buckets
}
