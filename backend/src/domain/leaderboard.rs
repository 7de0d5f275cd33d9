//! Leaderboard read model and its optional activity window.
//!
//! The window filters users by `updated_at`, which every ledger mutation
//! refreshes. It spans whole UTC calendar days: from `00:00:00.000000` on the
//! first day to `23:59:59.999999` on the last, both ends inclusive. Bounds that
//! are missing or do not parse disable the filter instead of failing the
//! request.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::user::{EmailAddress, UserId, UserName};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw `from`/`to` strings exactly as the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardFilter {
    /// First day of the window.
    pub from: Option<String>,
    /// Last day of the window.
    pub to: Option<String>,
}

impl LeaderboardFilter {
    /// Resolve the filter into a window, or `None` when it should not apply.
    ///
    /// # Examples
    /// ```
    /// use leaderboard::domain::LeaderboardFilter;
    ///
    /// let filter = LeaderboardFilter {
    ///     from: Some("2025-11-01".into()),
    ///     to: Some("not a date".into()),
    /// };
    /// assert!(filter.window().is_none());
    /// ```
    #[must_use]
    pub fn window(&self) -> Option<UpdatedWindow> {
        let (raw_from, raw_to) = match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
                (from, to)
            }
            _ => return None,
        };
        let Some(from) = parse_calendar_date(raw_from) else {
            warn!(from = raw_from, "ignoring unparseable leaderboard start date");
            return None;
        };
        let Some(to) = parse_calendar_date(raw_to) else {
            warn!(to = raw_to, "ignoring unparseable leaderboard end date");
            return None;
        };
        Some(UpdatedWindow::from_dates(from, to))
    }
}

/// Accept an RFC 3339 timestamp (normalised to UTC) or a bare `YYYY-MM-DD`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use leaderboard::domain::parse_calendar_date;
///
/// let late_evening = parse_calendar_date("2025-11-03T23:30:00-02:00");
/// assert_eq!(late_evening, NaiveDate::from_ymd_opt(2025, 11, 4));
/// ```
#[must_use]
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|stamp| stamp.with_timezone(&Utc).date_naive())
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_FORMAT))
        .ok()
}

/// Inclusive UTC interval over `updated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatedWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl UpdatedWindow {
    /// Window covering every instant of `from` through `to`. An inverted
    /// range is kept as-is and matches nothing.
    #[must_use]
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            start: from.and_time(NaiveTime::MIN).and_utc(),
            end: to.and_time(end_of_day()).and_utc(),
        }
    }

    /// First included instant.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Last included instant.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN)
}

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User id; breaks ties between equal totals, ascending.
    pub id: UserId,
    /// Display name.
    pub name: UserName,
    /// Login email.
    pub email: EmailAddress,
    /// Cached ledger sum.
    pub total_points: i64,
    /// Last profile or ledger change.
    pub updated_at: DateTime<Utc>,
}

/// Query accepted by the ranking use-case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardRequest {
    /// Raw date filter.
    pub filter: LeaderboardFilter,
    /// Requested page.
    pub page: PageRequest,
}

/// Ranked page plus the filter that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPage {
    /// Ranked users.
    #[serde(flatten)]
    pub users: Page<UserSummary>,
    /// Echo of the raw filter.
    pub filters: LeaderboardFilter,
}

#[cfg(test)]
mod tests {
    //! Boundary coverage for the activity window.
    use super::*;
    use rstest::rstest;

    fn filter(from: Option<&str>, to: Option<&str>) -> LeaderboardFilter {
        LeaderboardFilter {
            from: from.map(str::to_owned),
            to: to.map(str::to_owned),
        }
    }

    fn instant(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("valid fixture timestamp")
            .with_timezone(&Utc)
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("2025-11-01"), None)]
    #[case(None, Some("2025-11-03"))]
    #[case(Some("yesterday"), Some("2025-11-03"))]
    #[case(Some("2025-11-01"), Some("2025-13-40"))]
    #[case(Some(""), Some("2025-11-03"))]
    fn incomplete_or_malformed_filters_fail_open(
        #[case] from: Option<&str>,
        #[case] to: Option<&str>,
    ) {
        assert!(filter(from, to).window().is_none());
    }

    #[rstest]
    #[case("2025-11-02T00:00:49Z", true)]
    #[case("2025-11-03T23:59:59.999999Z", true)]
    #[case("2025-11-01T00:00:00Z", true)]
    #[case("2025-10-31T23:59:59.999999Z", false)]
    #[case("2025-11-04T00:00:49Z", false)]
    #[case("2025-11-04T00:00:00Z", false)]
    fn window_boundaries_are_inclusive_whole_days(#[case] at: &str, #[case] included: bool) {
        let window = filter(Some("2025-11-01"), Some("2025-11-03"))
            .window()
            .expect("window applies");
        assert_eq!(window.contains(instant(at)), included, "{at}");
    }

    #[rstest]
    fn timestamps_are_truncated_to_their_utc_day() {
        let window = filter(Some("2025-11-01T10:15:00Z"), Some("2025-11-03T05:00:00+01:00"))
            .window()
            .expect("window applies");
        assert_eq!(window.start(), instant("2025-11-01T00:00:00Z"));
        assert_eq!(window.end(), instant("2025-11-03T23:59:59.999999Z"));
    }

    #[rstest]
    fn inverted_window_matches_nothing() {
        let window = filter(Some("2025-11-05"), Some("2025-11-01"))
            .window()
            .expect("window applies");
        assert!(!window.contains(instant("2025-11-03T12:00:00Z")));
        assert!(!window.contains(instant("2025-11-05T00:00:00Z")));
    }
}
