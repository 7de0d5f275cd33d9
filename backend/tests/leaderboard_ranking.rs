//! Ranking order and date-window behaviour of the leaderboard.

mod support;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use pagination::PageRequest;
use rstest::rstest;

use leaderboard::domain::ports::{LeaderboardQuery, LedgerCommand, PointAwardRequest};
use leaderboard::domain::{LeaderboardFilter, LeaderboardRequest, UserId};

use support::harness::Harness;

fn instant(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("RFC 3339 instant")
        .with_timezone(&Utc)
}

fn request(from: Option<&str>, to: Option<&str>) -> LeaderboardRequest {
    LeaderboardRequest {
        filter: LeaderboardFilter {
            from: from.map(str::to_owned),
            to: to.map(str::to_owned),
        },
        page: PageRequest::new(1, 15).expect("page request"),
    }
}

async fn award(harness: &Harness, user: UserId, points: i64) {
    harness
        .ledger
        .award(
            &harness.admin,
            PointAwardRequest {
                user_id: user.as_i64(),
                points,
                action_type: "Contest".to_owned(),
            },
        )
        .await
        .expect("award");
}

#[rstest]
#[tokio::test]
async fn ties_rank_by_ascending_id() {
    let harness = Harness::new(
        Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0)
            .single()
            .expect("valid start"),
    );
    let ada = harness.add_user("Ada", "ada@example.com").await;
    let bob = harness.add_user("Bob", "bob@example.com").await;
    let cy = harness.add_user("Cy", "cy@example.com").await;
    let dee = harness.add_user("Dee", "dee@example.com").await;
    award(&harness, cy, 500).await;
    award(&harness, ada, 500).await;
    award(&harness, bob, 600).await;

    let ranked = harness
        .leaderboard
        .ranked_users(request(None, None))
        .await
        .expect("ranking");

    let order: Vec<(UserId, i64)> = ranked
        .users
        .data()
        .iter()
        .map(|summary| (summary.id, summary.total_points))
        .collect();
    assert_eq!(order, vec![(bob, 600), (ada, 500), (cy, 500), (dee, 0)]);
    assert_eq!(ranked.users.meta().total, 4);
}

#[rstest]
#[tokio::test]
async fn window_includes_whole_end_day() {
    let harness = Harness::new(instant("2025-11-02T00:00:49Z"));
    let early = harness.add_user("Early", "early@example.com").await;
    harness.clock.set(instant("2025-11-04T00:00:49Z"));
    let late = harness.add_user("Late", "late@example.com").await;
    harness.clock.set(instant("2025-11-03T23:59:59.999999Z"));
    let edge = harness.add_user("Edge", "edge@example.com").await;

    let ranked = harness
        .leaderboard
        .ranked_users(request(Some("2025-11-01"), Some("2025-11-03")))
        .await
        .expect("ranking");

    let ids: Vec<UserId> = ranked.users.data().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![early, edge]);
    assert!(!ids.contains(&late));
    assert_eq!(ranked.filters.from.as_deref(), Some("2025-11-01"));
}

#[rstest]
#[case(Some("2025-11-01"), None)]
#[case(Some("yesterday"), Some("2025-11-03"))]
#[case(Some(""), Some(""))]
#[tokio::test]
async fn unusable_windows_rank_everyone(#[case] from: Option<&str>, #[case] to: Option<&str>) {
    let harness = Harness::new(instant("2025-10-01T08:00:00Z"));
    harness.add_user("Ada", "ada@example.com").await;
    harness.clock.set(instant("2025-12-01T08:00:00Z"));
    harness.add_user("Bob", "bob@example.com").await;

    let ranked = harness
        .leaderboard
        .ranked_users(request(from, to))
        .await
        .expect("ranking");

    assert_eq!(ranked.users.meta().total, 2);
}

#[rstest]
#[tokio::test]
async fn awarding_refreshes_the_window_position() {
    let harness = Harness::new(instant("2025-10-01T08:00:00Z"));
    let ada = harness.add_user("Ada", "ada@example.com").await;
    harness.clock.set(instant("2025-11-02T10:00:00Z"));
    award(&harness, ada, 5).await;

    let ranked = harness
        .leaderboard
        .ranked_users(request(Some("2025-11-01"), Some("2025-11-03")))
        .await
        .expect("ranking");

    assert_eq!(ranked.users.data().len(), 1);
    assert_eq!(
        NaiveDate::from_ymd_opt(2025, 11, 2),
        ranked.users.data().first().map(|s| s.updated_at.date_naive())
    );
}
