// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_query, finished_run, save_result, setup_db};
use serpdiff::domain::services::correlator::{CorrelationError, Correlator};
use uuid::Uuid;

fn correlator(app: &super::helpers::TestDb) -> Correlator {
    Correlator::new(app.stores.runs.clone(), app.stores.results.clone())
}

/// A、B、C 三次运行：u 出现在 A 和 C，不在 B。比较 B 与 C 时 u 是“回归”而不是“首次出现”
#[tokio::test]
async fn test_reappearing_url_is_added() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let a = finished_run(&app.stores, query.id, 30).await;
    let b = finished_run(&app.stores, query.id, 20).await;
    let c = finished_run(&app.stores, query.id, 10).await;

    save_result(&app.stores, a.id, "https://u.com", 1, Some("acme widgets")).await;
    save_result(&app.stores, a.id, "https://w.com", 2, Some("acme widgets")).await;
    save_result(&app.stores, b.id, "https://w.com", 1, Some("acme widgets")).await;
    save_result(&app.stores, c.id, "https://w.com", 1, Some("acme widgets")).await;
    save_result(&app.stores, c.id, "https://u.com", 2, Some("acme widgets")).await;
    save_result(&app.stores, c.id, "https://n.com", 3, Some("acme widgets")).await;

    let delta = correlator(&app).url_delta(b.id, c.id).await.unwrap();

    assert!(delta.added.contains("https://u.com"));
    assert!(!delta.uniquely_added.contains("https://u.com"));
    assert!(delta.uniquely_added.contains("https://n.com"));
    assert!(delta.removed.is_empty());
}

/// 只在第一次运行中出现过的链接，不会出现在之后任意两次运行的比较结果里
#[tokio::test]
async fn test_first_run_only_url_is_ignored_later() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let a = finished_run(&app.stores, query.id, 30).await;
    let b = finished_run(&app.stores, query.id, 20).await;
    let c = finished_run(&app.stores, query.id, 10).await;

    save_result(&app.stores, a.id, "https://v.com", 1, Some("acme widgets")).await;
    save_result(&app.stores, b.id, "https://w.com", 1, Some("acme widgets")).await;
    save_result(&app.stores, c.id, "https://x.com", 1, Some("acme widgets")).await;

    let delta = correlator(&app).url_delta(b.id, c.id).await.unwrap();

    for set in [&delta.added, &delta.removed, &delta.uniquely_added] {
        assert!(!set.contains("https://v.com"));
    }
    assert!(delta.removed.contains("https://w.com"));
    assert!(delta.uniquely_added.contains("https://x.com"));
}

/// 较晚运行之后的运行也属于历史
#[tokio::test]
async fn test_history_includes_later_runs() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let a = finished_run(&app.stores, query.id, 30).await;
    let b = finished_run(&app.stores, query.id, 20).await;
    let c = finished_run(&app.stores, query.id, 10).await;

    save_result(&app.stores, a.id, "https://w.com", 1, Some("acme widgets")).await;
    save_result(&app.stores, b.id, "https://z.com", 1, Some("acme widgets")).await;
    save_result(&app.stores, c.id, "https://z.com", 1, Some("acme widgets")).await;

    let delta = correlator(&app).url_delta(a.id, b.id).await.unwrap();

    assert!(delta.added.contains("https://z.com"));
    assert!(delta.uniquely_added.is_empty());
}

#[tokio::test]
async fn test_runs_of_different_queries_are_rejected() {
    let app = setup_db().await;
    let first = create_query(&app.stores, "acme widgets").await;
    let second = create_query(&app.stores, "blue gadgets").await;
    let a = finished_run(&app.stores, first.id, 20).await;
    let b = finished_run(&app.stores, second.id, 10).await;

    let err = correlator(&app).url_delta(a.id, b.id).await.unwrap_err();

    assert!(matches!(err, CorrelationError::CrossQuery(x, y) if x == a.id && y == b.id));
}

#[tokio::test]
async fn test_unknown_run_is_reported() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let a = finished_run(&app.stores, query.id, 20).await;
    let missing = Uuid::new_v4();

    let err = correlator(&app).url_delta(a.id, missing).await.unwrap_err();

    assert!(matches!(err, CorrelationError::RunNotFound(id) if id == missing));
}
