// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{create_query, finished_run, save_result, setup_db};
use chrono::Utc;
use serpdiff::domain::models::page_result::PageResult;
use serpdiff::domain::models::run::{Run, ScrapeStatus};
use serpdiff::domain::repositories::RepositoryError;
use uuid::Uuid;

/// 基线只在同一查询的成功运行中选择，取完成时间最晚的一个，并排除当前运行
#[tokio::test]
async fn test_find_baseline_picks_latest_successful_run() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let other = create_query(&app.stores, "blue gadgets").await;

    let older = finished_run(&app.stores, query.id, 60).await;
    let newer = finished_run(&app.stores, query.id, 30).await;
    finished_run(&app.stores, other.id, 1).await;

    let mut failed = Run::new(query.id);
    app.stores.runs.create(&failed).await.unwrap();
    failed.finish(ScrapeStatus::Failed, Some("boom".to_string())).unwrap();
    app.stores.runs.finalize(&failed).await.unwrap();

    let current = app.stores.runs.create(&Run::new(query.id)).await.unwrap();

    let baseline = app
        .stores
        .runs
        .find_baseline(query.id, current.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(baseline.id, newer.id);

    let excluding_newer = app
        .stores
        .runs
        .find_baseline(query.id, newer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(excluding_newer.id, older.id);
}

#[tokio::test]
async fn test_first_run_has_no_baseline() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let current = app.stores.runs.create(&Run::new(query.id)).await.unwrap();

    assert!(app
        .stores
        .runs
        .find_baseline(query.id, current.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_finalize_persists_terminal_state() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let mut run = app.stores.runs.create(&Run::new(query.id)).await.unwrap();

    run.finish(ScrapeStatus::Failed, Some("provider down".to_string()))
        .unwrap();
    app.stores.runs.finalize(&run).await.unwrap();

    let stored = app.stores.runs.find_by_id(run.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ScrapeStatus::Failed);
    assert_eq!(stored.log.as_deref(), Some("provider down"));
    assert!(stored.completed_at.is_some());
}

#[tokio::test]
async fn test_finalize_unknown_run() {
    let app = setup_db().await;
    let mut run = Run::new(Uuid::new_v4());
    run.finish(ScrapeStatus::Success, None).unwrap();

    assert!(matches!(
        app.stores.runs.finalize(&run).await,
        Err(RepositoryError::NotFound)
    ));
}

/// 已终止的运行不会再次转换
#[tokio::test]
async fn test_finalize_rejects_terminal_run() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let created = app.stores.runs.create(&Run::new(query.id)).await.unwrap();

    let mut stale = created.clone();
    let mut run = created;
    run.finish(ScrapeStatus::Success, None).unwrap();
    app.stores.runs.finalize(&run).await.unwrap();

    stale.finish(ScrapeStatus::Failed, Some("late".to_string())).unwrap();
    let second = app.stores.runs.finalize(&stale).await;

    assert!(matches!(second, Err(RepositoryError::Conflict(_))));
    let stored = app.stores.runs.find_by_id(run.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ScrapeStatus::Success);
    assert!(stored.log.is_none());
}

/// 每个待执行运行只会被认领一次
#[tokio::test]
async fn test_claim_next_pending_once() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let mut first = Run::new(query.id);
    first.started_at = Utc::now() - chrono::Duration::minutes(5);
    app.stores.runs.create(&first).await.unwrap();
    let second = app.stores.runs.create(&Run::new(query.id)).await.unwrap();

    let worker = Uuid::new_v4();
    let claimed = app.stores.runs.claim_next_pending(worker).await.unwrap().unwrap();
    assert_eq!(claimed.id, first.id);
    let claimed = app.stores.runs.claim_next_pending(worker).await.unwrap().unwrap();
    assert_eq!(claimed.id, second.id);
    assert!(app.stores.runs.claim_next_pending(worker).await.unwrap().is_none());
}

/// 认领只在运行未被他人持有且仍待执行时成功
#[tokio::test]
async fn test_claim_is_held_by_single_owner() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let run = app.stores.runs.create(&Run::new(query.id)).await.unwrap();
    let owner = Uuid::new_v4();
    let rival = Uuid::new_v4();

    assert!(app.stores.runs.claim(run.id, owner).await.unwrap());
    assert!(!app.stores.runs.claim(run.id, rival).await.unwrap());
    assert!(app.stores.runs.claim(run.id, owner).await.unwrap());
    assert!(app.stores.runs.claim_next_pending(rival).await.unwrap().is_none());

    let finished = finished_run(&app.stores, query.id, 5).await;
    assert!(!app.stores.runs.claim(finished.id, owner).await.unwrap());
    assert!(!app.stores.runs.claim(Uuid::new_v4(), owner).await.unwrap());
}

#[tokio::test]
async fn test_created_claimed_run_is_skipped_by_workers() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let owner = Uuid::new_v4();
    let run = app
        .stores
        .runs
        .create_claimed(&Run::new(query.id), owner)
        .await
        .unwrap();

    assert!(app.stores.runs.claim_next_pending(Uuid::new_v4()).await.unwrap().is_none());
    assert!(!app.stores.runs.claim(run.id, Uuid::new_v4()).await.unwrap());
    assert!(app.stores.runs.claim(run.id, owner).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_workers_split_pending_runs() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let run = app.stores.runs.create(&Run::new(query.id)).await.unwrap();

    let (a, b) = tokio::join!(
        app.stores.runs.claim_next_pending(Uuid::new_v4()),
        app.stores.runs.claim_next_pending(Uuid::new_v4()),
    );

    let claimed: Vec<Run> = [a.unwrap(), b.unwrap()].into_iter().flatten().collect();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].id, run.id);
}

#[tokio::test]
async fn test_rank_outside_column_range_is_rejected() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let run = finished_run(&app.stores, query.id, 10).await;
    let result = PageResult::skeleton(run.id, "A".to_string(), "https://a.com".to_string(), u32::MAX)
        .succeed("acme widgets".to_string());

    let saved = app.stores.results.save(&result).await;

    assert!(matches!(saved, Err(RepositoryError::Invalid(_))));
    assert!(app.stores.results.list_by_run(run.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_result_matching_by_run_and_url() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let run = finished_run(&app.stores, query.id, 10).await;

    save_result(&app.stores, run.id, "https://a.com", 1, Some("acme widgets")).await;
    save_result(&app.stores, run.id, "https://b.com", 2, None).await;

    let found = app
        .stores
        .results
        .find_successful_by_run_and_url(run.id, "https://a.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.page_ranking, 1);
    assert_eq!(found.page_content_text, "acme widgets");

    // 提取失败的结果不参与匹配
    assert!(app
        .stores
        .results
        .find_successful_by_run_and_url(run.id, "https://b.com")
        .await
        .unwrap()
        .is_none());

    let all = app.stores.results.list_by_run(run.id).await.unwrap();
    assert_eq!(all.len(), 2);
    let failed = all.iter().find(|r| r.page_link == "https://b.com").unwrap();
    assert_eq!(failed.status, ScrapeStatus::Failed);
    assert_eq!(failed.log, "Query not in returned content.");
}

#[tokio::test]
async fn test_query_lookup_by_text() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;

    let found = app
        .stores
        .queries
        .find_by_text("acme widgets")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, query.id);
    assert_eq!(found.interval_months, 1);

    // 查询文本唯一
    assert!(app.stores.queries.create(&serpdiff::domain::models::query::Query {
        id: Uuid::new_v4(),
        ..query.clone()
    })
    .await
    .is_err());
}
