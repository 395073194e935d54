// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_query, setup_db};
use serde_json::json;
use serpdiff::config::settings::{BrowserSettings, FetchSettings, ProviderSettings};
use serpdiff::domain::models::query::NewQuery;
use serpdiff::domain::models::run::ScrapeStatus;
use serpdiff::domain::services::content_extractor::ContentExtractor;
use serpdiff::domain::services::correlator::Correlator;
use serpdiff::domain::services::run_orchestrator::{RunOrchestrator, RunStores};
use serpdiff::engines::router::FetchStrategySelector;
use serpdiff::infrastructure::search::DataForSeoProvider;
use serpdiff::workers::run_worker::RunWorker;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERP_PATH: &str = "/v3/serp/google/organic/live/advanced";

fn orchestrator(stores: &RunStores, server: &MockServer) -> RunOrchestrator {
    let provider = DataForSeoProvider::new(ProviderSettings {
        base_url: server.uri(),
        login: "login".to_string(),
        password: "secret".to_string(),
        location_code: 2826,
        language_code: "en".to_string(),
        device: "desktop".to_string(),
        os: "windows".to_string(),
        depth: 100,
        timeout_secs: 5,
    })
    .unwrap();
    let fetcher =
        FetchStrategySelector::new(&FetchSettings::default(), &BrowserSettings::default()).unwrap();

    RunOrchestrator::new(
        stores.clone(),
        Arc::new(provider),
        Arc::new(fetcher),
        ContentExtractor::default(),
        BrowserSettings::default(),
    )
}

async fn mount_serp(server: &MockServer, items: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(SERP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 20000,
            "status_message": "Ok.",
            "tasks": [{"status_code": 20000, "status_message": "Ok.", "result": [{"items": items}]}]
        })))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(format!("<html><body><p>{}</p></body></html>", body), "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_acme_widgets_pipeline() {
    let app = setup_db().await;
    let server = MockServer::start().await;
    let orchestrator = Arc::new(orchestrator(&app.stores, &server));
    let a = format!("{}/a", server.uri());
    let b = format!("{}/b", server.uri());
    let c = format!("{}/c", server.uri());

    // 第一次运行
    mount_serp(
        &server,
        json!([
            {"type": "organic", "title": "Acme", "url": a, "rank_absolute": 1},
            {"type": "paid", "title": "Ad", "url": "https://ads.example", "rank_absolute": 2},
            {"type": "organic", "title": "B", "url": b, "rank_absolute": 2}
        ]),
    )
    .await;
    mount_page(&server, "/a", "... acme widgets are great ...").await;
    mount_page(&server, "/b", "... acme widgets ...").await;

    let (query, first_run) = orchestrator
        .track(NewQuery::new("acme widgets", 1))
        .await
        .unwrap();
    let worker = RunWorker::new(
        app.stores.runs.clone(),
        orchestrator.clone(),
        Duration::from_millis(10),
    );
    let first = worker.process_next().await.unwrap().unwrap();
    assert_eq!(first.run_id, first_run.id);
    assert_eq!(first.status, ScrapeStatus::Success);
    assert_eq!(first.results, 2);
    assert_eq!(first.differences, 0);

    // 第二次运行
    server.reset().await;
    mount_serp(
        &server,
        json!([
            {"type": "organic", "title": "C", "url": c, "rank_absolute": 1},
            {"type": "organic", "title": "Acme", "url": a, "rank_absolute": 2}
        ]),
    )
    .await;
    mount_page(&server, "/a", "... acme widgets are great now ...").await;
    mount_page(&server, "/c", "... acme widgets ...").await;

    let second = orchestrator.run_query(&query).await.unwrap();
    assert_eq!(second.status, ScrapeStatus::Success);
    assert_eq!(second.differences, 1);
    assert!(worker.process_next().await.unwrap().is_none());

    let later_a = app
        .stores
        .results
        .find_successful_by_run_and_url(second.run_id, &a)
        .await
        .unwrap()
        .unwrap();
    let differences = app.stores.differences.list_by_result(later_a.id).await.unwrap();
    assert_eq!(differences.len(), 1);
    assert!(differences[0].has_difference);
    assert_eq!(differences[0].ranking_difference, 1);

    let delta = Correlator::new(app.stores.runs.clone(), app.stores.results.clone())
        .url_delta(first.run_id, second.run_id)
        .await
        .unwrap();
    assert_eq!(delta.removed.into_iter().collect::<Vec<_>>(), vec![b]);
    assert!(delta.added.is_empty());
    assert_eq!(delta.uniquely_added.into_iter().collect::<Vec<_>>(), vec![c]);
}

#[tokio::test]
async fn test_provider_outage_fails_run() {
    let app = setup_db().await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SERP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 50000,
            "status_message": "Internal Error.",
            "tasks": []
        })))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(&app.stores, &server);
    let (_, run) = orchestrator.track(NewQuery::new("acme widgets", 1)).await.unwrap();

    let outcome = orchestrator.execute(run.id).await.unwrap();

    assert_eq!(outcome.status, ScrapeStatus::Failed);
    let stored = app.stores.runs.find_by_id(run.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ScrapeStatus::Failed);
    assert!(stored.log.unwrap().contains("Internal Error."));
    assert!(app.stores.results.list_by_run(run.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_off_topic_page_recorded_as_failed() {
    let app = setup_db().await;
    let server = MockServer::start().await;
    let off = format!("{}/off", server.uri());
    mount_serp(
        &server,
        json!([{"type": "organic", "title": "Off", "url": off, "rank_absolute": 1}]),
    )
    .await;
    mount_page(&server, "/off", "nothing to see").await;

    let orchestrator = orchestrator(&app.stores, &server);
    let (query, _) = orchestrator.track(NewQuery::new("acme widgets", 1)).await.unwrap();
    let pending = app.stores.runs.list_by_query(query.id).await.unwrap();

    let outcome = orchestrator.execute(pending[0].id).await.unwrap();

    assert_eq!(outcome.status, ScrapeStatus::Success);
    assert_eq!(outcome.failed_results, 1);
    let results = app.stores.results.list_by_run(outcome.run_id).await.unwrap();
    assert_eq!(results[0].status, ScrapeStatus::Failed);
    assert_eq!(results[0].log, "Query not in returned content.");
}

/// `run_query` 正在执行的运行不会再被工作器拾取
#[tokio::test]
async fn test_worker_skips_run_executed_in_process() {
    let app = setup_db().await;
    let server = MockServer::start().await;
    let slow = format!("{}/slow", server.uri());
    mount_serp(
        &server,
        json!([{"type": "organic", "title": "Slow", "url": slow, "rank_absolute": 1}]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body><p>acme widgets</p></body></html>", "text/html")
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let orchestrator = Arc::new(orchestrator(&app.stores, &server));
    let query = create_query(&app.stores, "acme widgets").await;
    let running = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let query = query.clone();
        async move { orchestrator.run_query(&query).await }
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    let worker = RunWorker::new(
        app.stores.runs.clone(),
        orchestrator.clone(),
        Duration::from_millis(10),
    );
    assert!(worker.process_next().await.unwrap().is_none());

    let outcome = running.await.unwrap().unwrap();
    assert_eq!(outcome.status, ScrapeStatus::Success);
    assert_eq!(outcome.results, 1);
    assert_eq!(app.stores.runs.list_by_query(query.id).await.unwrap().len(), 1);
    assert_eq!(app.stores.results.list_by_run(outcome.run_id).await.unwrap().len(), 1);
}
