// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{create_query, finished_run, save_result, setup_db};
use serpdiff::domain::models::difference::DiffTag;
use serpdiff::domain::repositories::RepositoryError;
use serpdiff::domain::services::diff_engine::DiffEngine;

#[tokio::test]
async fn test_difference_round_trips_diff_lines() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let first = finished_run(&app.stores, query.id, 20).await;
    let second = finished_run(&app.stores, query.id, 10).await;
    let earlier = save_result(&app.stores, first.id, "https://a.com", 1, Some("acme\nwidgets")).await;
    let later = save_result(&app.stores, second.id, "https://a.com", 3, Some("acme\ngadgets")).await;

    let difference = DiffEngine::compare(&earlier, &later);
    app.stores.differences.create(&difference).await.unwrap();

    let stored = app
        .stores
        .differences
        .find_by_id(difference.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.content_difference, difference.content_difference);
    assert_eq!(stored.title_difference[0].tag, DiffTag::Unchanged);
    assert_eq!(stored.ranking_difference, 2);
    assert!(stored.has_difference);

    let by_earlier = app.stores.differences.list_by_result(earlier.id).await.unwrap();
    let by_later = app.stores.differences.list_by_result(later.id).await.unwrap();
    assert_eq!(by_earlier.len(), 1);
    assert_eq!(by_later.len(), 1);
}

#[tokio::test]
async fn test_ranking_delta_outside_column_range_is_rejected() {
    let app = setup_db().await;
    let query = create_query(&app.stores, "acme widgets").await;
    let first = finished_run(&app.stores, query.id, 20).await;
    let second = finished_run(&app.stores, query.id, 10).await;
    let earlier = save_result(&app.stores, first.id, "https://a.com", 1, Some("acme")).await;
    let later = save_result(&app.stores, second.id, "https://a.com", 2, Some("acme")).await;

    let mut difference = DiffEngine::compare(&earlier, &later);
    difference.ranking_difference = i64::from(i32::MAX) + 1;

    let created = app.stores.differences.create(&difference).await;

    assert!(matches!(created, Err(RepositoryError::Invalid(_))));
    assert!(app.stores.differences.find_by_id(difference.id).await.unwrap().is_none());
}
