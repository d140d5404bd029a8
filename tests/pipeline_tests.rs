// SPDX-License-Identifier: MIT

mod common;

use common::{raw_activity, ScriptedSource, Step};
use runhub::config::{Config, MalformedPolicy};
use runhub::error::AppError;
use runhub::models::{Sport, WeekKey};
use runhub::services::{ActivityFilter, SyncPipeline};

fn test_config() -> Config {
    let mut config = Config::test_default();
    config.fetch.initial_backoff_secs = 0;
    config.fetch.default_cooldown_secs = 0;
    config
}

#[tokio::test]
async fn test_full_pipeline_orders_and_aggregates() {
    // Listing endpoints return newest-first; the pipeline re-orders.
    let source = ScriptedSource::new(vec![
        Step::Page(vec![
            raw_activity(3, "Ride", "2024-01-20T09:00:00Z", 20000.0),
            raw_activity(2, "Run", "2024-01-17T10:00:00Z", 3000.0),
        ]),
        Step::Page(vec![raw_activity(1, "Run", "2024-01-15T10:00:00Z", 5000.0)]),
        Step::Page(vec![]),
    ]);
    let pipeline = SyncPipeline::new(source, &test_config());

    let output = pipeline.run(ActivityFilter::default()).await.unwrap();

    let ids: Vec<u64> = output.activities.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(output.summary.total_activities, 3);
    assert_eq!(output.summary.total_distance_m, 28000.0);

    // All three fall in ISO week 2024-W03.
    let week = WeekKey { year: 2024, week: 3 };
    assert_eq!(output.summary.weeks.get(&week).unwrap().distance_m, 28000.0);
}

#[tokio::test]
async fn test_sport_filter_narrows_result() {
    let source = ScriptedSource::new(vec![
        Step::Page(vec![
            raw_activity(1, "Run", "2024-01-15T10:00:00Z", 5000.0),
            raw_activity(2, "Ride", "2024-01-16T10:00:00Z", 20000.0),
            raw_activity(3, "Run", "2024-01-17T10:00:00Z", 3000.0),
        ]),
        Step::Page(vec![]),
    ]);
    let pipeline = SyncPipeline::new(source, &test_config());

    let filter = ActivityFilter {
        sport: Some(Sport::Run),
        ..Default::default()
    };
    let output = pipeline.run(filter).await.unwrap();

    assert_eq!(output.activities.len(), 2);
    assert!(output.activities.iter().all(|a| a.sport == Sport::Run));
    assert_eq!(output.summary.total_distance_m, 8000.0);
}

#[tokio::test]
async fn test_mixed_unit_records_normalize_to_meters() {
    let mile_record = serde_json::json!({
        "id": 10,
        "type": "Run",
        "start_date": "2024-01-15T10:00:00Z",
        "distance_miles": 3.1,
        "moving_time_s": 1500,
        "elevation_ft": 100,
        "avg_hr": null
    });
    let source = ScriptedSource::new(vec![
        Step::Page(vec![mile_record, raw_activity(11, "Run", "2024-01-16T10:00:00Z", 5000.0)]),
        Step::Page(vec![]),
    ]);
    let pipeline = SyncPipeline::new(source, &test_config());

    let output = pipeline.run(ActivityFilter::default()).await.unwrap();

    let converted = output.activities.iter().find(|a| a.id == 10).unwrap();
    assert!((converted.distance_m - 4988.954).abs() < 1e-9);
    assert!((converted.elevation_gain_m.unwrap() - 30.48).abs() < 1e-9);
    assert_eq!(converted.average_hr, None);
}

#[tokio::test]
async fn test_abort_policy_fails_on_malformed_record() {
    let bad_record = serde_json::json!({
        "id": 10,
        "sport_type": "Run",
        "start_date": "2024-01-15T10:00:00Z",
        "moving_time": 1500
    });
    let source = ScriptedSource::new(vec![
        Step::Page(vec![raw_activity(1, "Run", "2024-01-14T10:00:00Z", 5000.0), bad_record]),
        Step::Page(vec![]),
    ]);
    let mut config = test_config();
    config.malformed_policy = MalformedPolicy::Abort;
    let pipeline = SyncPipeline::new(source, &config);

    let err = pipeline.run(ActivityFilter::default()).await.unwrap_err();
    match err {
        AppError::MalformedRecord { field, .. } => assert_eq!(field, "distance"),
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
}

#[tokio::test]
async fn test_skip_policy_drops_malformed_record_and_continues() {
    let bad_record = serde_json::json!({
        "id": 10,
        "sport_type": "Run",
        "start_date": "2024-01-15T10:00:00Z",
        "moving_time": 1500
    });
    let source = ScriptedSource::new(vec![
        Step::Page(vec![raw_activity(1, "Run", "2024-01-14T10:00:00Z", 5000.0), bad_record]),
        Step::Page(vec![]),
    ]);
    let mut config = test_config();
    config.malformed_policy = MalformedPolicy::Skip;
    let pipeline = SyncPipeline::new(source, &config);

    let output = pipeline.run(ActivityFilter::default()).await.unwrap();
    assert_eq!(output.activities.len(), 1);
    assert_eq!(output.skipped, 1);
}

#[tokio::test]
async fn test_date_filter_passes_range_to_source_and_bounds_result() {
    let source = ScriptedSource::new(vec![
        Step::Page(vec![
            raw_activity(1, "Run", "2024-01-05T10:00:00Z", 5000.0),
            raw_activity(2, "Run", "2024-01-15T10:00:00Z", 3000.0),
            raw_activity(3, "Run", "2024-02-10T10:00:00Z", 4000.0),
        ]),
        Step::Page(vec![]),
    ]);
    let pipeline = SyncPipeline::new(source, &test_config());

    let filter = ActivityFilter {
        after: Some("2024-01-10T00:00:00Z".parse().unwrap()),
        before: Some("2024-02-01T00:00:00Z".parse().unwrap()),
        ..Default::default()
    };
    let output = pipeline.run(filter).await.unwrap();

    let ids: Vec<u64> = output.activities.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn test_empty_scope_yields_empty_summary() {
    let source = ScriptedSource::new(vec![Step::Page(vec![])]);
    let pipeline = SyncPipeline::new(source, &test_config());

    let output = pipeline.run(ActivityFilter::default()).await.unwrap();
    assert!(output.activities.is_empty());
    assert_eq!(output.summary.total_activities, 0);
    assert!(output.summary.weeks.is_empty());
}
