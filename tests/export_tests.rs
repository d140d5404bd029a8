// SPDX-License-Identifier: MIT

use runhub::models::{Activity, Sport};
use runhub::services::export;

fn make_activity(id: u64) -> Activity {
    Activity {
        id,
        name: format!("Activity {}", id),
        sport: Sport::Run,
        start: "2024-01-15T10:00:00Z".parse().unwrap(),
        distance_m: 5000.0,
        moving_time_s: 1500,
        elapsed_time_s: 1600,
        elevation_gain_m: Some(40.0),
        average_hr: None,
        pace_s_per_m: Some(0.3),
    }
}

#[test]
fn test_export_to_dir_writes_dated_csv() {
    let dir = std::env::temp_dir().join(format!("runhub-export-test-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let path = export::export_to_dir(&dir, &[make_activity(1), make_activity(2)]).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("strava_activities_"));
    assert!(name.ends_with(".csv"));

    let contents = std::fs::read_to_string(&path).unwrap();
    // Header plus two data rows.
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.lines().nth(1).unwrap().contains("Activity 1"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_export_empty_collection_is_valid() {
    let mut buf = Vec::new();
    export::write_csv(&mut buf, &[]).unwrap();
    // No activities means no rows; serde-driven headers are only
    // emitted alongside a first record.
    assert!(buf.is_empty());
}
