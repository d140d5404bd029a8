// SPDX-License-Identifier: MIT

//! Activity filtering by sport type and date range.

use chrono::{DateTime, Utc};

use crate::models::{Activity, Sport};

/// Filter criteria for a run. All fields optional; `None` matches
/// everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityFilter {
    pub sport: Option<Sport>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

impl ActivityFilter {
    pub fn matches(&self, activity: &Activity) -> bool {
        if let Some(sport) = self.sport {
            if activity.sport != sport {
                return false;
            }
        }
        if let Some(after) = self.after {
            if activity.start < after {
                return false;
            }
        }
        if let Some(before) = self.before {
            if activity.start >= before {
                return false;
            }
        }
        true
    }

    /// The subsequence of `activities` satisfying every criterion,
    /// preserving relative order. An empty result is valid.
    pub fn apply(&self, activities: &[Activity]) -> Vec<Activity> {
        activities.iter().filter(|a| self.matches(a)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_activity(id: u64, sport: Sport, date: &str) -> Activity {
        Activity {
            id,
            name: format!("Activity {}", id),
            sport,
            start: date.parse().unwrap(),
            distance_m: 5000.0,
            moving_time_s: 1500,
            elapsed_time_s: 1600,
            elevation_gain_m: None,
            average_hr: None,
            pace_s_per_m: Some(0.3),
        }
    }

    #[test]
    fn test_sport_filter_preserves_order() {
        let activities = vec![
            make_activity(1, Sport::Run, "2024-01-10T10:00:00Z"),
            make_activity(2, Sport::Ride, "2024-01-11T10:00:00Z"),
            make_activity(3, Sport::Run, "2024-01-12T10:00:00Z"),
        ];
        let filter = ActivityFilter {
            sport: Some(Sport::Run),
            ..Default::default()
        };
        let runs = filter.apply(&activities);
        let ids: Vec<u64> = runs.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_date_range_is_half_open() {
        let activities = vec![
            make_activity(1, Sport::Run, "2024-01-10T00:00:00Z"),
            make_activity(2, Sport::Run, "2024-01-15T00:00:00Z"),
            make_activity(3, Sport::Run, "2024-01-20T00:00:00Z"),
        ];
        let filter = ActivityFilter {
            after: Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()),
            before: Some(Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let ids: Vec<u64> = filter.apply(&activities).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_nothing_matching_is_empty_not_error() {
        let activities = vec![make_activity(1, Sport::Run, "2024-01-10T10:00:00Z")];
        let filter = ActivityFilter {
            sport: Some(Sport::Swim),
            ..Default::default()
        };
        assert!(filter.apply(&activities).is_empty());
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let activities = vec![
            make_activity(1, Sport::Run, "2024-01-10T10:00:00Z"),
            make_activity(2, Sport::Ride, "2024-01-11T10:00:00Z"),
        ];
        assert_eq!(ActivityFilter::default().apply(&activities).len(), 2);
    }
}
