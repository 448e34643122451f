//! Synthetic prayer history shown while demo mode is on.

use crate::catalog::{PRAYER_DEED_IDS, STATUS_JAMAAH, STATUS_LATE, STATUS_MISSED, STATUS_ON_TIME};
use crate::models::DeedLog;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEMO_DAYS: i64 = 90;

fn weighted_status(roll: f64) -> &'static str {
    if roll < 0.40 {
        STATUS_JAMAAH
    } else if roll < 0.75 {
        STATUS_ON_TIME
    } else if roll < 0.95 {
        STATUS_LATE
    } else {
        STATUS_MISSED
    }
}

/// `DEMO_DAYS` of prayer logs ending at `today`, skipping roughly one in ten.
/// The same seed always yields the same history.
pub fn generate_demo_logs(today: NaiveDate, seed: u64) -> Vec<DeedLog> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut logs = Vec::new();

    for offset in 0..DEMO_DAYS {
        let date = today - Duration::days(offset);
        for deed_id in PRAYER_DEED_IDS {
            if rng.gen_range(0.0..1.0) < 0.1 {
                continue;
            }
            logs.push(DeedLog {
                id: format!("log-{deed_id}-{date}"),
                deed_id: deed_id.to_string(),
                date,
                status_id: weighted_status(rng.gen_range(0.0..1.0)).to_string(),
                value: None,
            });
        }
    }

    logs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_logs_are_unique_per_deed_and_day() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 29).unwrap();
        let logs = generate_demo_logs(today, 7);
        assert!(!logs.is_empty());
        assert!(logs.len() <= PRAYER_DEED_IDS.len() * DEMO_DAYS as usize);

        let pairs: HashSet<(&str, NaiveDate)> =
            logs.iter().map(|log| (log.deed_id.as_str(), log.date)).collect();
        assert_eq!(pairs.len(), logs.len());
        assert!(logs.iter().all(|log| log.date <= today && log.date > today - Duration::days(DEMO_DAYS)));
    }

    #[test]
    fn same_seed_same_history() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 29).unwrap();
        assert_eq!(generate_demo_logs(today, 1), generate_demo_logs(today, 1));
    }

    #[test]
    fn weights_cover_every_prayer_status() {
        assert_eq!(weighted_status(0.0), STATUS_JAMAAH);
        assert_eq!(weighted_status(0.5), STATUS_ON_TIME);
        assert_eq!(weighted_status(0.9), STATUS_LATE);
        assert_eq!(weighted_status(0.99), STATUS_MISSED);
    }
}
