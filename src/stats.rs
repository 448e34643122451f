use crate::catalog::{PRAYER_DEED_IDS, PRAYER_STATUS_ORDER};
use crate::models::{
    ActivityGrid, ActivityRow, Deed, DeedLog, DeedStatsRow, GoalProgress, StatsInterval,
    StatsResponse, StatusShare,
};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::{BTreeMap, HashSet};

const ACTIVITY_DAYS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start).num_days() as u64 + 1
        }
    }

    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let start = self.start;
        (0..self.days() as i64).map(move |offset| start + Duration::days(offset))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub total: u64,
    pub counts: BTreeMap<String, u64>,
}

impl StatusBreakdown {
    pub fn from_logs<'a>(logs: impl IntoIterator<Item = &'a DeedLog>) -> Self {
        let mut breakdown = Self::default();
        for log in logs {
            breakdown.total += 1;
            *breakdown.counts.entry(log.status_id.clone()).or_default() += 1;
        }
        breakdown
    }

    /// Share of `status_id`; zero when nothing was logged.
    pub fn stat(&self, status_id: &str) -> StatusShare {
        let count = self.counts.get(status_id).copied().unwrap_or(0);
        let percentage = if self.total == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total as f64
        };
        StatusShare {
            status_id: status_id.to_string(),
            count,
            percentage,
        }
    }

    pub fn ordered<S: AsRef<str>>(&self, order: &[S]) -> Vec<StatusShare> {
        order.iter().map(|id| self.stat(id.as_ref())).collect()
    }

    pub fn shares(&self) -> Vec<StatusShare> {
        self.counts.keys().map(|id| self.stat(id)).collect()
    }
}

pub fn aggregate(logs: &[DeedLog], range: DateRange, deed_ids: &HashSet<&str>) -> StatusBreakdown {
    StatusBreakdown::from_logs(
        logs.iter()
            .filter(|log| range.contains(log.date))
            .filter(|log| deed_ids.contains(log.deed_id.as_str())),
    )
}

/// Best outcome first: the deed's vocabulary reversed, then any stray ids.
fn status_order(deed: &Deed, breakdown: &StatusBreakdown) -> Vec<String> {
    let mut order: Vec<String> = deed.statuses.iter().rev().map(|s| s.id.clone()).collect();
    for id in breakdown.counts.keys() {
        if !order.contains(id) {
            order.push(id.clone());
        }
    }
    order
}

pub fn deed_breakdown(logs: &[DeedLog], range: DateRange, deed: &Deed) -> DeedStatsRow {
    let ids = HashSet::from([deed.id.as_str()]);
    let breakdown = aggregate(logs, range, &ids);
    DeedStatsRow {
        deed_id: deed.id.clone(),
        name: deed.name.clone(),
        icon: deed.icon.clone(),
        total: breakdown.total,
        breakdown: breakdown.ordered(status_order(deed, &breakdown).as_slice()),
    }
}

/// Sum of logged values against the daily goal over every day of `range`.
/// Returns `None` for deeds without a goal.
pub fn goal_progress(logs: &[DeedLog], range: DateRange, deed: &Deed) -> Option<GoalProgress> {
    let goal = deed.goal.as_ref()?;
    let progress: u64 = logs
        .iter()
        .filter(|log| log.deed_id == deed.id && range.contains(log.date))
        .map(|log| u64::from(log.value.unwrap_or(0)))
        .sum();
    let target = u64::from(goal.value).saturating_mul(range.days());
    let ratio_percentage = if target == 0 {
        0.0
    } else {
        100.0 * progress as f64 / target as f64
    };

    Some(GoalProgress {
        deed_id: deed.id.clone(),
        name: deed.name.clone(),
        unit: goal.unit.clone(),
        progress,
        target,
        ratio_percentage,
        display_percentage: ratio_percentage.min(100.0),
    })
}

/// The logged status per deed per day over the `ACTIVITY_DAYS` ending at `today`.
pub fn activity_grid(logs: &[DeedLog], deeds: &[&Deed], today: NaiveDate) -> ActivityGrid {
    let range = DateRange::new(days_before(today, ACTIVITY_DAYS - 1), today);
    let dates: Vec<NaiveDate> = range.iter_days().collect();

    let mut by_key: BTreeMap<(&str, NaiveDate), &str> = BTreeMap::new();
    for log in logs.iter().filter(|log| range.contains(log.date)) {
        by_key.insert((log.deed_id.as_str(), log.date), log.status_id.as_str());
    }

    let rows = deeds
        .iter()
        .map(|deed| ActivityRow {
            deed_id: deed.id.clone(),
            icon: deed.icon.clone(),
            cells: dates
                .iter()
                .map(|date| by_key.get(&(deed.id.as_str(), *date)).map(|s| s.to_string()))
                .collect(),
        })
        .collect();

    ActivityGrid { dates, rows }
}

/// The days an interval covers, ending at `today`. Weeks start on Sunday.
pub fn interval_range(interval: StatsInterval, today: NaiveDate, logs: &[DeedLog]) -> DateRange {
    let start = match interval {
        StatsInterval::Week => week_start(today),
        StatsInterval::Month => today.with_day(1).unwrap_or(today),
        StatsInterval::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        StatsInterval::All => logs
            .iter()
            .map(|log| log.date)
            .min()
            .map_or(today, |first| first.min(today)),
    };
    DateRange::new(start, today)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    days_before(date, date.weekday().num_days_from_sunday() as i64)
}

// Clamps at the earliest representable date.
fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_sub_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}

pub fn build_stats(deeds: &[Deed], logs: &[DeedLog], interval: StatsInterval) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), deeds, logs, interval)
}

pub fn build_stats_at(
    today: NaiveDate,
    deeds: &[Deed],
    logs: &[DeedLog],
    interval: StatsInterval,
) -> StatsResponse {
    let range = interval_range(interval, today, logs);

    let prayers: Vec<&Deed> = PRAYER_DEED_IDS
        .iter()
        .filter_map(|id| deeds.iter().find(|deed| deed.id == *id))
        .collect();
    let prayer_ids: HashSet<&str> = prayers.iter().map(|deed| deed.id.as_str()).collect();
    let summary = aggregate(logs, range, &prayer_ids).ordered(&PRAYER_STATUS_ORDER);

    let deed_rows = deeds
        .iter()
        .filter(|deed| deed.goal.is_none())
        .map(|deed| deed_breakdown(logs, range, deed))
        .collect();

    let goals = deeds
        .iter()
        .filter(|deed| !deed.is_core)
        .filter_map(|deed| goal_progress(logs, range, deed))
        .collect();

    StatsResponse {
        interval,
        start_date: range.start,
        end_date: range.end,
        summary,
        deeds: deed_rows,
        goals,
        activity: activity_grid(logs, &prayers, today),
    }
}
