use crate::deeds;
use crate::demo::generate_demo_logs;
use crate::logs::{log_deed, log_goal};
use crate::models::{AppData, Deed, DeedLog, NewDeed, Settings};
use chrono::{Datelike, Local, NaiveDate};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// `demo_logs` is set while demo mode is on; it stands in for the live logs
/// and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub data: Arc<AppData>,
    pub demo_logs: Option<Arc<Vec<DeedLog>>>,
}

impl Snapshot {
    pub fn deeds(&self) -> &[Deed] {
        &self.data.deeds
    }

    pub fn logs(&self) -> &[DeedLog] {
        match &self.demo_logs {
            Some(logs) => logs.as_slice(),
            None => self.data.logs.as_slice(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.data.settings
    }

    fn with_data(&self, data: AppData) -> Self {
        Self {
            data: Arc::new(data),
            demo_logs: self.demo_logs.clone(),
        }
    }

    fn with_logs(&self, logs: Vec<DeedLog>) -> Self {
        match self.demo_logs {
            Some(_) => Self {
                data: Arc::clone(&self.data),
                demo_logs: Some(Arc::new(logs)),
            },
            None => self.with_data(AppData {
                logs,
                ..(*self.data).clone()
            }),
        }
    }
}

fn demo_logs_for(today: NaiveDate) -> Arc<Vec<DeedLog>> {
    Arc::new(generate_demo_logs(today, today.num_days_from_ce() as u64))
}

#[derive(Clone)]
pub struct AppStore {
    snapshots: Arc<watch::Sender<Snapshot>>,
}

impl AppStore {
    pub fn new(data: AppData) -> Self {
        Self::new_at(data, Local::now().date_naive())
    }

    pub fn new_at(data: AppData, today: NaiveDate) -> Self {
        let demo_logs = data.settings.is_demo_mode.then(|| demo_logs_for(today));
        let snapshot = Snapshot {
            data: Arc::new(data),
            demo_logs,
        };
        let (sender, _) = watch::channel(snapshot);
        Self {
            snapshots: Arc::new(sender),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Applies `change` atomically. `None` leaves the state untouched and
    /// publishes nothing.
    fn commit(&self, change: impl FnOnce(&Snapshot) -> Option<Snapshot>) -> Option<Snapshot> {
        let mut committed = None;
        self.snapshots.send_if_modified(|current| match change(&*current) {
            Some(next) => {
                *current = next;
                committed = Some(current.clone());
                true
            }
            None => false,
        });
        committed
    }

    fn commit_data(&self, change: impl FnOnce(&AppData) -> Option<AppData>) -> Option<Snapshot> {
        self.commit(|current| change(&current.data).map(|data| current.with_data(data)))
    }

    pub fn log_status(&self, deed_id: &str, date: NaiveDate, status_id: &str) -> Snapshot {
        debug!(deed_id, %date, status_id, "logging status");
        self.commit(|current| Some(current.with_logs(log_deed(current.logs(), deed_id, date, status_id, None))))
            .unwrap_or_else(|| self.snapshot())
    }

    pub fn log_goal(&self, deed_id: &str, date: NaiveDate, value: u32) -> Snapshot {
        debug!(deed_id, %date, value, "logging goal progress");
        self.commit(|current| Some(current.with_logs(log_goal(current.logs(), deed_id, date, value))))
            .unwrap_or_else(|| self.snapshot())
    }

    pub fn create_deed(&self, draft: NewDeed) -> Deed {
        let deed = deeds::create_deed(draft);
        info!(id = %deed.id, "deed created");
        self.add_deed(deed.clone());
        deed
    }

    pub fn add_deed(&self, deed: Deed) -> Snapshot {
        self.commit_data(|data| {
            Some(AppData {
                deeds: deeds::add_deed(&data.deeds, deed),
                ..data.clone()
            })
        })
        .unwrap_or_else(|| self.snapshot())
    }

    pub fn add_suggested(&self, id: &str) -> Option<Snapshot> {
        self.commit_data(|data| {
            deeds::add_suggested(&data.deeds, id).map(|deeds| AppData {
                deeds,
                ..data.clone()
            })
        })
    }

    pub fn update_deed(&self, deed: Deed) -> Option<Snapshot> {
        self.commit_data(|data| {
            deeds::update_deed(&data.deeds, deed).map(|deeds| AppData {
                deeds,
                ..data.clone()
            })
        })
    }

    pub fn delete_deed(&self, deed_id: &str) -> Option<Snapshot> {
        self.commit(|current| {
            if !current.deeds().iter().any(|deed| deed.id == deed_id) {
                return None;
            }
            let (deeds, logs) = deeds::delete_deed(&current.data.deeds, &current.data.logs, deed_id);
            let demo_logs = current
                .demo_logs
                .as_ref()
                .map(|demo| Arc::new(demo.iter().filter(|log| log.deed_id != deed_id).cloned().collect()));
            info!(deed_id, "deed deleted");
            Some(Snapshot {
                data: Arc::new(AppData {
                    deeds,
                    logs,
                    settings: current.data.settings.clone(),
                }),
                demo_logs,
            })
        })
    }

    pub fn reorder(&self, ids: &[String]) -> Snapshot {
        self.commit_data(|data| {
            Some(AppData {
                deeds: deeds::reorder_deeds(&data.deeds, ids),
                ..data.clone()
            })
        })
        .unwrap_or_else(|| self.snapshot())
    }

    pub fn reset(&self) -> Snapshot {
        info!("resetting deeds and logs");
        self.commit_data(|data| Some(deeds::reset(data)))
            .unwrap_or_else(|| self.snapshot())
    }

    pub fn update_settings(&self, settings: Settings) -> Snapshot {
        self.update_settings_at(settings, Local::now().date_naive())
    }

    /// Replaces the settings. Turning demo mode on swaps in generated logs;
    /// turning it off brings the live logs back.
    pub fn update_settings_at(&self, settings: Settings, today: NaiveDate) -> Snapshot {
        self.commit(|current| {
            let demo_logs = match (current.demo_logs.as_ref(), settings.is_demo_mode) {
                (Some(existing), true) => Some(Arc::clone(existing)),
                (None, true) => {
                    info!("demo mode on");
                    Some(demo_logs_for(today))
                }
                (Some(_), false) => {
                    info!("demo mode off");
                    None
                }
                (None, false) => None,
            };
            Some(Snapshot {
                data: Arc::new(AppData {
                    settings,
                    ..(*current.data).clone()
                }),
                demo_logs,
            })
        })
        .unwrap_or_else(|| self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_data;
    use crate::logs::find_log;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 29).unwrap()
    }

    fn store() -> AppStore {
        AppStore::new_at(seed_data(), today())
    }

    #[test]
    fn logging_twice_keeps_one_entry() {
        let store = store();
        store.log_status("prayer-fajr", today(), "jamaah");
        let snapshot = store.log_status("prayer-fajr", today(), "late");
        assert_eq!(snapshot.logs().len(), 1);
        assert_eq!(find_log(snapshot.logs(), "prayer-fajr", today()).unwrap().status_id, "late");
    }

    #[test]
    fn snapshots_are_immutable() {
        let store = store();
        let before = store.snapshot();
        store.log_status("prayer-fajr", today(), "jamaah");
        assert!(before.logs().is_empty());
        assert_eq!(store.snapshot().logs().len(), 1);
    }

    #[test]
    fn subscribers_see_mutations() {
        let store = store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());
        store.log_status("prayer-asr", today(), "on-time");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().logs().len(), 1);
    }

    #[test]
    fn failed_mutations_publish_nothing() {
        let store = store();
        let rx = store.subscribe();
        assert!(store.delete_deed("nope").is_none());
        assert!(store.add_suggested("nope").is_none());
        let mut ghost = store.snapshot().deeds()[0].clone();
        ghost.id = "ghost".into();
        assert!(store.update_deed(ghost).is_none());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn delete_cascades() {
        let store = store();
        store.log_status("prayer-fajr", today(), "jamaah");
        store.log_status("prayer-asr", today(), "late");
        let snapshot = store.delete_deed("prayer-fajr").unwrap();
        assert_eq!(snapshot.deeds().len(), 4);
        assert_eq!(snapshot.logs().len(), 1);
        assert_eq!(snapshot.logs()[0].deed_id, "prayer-asr");
    }

    #[test]
    fn demo_mode_swaps_logs_without_touching_live_ones() {
        let store = store();
        store.log_status("prayer-fajr", today(), "missed");
        let live = store.snapshot().data.logs.clone();

        let mut settings = store.snapshot().settings().clone();
        settings.is_demo_mode = true;
        let demo = store.update_settings_at(settings.clone(), today());
        assert!(demo.demo_logs.is_some());
        assert!(demo.logs().len() > 1);
        assert_eq!(demo.data.logs, live);

        let logged = store.log_status("prayer-isha", today(), "jamaah");
        assert_eq!(logged.data.logs, live);
        assert!(find_log(logged.logs(), "prayer-isha", today()).is_some());

        settings.is_demo_mode = false;
        let back = store.update_settings_at(settings, today());
        assert!(back.demo_logs.is_none());
        assert_eq!(back.logs(), live.as_slice());
    }

    #[test]
    fn demo_mode_is_restored_on_start() {
        let mut data = seed_data();
        data.settings.is_demo_mode = true;
        let store = AppStore::new_at(data, today());
        assert!(store.snapshot().demo_logs.is_some());
    }

    #[test]
    fn reset_restores_seed_but_keeps_settings() {
        let store = store();
        store.add_suggested("learning-book").unwrap();
        store.log_status("learning-book", today(), "completed");
        let mut settings = store.snapshot().settings().clone();
        settings.is_haptics_enabled = false;
        store.update_settings_at(settings, today());

        let snapshot = store.reset();
        assert_eq!(snapshot.deeds().len(), 5);
        assert!(snapshot.logs().is_empty());
        assert!(!snapshot.settings().is_haptics_enabled);
    }

    #[test]
    fn created_deed_is_appended() {
        let store = store();
        let deed = store.create_deed(NewDeed {
            name: "Dhikr".into(),
            icon: "star-outline".into(),
            frequency: None,
            goal: None,
            parent_id: None,
        });
        let snapshot = store.snapshot();
        assert_eq!(snapshot.deeds().last().unwrap().id, deed.id);
    }
}
