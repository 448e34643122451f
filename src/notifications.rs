use crate::models::ReminderSettings;
use crate::store::Snapshot;
use chrono::NaiveTime;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Platform hook for the daily reminder. Scheduling replaces any earlier
/// trigger, so at most one is ever active.
pub trait ReminderScheduler: Send + Sync {
    fn schedule_daily(&self, at: NaiveTime);
    fn cancel(&self);
}

#[derive(Debug, Default)]
pub struct LocalReminders {
    active: Mutex<Option<NaiveTime>>,
}

impl LocalReminders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<NaiveTime> {
        *self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReminderScheduler for LocalReminders {
    fn schedule_daily(&self, at: NaiveTime) {
        let mut active = self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *active = Some(at);
        info!("daily reminder scheduled for {}", at.format("%H:%M"));
    }

    fn cancel(&self) {
        let mut active = self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if active.take().is_some() {
            info!("daily reminder canceled");
        }
    }
}

fn apply(scheduler: &dyn ReminderScheduler, reminder: &ReminderSettings) {
    if reminder.enabled {
        scheduler.schedule_daily(reminder.time);
    } else {
        scheduler.cancel();
    }
}

/// Keeps the scheduled reminder in step with the reminder settings: applies
/// the current ones right away, then every change the store publishes.
pub fn spawn_reminder_sync(
    scheduler: Arc<dyn ReminderScheduler>,
    mut snapshots: watch::Receiver<Snapshot>,
) -> JoinHandle<()> {
    let mut applied = snapshots.borrow_and_update().settings().reminder;
    apply(scheduler.as_ref(), &applied);
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let reminder = snapshots.borrow_and_update().settings().reminder;
            if reminder != applied {
                apply(scheduler.as_ref(), &reminder);
                applied = reminder;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_data;
    use crate::store::AppStore;
    use chrono::NaiveDate;

    #[test]
    fn rescheduling_replaces() {
        let reminders = LocalReminders::new();
        let morning = NaiveTime::from_hms_opt(5, 0, 0).unwrap();
        let evening = NaiveTime::from_hms_opt(20, 30, 0).unwrap();

        reminders.schedule_daily(morning);
        reminders.schedule_daily(evening);
        assert_eq!(reminders.active(), Some(evening));

        reminders.cancel();
        assert_eq!(reminders.active(), None);
    }

    #[tokio::test]
    async fn reminder_follows_settings() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 29).unwrap();
        let store = AppStore::new_at(seed_data(), today);
        let reminders = Arc::new(LocalReminders::new());
        let sync = spawn_reminder_sync(reminders.clone(), store.subscribe());
        assert_eq!(reminders.active(), None);

        let mut settings = store.snapshot().settings().clone();
        settings.reminder.enabled = true;
        settings.reminder.time = NaiveTime::from_hms_opt(6, 15, 0).unwrap();
        store.update_settings_at(settings, today);
        drop(store);
        sync.await.unwrap();

        assert_eq!(reminders.active(), NaiveTime::from_hms_opt(6, 15, 0));
    }

    #[test]
    fn enabled_settings_apply_immediately() {
        let mut data = seed_data();
        data.settings.reminder.enabled = true;
        let reminders = LocalReminders::new();
        apply(&reminders, &data.settings.reminder);
        assert_eq!(reminders.active(), Some(data.settings.reminder.time));
    }
}
