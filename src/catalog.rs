//! Built-in status vocabularies and the deeds shipped with the app.

use crate::models::{AppData, Deed, DeedCategory, DeedStatus, Settings, StatusColor};

pub const STATUS_MISSED: &str = "missed";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_LATE: &str = "late";
pub const STATUS_ON_TIME: &str = "on-time";
pub const STATUS_JAMAAH: &str = "jamaah";

pub const PRAYER_DEED_IDS: [&str; 5] = [
    "prayer-fajr",
    "prayer-dhuhr",
    "prayer-asr",
    "prayer-maghrib",
    "prayer-isha",
];

/// Best outcome first.
pub const PRAYER_STATUS_ORDER: [&str; 4] = [STATUS_JAMAAH, STATUS_ON_TIME, STATUS_LATE, STATUS_MISSED];

fn status(id: &str, label: &str, icon: &str, color: StatusColor) -> DeedStatus {
    DeedStatus {
        id: id.to_string(),
        label: label.to_string(),
        icon: icon.to_string(),
        color,
    }
}

pub fn prayer_statuses() -> Vec<DeedStatus> {
    vec![
        status(STATUS_MISSED, "Not Prayed", "close-circle", StatusColor::Missed),
        status(STATUS_LATE, "Late", "clock-alert", StatusColor::Late),
        status(STATUS_ON_TIME, "On Time", "clock-check", StatusColor::OnTime),
        status(STATUS_JAMAAH, "In Jama'ah", "check-all", StatusColor::Jamaah),
    ]
}

pub fn generic_statuses() -> Vec<DeedStatus> {
    vec![
        status(STATUS_MISSED, "Missed", "close", StatusColor::Late),
        status(STATUS_COMPLETED, "Completed", "check", StatusColor::Primary),
    ]
}

fn deed(id: &str, name: &str, icon: &str, category: DeedCategory, is_core: bool) -> Deed {
    Deed {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        category,
        statuses: if is_core {
            prayer_statuses()
        } else {
            generic_statuses()
        },
        is_core,
        frequency: None,
        goal: None,
        parent_id: None,
    }
}

pub fn core_deeds() -> Vec<Deed> {
    [
        ("Fajr", "weather-sunset-up"),
        ("Dhuhr", "weather-sunny"),
        ("Asr", "weather-partly-cloudy"),
        ("Maghrib", "weather-sunset-down"),
        ("Isha", "weather-night"),
    ]
    .into_iter()
    .zip(PRAYER_DEED_IDS)
    .map(|((name, icon), id)| deed(id, name, icon, DeedCategory::Prayers, true))
    .collect()
}

pub fn suggested_deeds() -> Vec<Deed> {
    vec![
        deed("prayer-witr", "Witr", "moon-waning-crescent", DeedCategory::Prayers, false),
        deed("prayer-tahajjud", "Tahajjud", "meditation", DeedCategory::Prayers, false),
        deed("quran-reading", "Read Quran", "book-open-page-variant", DeedCategory::Quran, false),
        deed("quran-memorizing", "Memorize Quran", "brain", DeedCategory::Quran, false),
        deed("learning-book", "Read a book", "book-education", DeedCategory::Learning, false),
        deed("social-charity", "Give Charity", "charity", DeedCategory::Social, false),
        deed("social-family", "Call family", "phone-in-talk", DeedCategory::Social, false),
    ]
}

pub fn suggested_deed(id: &str) -> Option<Deed> {
    suggested_deeds().into_iter().find(|deed| deed.id == id)
}

pub fn seed_data() -> AppData {
    AppData {
        deeds: core_deeds(),
        logs: Vec::new(),
        settings: Settings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_deeds_are_the_five_prayers() {
        let deeds = core_deeds();
        let ids: Vec<&str> = deeds.iter().map(|deed| deed.id.as_str()).collect();
        assert_eq!(ids, PRAYER_DEED_IDS);
        assert!(deeds.iter().all(|deed| deed.is_core && deed.statuses.len() == 4));
    }

    #[test]
    fn suggestions_use_generic_vocabulary() {
        let deeds = suggested_deeds();
        assert_eq!(deeds.len(), 7);
        assert!(deeds.iter().all(|deed| !deed.is_core));
        assert!(deeds.iter().all(|deed| deed.has_status(STATUS_COMPLETED)));
        assert!(suggested_deed("quran-reading").is_some());
        assert!(suggested_deed("prayer-fajr").is_none());
    }
}
