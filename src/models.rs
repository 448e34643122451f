use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeedCategory {
    Prayers,
    Quran,
    Learning,
    Social,
    #[default]
    Custom,
}

/// Theme color token a status is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum StatusColor {
    Jamaah,
    OnTime,
    Late,
    Missed,
    #[default]
    Primary,
}

/// One allowed completion outcome for a deed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeedStatus {
    pub id: String,
    pub label: String,
    pub icon: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub color: StatusColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyType {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Recurrence rule. `days` holds weekday ordinals with 0 = Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeedFrequency {
    #[serde(rename = "type", deserialize_with = "lenient::or_default")]
    pub kind: FrequencyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl DeedFrequency {
    pub fn weekly(days: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: FrequencyType::Weekly,
            days: Some(days.into()),
            count: None,
        }
    }

    pub fn of(kind: FrequencyType) -> Self {
        Self {
            kind,
            days: None,
            count: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeedGoal {
    pub value: u32,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Deed {
    pub id: String,
    pub name: String,
    pub icon: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub category: DeedCategory,
    pub statuses: Vec<DeedStatus>,
    pub is_core: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<DeedFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<DeedGoal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Deed {
    pub fn has_status(&self, status_id: &str) -> bool {
        self.statuses.iter().any(|status| status.id == status_id)
    }
}

/// What happened for one deed on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DeedLog {
    pub id: String,
    pub deed_id: String,
    pub date: NaiveDate,
    pub status_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderSettings {
    pub enabled: bool,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

fn default_reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time: default_reminder_time(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(deserialize_with = "lenient::or_default")]
    pub theme: ThemePreference,
    #[serde(deserialize_with = "lenient::or_default")]
    pub language: Language,
    pub is_haptics_enabled: bool,
    pub reminder: ReminderSettings,
    pub is_dev_mode: bool,
    pub is_demo_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemePreference::default(),
            language: Language::default(),
            is_haptics_enabled: true,
            reminder: ReminderSettings::default(),
            is_dev_mode: false,
            is_demo_mode: false,
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppData {
    pub deeds: Vec<Deed>,
    pub logs: Vec<DeedLog>,
    pub settings: Settings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeed {
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub frequency: Option<DeedFrequency>,
    #[serde(default)]
    pub goal: Option<DeedGoal>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

fn default_icon() -> String {
    "star-outline".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    pub deed_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status_id: Option<String>,
    #[serde(default)]
    pub value: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DayDeed {
    pub deed: Deed,
    pub log: Option<DeedLog>,
    pub children: Vec<DayChild>,
}

#[derive(Debug, Serialize)]
pub struct DayChild {
    pub deed: Deed,
    pub log: Option<DeedLog>,
}

#[derive(Debug, Serialize)]
pub struct DaySection {
    pub category: DeedCategory,
    pub deeds: Vec<DayDeed>,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: NaiveDate,
    pub sections: Vec<DaySection>,
}

/// Count and share of one status within a filtered log set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusShare {
    pub status_id: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeedStatsRow {
    pub deed_id: String,
    pub name: String,
    pub icon: String,
    pub total: u64,
    pub breakdown: Vec<StatusShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub deed_id: String,
    pub name: String,
    pub unit: String,
    pub progress: u64,
    pub target: u64,
    pub ratio_percentage: f64,
    pub display_percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRow {
    pub deed_id: String,
    pub icon: String,
    pub cells: Vec<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct ActivityGrid {
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<ActivityRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub interval: StatsInterval,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: Vec<StatusShare>,
    pub deeds: Vec<DeedStatsRow>,
    pub goals: Vec<GoalProgress>,
    pub activity: ActivityGrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatsInterval {
    #[default]
    Week,
    Month,
    Year,
    All,
}

#[derive(Debug, Deserialize, Default)]
pub struct StatsQuery {
    #[serde(default)]
    pub interval: StatsInterval,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Unrecognised values in a stored document fall back to the field's
/// default instead of failing the whole load.
mod lenient {
    use serde::de::{Deserialize, DeserializeOwned, Deserializer};
    use serde_json::Value;

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).unwrap_or_default())
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|raw| NaiveTime::parse_from_str(raw.trim(), FORMAT).ok())
            .unwrap_or_else(super::default_reminder_time))
    }
}
