use crate::catalog::{STATUS_COMPLETED, STATUS_MISSED};
use crate::models::DeedLog;
use chrono::NaiveDate;
use uuid::Uuid;

fn find_log_index(logs: &[DeedLog], deed_id: &str, date: NaiveDate) -> Option<usize> {
    logs.iter()
        .position(|log| log.deed_id == deed_id && log.date == date)
}

pub fn find_log<'a>(logs: &'a [DeedLog], deed_id: &str, date: NaiveDate) -> Option<&'a DeedLog> {
    find_log_index(logs, deed_id, date).map(|i| &logs[i])
}

pub fn logs_on(logs: &[DeedLog], date: NaiveDate) -> Vec<&DeedLog> {
    logs.iter().filter(|log| log.date == date).collect()
}

pub fn new_log_id() -> String {
    format!("log-{}", Uuid::new_v4())
}

// At most one log per (deed_id, date). The deed id is not checked.
pub fn log_deed(
    logs: &[DeedLog],
    deed_id: &str,
    date: NaiveDate,
    status_id: &str,
    value: Option<u32>,
) -> Vec<DeedLog> {
    let mut out = logs.to_vec();
    match find_log_index(&out, deed_id, date) {
        Some(i) => {
            let log = &mut out[i];
            log.status_id = status_id.to_string();
            if value.is_some() {
                log.value = value;
            }
        }
        None => out.push(DeedLog {
            id: new_log_id(),
            deed_id: deed_id.to_string(),
            date,
            status_id: status_id.to_string(),
            value,
        }),
    }
    out
}

pub fn goal_status(value: u32) -> &'static str {
    if value > 0 {
        STATUS_COMPLETED
    } else {
        STATUS_MISSED
    }
}

pub fn log_goal(logs: &[DeedLog], deed_id: &str, date: NaiveDate, value: u32) -> Vec<DeedLog> {
    log_deed(logs, deed_id, date, goal_status(value), Some(value))
}
