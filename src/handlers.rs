use crate::deeds::available_suggestions;
use crate::errors::AppError;
use crate::logs::find_log;
use crate::models::{
    AppData, DayChild, DayDeed, DayResponse, DaySection, Deed, DeedFrequency, DeedGoal, DeedLog,
    FrequencyType, LogRequest, NewDeed, ReorderRequest, Settings, StatsQuery, StatsResponse,
};
use crate::recurrence::{children_of, sections};
use crate::state::AppState;
use crate::stats::{build_stats, build_stats_at};
use crate::store::Snapshot;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{Local, NaiveDate};
use tracing::warn;

pub async fn get_state(State(state): State<AppState>) -> Json<AppData> {
    Json((*state.store.snapshot().data).clone())
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(build_day(&state.store.snapshot(), date)))
}

pub async fn get_today(State(state): State<AppState>) -> Json<DayResponse> {
    Json(build_day(&state.store.snapshot(), today()))
}

pub async fn log_deed(
    State(state): State<AppState>,
    Json(payload): Json<LogRequest>,
) -> Result<Json<DeedLog>, AppError> {
    let deed_id = payload.deed_id.trim();
    if deed_id.is_empty() {
        return Err(AppError::bad_request("deedId must not be empty"));
    }

    let current = state.store.snapshot();
    let deed = current.deeds().iter().find(|deed| deed.id == deed_id);
    if deed.is_none() {
        warn!(deed_id, "logging for unknown deed");
    }

    let snapshot = match (payload.value, payload.status_id.as_deref()) {
        (Some(_), _) if deed.is_some_and(|deed| deed.goal.is_none()) => {
            return Err(AppError::bad_request(format!(
                "deed '{deed_id}' has no goal to log a value against"
            )));
        }
        (Some(value), _) => state.store.log_goal(deed_id, payload.date, value),
        (None, Some(status_id)) if !status_id.trim().is_empty() => {
            let status_id = status_id.trim();
            if deed.is_some_and(|deed| !deed.has_status(status_id)) {
                return Err(AppError::bad_request(format!(
                    "status '{status_id}' is not valid for deed '{deed_id}'"
                )));
            }
            state.store.log_status(deed_id, payload.date, status_id)
        }
        _ => return Err(AppError::bad_request("either statusId or value is required")),
    };

    find_log(snapshot.logs(), deed_id, payload.date)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("log was not recorded"))
}

pub async fn list_deeds(State(state): State<AppState>) -> Json<Vec<Deed>> {
    Json(state.store.snapshot().deeds().to_vec())
}

pub async fn create_deed(
    State(state): State<AppState>,
    Json(payload): Json<NewDeed>,
) -> Result<(StatusCode, Json<Deed>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    validate_rules(payload.frequency.as_ref(), payload.goal.as_ref())?;

    let deed = state.store.create_deed(payload);
    Ok((StatusCode::CREATED, Json(deed)))
}

pub async fn update_deed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut deed): Json<Deed>,
) -> Result<Json<Deed>, AppError> {
    let current = state.store.snapshot();
    let stored = ensure_editable(&current, &id)?;
    if deed.name.trim().is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    if deed.parent_id.as_deref() == Some(id.as_str()) {
        return Err(AppError::bad_request("a deed cannot be its own parent"));
    }
    validate_rules(deed.frequency.as_ref(), deed.goal.as_ref())?;

    deed.is_core = stored.is_core;
    deed.id = id;
    state
        .store
        .update_deed(deed.clone())
        .ok_or_else(|| AppError::not_found(format!("no deed with id '{}'", deed.id)))?;
    Ok(Json(deed))
}

pub async fn delete_deed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    ensure_editable(&state.store.snapshot(), &id)?;
    state
        .store
        .delete_deed(&id)
        .ok_or_else(|| AppError::not_found(format!("no deed with id '{id}'")))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_deeds(
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> Json<Vec<Deed>> {
    Json(state.store.reorder(&payload.ids).deeds().to_vec())
}

pub async fn list_suggested(State(state): State<AppState>) -> Json<Vec<Deed>> {
    Json(available_suggestions(state.store.snapshot().deeds()))
}

pub async fn add_suggested(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Deed>>, AppError> {
    let snapshot = state
        .store
        .add_suggested(&id)
        .ok_or_else(|| AppError::not_found(format!("no suggested deed with id '{id}'")))?;
    Ok(Json(snapshot.deeds().to_vec()))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Json<StatsResponse> {
    let snapshot = state.store.snapshot();
    Json(match query.today {
        Some(today) => build_stats_at(today, snapshot.deeds(), snapshot.logs(), query.interval),
        None => build_stats(snapshot.deeds(), snapshot.logs(), query.interval),
    })
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.store.snapshot().settings().clone())
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Json<Settings> {
    Json(state.store.update_settings(settings).settings().clone())
}

pub async fn reset(State(state): State<AppState>) -> Json<AppData> {
    Json((*state.store.reset().data).clone())
}

/// Core deeds cannot be edited or removed from the app.
fn ensure_editable<'a>(snapshot: &'a Snapshot, id: &str) -> Result<&'a Deed, AppError> {
    match snapshot.deeds().iter().find(|deed| deed.id == id) {
        None => Err(AppError::not_found(format!("no deed with id '{id}'"))),
        Some(deed) if deed.is_core => Err(AppError::forbidden(format!("deed '{id}' is built in"))),
        Some(deed) => Ok(deed),
    }
}

fn validate_rules(frequency: Option<&DeedFrequency>, goal: Option<&DeedGoal>) -> Result<(), AppError> {
    if let Some(frequency) = frequency {
        if frequency.kind == FrequencyType::Weekly
            && frequency.days.iter().flatten().any(|day| *day > 6)
        {
            return Err(AppError::bad_request("weekly days must be between 0 and 6"));
        }
    }
    if goal.is_some_and(|goal| goal.value == 0) {
        return Err(AppError::bad_request("goal value must be positive"));
    }
    Ok(())
}

fn build_day(snapshot: &Snapshot, date: NaiveDate) -> DayResponse {
    let logs = snapshot.logs();
    let entry = |deed: &Deed| (deed.clone(), find_log(logs, &deed.id, date).cloned());

    let sections = sections(snapshot.deeds(), date)
        .into_iter()
        .map(|(category, deeds)| DaySection {
            category,
            deeds: deeds
                .into_iter()
                .map(|deed| {
                    let (parent, log) = entry(deed);
                    let children = children_of(snapshot.deeds(), &deed.id)
                        .into_iter()
                        .map(|child| {
                            let (deed, log) = entry(child);
                            DayChild { deed, log }
                        })
                        .collect();
                    DayDeed {
                        deed: parent,
                        log,
                        children,
                    }
                })
                .collect(),
        })
        .collect();

    DayResponse { date, sections }
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
