use crate::catalog::{generic_statuses, seed_data, suggested_deed, suggested_deeds};
use crate::models::{AppData, Deed, DeedCategory, DeedLog, NewDeed};
use uuid::Uuid;

pub fn create_deed(draft: NewDeed) -> Deed {
    Deed {
        id: format!("custom-{}", Uuid::new_v4()),
        name: draft.name.trim().to_string(),
        icon: draft.icon,
        category: DeedCategory::Custom,
        statuses: generic_statuses(),
        is_core: false,
        frequency: draft.frequency,
        goal: draft.goal,
        parent_id: draft.parent_id,
    }
}

pub fn add_deed(deeds: &[Deed], deed: Deed) -> Vec<Deed> {
    let mut out = deeds.to_vec();
    if !out.iter().any(|existing| existing.id == deed.id) {
        out.push(deed);
    }
    out
}

/// Adds a catalog suggestion. Returns `None` when `id` is not a suggestion.
pub fn add_suggested(deeds: &[Deed], id: &str) -> Option<Vec<Deed>> {
    suggested_deed(id).map(|deed| add_deed(deeds, deed))
}

pub fn available_suggestions(deeds: &[Deed]) -> Vec<Deed> {
    suggested_deeds()
        .into_iter()
        .filter(|suggestion| !deeds.iter().any(|deed| deed.id == suggestion.id))
        .collect()
}

pub fn update_deed(deeds: &[Deed], deed: Deed) -> Option<Vec<Deed>> {
    let index = deeds.iter().position(|existing| existing.id == deed.id)?;
    let mut out = deeds.to_vec();
    out[index] = deed;
    Some(out)
}

pub fn delete_deed(deeds: &[Deed], logs: &[DeedLog], deed_id: &str) -> (Vec<Deed>, Vec<DeedLog>) {
    let deeds = deeds
        .iter()
        .filter(|deed| deed.id != deed_id)
        .cloned()
        .collect();
    let logs = logs
        .iter()
        .filter(|log| log.deed_id != deed_id)
        .cloned()
        .collect();
    (deeds, logs)
}

/// Listed ids first, in the given order; the rest keep their relative order.
pub fn reorder_deeds(deeds: &[Deed], ids: &[String]) -> Vec<Deed> {
    let mut out: Vec<Deed> = Vec::with_capacity(deeds.len());
    for id in ids {
        if out.iter().any(|deed| &deed.id == id) {
            continue;
        }
        if let Some(deed) = deeds.iter().find(|deed| &deed.id == id) {
            out.push(deed.clone());
        }
    }
    for deed in deeds {
        if !ids.contains(&deed.id) {
            out.push(deed.clone());
        }
    }
    out
}

/// Seed deeds and logs; settings survive.
pub fn reset(data: &AppData) -> AppData {
    AppData {
        settings: data.settings.clone(),
        ..seed_data()
    }
}
