use crate::models::{Deed, DeedCategory, FrequencyType};
use chrono::{Datelike, NaiveDate};

/// Monthly and yearly deeds are always due; their `count` is informational.
pub fn is_due_on(deed: &Deed, date: NaiveDate) -> bool {
    let Some(frequency) = &deed.frequency else {
        return true;
    };

    match frequency.kind {
        FrequencyType::Daily | FrequencyType::Monthly | FrequencyType::Yearly => true,
        FrequencyType::Weekly => {
            let weekday = date.weekday().num_days_from_sunday();
            frequency
                .days
                .as_deref()
                .is_some_and(|days| days.iter().any(|day| u32::from(*day) == weekday))
        }
    }
}

/// Top-level deeds due on `date`, in collection order. Children are only
/// reachable through their parent.
pub fn due_deeds(deeds: &[Deed], date: NaiveDate) -> Vec<&Deed> {
    deeds
        .iter()
        .filter(|deed| deed.parent_id.is_none())
        .filter(|deed| is_due_on(deed, date))
        .collect()
}

pub fn sections(deeds: &[Deed], date: NaiveDate) -> Vec<(DeedCategory, Vec<&Deed>)> {
    let mut out: Vec<(DeedCategory, Vec<&Deed>)> = Vec::new();
    for deed in due_deeds(deeds, date) {
        match out.iter_mut().find(|(category, _)| *category == deed.category) {
            Some((_, members)) => members.push(deed),
            None => out.push((deed.category, vec![deed])),
        }
    }
    out
}

pub fn children_of<'a>(deeds: &'a [Deed], parent_id: &str) -> Vec<&'a Deed> {
    deeds
        .iter()
        .filter(|deed| deed.parent_id.as_deref() == Some(parent_id))
        .collect()
}
