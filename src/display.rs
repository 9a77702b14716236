use crate::data::{EntryKind, ScheduleEntry};
use crate::grid::{Day, Recess, Slot, TimeSlot};
use serde::Serialize;

/// Grid columns in clock order.
const COLUMNS: [Slot; 9] = [
    Slot::Period(TimeSlot::P1),
    Slot::Period(TimeSlot::P2),
    Slot::Recess(Recess::Break),
    Slot::Period(TimeSlot::P3),
    Slot::Period(TimeSlot::P4),
    Slot::Recess(Recess::Lunch),
    Slot::Period(TimeSlot::P5),
    Slot::Period(TimeSlot::P6),
    Slot::Period(TimeSlot::P7),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub time: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub day: Day,
    pub label: &'static str,
    pub cells: Vec<GridCell>,
}

/// Lays entries out as one row per day. Lab blocks repeat across every period
/// they cover; a period with no entry renders as an empty cell.
pub fn render_grid(days: &[Day], entries: &[ScheduleEntry]) -> Vec<GridRow> {
    days.iter()
        .map(|&day| GridRow {
            day,
            label: day.short_name(),
            cells: COLUMNS
                .iter()
                .map(|&column| {
                    let occupants: Vec<&ScheduleEntry> = entries
                        .iter()
                        .filter(|e| e.day == day && covers(e.slot, column))
                        .collect();
                    GridCell {
                        time: column.label(),
                        text: occupants
                            .iter()
                            .map(|e| format_entry(e))
                            .collect::<Vec<_>>()
                            .join(" / "),
                    }
                })
                .collect(),
        })
        .collect()
}

fn covers(slot: Slot, column: Slot) -> bool {
    match column {
        Slot::Period(period) => slot.periods().contains(&period),
        _ => slot == column,
    }
}

pub fn format_entry(entry: &ScheduleEntry) -> String {
    match &entry.kind {
        EntryKind::Break => "BREAK".to_string(),
        EntryKind::Lunch => "LUNCH".to_string(),
        EntryKind::Free { category } => category.clone(),
        EntryKind::Class { subject, batch, .. } => {
            let teacher = entry.primary_teacher().unwrap_or("TBA");
            match batch {
                Some(batch) => format!("{} [{:?}] ({})", subject, batch, teacher),
                None => format!("{} ({})", subject, teacher),
            }
        }
    }
}
