use crate::data::{EntryKind, ScheduleEntry, Timetable};
use crate::grid::{Day, Recess, Slot, TimeSlot};
use crate::ledger::AllocationLedger;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

/// Break and lunch markers for every active day.
pub fn recess_markers(days: &[Day], out: &mut Timetable) {
    for &day in days {
        for recess in Recess::ALL {
            let kind = match recess {
                Recess::Break => EntryKind::Break,
                Recess::Lunch => EntryKind::Lunch,
            };
            out.entries.push(ScheduleEntry {
                day,
                slot: Slot::Recess(recess),
                kind,
            });
        }
    }
}

/// Gives every still-unoccupied period a random free-hour category.
///
/// Does nothing when `categories` is empty; callers validate that beforehand.
pub fn fill_gaps<R: Rng + ?Sized>(
    days: &[Day],
    categories: &[String],
    ledger: &mut AllocationLedger,
    rng: &mut R,
    out: &mut Timetable,
) {
    let mut filled = 0usize;
    for &day in days {
        for slot in TimeSlot::ALL {
            if !ledger.is_cell_free(day, slot) {
                continue;
            }
            let Some(category) = categories.choose(rng) else {
                return;
            };
            ledger.commit(day, slot, &[]);
            out.entries.push(ScheduleEntry {
                day,
                slot: Slot::Period(slot),
                kind: EntryKind::Free {
                    category: category.clone(),
                },
            });
            filled += 1;
        }
    }
    debug!("Filled {} free periods.", filled);
}
