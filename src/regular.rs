use crate::data::{Requirement, ScheduleEntry, Shortfall, Timetable};
use crate::grid::{Day, Slot, TimeSlot};
use crate::ledger::AllocationLedger;
use itertools::Itertools;
use log::{trace, warn};
use rand::Rng;
use rand::seq::SliceRandom;

/// Places each non-lab requirement into up to `periods_per_week` single
/// periods, in input order. Each period is drawn uniformly from the cells
/// still open for the requirement's teachers.
pub fn place_subjects<R: Rng + ?Sized>(
    subjects: &[&Requirement],
    days: &[Day],
    periods_per_week: usize,
    ledger: &mut AllocationLedger,
    rng: &mut R,
    out: &mut Timetable,
) {
    for subject in subjects {
        let placed = place_subject(subject, days, periods_per_week, ledger, rng, out);
        if placed < periods_per_week {
            let shortfall = Shortfall::of(subject, periods_per_week, placed);
            warn!("Under-allocated: {}", shortfall);
            out.unmet.push(shortfall);
        }
    }
}

fn place_subject<R: Rng + ?Sized>(
    subject: &Requirement,
    days: &[Day],
    periods_per_week: usize,
    ledger: &mut AllocationLedger,
    rng: &mut R,
    out: &mut Timetable,
) -> usize {
    for placed in 0..periods_per_week {
        let candidates: Vec<(Day, TimeSlot)> = days
            .iter()
            .copied()
            .cartesian_product(TimeSlot::ALL)
            .filter(|&(day, slot)| ledger.can_place(day, slot, &subject.teachers))
            .collect();

        let Some(&(day, slot)) = candidates.choose(rng) else {
            return placed;
        };
        ledger.commit(day, slot, &subject.teachers);
        out.entries
            .push(ScheduleEntry::class(day, Slot::Period(slot), subject));
        trace!(
            "'{}' -> {} {} ({} candidates)",
            subject.subject,
            day,
            slot.label(),
            candidates.len()
        );
    }
    periods_per_week
}
