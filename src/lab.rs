//! Lab placement.
//!
//! A lab takes one whole [`LabBlock`] on one day. When both B1 and B2 labs are
//! present, the i-th B1 lab is paired with the i-th B2 lab and the pair runs
//! side by side on two days with the batch labels swapped on the second day.

use crate::data::{Batch, EntryKind, LabGroupId, Requirement, ScheduleEntry, Shortfall, TeacherId, Timetable};
use crate::grid::{Day, LabBlock, Slot};
use crate::ledger::AllocationLedger;
use log::{debug, info, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Places every lab requirement, rotation pairs first.
///
/// Labs that find no block are reported in `out.unmet` and otherwise left out.
pub fn place_labs<R: Rng + ?Sized>(
    labs: &[&Requirement],
    days: &[Day],
    ledger: &mut AllocationLedger,
    rng: &mut R,
    out: &mut Timetable,
) {
    let b1: Vec<usize> = batch_indices(labs, Batch::B1);
    let b2: Vec<usize> = batch_indices(labs, Batch::B2);

    let pairs = if b1.is_empty() || b2.is_empty() {
        0
    } else {
        b1.len().min(b2.len())
    };
    if pairs > 0 && b1.len() != b2.len() {
        warn!(
            "Batch lists differ in size (B1: {}, B2: {}); unpaired labs are placed without rotation.",
            b1.len(),
            b2.len()
        );
    }

    let mut next_group: LabGroupId = 1;
    let mut paired: HashSet<usize> = HashSet::with_capacity(pairs * 2);
    for (&first, &second) in b1.iter().zip(&b2).take(pairs) {
        paired.insert(first);
        paired.insert(second);
        place_rotation_pair(labs[first], labs[second], days, ledger, rng, &mut next_group, out);
    }

    for (i, lab) in labs.iter().enumerate() {
        if !paired.contains(&i) {
            place_single(lab, days, ledger, rng, out);
        }
    }
}

fn batch_indices(labs: &[&Requirement], batch: Batch) -> Vec<usize> {
    labs.iter()
        .enumerate()
        .filter(|(_, lab)| lab.batch == Some(batch))
        .map(|(i, _)| i)
        .collect()
}

/// Days on which the whole block is free for every listed teacher.
fn open_days(days: &[Day], block: LabBlock, teachers: &[TeacherId], ledger: &AllocationLedger) -> Vec<Day> {
    days.iter()
        .copied()
        .filter(|&day| ledger.can_place_block(day, block, teachers))
        .collect()
}

/// Morning first; the day is drawn uniformly among open days.
fn place_single<R: Rng + ?Sized>(
    lab: &Requirement,
    days: &[Day],
    ledger: &mut AllocationLedger,
    rng: &mut R,
    out: &mut Timetable,
) {
    for block in LabBlock::ALL {
        let candidates = open_days(days, block, &lab.teachers, ledger);
        if let Some(&day) = candidates.choose(rng) {
            ledger.commit_block(day, block, &lab.teachers);
            out.entries
                .push(ScheduleEntry::class(day, Slot::Block(block), lab));
            debug!("Placed lab '{}' on {} {}.", lab.subject, day, block.label());
            return;
        }
    }
    let shortfall = Shortfall::of(lab, 1, 0);
    warn!("No free block left: {}", shortfall);
    out.unmet.push(shortfall);
}

fn place_rotation_pair<R: Rng + ?Sized>(
    first: &Requirement,
    second: &Requirement,
    days: &[Day],
    ledger: &mut AllocationLedger,
    rng: &mut R,
    next_group: &mut LabGroupId,
    out: &mut Timetable,
) {
    let shared = first
        .teachers
        .iter()
        .any(|teacher| second.teachers.contains(teacher));

    if !shared {
        let teachers: Vec<TeacherId> = first
            .teachers
            .iter()
            .chain(&second.teachers)
            .cloned()
            .collect();

        for block in LabBlock::ALL {
            let candidates = open_days(days, block, &teachers, ledger);
            if candidates.len() < 2 {
                continue;
            }
            let mut chosen: Vec<Day> = candidates.choose_multiple(rng, 2).copied().collect();
            chosen.sort();
            let (day_a, day_b) = (chosen[0], chosen[1]);

            for (day, swapped) in [(day_a, false), (day_b, true)] {
                let group = *next_group;
                *next_group += 1;
                ledger.commit_block(day, block, &teachers);

                let (for_b1, for_b2) = if swapped { (second, first) } else { (first, second) };
                out.entries
                    .push(rotation_entry(day, block, for_b1, Batch::B1, group));
                out.entries
                    .push(rotation_entry(day, block, for_b2, Batch::B2, group));
            }
            info!(
                "Rotated '{}' / '{}' across {} and {} ({}).",
                first.subject,
                second.subject,
                day_a,
                day_b,
                block.label()
            );
            return;
        }
        warn!(
            "Fewer than two open days for rotation of '{}' / '{}'; pair skipped.",
            first.subject, second.subject
        );
    } else {
        warn!(
            "'{}' and '{}' share a teacher and cannot run in parallel; pair skipped.",
            first.subject, second.subject
        );
    }

    out.unmet.push(Shortfall::of(first, 2, 0));
    out.unmet.push(Shortfall::of(second, 2, 0));
}

fn rotation_entry(
    day: Day,
    block: LabBlock,
    lab: &Requirement,
    batch: Batch,
    group: LabGroupId,
) -> ScheduleEntry {
    ScheduleEntry {
        day,
        slot: Slot::Block(block),
        kind: EntryKind::Class {
            subject: lab.subject.clone(),
            teachers: lab.teachers.clone(),
            is_lab: true,
            batch: Some(batch),
            lab_group: Some(group),
        },
    }
}
