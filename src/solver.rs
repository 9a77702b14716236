use crate::data::{GenerateRequest, Requirement, Timetable};
use crate::error::EngineError;
use crate::filler::{fill_gaps, recess_markers};
use crate::grid::active_days;
use crate::lab::place_labs;
use crate::ledger::AllocationLedger;
use crate::regular::place_subjects;
use crate::validation::validate_request;
use log::{info, trace};
use rand::Rng;
use std::slice;
use std::time::Instant;

/// Weekly periods a non-lab subject asks for unless configured otherwise.
pub const DEFAULT_PERIODS_PER_WEEK: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub periods_per_week: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            periods_per_week: DEFAULT_PERIODS_PER_WEEK,
        }
    }
}

/// Builds a timetable: labs first, then regular subjects, then free hours.
///
/// Only malformed input is an error. Requirements that find no room are left
/// out of `entries` and listed in `unmet`. The ledger lives for this call only.
pub fn generate<R: Rng + ?Sized>(
    request: &GenerateRequest,
    options: &EngineOptions,
    rng: &mut R,
) -> Result<Timetable, EngineError> {
    let start_time = Instant::now();
    validate_request(request)?;

    let days = active_days(request.year_level, &request.day_options);
    info!(
        "Generating {:?} timetable over {} days with {} requirements...",
        request.year_level,
        days.len(),
        request.requirements.len()
    );

    let mut ledger = AllocationLedger::new();
    for blocked in &request.unavailable {
        if days.contains(&blocked.day) {
            ledger.reserve_teachers(blocked.day, blocked.slot, slice::from_ref(&blocked.teacher));
        }
    }
    trace!("Reserved {} unavailable teacher cells.", request.unavailable.len());

    let (labs, subjects): (Vec<&Requirement>, Vec<&Requirement>) =
        request.requirements.iter().partition(|r| r.is_lab);

    let mut timetable = Timetable::default();
    recess_markers(&days, &mut timetable);
    place_labs(&labs, &days, &mut ledger, rng, &mut timetable);
    place_subjects(
        &subjects,
        &days,
        options.periods_per_week,
        &mut ledger,
        rng,
        &mut timetable,
    );

    let categories: Vec<String> = request
        .free_categories
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    fill_gaps(&days, &categories, &mut ledger, rng, &mut timetable);

    timetable
        .entries
        .sort_by_key(|e| (e.day, e.slot.start_position()));

    info!(
        "Timetable generated in {:.2?}: {} entries, {} unmet requirements.",
        start_time.elapsed(),
        timetable.entries.len(),
        timetable.unmet.len()
    );
    Ok(timetable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Batch, EntryKind, LabGroupId, ScheduleEntry, Unavailability};
    use crate::grid::{Day, DayOptions, Recess, Slot, TimeSlot, YearLevel};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::{HashMap, HashSet};

    fn department_request() -> GenerateRequest {
        GenerateRequest {
            year_level: YearLevel::Third,
            day_options: DayOptions::default(),
            requirements: vec![
                Requirement::lab("DS Lab", &["Patil", "Shah"], Some(Batch::B1)),
                Requirement::lab("OS Lab", &["Kulkarni"], Some(Batch::B2)),
                Requirement::lab("Web Lab", &["Joshi"], None),
                Requirement::subject("Maths", "Das"),
                Requirement::subject("Statistics", "Das"),
                Requirement::subject("DBMS", "Patil"),
                Requirement::subject("Networks", "Kulkarni"),
                Requirement::subject("Economics", "Mehta"),
            ],
            free_categories: vec!["Library".to_string(), "Sports".to_string()],
            unavailable: Vec::new(),
        }
    }

    /// Distinct occupants per (day, period); a rotation pair counts once.
    fn coverage(entries: &[ScheduleEntry]) -> HashMap<(Day, TimeSlot), usize> {
        let mut seen_groups: HashSet<LabGroupId> = HashSet::new();
        let mut cover = HashMap::new();
        for entry in entries {
            if let Some(group) = entry.lab_group() {
                if !seen_groups.insert(group) {
                    continue;
                }
            }
            for &slot in entry.slot.periods() {
                *cover.entry((entry.day, slot)).or_insert(0) += 1;
            }
        }
        cover
    }

    #[test]
    fn every_period_is_covered_exactly_once() {
        for seed in 0..25 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let timetable = generate(&department_request(), &EngineOptions::default(), &mut rng).unwrap();

            let cover = coverage(&timetable.entries);
            assert_eq!(cover.len(), 6 * 7, "seed {seed}");
            assert!(cover.values().all(|&n| n == 1), "seed {seed}");
        }
    }

    #[test]
    fn no_teacher_is_double_booked() {
        for seed in 0..25 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let timetable = generate(&department_request(), &EngineOptions::default(), &mut rng).unwrap();

            let mut booked: HashSet<(Day, TimeSlot, &str)> = HashSet::new();
            for entry in &timetable.entries {
                for &slot in entry.slot.periods() {
                    for teacher in entry.teachers() {
                        assert!(
                            booked.insert((entry.day, slot, teacher.as_str())),
                            "seed {seed}: {teacher} twice on {} {}",
                            entry.day,
                            slot.label()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn roomy_week_meets_every_requirement() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let timetable = generate(&department_request(), &EngineOptions::default(), &mut rng).unwrap();

        assert!(timetable.unmet.is_empty());
        let maths = timetable
            .entries
            .iter()
            .filter(|e| e.subject() == Some("Maths"))
            .count();
        assert_eq!(maths, DEFAULT_PERIODS_PER_WEEK);
        let groups: HashSet<_> = timetable.entries.iter().filter_map(|e| e.lab_group()).collect();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn recess_markers_exist_for_each_day() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let timetable = generate(&department_request(), &EngineOptions::default(), &mut rng).unwrap();

        for day in Day::ALL {
            let recesses: Vec<_> = timetable
                .entries
                .iter()
                .filter(|e| e.day == day && matches!(e.slot, Slot::Recess(_)))
                .collect();
            assert_eq!(recesses.len(), 2);
            assert_eq!(recesses[0].kind, EntryKind::Break);
            assert_eq!(recesses[1].slot, Slot::Recess(Recess::Lunch));
        }
    }

    #[test]
    fn entries_are_ordered_by_day_then_time() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let timetable = generate(&department_request(), &EngineOptions::default(), &mut rng).unwrap();

        let keys: Vec<_> = timetable
            .entries
            .iter()
            .map(|e| (e.day, e.slot.start_position()))
            .collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let request = department_request();
        let a = generate(&request, &EngineOptions::default(), &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let b = generate(&request, &EngineOptions::default(), &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a.entries, b.entries);
    }

    #[test]
    fn senior_four_day_week_stays_within_monday_to_thursday() {
        let mut request = department_request();
        request.year_level = YearLevel::Final;
        request.day_options.four_day_week = true;
        let mut rng = ChaCha8Rng::seed_from_u64(13);

        let timetable = generate(&request, &EngineOptions::default(), &mut rng).unwrap();

        let days: HashSet<Day> = timetable.entries.iter().map(|e| e.day).collect();
        assert_eq!(
            days,
            HashSet::from([Day::Monday, Day::Tuesday, Day::Wednesday, Day::Thursday])
        );
        assert_eq!(coverage(&timetable.entries).len(), 4 * 7);
    }

    #[test]
    fn unavailable_cells_are_never_given_to_that_teacher() {
        let mut request = department_request();
        for day in Day::ALL {
            for slot in [TimeSlot::P1, TimeSlot::P2] {
                request.unavailable.push(Unavailability {
                    teacher: "Das".to_string(),
                    day,
                    slot,
                });
            }
        }
        for seed in 0..10 {
            let timetable =
                generate(&request, &EngineOptions::default(), &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            assert!(timetable.entries.iter().all(|e| {
                !(e.teachers().iter().any(|t| t == "Das")
                    && (e.slot.periods().contains(&TimeSlot::P1) || e.slot.periods().contains(&TimeSlot::P2)))
            }));
        }
    }

    #[test]
    fn overfull_week_degrades_without_error() {
        let mut request = department_request();
        request.requirements = (0..14)
            .map(|i| Requirement::subject(format!("Elective {i}"), format!("T{i}")))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let timetable = generate(&request, &EngineOptions::default(), &mut rng).unwrap();

        let placed = timetable.entries.iter().filter(|e| e.subject().is_some()).count();
        assert_eq!(placed, 42);
        let missing: usize = timetable.unmet.iter().map(|s| s.required - s.placed).sum();
        assert_eq!(missing, 14 * 4 - 42);
        assert!(
            timetable
                .entries
                .iter()
                .all(|e| !matches!(e.kind, EntryKind::Free { .. }))
        );
    }

    #[test]
    fn invalid_input_stops_before_placement() {
        let mut request = department_request();
        request.requirements.push(Requirement::lab("Empty Lab", &[], None));
        let result = generate(&request, &EngineOptions::default(), &mut ChaCha8Rng::seed_from_u64(0));
        assert!(matches!(result, Err(EngineError::InvalidRequirement { index: 8, .. })));
    }
}
