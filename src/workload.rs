use crate::data::{Requirement, TimetableRecord};
use crate::error::{EngineError, Overload};
use itertools::Itertools;
use log::debug;

/// Lifetime limit on distinct non-lab subjects per teacher.
pub const DEFAULT_WORKLOAD_CAP: usize = 3;

/// Read-only view over already stored timetables.
///
/// Counts distinct (timetable, subject) pairs a teacher takes, skipping labs,
/// recesses and free hours. Holds no state of its own, so repeated queries
/// over the same corpus agree.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadValidator<'a> {
    timetables: &'a [TimetableRecord],
}

impl<'a> WorkloadValidator<'a> {
    pub fn new(timetables: &'a [TimetableRecord]) -> Self {
        Self { timetables }
    }

    pub fn count_non_lab_assignments(&self, teacher: &str) -> usize {
        self.timetables
            .iter()
            .flat_map(move |timetable| {
                timetable
                    .entries
                    .iter()
                    .filter(|entry| !entry.is_lab())
                    .filter(move |entry| entry.teachers().iter().any(|t| t == teacher))
                    .filter_map(move |entry| entry.subject().map(|subject| (timetable.id, subject)))
            })
            .unique()
            .count()
    }

    pub fn is_available(&self, teacher: &str, cap: usize) -> bool {
        self.count_non_lab_assignments(teacher) < cap
    }

    /// Rejects a requirement set that would take any teacher past `cap`.
    pub fn check_requirements(&self, requirements: &[Requirement], cap: usize) -> Result<(), EngineError> {
        let requested = requirements
            .iter()
            .filter(|r| !r.is_lab)
            .flat_map(|r| r.teachers.iter().map(move |t| (t.as_str(), r.subject.as_str())))
            .unique()
            .into_group_map();

        let overloads: Vec<Overload> = requested
            .into_iter()
            .filter_map(|(teacher, subjects)| {
                let existing = self.count_non_lab_assignments(teacher);
                debug!(
                    "Workload for {}: {} assigned, {} requested (cap {}).",
                    teacher,
                    existing,
                    subjects.len(),
                    cap
                );
                (existing + subjects.len() > cap).then(|| Overload {
                    teacher: teacher.to_string(),
                    existing,
                    requested: subjects.len(),
                })
            })
            .sorted_by(|a, b| a.teacher.cmp(&b.teacher))
            .collect();

        if overloads.is_empty() {
            Ok(())
        } else {
            Err(EngineError::WorkloadExceeded { cap, overloads })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ScheduleEntry, TimetableId};
    use crate::grid::{Day, LabBlock, Slot, TimeSlot, YearLevel};
    use chrono::Utc;

    fn record(id: TimetableId, classes: &[Requirement]) -> TimetableRecord {
        let entries = classes
            .iter()
            .enumerate()
            .map(|(i, req)| {
                let slot = if req.is_lab {
                    Slot::Block(LabBlock::Morning)
                } else {
                    Slot::Period(TimeSlot::ALL[i % 7])
                };
                ScheduleEntry::class(Day::ALL[i % 6], slot, req)
            })
            .collect();
        TimetableRecord {
            id,
            created_at: Utc::now(),
            year_level: YearLevel::Second,
            days: Day::ALL.to_vec(),
            entries,
        }
    }

    fn corpus() -> Vec<TimetableRecord> {
        vec![
            record(
                1,
                &[
                    Requirement::subject("Maths", "Rao"),
                    Requirement::subject("Maths", "Rao"),
                    Requirement::subject("Physics", "Rao"),
                    Requirement::lab("Physics Lab", &["Rao"], None),
                ],
            ),
            record(
                2,
                &[
                    Requirement::subject("Maths", "Rao"),
                    Requirement::lab("Chem Lab", &["Iyer", "Rao"], None),
                    Requirement {
                        subject: "Design".to_string(),
                        teachers: vec!["Iyer".to_string(), "Rao".to_string()],
                        is_lab: false,
                        batch: None,
                    },
                ],
            ),
        ]
    }

    #[test]
    fn counts_distinct_subjects_per_timetable() {
        let timetables = corpus();
        let validator = WorkloadValidator::new(&timetables);

        assert_eq!(validator.count_non_lab_assignments("Rao"), 4);
        assert_eq!(validator.count_non_lab_assignments("Iyer"), 1);
        assert_eq!(validator.count_non_lab_assignments("Nobody"), 0);
    }

    #[test]
    fn counting_is_idempotent() {
        let timetables = corpus();
        let validator = WorkloadValidator::new(&timetables);
        assert_eq!(
            validator.count_non_lab_assignments("Iyer"),
            validator.count_non_lab_assignments("Iyer")
        );
    }

    #[test]
    fn teacher_at_cap_is_unavailable_for_a_fourth_subject() {
        let timetables = vec![record(
            7,
            &[
                Requirement::subject("Maths", "Sen"),
                Requirement::subject("Physics", "Sen"),
                Requirement::subject("Biology", "Sen"),
            ],
        )];
        let validator = WorkloadValidator::new(&timetables);

        assert!(!validator.is_available("Sen", DEFAULT_WORKLOAD_CAP));
        let result = validator.check_requirements(
            &[
                Requirement::subject("Chemistry", "Sen"),
                Requirement::subject("Chemistry", "Bose"),
            ],
            DEFAULT_WORKLOAD_CAP,
        );
        assert_eq!(
            result,
            Err(EngineError::WorkloadExceeded {
                cap: 3,
                overloads: vec![Overload {
                    teacher: "Sen".to_string(),
                    existing: 3,
                    requested: 1,
                }],
            })
        );
    }

    #[test]
    fn labs_do_not_count_towards_the_cap() {
        let timetables = vec![record(
            1,
            &[
                Requirement::subject("Maths", "Sen"),
                Requirement::subject("Physics", "Sen"),
            ],
        )];
        let validator = WorkloadValidator::new(&timetables);

        assert!(validator.is_available("Sen", DEFAULT_WORKLOAD_CAP));
        let result = validator.check_requirements(
            &[
                Requirement::subject("Biology", "Sen"),
                Requirement::lab("Bio Lab", &["Sen"], None),
                Requirement::lab("Chem Lab", &["Sen"], None),
            ],
            DEFAULT_WORKLOAD_CAP,
        );
        assert_eq!(result, Ok(()));
    }
}
