use crate::data::TeacherId;
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// EngineError
///
/// Raised before placement starts. Placement itself never fails; shortfalls
/// show up as missing entries.
///

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum EngineError {
    #[error("requirement #{index} ('{subject}') is invalid: {fault}")]
    InvalidRequirement {
        index: usize,
        subject: String,
        fault: RequirementFault,
    },

    #[error("custom day selection is enabled but no days were chosen")]
    EmptyCustomDays,

    #[error("no free-hour categories were supplied")]
    NoFreeCategories,

    #[error("workload cap of {cap} non-lab subjects exceeded for {}", list_overloads(.overloads))]
    WorkloadExceeded { cap: usize, overloads: Vec<Overload> },
}

///
/// RequirementFault
///

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum RequirementFault {
    #[error("subject name is empty")]
    EmptySubject,

    #[error("no teacher assigned")]
    MissingTeacher,

    #[error("teacher name is blank")]
    BlankTeacher,

    #[error("{0} teachers listed, at most 2 allowed")]
    TooManyTeachers(usize),

    #[error("batch label set on a non-lab subject")]
    BatchWithoutLab,
}

/// A teacher the new request would push over the workload cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overload {
    pub teacher: TeacherId,
    pub existing: usize,
    pub requested: usize,
}

fn list_overloads(overloads: &[Overload]) -> String {
    overloads
        .iter()
        .map(|o| format!("{} ({} assigned + {} requested)", o.teacher, o.existing, o.requested))
        .collect::<Vec<_>>()
        .join(", ")
}
