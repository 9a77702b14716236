use crate::grid::{Day, DayOptions, Slot, TimeSlot, YearLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type TeacherId = String;
pub type TimetableId = u64;
pub type LabGroupId = u32;

/// Student batch for lab rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Batch {
    B1,
    B2,
}

/// One unit of scheduling demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RequirementWire")]
pub struct Requirement {
    pub subject: String,
    pub teachers: Vec<TeacherId>,
    pub is_lab: bool,
    pub batch: Option<Batch>,
}

impl Requirement {
    pub fn subject(subject: impl Into<String>, teacher: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            teachers: vec![teacher.into()],
            is_lab: false,
            batch: None,
        }
    }

    pub fn lab(subject: impl Into<String>, teachers: &[&str], batch: Option<Batch>) -> Self {
        Self {
            subject: subject.into(),
            teachers: teachers.iter().map(|t| t.to_string()).collect(),
            is_lab: true,
            batch,
        }
    }
}

/// Accepts the legacy singular `teacher` field next to `teachers`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequirementWire {
    subject: String,
    #[serde(default)]
    teacher: Option<TeacherId>,
    #[serde(default)]
    teachers: Vec<TeacherId>,
    #[serde(default)]
    is_lab: bool,
    #[serde(default)]
    batch: Option<Batch>,
}

impl From<RequirementWire> for Requirement {
    fn from(wire: RequirementWire) -> Self {
        let mut teachers: Vec<TeacherId> = Vec::with_capacity(wire.teachers.len() + 1);
        for teacher in wire.teacher.into_iter().chain(wire.teachers) {
            if !teachers.contains(&teacher) {
                teachers.push(teacher);
            }
        }
        Self {
            subject: wire.subject,
            teachers,
            is_lab: wire.is_lab,
            batch: wire.batch,
        }
    }
}

/// A teacher who cannot take any class in the given cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unavailability {
    pub teacher: TeacherId,
    pub day: Day,
    pub slot: TimeSlot,
}

/// Everything a single generation run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub year_level: YearLevel,
    #[serde(default)]
    pub day_options: DayOptions,
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub free_categories: Vec<String>,
    #[serde(default)]
    pub unavailable: Vec<Unavailability>,
}

/// Payload of a schedule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EntryKind {
    Break,
    Lunch,
    #[serde(rename_all = "camelCase")]
    Class {
        subject: String,
        teachers: Vec<TeacherId>,
        is_lab: bool,
        batch: Option<Batch>,
        lab_group: Option<LabGroupId>,
    },
    #[serde(rename_all = "camelCase")]
    Free { category: String },
}

/// The atomic output unit, keyed by day and slot label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: Day,
    pub slot: Slot,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl ScheduleEntry {
    pub fn class(day: Day, slot: Slot, requirement: &Requirement) -> Self {
        Self {
            day,
            slot,
            kind: EntryKind::Class {
                subject: requirement.subject.clone(),
                teachers: requirement.teachers.clone(),
                is_lab: requirement.is_lab,
                batch: requirement.batch,
                lab_group: None,
            },
        }
    }

    pub fn teachers(&self) -> &[TeacherId] {
        match &self.kind {
            EntryKind::Class { teachers, .. } => teachers,
            _ => &[],
        }
    }

    pub fn subject(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Class { subject, .. } => Some(subject),
            _ => None,
        }
    }

    pub fn is_lab(&self) -> bool {
        matches!(self.kind, EntryKind::Class { is_lab: true, .. })
    }

    pub fn lab_group(&self) -> Option<LabGroupId> {
        match self.kind {
            EntryKind::Class { lab_group, .. } => lab_group,
            _ => None,
        }
    }

    /// First listed teacher. Only for rendering; placement works on the full list.
    pub fn primary_teacher(&self) -> Option<&str> {
        self.teachers().first().map(String::as_str)
    }
}

/// A requirement that ended up with fewer placements than it asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    pub subject: String,
    pub teachers: Vec<TeacherId>,
    pub is_lab: bool,
    pub batch: Option<Batch>,
    pub required: usize,
    pub placed: usize,
}

impl Shortfall {
    pub fn of(requirement: &Requirement, required: usize, placed: usize) -> Self {
        Self {
            subject: requirement.subject.clone(),
            teachers: requirement.teachers.clone(),
            is_lab: requirement.is_lab,
            batch: requirement.batch,
            required,
            placed,
        }
    }
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_lab { "lab" } else { "subject" };
        write!(
            f,
            "[{}] {} ({}) placed {}/{}",
            kind,
            self.subject,
            self.teachers.join(", "),
            self.placed,
            self.required
        )
    }
}

/// Output of one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub entries: Vec<ScheduleEntry>,
    pub unmet: Vec<Shortfall>,
}

/// A timetable as stored by the caller layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRecord {
    pub id: TimetableId,
    pub created_at: DateTime<Utc>,
    pub year_level: YearLevel,
    pub days: Vec<Day>,
    pub entries: Vec<ScheduleEntry>,
}

/// A timetable that has not been assigned an id yet.
#[derive(Debug, Clone)]
pub struct NewTimetable {
    pub year_level: YearLevel,
    pub days: Vec<Day>,
    pub entries: Vec<ScheduleEntry>,
}
