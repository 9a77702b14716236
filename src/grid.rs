use serde::{Deserialize, Serialize};
use std::fmt;

/// Teaching days, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
            Day::Saturday => "Sat",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An ordinary 50-minute teaching period. Serialized as its time label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "9:30-10:20")]
    P1,
    #[serde(rename = "10:20-11:10")]
    P2,
    #[serde(rename = "11:20-12:10")]
    P3,
    #[serde(rename = "12:10-1:00")]
    P4,
    #[serde(rename = "2:00-2:50")]
    P5,
    #[serde(rename = "2:50-3:40")]
    P6,
    #[serde(rename = "3:40-4:30")]
    P7,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 7] = [
        TimeSlot::P1,
        TimeSlot::P2,
        TimeSlot::P3,
        TimeSlot::P4,
        TimeSlot::P5,
        TimeSlot::P6,
        TimeSlot::P7,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::P1 => "9:30-10:20",
            TimeSlot::P2 => "10:20-11:10",
            TimeSlot::P3 => "11:20-12:10",
            TimeSlot::P4 => "12:10-1:00",
            TimeSlot::P5 => "2:00-2:50",
            TimeSlot::P6 => "2:50-3:40",
            TimeSlot::P7 => "3:40-4:30",
        }
    }

    /// Position of the period in the day, counting the recess slots.
    fn position(self) -> u8 {
        match self {
            TimeSlot::P1 => 0,
            TimeSlot::P2 => 1,
            TimeSlot::P3 => 3,
            TimeSlot::P4 => 4,
            TimeSlot::P5 => 6,
            TimeSlot::P6 => 7,
            TimeSlot::P7 => 8,
        }
    }
}

/// The two reserved non-teaching slots. Never assigned a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recess {
    #[serde(rename = "11:10-11:20")]
    Break,
    #[serde(rename = "1:00-2:00")]
    Lunch,
}

impl Recess {
    pub const ALL: [Recess; 2] = [Recess::Break, Recess::Lunch];

    pub fn label(self) -> &'static str {
        match self {
            Recess::Break => "11:10-11:20",
            Recess::Lunch => "1:00-2:00",
        }
    }

    fn position(self) -> u8 {
        match self {
            Recess::Break => 2,
            Recess::Lunch => 5,
        }
    }
}

/// A contiguous run of ordinary periods that a lab occupies as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabBlock {
    #[serde(rename = "9:30-1:00")]
    Morning,
    #[serde(rename = "2:00-4:30")]
    Afternoon,
}

impl LabBlock {
    /// Preference order: morning is tried first.
    pub const ALL: [LabBlock; 2] = [LabBlock::Morning, LabBlock::Afternoon];

    pub fn slots(self) -> &'static [TimeSlot] {
        match self {
            LabBlock::Morning => &[TimeSlot::P1, TimeSlot::P2, TimeSlot::P3, TimeSlot::P4],
            LabBlock::Afternoon => &[TimeSlot::P5, TimeSlot::P6, TimeSlot::P7],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LabBlock::Morning => "9:30-1:00",
            LabBlock::Afternoon => "2:00-4:30",
        }
    }
}

/// What an entry's "slot" refers to: a single period, a whole lab block,
/// or a recess. All three serialize to their plain time label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot {
    Period(TimeSlot),
    Block(LabBlock),
    Recess(Recess),
}

impl Slot {
    pub fn label(self) -> &'static str {
        match self {
            Slot::Period(slot) => slot.label(),
            Slot::Block(block) => block.label(),
            Slot::Recess(recess) => recess.label(),
        }
    }

    /// Ordinary periods covered by this slot. Empty for recesses.
    pub fn periods(self) -> &'static [TimeSlot] {
        match self {
            Slot::Period(slot) => match slot {
                TimeSlot::P1 => &[TimeSlot::P1],
                TimeSlot::P2 => &[TimeSlot::P2],
                TimeSlot::P3 => &[TimeSlot::P3],
                TimeSlot::P4 => &[TimeSlot::P4],
                TimeSlot::P5 => &[TimeSlot::P5],
                TimeSlot::P6 => &[TimeSlot::P6],
                TimeSlot::P7 => &[TimeSlot::P7],
            },
            Slot::Block(block) => block.slots(),
            Slot::Recess(_) => &[],
        }
    }

    /// Sort key by start time within a day.
    pub fn start_position(self) -> u8 {
        match self {
            Slot::Period(slot) => slot.position(),
            Slot::Block(block) => block.slots()[0].position(),
            Slot::Recess(recess) => recess.position(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum YearLevel {
    First,
    Second,
    Third,
    Final,
}

impl YearLevel {
    pub fn is_senior(self) -> bool {
        matches!(self, YearLevel::Final)
    }
}

/// Day selection policy. Only honoured for the senior year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayOptions {
    pub use_custom_days: bool,
    pub custom_days: Vec<Day>,
    pub four_day_week: bool,
}

/// Returns the ordered list of days a timetable covers.
///
/// Junior years always get the full week. For the senior year a custom
/// selection wins over the four-day flag; the custom list is returned in
/// calendar order with duplicates removed.
pub fn active_days(year: YearLevel, options: &DayOptions) -> Vec<Day> {
    if !year.is_senior() {
        return Day::ALL.to_vec();
    }
    if options.use_custom_days {
        return Day::ALL
            .into_iter()
            .filter(|day| options.custom_days.contains(day))
            .collect();
    }
    if options.four_day_week {
        return Day::ALL[..4].to_vec();
    }
    Day::ALL.to_vec()
}
