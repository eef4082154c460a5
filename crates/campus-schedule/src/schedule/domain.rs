use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::group::{GroupAssignment, GroupCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Semester {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
}

impl Semester {
    pub const fn ordered() -> [Self; 2] {
        [Self::First, Self::Second]
    }

    pub fn from_number(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::First),
            "2" => Some(Self::Second),
            _ => None,
        }
    }

    /// Response key used when semester branches are returned side by side.
    pub const fn response_key(self) -> &'static str {
        match self {
            Self::First => "sem1Schedule",
            Self::Second => "sem2Schedule",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StudyYear {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "3")]
    Third,
}

impl StudyYear {
    pub const fn ordered() -> [Self; 3] {
        [Self::First, Self::Second, Self::Third]
    }

    pub fn from_number(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::First),
            "2" => Some(Self::Second),
            "3" => Some(Self::Third),
            _ => None,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }
}

/// Teaching days as they are keyed in the schedule source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Luni,
    Marti,
    Miercuri,
    Joi,
    Vineri,
}

impl Weekday {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Luni,
            Self::Marti,
            Self::Miercuri,
            Self::Joi,
            Self::Vineri,
        ]
    }

    /// Maps the 1-based day number used by clients (1 = Monday).
    pub fn from_number(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::Luni),
            "2" => Some(Self::Marti),
            "3" => Some(Self::Miercuri),
            "4" => Some(Self::Joi),
            "5" => Some(Self::Vineri),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Luni => "Luni",
            Self::Marti => "Marti",
            Self::Miercuri => "Miercuri",
            Self::Joi => "Joi",
            Self::Vineri => "Vineri",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseKind {
    #[serde(rename = "Curs")]
    Lecture,
    Seminar,
    #[serde(rename = "Laborator")]
    Laboratory,
}

impl CourseKind {
    pub const fn is_lecture(self) -> bool {
        matches!(self, Self::Lecture)
    }
}

/// One timetable slot. Descriptive columns (subject, hours, instructor) are kept
/// verbatim in `details` and are never inspected by the filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEntry {
    #[serde(rename = "Grupa")]
    pub group: GroupAssignment,
    #[serde(rename = "Sala")]
    pub room: String,
    #[serde(rename = "Tip")]
    pub kind: CourseKind,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl CourseEntry {
    pub fn codes(&self) -> &[GroupCode] {
        self.group.codes()
    }
}

pub type DaySchedule = BTreeMap<Weekday, Vec<CourseEntry>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SemesterSchedule {
    #[serde(rename = "1")]
    pub first_year: DaySchedule,
    #[serde(rename = "2")]
    pub second_year: DaySchedule,
    #[serde(rename = "3")]
    pub third_year: DaySchedule,
}

impl SemesterSchedule {
    pub fn year(&self, year: StudyYear) -> &DaySchedule {
        match year {
            StudyYear::First => &self.first_year,
            StudyYear::Second => &self.second_year,
            StudyYear::Third => &self.third_year,
        }
    }

    pub fn years(&self) -> impl Iterator<Item = (StudyYear, &DaySchedule)> + '_ {
        StudyYear::ordered()
            .into_iter()
            .map(move |year| (year, self.year(year)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacultySchedule {
    #[serde(rename = "1")]
    pub first_semester: SemesterSchedule,
    #[serde(rename = "2")]
    pub second_semester: SemesterSchedule,
}

impl FacultySchedule {
    pub fn semester(&self, semester: Semester) -> &SemesterSchedule {
        match semester {
            Semester::First => &self.first_semester,
            Semester::Second => &self.second_semester,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &CourseEntry> + '_ {
        Semester::ordered().into_iter().flat_map(move |semester| {
            self.semester(semester)
                .years()
                .flat_map(|(_, days)| days.values().flatten())
        })
    }
}

/// Whole dataset keyed by faculty short code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleDocument {
    pub faculties: BTreeMap<String, FacultySchedule>,
}
