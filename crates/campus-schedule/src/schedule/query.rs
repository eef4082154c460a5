use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};

use super::domain::{CourseEntry, Semester, StudyYear, Weekday};

/// Raw query parameters of `GET /schedule`. Every field is optional and a
/// blank value is treated the same as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScheduleCriteria {
    #[serde(default)]
    pub faculty: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub semiyear: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleQueryError {
    #[error("Invalid query")]
    InvalidQuery,
    #[error("Invalid semester")]
    InvalidSemester,
    #[error("Invalid year number")]
    InvalidYearNumber,
    #[error("Invalid semester number")]
    InvalidSemesterNumber,
    #[error("Invalid group name")]
    InvalidGroupName,
}

impl ScheduleCriteria {
    /// Build criteria from raw query-string pairs. Repeated `day` and `room`
    /// keys are merged into one comma-separated list; for the other keys the
    /// first non-blank value wins. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            let slot = match key.as_ref() {
                "faculty" => &mut criteria.faculty,
                "semester" => &mut criteria.semester,
                "year" => &mut criteria.year,
                "semiyear" => &mut criteria.semiyear,
                "group" => &mut criteria.group,
                "day" => {
                    append_list(&mut criteria.day, value);
                    continue;
                }
                "room" => {
                    append_list(&mut criteria.room, value);
                    continue;
                }
                _ => continue,
            };
            if present(slot).is_none() {
                *slot = Some(value);
            }
        }
        criteria
    }
}

pub(crate) fn append_list(slot: &mut Option<String>, value: String) {
    match slot {
        Some(list) if !list.trim().is_empty() => {
            if !value.trim().is_empty() {
                list.push(',');
                list.push_str(&value);
            }
        }
        _ => *slot = Some(value),
    }
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|token| !token.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum YearSelection {
    All,
    One(StudyYear),
    /// A year outside 1..=3 was requested; every year branch is dropped.
    Nothing,
}

impl YearSelection {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Self::All,
            Some(raw) => StudyYear::from_number(raw).map_or(Self::Nothing, Self::One),
        }
    }

    pub(crate) fn includes(self, year: StudyYear) -> bool {
        match self {
            Self::All => true,
            Self::One(selected) => selected == year,
            Self::Nothing => false,
        }
    }
}

/// Weekday restriction. Unknown day numbers are dropped; when nothing
/// resolves the axis stays unrestricted.
pub(crate) fn parse_days(raw: Option<&str>) -> Option<BTreeSet<Weekday>> {
    let days: BTreeSet<Weekday> = split_list(raw?).filter_map(Weekday::from_number).collect();
    (!days.is_empty()).then_some(days)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubgroupFilter {
    Number(u16),
    /// A non-numeric subgroup; only lectures can still match.
    Unmatchable,
}

/// Entry-level predicates, combined with logical AND.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryFilter<'q> {
    rooms: Option<HashSet<&'q str>>,
    semiyear: Option<&'q str>,
    subgroup: Option<SubgroupFilter>,
}

impl<'q> EntryFilter<'q> {
    pub(crate) fn from_criteria(criteria: &'q ScheduleCriteria) -> Self {
        let semiyear = present(&criteria.semiyear);
        let subgroup = semiyear
            .and(present(&criteria.group))
            .map(|raw| match raw.parse::<u16>() {
                Ok(number) => SubgroupFilter::Number(number),
                Err(_) => SubgroupFilter::Unmatchable,
            });

        Self {
            rooms: present(&criteria.room).map(|raw| split_list(raw).collect()),
            semiyear,
            subgroup,
        }
    }

    pub(crate) fn rooms(raw: Option<&'q str>) -> Self {
        Self {
            rooms: raw.map(|raw| split_list(raw).collect()),
            ..Self::default()
        }
    }

    pub(crate) fn cohort_subgroup(cohort: &'q str, subgroup: u16) -> Self {
        Self {
            semiyear: Some(cohort),
            subgroup: Some(SubgroupFilter::Number(subgroup)),
            ..Self::default()
        }
    }

    pub(crate) fn matches(&self, entry: &CourseEntry) -> bool {
        if let Some(rooms) = &self.rooms {
            if !rooms.contains(entry.room.as_str()) {
                return false;
            }
        }

        let Some(semiyear) = self.semiyear else {
            return true;
        };
        if !entry.group.contains(semiyear) {
            return false;
        }

        match self.subgroup {
            None => true,
            Some(filter) => {
                let cohort = single_letter(semiyear);
                if entry.kind.is_lecture() {
                    cohort.is_some_and(|c| entry.codes().iter().any(|code| code.is_in_cohort(c)))
                } else {
                    match (cohort, filter) {
                        (Some(c), SubgroupFilter::Number(n)) => {
                            entry.codes().iter().any(|code| code.is_subgroup(c, n))
                        }
                        _ => false,
                    }
                }
            }
        }
    }
}

fn single_letter(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

/// Validated form of [`ScheduleCriteria`] minus the faculty lookup.
#[derive(Debug, Clone)]
pub(crate) struct QueryPlan<'q> {
    pub(crate) semester: Option<Semester>,
    pub(crate) years: YearSelection,
    pub(crate) days: Option<BTreeSet<Weekday>>,
    pub(crate) entries: EntryFilter<'q>,
}

impl<'q> QueryPlan<'q> {
    pub(crate) fn from_criteria(criteria: &'q ScheduleCriteria) -> Result<Self, ScheduleQueryError> {
        let semester = match present(&criteria.semester) {
            None => None,
            Some(raw) => Some(Semester::from_number(raw).ok_or(ScheduleQueryError::InvalidSemester)?),
        };

        Ok(Self {
            semester,
            years: YearSelection::parse(present(&criteria.year)),
            days: parse_days(present(&criteria.day)),
            entries: EntryFilter::from_criteria(criteria),
        })
    }

    pub(crate) fn includes_semester(&self, semester: Semester) -> bool {
        self.semester.map_or(true, |selected| selected == semester)
    }

    pub(crate) fn includes_day(&self, day: Weekday) -> bool {
        self.days.as_ref().map_or(true, |days| days.contains(&day))
    }
}
