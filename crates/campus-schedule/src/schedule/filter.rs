use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::domain::{
    CourseEntry, DaySchedule, FacultySchedule, Semester, SemesterSchedule, StudyYear, Weekday,
};
use super::group::CohortSubgroup;
use super::query::{present, EntryFilter, QueryPlan, ScheduleCriteria, ScheduleQueryError};
use super::store::{ScheduleLoadError, ScheduleStore};

/// Course entries per weekday, borrowed from the store.
pub type DayView<'a> = BTreeMap<Weekday, Vec<&'a CourseEntry>>;
/// Day views per study year.
pub type YearView<'a> = BTreeMap<StudyYear, DayView<'a>>;
/// Year views per semester, keyed `"1"`/`"2"` when serialized.
pub type SemesterView<'a> = BTreeMap<Semester, YearView<'a>>;

/// Narrowed schedule returned by [`ScheduleQueryEngine::filter_schedule`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleSubtree<'a> {
    #[serde(rename = "sem1Schedule", skip_serializing_if = "Option::is_none")]
    pub first_semester: Option<YearView<'a>>,
    #[serde(rename = "sem2Schedule", skip_serializing_if = "Option::is_none")]
    pub second_semester: Option<YearView<'a>>,
}

impl<'a> ScheduleSubtree<'a> {
    pub fn semester(&self, semester: Semester) -> Option<&YearView<'a>> {
        match semester {
            Semester::First => self.first_semester.as_ref(),
            Semester::Second => self.second_semester.as_ref(),
        }
    }

    fn semester_mut(&mut self, semester: Semester) -> &mut Option<YearView<'a>> {
        match semester {
            Semester::First => &mut self.first_semester,
            Semester::Second => &mut self.second_semester,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &'a CourseEntry> + '_ {
        [&self.first_semester, &self.second_semester]
            .into_iter()
            .flatten()
            .flat_map(|years| years.values())
            .flat_map(|days| days.values())
            .flat_map(|entries| entries.iter().copied())
    }
}

/// Read-only query engine over the schedule store.
#[derive(Debug, Clone)]
pub struct ScheduleQueryEngine {
    store: Arc<ScheduleStore>,
    primary_faculty: String,
}

impl ScheduleQueryEngine {
    /// Build the engine over a loaded store. The primary faculty answers
    /// unscoped queries and the legacy routes, so it must exist in the store.
    pub fn new(
        store: Arc<ScheduleStore>,
        primary_faculty: impl Into<String>,
    ) -> Result<Self, ScheduleLoadError> {
        let primary_faculty = primary_faculty.into();
        if !store.contains(&primary_faculty) {
            return Err(ScheduleLoadError::UnknownPrimaryFaculty {
                code: primary_faculty,
            });
        }

        Ok(Self {
            store,
            primary_faculty,
        })
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    pub fn primary_faculty(&self) -> &str {
        &self.primary_faculty
    }

    /// Narrow the schedule by the given criteria. Filters are applied in the
    /// order faculty, semester, year, day, then entry predicates; only an
    /// unknown faculty or semester is an error.
    pub fn filter_schedule(
        &self,
        criteria: &ScheduleCriteria,
    ) -> Result<ScheduleSubtree<'_>, ScheduleQueryError> {
        let code = present(&criteria.faculty).unwrap_or(self.primary_faculty.as_str());
        let faculty = self.store.faculty(code).ok_or_else(|| {
            debug!(faculty = code, "rejected schedule query for unknown faculty");
            ScheduleQueryError::InvalidQuery
        })?;

        let plan = QueryPlan::from_criteria(criteria).inspect_err(|_| {
            debug!(semester = ?criteria.semester, "rejected schedule query for invalid semester");
        })?;

        let mut subtree = ScheduleSubtree::default();
        for semester in Semester::ordered() {
            if plan.includes_semester(semester) {
                *subtree.semester_mut(semester) =
                    Some(narrow_semester(faculty.semester(semester), &plan));
            }
        }

        Ok(subtree)
    }

    fn primary(&self) -> Result<&FacultySchedule, ScheduleQueryError> {
        self.store
            .faculty(&self.primary_faculty)
            .ok_or(ScheduleQueryError::InvalidQuery)
    }

    /// Primary faculty schedule restricted to the given comma-separated rooms.
    pub fn by_rooms(&self, rooms: Option<&str>) -> Result<SemesterView<'_>, ScheduleQueryError> {
        let faculty = self.primary()?;
        let filter = EntryFilter::rooms(rooms.map(str::trim).filter(|raw| !raw.is_empty()));

        Ok(Semester::ordered()
            .into_iter()
            .map(|semester| {
                let years: YearView<'_> = faculty
                    .semester(semester)
                    .years()
                    .map(|(year, days)| (year, narrow_days(days, None, &filter)))
                    .collect();
                (semester, years)
            })
            .collect())
    }

    /// One study year of the primary faculty across both semesters.
    pub fn by_year(
        &self,
        year: &str,
    ) -> Result<BTreeMap<Semester, DayView<'_>>, ScheduleQueryError> {
        let year = StudyYear::from_number(year).ok_or(ScheduleQueryError::InvalidYearNumber)?;
        let faculty = self.primary()?;
        let filter = EntryFilter::default();

        Ok(Semester::ordered()
            .into_iter()
            .map(|semester| {
                let days = faculty.semester(semester).year(year);
                (semester, narrow_days(days, None, &filter))
            })
            .collect())
    }

    pub fn by_year_and_semester(
        &self,
        year: &str,
        semester: &str,
    ) -> Result<DayView<'_>, ScheduleQueryError> {
        let days = self.year_branch(year, semester)?;
        Ok(narrow_days(days, None, &EntryFilter::default()))
    }

    /// Timetable of a single subgroup such as `E3`, including the lectures
    /// shared by its whole cohort.
    pub fn by_group(
        &self,
        year: &str,
        semester: &str,
        group: &str,
    ) -> Result<DayView<'_>, ScheduleQueryError> {
        let days = self.year_branch(year, semester)?;
        let group = CohortSubgroup::parse(group).ok_or(ScheduleQueryError::InvalidGroupName)?;
        let mut buf = [0u8; 4];
        let cohort: &str = group.cohort.encode_utf8(&mut buf);
        let filter = EntryFilter::cohort_subgroup(cohort, group.subgroup);

        Ok(narrow_days(days, None, &filter))
    }

    fn year_branch(&self, year: &str, semester: &str) -> Result<&DaySchedule, ScheduleQueryError> {
        let year = StudyYear::from_number(year).ok_or(ScheduleQueryError::InvalidYearNumber)?;
        let semester =
            Semester::from_number(semester).ok_or(ScheduleQueryError::InvalidSemesterNumber)?;
        Ok(self.primary()?.semester(semester).year(year))
    }
}

fn narrow_semester<'a>(semester: &'a SemesterSchedule, plan: &QueryPlan<'_>) -> YearView<'a> {
    semester
        .years()
        .filter(|(year, _)| plan.years.includes(*year))
        .map(|(year, days)| (year, narrow_days(days, Some(plan), &plan.entries)))
        .collect()
}

fn narrow_days<'a>(
    days: &'a DaySchedule,
    plan: Option<&QueryPlan<'_>>,
    filter: &EntryFilter<'_>,
) -> DayView<'a> {
    days.iter()
        .filter(|(day, _)| plan.map_or(true, |plan| plan.includes_day(**day)))
        .map(|(day, entries)| {
            let matching: Vec<_> = entries.iter().filter(|entry| filter.matches(entry)).collect();
            (*day, matching)
        })
        .collect()
}
