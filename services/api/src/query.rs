use campus_schedule::config::AppConfig;
use campus_schedule::envelope::MessageEnvelope;
use campus_schedule::error::AppError;
use campus_schedule::schedule::{
    ScheduleCriteria, ScheduleEnvelope, ScheduleQueryEngine, ScheduleStore,
};
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct QueryArgs {
    /// Schedule document to query (defaults to SCHEDULE_DATA_PATH)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Faculty short code (defaults to SCHEDULE_PRIMARY_FACULTY)
    #[arg(long)]
    pub(crate) faculty: Option<String>,
    /// Semester number, 1 or 2
    #[arg(long)]
    pub(crate) semester: Option<String>,
    /// Study year number, 1 to 3
    #[arg(long)]
    pub(crate) year: Option<String>,
    /// Comma separated day numbers, 1 is Monday
    #[arg(long)]
    pub(crate) day: Option<String>,
    /// Comma separated room identifiers
    #[arg(long)]
    pub(crate) room: Option<String>,
    /// Half-year letter, e.g. E
    #[arg(long)]
    pub(crate) semiyear: Option<String>,
    /// Subgroup number within the half-year
    #[arg(long)]
    pub(crate) group: Option<String>,
}

impl QueryArgs {
    pub(crate) fn criteria(&self) -> ScheduleCriteria {
        ScheduleCriteria {
            faculty: self.faculty.clone(),
            semester: self.semester.clone(),
            year: self.year.clone(),
            day: self.day.clone(),
            room: self.room.clone(),
            semiyear: self.semiyear.clone(),
            group: self.group.clone(),
        }
    }
}

pub(crate) fn run_query(args: QueryArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let data_path = args
        .data
        .clone()
        .unwrap_or_else(|| config.schedule.data_path.clone());

    let store = Arc::new(ScheduleStore::from_path(&data_path)?);
    let engine = ScheduleQueryEngine::new(store, config.schedule.primary_faculty)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    render_query(&engine, &args.criteria(), &mut handle)
}

pub(crate) fn render_query<W: Write>(
    engine: &ScheduleQueryEngine,
    criteria: &ScheduleCriteria,
    out: &mut W,
) -> Result<(), AppError> {
    match engine.filter_schedule(criteria) {
        Ok(schedule) => {
            let envelope = ScheduleEnvelope {
                success: true,
                schedule,
            };
            serde_json::to_writer_pretty(&mut *out, &envelope)?;
            writeln!(out)?;
            Ok(())
        }
        Err(err) => {
            serde_json::to_writer_pretty(&mut *out, &MessageEnvelope::failure(err.to_string()))?;
            writeln!(out)?;
            Err(err.into())
        }
    }
}
