use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use super::filter::ScheduleQueryEngine;
use super::query::{append_list, ScheduleCriteria, ScheduleQueryError};
use crate::envelope::MessageEnvelope;

/// Success payload shared by every schedule endpoint.
#[derive(Debug, Serialize)]
pub struct ScheduleEnvelope<T> {
    pub success: bool,
    pub schedule: T,
}

impl<T: Serialize> ScheduleEnvelope<T> {
    pub fn ok(schedule: T) -> Response {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                schedule,
            }),
        )
            .into_response()
    }
}

impl ScheduleQueryError {
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::InvalidQuery | Self::InvalidSemester => StatusCode::BAD_REQUEST,
            Self::InvalidYearNumber | Self::InvalidSemesterNumber | Self::InvalidGroupName => {
                StatusCode::NOT_FOUND
            }
        }
    }
}

impl IntoResponse for ScheduleQueryError {
    fn into_response(self) -> Response {
        let body = Json(MessageEnvelope::failure(self.to_string()));
        (self.status_code(), body).into_response()
    }
}

/// Raw query-string pairs. Repeated keys are kept so handlers can merge them.
type QueryPairs = Vec<(String, String)>;

fn query_pairs(query: Result<Query<QueryPairs>, QueryRejection>) -> Result<QueryPairs, Response> {
    query.map(|Query(pairs)| pairs).map_err(|rejection| {
        debug!(error = %rejection, "rejected malformed schedule query string");
        ScheduleQueryError::InvalidQuery.into_response()
    })
}

/// Router exposing the filtered schedule and the legacy path-based lookups.
pub fn schedule_router(engine: Arc<ScheduleQueryEngine>) -> Router {
    Router::new()
        .route("/schedule", get(filter_handler))
        .route("/schedule/rooms", get(rooms_handler))
        .route("/schedule/year/:year", get(year_handler))
        .route(
            "/schedule/year/:year/semester/:semester",
            get(year_semester_handler),
        )
        .route(
            "/schedule/year/:year/semester/:semester/group/:group",
            get(group_handler),
        )
        .with_state(engine)
}

pub(crate) async fn filter_handler(
    State(engine): State<Arc<ScheduleQueryEngine>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Response {
    let criteria = match query_pairs(query) {
        Ok(pairs) => ScheduleCriteria::from_pairs(pairs),
        Err(response) => return response,
    };

    match engine.filter_schedule(&criteria) {
        Ok(subtree) => ScheduleEnvelope::ok(subtree),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn rooms_handler(
    State(engine): State<Arc<ScheduleQueryEngine>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Response {
    let pairs = match query_pairs(query) {
        Ok(pairs) => pairs,
        Err(response) => return response,
    };
    let mut rooms = None;
    for (key, value) in pairs {
        if key == "r" {
            append_list(&mut rooms, value);
        }
    }

    match engine.by_rooms(rooms.as_deref()) {
        Ok(schedule) => ScheduleEnvelope::ok(schedule),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn year_handler(
    State(engine): State<Arc<ScheduleQueryEngine>>,
    Path(year): Path<String>,
) -> Response {
    match engine.by_year(&year) {
        Ok(schedule) => ScheduleEnvelope::ok(schedule),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn year_semester_handler(
    State(engine): State<Arc<ScheduleQueryEngine>>,
    Path((year, semester)): Path<(String, String)>,
) -> Response {
    match engine.by_year_and_semester(&year, &semester) {
        Ok(schedule) => ScheduleEnvelope::ok(schedule),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn group_handler(
    State(engine): State<Arc<ScheduleQueryEngine>>,
    Path((year, semester, group)): Path<(String, String, String)>,
) -> Response {
    match engine.by_group(&year, &semester, &group) {
        Ok(schedule) => ScheduleEnvelope::ok(schedule),
        Err(err) => err.into_response(),
    }
}
