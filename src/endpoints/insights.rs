use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth_middleware::LoggedInUser,
    error::ApiError,
    services::{self, summary},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct Output {
    pub total: f64,
    pub avg: f64,
    /// The raw model completion the sections were extracted from.
    pub message: String,
    pub insights: Vec<String>,
    pub predictions: Vec<String>,
    pub motivational: String,
}

#[utoipa::path(
    get,
    path = "/insights",
    operation_id = "insights",
    responses(
        (status = 200, body = Output),
        (status = 401)
    )
)]
pub async fn get_insights(
    State(state): State<AppState>,
    user: LoggedInUser,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = services::transactions::list(&state.data, &user.id).await?;

    let ledger = services::insights::summarize(&state.config, &transactions).await;
    let sections = summary::sectionize(&ledger.message);

    return Ok(Json(Output {
        total: ledger.total,
        avg: ledger.avg,
        message: ledger.message,
        insights: summary::insight_lines(&sections.insights),
        predictions: summary::prediction_lines(&sections.predictions),
        motivational: sections.motivational,
    }));
}
