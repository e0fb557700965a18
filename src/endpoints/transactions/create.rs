use axum::{
    extract::{self, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{auth_middleware::LoggedInUser, error::ApiError, services, state::AppState};

#[derive(Deserialize, ToSchema)]
pub struct CreateTransactionInput {
    pub desc: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/transactions",
    operation_id = "transactions/create",
    request_body(
        content = CreateTransactionInput,
        content_type = "application/json",
    ),
    responses(
        (status = 201, body = ()),
        (status = 401)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    user: LoggedInUser,
    extract::Json(payload): extract::Json<CreateTransactionInput>,
) -> Result<impl IntoResponse, ApiError> {
    services::transactions::create(&state.data, &user.id, &payload).await?;

    return Ok(StatusCode::CREATED);
}
