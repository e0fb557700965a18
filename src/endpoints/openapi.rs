use crate::endpoints;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(
    endpoints::auth::init,
    endpoints::auth::callback,
    endpoints::me::get_me,
    endpoints::transactions::query::query,
    endpoints::transactions::create::create,
    endpoints::transactions::chart::chart,
    endpoints::transactions::overview::overview,
    endpoints::insights::get_insights,
))]
struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
