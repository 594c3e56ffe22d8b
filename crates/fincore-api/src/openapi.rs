//! # OpenAPI Document Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the onboarding API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fincore Onboarding API",
        version = "0.1.0",
        description = "Customer onboarding for the Fincore loan program: Sri Lankan NIC validation, NIC-derived sex checks and gated enrollment.",
        license(name = "BUSL-1.1")
    ),
    paths(
        crate::routes::customers::check_eligibility,
        crate::routes::customers::create_customer,
        crate::routes::customers::get_customer,
    ),
    components(schemas(
        crate::state::CustomerRecord,
        crate::routes::customers::EligibilityRequest,
        crate::routes::customers::EligibilityResponse,
        crate::routes::customers::CreateCustomerRequest,
        crate::routes::customers::PersonalDetails,
        crate::routes::customers::AddressDetails,
        crate::routes::customers::ProductDetails,
        crate::routes::customers::BusinessDetails,
        crate::routes::customers::CivilStatus,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "customers", description = "Customer eligibility and enrollment"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
