//! # Customer Onboarding Routes
//!
//! Eligibility pre-checks and gated enrollment for the loan program.
//!
//! Every write runs the same pipeline:
//!
//! 1. Deserialize and validate the form fields ([`Validate`]).
//! 2. Run the eligibility gate on `customer_code` and `gender`.
//! 3. Reject a NIC that is already enrolled (compared canonically).
//! 4. Store the record and return it.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use fincore_core::{Accepted, DeclaredGender, NicFormat, Rejection, Sex};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_max_len, require_non_empty, Validate};
use crate::state::{AppState, CustomerRecord};

const MAX_FIELD_LEN: usize = 255;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/customers", post(create_customer))
        .route("/v1/customers/eligibility", post(check_eligibility))
        .route("/v1/customers/:id", get(get_customer))
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Marital status options offered by the onboarding form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CivilStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

/// Request to pre-check an applicant without enrolling them.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EligibilityRequest {
    /// NIC number, old (`856234567V`) or new (`198523445678`) format.
    pub customer_code: String,
    /// Declared gender: `Male`, `Female` or `Other`.
    #[schema(value_type = String, example = "Female")]
    pub gender: DeclaredGender,
}

/// Positive eligibility result. Rejections are returned as error bodies.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EligibilityResponse {
    pub eligible: bool,
    #[schema(value_type = String, example = "Female")]
    pub sex: Sex,
    /// Canonical NIC.
    pub nic: String,
    #[schema(value_type = String, example = "old")]
    pub nic_format: NicFormat,
}

impl From<Accepted> for EligibilityResponse {
    fn from(accepted: Accepted) -> Self {
        Self {
            eligible: true,
            sex: accepted.sex,
            nic_format: accepted.nic.format(),
            nic: accepted.nic.canonical(),
        }
    }
}

/// Applicant identity and contact details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonalDetails {
    pub title: String,
    pub full_name: String,
    pub initials: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String, format = Date, example = "1985-12-14")]
    pub date_of_birth: NaiveDate,
    pub civil_status: CivilStatus,
    pub religion: String,
    pub mobile_no_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_no_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccl_mobile_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub health_info: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_members_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_profile_image: Option<String>,
    /// Decimal string with at most two fraction digits, e.g. `"45000.50"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<String>,
}

/// Residential address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressDetails {
    pub address_type: String,
    pub address_line_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_3: Option<String>,
    pub country: String,
    pub province: String,
    pub district: String,
    pub city: String,
    pub gs_division: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_address: Option<bool>,
}

/// Loan product placement. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcsu_csu_code: Option<String>,
}

/// The applicant's business, if any. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BusinessDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handled_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_of_employees: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_reputation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_sector: Option<String>,
}

/// Full onboarding form, submitted as one flat JSON object.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    /// Identity document type, e.g. `"NIC"`.
    pub code_type: String,
    /// NIC number. Must be eligible and not already enrolled.
    pub customer_code: String,
    #[schema(value_type = String, example = "Female")]
    pub gender: DeclaredGender,
    #[serde(flatten)]
    pub personal: PersonalDetails,
    #[serde(flatten)]
    pub address: AddressDetails,
    #[serde(flatten)]
    pub product: ProductDetails,
    #[serde(flatten)]
    pub business: BusinessDetails,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a non-negative decimal with at most two fraction digits.
fn validate_amount(field: &str, value: &str) -> Result<(), String> {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    let digits_ok = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let fraction_ok = match fraction {
        Some(f) => digits_ok(f) && f.len() <= 2,
        None => true,
    };
    if !digits_ok(whole) || !fraction_ok {
        return Err(format!(
            "{field} must be a non-negative amount with at most two decimal places"
        ));
    }
    Ok(())
}

impl Validate for EligibilityRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("customer_code", &self.customer_code)
    }
}

impl Validate for CreateCustomerRequest {
    fn validate(&self) -> Result<(), String> {
        let p = &self.personal;
        let a = &self.address;
        for (field, value) in [
            ("code_type", self.code_type.as_str()),
            ("customer_code", self.customer_code.as_str()),
            ("title", p.title.as_str()),
            ("full_name", p.full_name.as_str()),
            ("initials", p.initials.as_str()),
            ("first_name", p.first_name.as_str()),
            ("last_name", p.last_name.as_str()),
            ("religion", p.religion.as_str()),
            ("mobile_no_1", p.mobile_no_1.as_str()),
            ("address_type", a.address_type.as_str()),
            ("address_line_1", a.address_line_1.as_str()),
            ("country", a.country.as_str()),
            ("province", a.province.as_str()),
            ("district", a.district.as_str()),
            ("city", a.city.as_str()),
            ("gs_division", a.gs_division.as_str()),
        ] {
            require_non_empty(field, value)?;
            require_max_len(field, value, MAX_FIELD_LEN)?;
        }

        if let Some(ref income) = p.monthly_income {
            validate_amount("monthly_income", income.trim())?;
        }
        if let Some(ref email) = self.business.business_email {
            let valid = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
                .unwrap_or(false);
            if !valid {
                return Err("business_email must be a valid email address".into());
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Run the gate and count the outcome.
fn evaluate(state: &AppState, code: &str, gender: DeclaredGender) -> Result<Accepted, Rejection> {
    let decision = state.policy.evaluate(code, gender);
    state.metrics.record_decision(&decision);
    decision
}

/// POST /v1/customers/eligibility: Check an applicant without enrolling.
#[utoipa::path(
    post,
    path = "/v1/customers/eligibility",
    request_body = EligibilityRequest,
    responses(
        (status = 200, description = "Applicant is eligible", body = EligibilityResponse),
        (status = 403, description = "Applicant's sex is not enrolled by the program", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid NIC, gender mismatch or malformed body", body = crate::error::ErrorBody),
    ),
    tag = "customers"
)]
pub async fn check_eligibility(
    State(state): State<AppState>,
    body: Result<Json<EligibilityRequest>, JsonRejection>,
) -> Result<Json<EligibilityResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let accepted = evaluate(&state, &req.customer_code, req.gender)?;
    Ok(Json(accepted.into()))
}

/// POST /v1/customers: Enroll an eligible applicant.
#[utoipa::path(
    post,
    path = "/v1/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer enrolled", body = CustomerRecord),
        (status = 403, description = "Applicant's sex is not enrolled by the program", body = crate::error::ErrorBody),
        (status = 409, description = "NIC already enrolled", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid field, invalid NIC or gender mismatch", body = crate::error::ErrorBody),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    body: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerRecord>), AppError> {
    let req = extract_validated_json(body)?;
    let Accepted { sex, nic } = evaluate(&state, &req.customer_code, req.gender)?;

    let record = CustomerRecord {
        id: Uuid::new_v4(),
        nic_format: nic.format(),
        customer_code: nic,
        sex,
        personal: req.personal,
        address: req.address,
        product: Some(req.product).filter(|p| *p != ProductDetails::default()),
        business: Some(req.business).filter(|b| *b != BusinessDetails::default()),
        created_at: Utc::now(),
    };

    let id = record.id;
    let format = record.nic_format;
    state
        .customers
        .insert_unless(id, record.clone(), |existing| {
            existing.customer_code == record.customer_code
        })
        .map_err(|existing| {
            tracing::info!(existing_id = %existing.id, "duplicate NIC rejected");
            AppError::Conflict("a customer with this NIC is already enrolled".to_string())
        })?;

    tracing::info!(customer_id = %id, nic_format = %format, "customer enrolled");
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/customers/:id: Fetch an enrolled customer.
#[utoipa::path(
    get,
    path = "/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer record ID")),
    responses(
        (status = 200, description = "Customer found", body = CustomerRecord),
        (status = 404, description = "Customer not found", body = crate::error::ErrorBody),
        (status = 422, description = "Malformed customer ID", body = crate::error::ErrorBody),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CustomerRecord>, AppError> {
    let Path(id) =
        id.map_err(|e| AppError::BadRequest(format!("invalid customer id: {}", e.body_text())))?;
    state
        .customers
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("customer {id} not found")))
}
