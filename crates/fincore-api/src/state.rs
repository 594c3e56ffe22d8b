//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! AppState holds the onboarding service's concerns:
//! - **Customers**: enrolled applicants, keyed by record id.
//! - **Policy**: which NIC-derived sex the loan program enrolls.
//! - **Metrics**: Prometheus registry shared with the middleware.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fincore_core::{EligibilityPolicy, Nic, NicFormat, Sex, ValidationError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::middleware::metrics::ApiMetrics;
use crate::routes::customers::{AddressDetails, BusinessDetails, PersonalDetails, ProductDetails};

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not `tokio::sync`)
/// because we never hold the lock across `.await` points.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record unless an existing one matches `conflicts`.
    ///
    /// The scan and the insert run under a single write lock, so two
    /// concurrent requests cannot both pass the check. Returns the
    /// conflicting record on failure.
    pub fn insert_unless(
        &self,
        id: Uuid,
        value: T,
        conflicts: impl Fn(&T) -> bool,
    ) -> Result<(), T> {
        let mut guard = self.data.write();
        if let Some(existing) = guard.values().find(|v| conflicts(v)) {
            return Err(existing.clone());
        }
        guard.insert(id, value);
        Ok(())
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a read lock can be taken right now without blocking.
    pub fn is_accessible(&self) -> bool {
        self.data.try_read().is_some()
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Record Types -------------------------------------------------------------

/// An applicant that passed the eligibility gate and was enrolled.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerRecord {
    pub id: Uuid,
    /// Canonical NIC (trimmed, uppercase check letter). Unique per registry.
    #[schema(value_type = String, example = "856234567V")]
    pub customer_code: Nic,
    #[schema(value_type = String, example = "old")]
    pub nic_format: NicFormat,
    /// Sex derived from the NIC; always the program's eligible sex.
    #[schema(value_type = String, example = "Female")]
    pub sex: Sex,
    pub personal: PersonalDetails,
    pub address: AddressDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessDetails>,
    pub created_at: DateTime<Utc>,
}

// -- Configuration ------------------------------------------------------------

/// Error building [`AppConfig`] from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A port variable was set but is not a valid TCP port.
    #[error("invalid port in {var}: {value:?}")]
    InvalidPort { var: &'static str, value: String },

    /// The metrics toggle was set to something other than true/false.
    #[error("invalid boolean in {var}: {value:?}")]
    InvalidBool { var: &'static str, value: String },

    /// The eligible sex was not Male or Female.
    #[error("invalid eligible sex: {0}")]
    InvalidEligibleSex(#[from] ValidationError),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Whether `/metrics` and the metrics middleware are mounted.
    pub metrics_enabled: bool,
    /// The sex the loan program enrolls.
    pub eligible_sex: Sex,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_enabled: true,
            eligible_sex: Sex::Female,
        }
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `FINCORE_PORT` (fallback `PORT`) | `8080` |
    /// | `FINCORE_METRICS_ENABLED` | `true` |
    /// | `FINCORE_ELIGIBLE_SEX` | `Female` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match ["FINCORE_PORT", "PORT"]
            .into_iter()
            .find_map(|var| lookup(var).map(|value| (var, value)))
        {
            Some((var, value)) => {
                value
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort {
                        var,
                        value: value.clone(),
                    })?
            }
            None => defaults.port,
        };

        let metrics_enabled = match lookup("FINCORE_METRICS_ENABLED") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidBool {
                        var: "FINCORE_METRICS_ENABLED",
                        value,
                    })
                }
            },
            None => defaults.metrics_enabled,
        };

        let eligible_sex = match lookup("FINCORE_ELIGIBLE_SEX") {
            Some(value) => value.parse::<Sex>()?,
            None => defaults.eligible_sex,
        };

        Ok(Self {
            port,
            metrics_enabled,
            eligible_sex,
        })
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub customers: Store<CustomerRecord>,
    pub config: AppConfig,
    pub policy: EligibilityPolicy,
    pub metrics: ApiMetrics,
}

impl AppState {
    /// Create state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create state with a specific configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            customers: Store::new(),
            policy: EligibilityPolicy::new(config.eligible_sex),
            config,
            metrics: ApiMetrics::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
