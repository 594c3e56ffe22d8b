//! # Eligibility Gate
//!
//! Decides whether an applicant may enroll in the loan program, given the
//! identity code and the gender they declared.
//!
//! ## Evaluation Order
//!
//! 1. The identity code must parse as a NIC ([`Rejection::InvalidIdentityFormat`]).
//! 2. The declared gender must match the NIC-derived sex
//!    ([`Rejection::SexMismatch`]).
//! 3. The derived sex must be the one the program enrolls
//!    ([`Rejection::PolicyIneligible`]).
//!
//! An applicant whose declaration contradicts their NIC hears about the
//! mismatch, not about the policy.

use serde::Serialize;
use thiserror::Error;

use crate::error::NicError;
use crate::nic::Nic;
use crate::sex::{derive_sex, DeclaredGender, Sex};

/// An applicant that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accepted {
    /// The NIC-derived (and declared) sex.
    pub sex: Sex,
    /// The parsed identity code.
    pub nic: Nic,
}

/// Why the gate turned an applicant away.
///
/// Display strings are the user-facing messages shown by the onboarding
/// form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The identity code is not a NIC number.
    #[error("Invalid Sri Lankan NIC format")]
    InvalidIdentityFormat(#[from] NicError),

    /// The declared gender contradicts the NIC.
    #[error("Gender mismatch. NIC indicates gender is {derived}, but you provided {declared}")]
    SexMismatch {
        /// Sex encoded in the NIC.
        derived: Sex,
        /// Gender the applicant declared.
        declared: DeclaredGender,
    },

    /// Well-formed and consistent, but the program does not enroll this sex.
    #[error("Only {} customers are eligible for loans in this program", .eligible.adjective())]
    PolicyIneligible {
        /// Sex encoded in the NIC.
        derived: Sex,
        /// The sex the program enrolls.
        eligible: Sex,
    },
}

/// Discriminant of a [`Rejection`], for branching without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// See [`Rejection::InvalidIdentityFormat`].
    InvalidIdentityFormat,
    /// See [`Rejection::SexMismatch`].
    SexMismatch,
    /// See [`Rejection::PolicyIneligible`].
    PolicyIneligible,
}

impl RejectionKind {
    /// Snake-case label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidIdentityFormat => "invalid_identity_format",
            Self::SexMismatch => "sex_mismatch",
            Self::PolicyIneligible => "policy_ineligible",
        }
    }

    /// HTTP status an onboarding endpoint should answer with.
    ///
    /// Format and mismatch failures are unprocessable input (422); a policy
    /// refusal is a denied request (403).
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidIdentityFormat | Self::SexMismatch => 422,
            Self::PolicyIneligible => 403,
        }
    }
}

impl Rejection {
    /// The kind of this rejection.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::InvalidIdentityFormat(_) => RejectionKind::InvalidIdentityFormat,
            Self::SexMismatch { .. } => RejectionKind::SexMismatch,
            Self::PolicyIneligible { .. } => RejectionKind::PolicyIneligible,
        }
    }
}

/// Program policy: which NIC-derived sex may enroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityPolicy {
    eligible_sex: Sex,
}

impl EligibilityPolicy {
    /// Policy enrolling only applicants of `eligible_sex`.
    pub fn new(eligible_sex: Sex) -> Self {
        Self { eligible_sex }
    }

    /// The sex this policy enrolls.
    pub fn eligible_sex(&self) -> Sex {
        self.eligible_sex
    }

    /// Run the gate for one applicant.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`Rejection`], in the order
    /// format, mismatch, policy.
    pub fn evaluate(
        &self,
        identity_code: &str,
        declared: DeclaredGender,
    ) -> Result<Accepted, Rejection> {
        let decision = self.decide(identity_code, declared);
        match &decision {
            Ok(accepted) => {
                tracing::debug!(format = %accepted.nic.format(), sex = %accepted.sex, "applicant accepted");
            }
            Err(rejection) => {
                tracing::debug!(kind = rejection.kind().as_str(), %declared, "applicant rejected");
            }
        }
        decision
    }

    fn decide(&self, identity_code: &str, declared: DeclaredGender) -> Result<Accepted, Rejection> {
        let nic = Nic::parse(identity_code)?;
        let derived = derive_sex(&nic);

        if declared.as_sex() != Some(derived) {
            return Err(Rejection::SexMismatch { derived, declared });
        }

        if derived != self.eligible_sex {
            return Err(Rejection::PolicyIneligible {
                derived,
                eligible: self.eligible_sex,
            });
        }

        Ok(Accepted { sex: derived, nic })
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self::new(Sex::Female)
    }
}

/// Run the gate under the default (female-only) program policy.
///
/// # Errors
///
/// See [`EligibilityPolicy::evaluate`].
pub fn check_eligibility(identity_code: &str, declared: Sex) -> Result<Accepted, Rejection> {
    EligibilityPolicy::default().evaluate(identity_code, declared.into())
}
