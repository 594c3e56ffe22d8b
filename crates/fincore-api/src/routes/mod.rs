//! # API Route Modules
//!
//! - `customers`: eligibility pre-checks, gated enrollment and record lookup.

pub mod customers;
