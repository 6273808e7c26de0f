//! eduquery-core
//!
//! Pure domain types shared across the EduQuery client core: users and roles,
//! the assessment/question vocabulary, typed patch structures, and the
//! notification channel trait. No store dependency — this is the shared
//! vocabulary of the system.

pub mod error;
pub mod models;
pub mod notify;
