//! eduquery-assessments
//!
//! The assessment editor model and its persistence seam: draft editing with
//! dense question ordering, settings merging, validation, versioned saves,
//! and submission statistics.

pub mod editor;
pub mod error;
pub mod service;
pub mod stats;
