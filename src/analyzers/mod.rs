//! Score aggregation and severity classification.
//!
//! Turns a scored, filtered audit table into per-stage means, stage
//! leaders, an area ranking and the report cards, and classifies averages
//! into traffic-light severities.

pub mod aggregate;
pub mod grade;
pub mod types;
pub mod utility;
