//! Exploratory analysis of ANAC flight records: CSV loading, derived
//! columns (route, vacation period, delays, justifications, distance) and
//! grouped summaries.

pub mod aggregate;
pub mod catalog;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod output;
pub mod reference;
pub mod reports;
pub mod rules;
pub mod types;
pub mod util;

pub use aggregate::{group_by, AggSpec, Aggregation, SummaryTable, Value};
pub use dataset::FlightDataset;
pub use error::{AnalysisError, LoadError, RuleError};
pub use types::{DelayFlag, FlightRecord, FlightStatus, VacationPeriod};
