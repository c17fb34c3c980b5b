//! Database repositories
//!
//! Provides the data access layer. Repositories are thin: every method is a
//! single SQL statement returning `sqlx::Result`, and the service layer maps
//! storage failures onto the API error taxonomy.

pub mod calculation;
pub mod metric;
pub mod user;

pub use calculation::{
    CalcStatsRow, CalculationRecord, CalculationRepository, CreateCalculation,
};
pub use metric::{CreateMetric, MetricRecord, MetricRepository};
pub use user::{UpdateUser, UserRecord, UserRepository};
