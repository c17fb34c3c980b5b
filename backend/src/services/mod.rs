//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the formula engine, and external systems.

pub mod calculation;
pub mod metric;
pub mod user;

pub use calculation::CalculationService;
pub use metric::MetricService;
pub use user::UserService;
