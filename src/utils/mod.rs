// file: src/utils/mod.rs
// description: logging and telemetry utilities
// reference: internal module structure

pub mod logging;
pub mod telemetry;

pub use logging::{format_error, format_info, format_success, format_warning, init_logger};
pub use telemetry::{HealthCheck, HealthReport, HealthStatus, OperationTimer};
