//! System orchestration, configuration, startup, and shutdown logic.

pub mod config;
pub mod pipeline_system;
pub mod shutdown;
pub mod telemetry;

pub use config::*;
pub use pipeline_system::*;
pub use shutdown::*;
pub use telemetry::*;
