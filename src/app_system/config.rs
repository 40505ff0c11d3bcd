use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

/// Command-line and environment configuration for the service.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Applies queued product updates to an in-memory store",
    long_about = None
)]
pub struct AppConfig {
    /// HTTP port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Number of workers applying events.
    #[arg(
        long,
        env = "WORKERS",
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub workers: u32,

    /// Capacity of the event queue. Producers wait once it is full.
    #[arg(
        long,
        env = "QUEUE_SIZE",
        default_value_t = 128,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub queue_size: u32,

    /// Longest time shutdown waits for the queue to empty, in milliseconds.
    #[arg(long, env = "DRAIN_TIMEOUT_MS", default_value_t = 10_000)]
    pub drain_timeout_ms: u64,

    /// How often shutdown checks the queue length while draining, in milliseconds.
    #[arg(
        long,
        env = "DRAIN_POLL_INTERVAL_MS",
        default_value_t = 50,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub drain_poll_interval_ms: u64,

    /// Longest time to wait for in-flight HTTP requests at shutdown, in milliseconds.
    #[arg(long, env = "SERVER_SHUTDOWN_TIMEOUT_MS", default_value_t = 5_000)]
    pub server_shutdown_timeout_ms: u64,
}

impl AppConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn server_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.server_shutdown_timeout_ms)
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            queue_capacity: self.queue_size as usize,
            workers: self.workers as usize,
            drain_timeout: Duration::from_millis(self.drain_timeout_ms),
            drain_poll_interval: Duration::from_millis(self.drain_poll_interval_ms),
        }
    }
}

/// Construction-time settings of the pipeline core.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub queue_capacity: usize,
    pub workers: usize,
    pub drain_timeout: Duration,
    pub drain_poll_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 128,
            workers: 4,
            drain_timeout: Duration::from_secs(10),
            drain_poll_interval: Duration::from_millis(50),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue capacity must be positive".to_string()));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("worker count must be positive".to_string()));
        }
        if self.drain_poll_interval.is_zero() {
            return Err(ConfigError::Invalid("drain poll interval must be positive".to_string()));
        }
        Ok(())
    }
}
