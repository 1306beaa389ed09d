//! Conditional logging macros.
//!
//! With the `tracing` feature these re-export the `tracing` macros and
//! [`init`] installs an env-filtered subscriber. Without it the macros
//! expand to nothing.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
#[cfg(feature = "tracing")]
pub fn init() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub fn init() {}
