//! # Observability
//!
//! The engine logs through `tracing`: definition registration and renders at
//! `debug`, skipped definitions at `trace`, and depth overflows at `warn`.
//! Every public render call opens a span carrying the representer name.
//!
//! Applications that do not install their own subscriber can call
//! [`setup_tracing`] once at startup:
//!
//! ```bash
//! RUST_LOG=halogen=debug cargo run -p halogen-sample
//! ```

/// Initializes a compact `tracing` subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
