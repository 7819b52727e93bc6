//! Streaming Pipeline Facade
//!
//! Unified re-exports for the txstream pipeline:
//! - Contracts, record/result types and errors from SPI
//! - Configuration and model-params lookup from API
//! - Source, shifter, metrics, sinks and runner from Core

// Re-export everything from SPI
pub use stream_spi::*;

// Re-export everything from API
pub use stream_api::*;

// Re-export everything from Core
pub use stream_core::*;
