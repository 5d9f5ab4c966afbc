// Euro Denomination Calculator - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod amount;
pub mod breakdown;      // Decomposer
pub mod calculation;    // Request/result orchestration
pub mod changes;        // Differencer
pub mod config;
pub mod denomination;
pub mod error;
pub mod logging;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "remote")]
pub mod client;
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use amount::Cents;
pub use breakdown::{decompose, decompose_f64, Breakdown, DenominationCounts, PartialBreakdown};
pub use calculation::{
    calculate, CalculationMode, CalculationRequest, CalculationResult, CalculationSession,
    Calculator, ChangeRow, LocalCalculator,
};
pub use changes::{diff, ChangeSet};
pub use denomination::{Denomination, DenominationKind, DENOMINATIONS, DENOMINATION_COUNT};
pub use error::{DenominationError, Result};

#[cfg(feature = "remote")]
pub use client::RemoteCalculator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
