// 🧾 Calculation - request/result orchestration over the core
//
// Rule: changes are computed if and only if a previous amount is supplied.
// A previous amount of 0 is a real state (diff against an all-zero
// breakdown); a missing previous amount omits `changes` entirely.

use crate::amount::Cents;
use crate::breakdown::Breakdown;
use crate::changes::{diff, ChangeSet};
use crate::denomination::Denomination;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// REQUEST / RESULT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_amount: Option<f64>,
}

impl CalculationRequest {
    pub fn new(amount: Cents, previous_amount: Option<Cents>) -> Self {
        CalculationRequest {
            amount: amount.to_f64(),
            previous_amount: previous_amount.map(|p| p.to_f64()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Requested amount, rounded to the cent
    pub amount: f64,

    pub breakdown: Breakdown,

    /// Absent (not null, not empty) when no previous amount was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<ChangeSet>,
}

/// One row of the "what changed" view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRow {
    pub denomination: Denomination,
    pub current: u64,
    pub previous: u64,
    pub delta: i64,
}

impl CalculationResult {
    /// Changes for denominations used by either amount, largest first.
    /// Empty when the result carries no changes.
    pub fn change_rows(&self) -> Vec<ChangeRow> {
        let Some(changes) = &self.changes else {
            return Vec::new();
        };

        changes
            .iter()
            .map(|(denom, delta)| {
                let current = self.breakdown.count(denom);
                let previous = (current as i64 - delta).max(0) as u64;
                ChangeRow {
                    denomination: denom,
                    current,
                    previous,
                    delta,
                }
            })
            .filter(|row| row.current > 0 || row.previous > 0)
            .collect()
    }
}

/// Decompose the amount and, only when a previous amount is given, diff it.
pub fn calculate(request: &CalculationRequest) -> Result<CalculationResult> {
    let amount = Cents::from_f64(request.amount)?;
    let previous = request.previous_amount.map(Cents::from_f64).transpose()?;

    info!(amount = %amount, previous = ?previous.map(|p| p.to_string()), "calculating denominations");

    let breakdown = Breakdown::from_cents(amount);
    let changes = previous.map(|p| diff(&breakdown, &Breakdown::from_cents(p)));

    Ok(CalculationResult {
        amount: amount.to_f64(),
        breakdown,
        changes,
    })
}

// ============================================================================
// CALCULATORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationMode {
    Local,
    Remote,
}

impl CalculationMode {
    pub fn toggle(&self) -> Self {
        match self {
            CalculationMode::Local => CalculationMode::Remote,
            CalculationMode::Remote => CalculationMode::Local,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationMode::Local => "Local",
            CalculationMode::Remote => "Remote",
        }
    }
}

/// Something that turns a request into a result. The local and remote paths
/// must agree for identical requests.
pub trait Calculator {
    fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResult>;

    fn mode(&self) -> CalculationMode;
}

/// In-process calculation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCalculator;

impl Calculator for LocalCalculator {
    fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResult> {
        calculate(request)
    }

    fn mode(&self) -> CalculationMode {
        CalculationMode::Local
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Remembers the last calculated amount so the next calculation can show
/// what changed.
#[derive(Debug, Clone, Default)]
pub struct CalculationSession {
    previous_amount: Option<Cents>,
    old_amount: Option<Cents>,
    last_result: Option<CalculationResult>,
}

impl CalculationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount that will be sent as `previousAmount` on the next calculation
    pub fn previous_amount(&self) -> Option<Cents> {
        self.previous_amount
    }

    /// Amount the last result was compared against
    pub fn old_amount(&self) -> Option<Cents> {
        self.old_amount
    }

    pub fn last_result(&self) -> Option<&CalculationResult> {
        self.last_result.as_ref()
    }

    /// Run a calculation. On failure the session is left untouched.
    pub fn submit(
        &mut self,
        calculator: &dyn Calculator,
        amount: Cents,
    ) -> Result<&CalculationResult> {
        let request = CalculationRequest::new(amount, self.previous_amount);
        let result = calculator.calculate(&request)?;

        self.old_amount = self.previous_amount;
        self.previous_amount = Some(amount);
        Ok(&*self.last_result.insert(result))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// TESTS
// ============================================================================
