// 🧮 Decomposer - greedy breakdown of an amount into euro denominations
//
// Greedy-from-largest is exact and count-minimal for the euro series because
// the set is canonical. It is NOT valid for arbitrary denomination sets, which
// is why DENOMINATIONS is a constant and not a parameter.

use crate::amount::Cents;
use crate::denomination::{self, Denomination, DENOMINATIONS, DENOMINATION_COUNT};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

// ============================================================================
// COUNT ACCESS
// ============================================================================

/// Per-denomination counts addressed by index into DENOMINATIONS.
///
/// `None` means the denomination is absent from the mapping, which matters
/// for the key domain of a diff. A full Breakdown never returns `None`.
pub trait DenominationCounts {
    fn count_at(&self, index: usize) -> Option<u64>;
}

// ============================================================================
// BREAKDOWN
// ============================================================================

/// Full decomposition: one count per denomination, zero counts included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Breakdown {
    counts: [u64; DENOMINATION_COUNT],
}

impl Breakdown {
    /// Greedy decomposition of an already validated amount. Never fails.
    pub fn from_cents(amount: Cents) -> Self {
        let mut remaining = amount.get();
        let mut counts = [0u64; DENOMINATION_COUNT];

        for (i, denom) in denomination::iter() {
            let value = denom.cents();
            if remaining >= value {
                let count = remaining / value;
                counts[i] = count;
                remaining -= count * value;
                trace!(denomination = %denom.key(), count, remaining, "greedy pass");
            }
        }

        // The 0.01 denomination always absorbs the remainder
        debug_assert_eq!(remaining, 0);

        let breakdown = Breakdown { counts };
        debug!(amount = %amount, pieces = breakdown.piece_count(), "calculated breakdown");
        breakdown
    }

    pub fn count(&self, denom: Denomination) -> u64 {
        self.counts[denom.index()]
    }

    pub fn counts(&self) -> &[u64; DENOMINATION_COUNT] {
        &self.counts
    }

    /// All denominations with their counts, largest first
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u64)> + '_ {
        DENOMINATIONS.iter().copied().zip(self.counts.iter().copied())
    }

    /// Only the denominations actually used
    pub fn non_zero(&self) -> impl Iterator<Item = (Denomination, u64)> + '_ {
        self.iter().filter(|(_, count)| *count > 0)
    }

    /// Weighted sum of the counts
    pub fn total(&self) -> Cents {
        let cents = self
            .iter()
            .fold(0u64, |acc, (d, count)| acc.saturating_add(d.cents().saturating_mul(count)));
        Cents::new(cents)
    }

    /// Number of notes and coins in total
    pub fn piece_count(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, c| acc.saturating_add(*c))
    }
}

impl DenominationCounts for Breakdown {
    fn count_at(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied()
    }
}

/// Decompose a euro amount. Negative amounts are rejected.
pub fn decompose(amount: Decimal) -> Result<Breakdown> {
    let cents = Cents::from_decimal(amount)?;
    Ok(Breakdown::from_cents(cents))
}

/// Decompose a floating point euro amount. Negative, NaN and infinite
/// amounts are rejected.
pub fn decompose_f64(amount: f64) -> Result<Breakdown> {
    let cents = Cents::from_f64(amount)?;
    Ok(Breakdown::from_cents(cents))
}

// ============================================================================
// PARTIAL BREAKDOWN
// ============================================================================

/// Breakdown received from outside, where denominations may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialBreakdown {
    counts: [Option<u64>; DENOMINATION_COUNT],
}

impl PartialBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, denom: Denomination, count: u64) -> Self {
        self.set(denom, count);
        self
    }

    pub fn set(&mut self, denom: Denomination, count: u64) {
        self.counts[denom.index()] = Some(count);
    }

    pub fn get(&self, denom: Denomination) -> Option<u64> {
        self.counts[denom.index()]
    }

    /// Fill absent denominations with zero
    pub fn to_breakdown(&self) -> Breakdown {
        let mut counts = [0u64; DENOMINATION_COUNT];
        for (slot, count) in counts.iter_mut().zip(self.counts.iter()) {
            *slot = count.unwrap_or(0);
        }
        Breakdown { counts }
    }

    /// Build from raw key/value pairs, leniently.
    ///
    /// Non-numeric or negative counts are kept as 0. Keys that are not a euro
    /// denomination are skipped.
    pub fn from_raw(raw: &BTreeMap<String, serde_json::Value>) -> Self {
        let mut partial = PartialBreakdown::new();
        for (key, value) in raw {
            match Denomination::from_key(key) {
                Some((i, _)) => partial.counts[i] = Some(lenient_count(value)),
                None => warn!(key = %key, "ignoring unknown denomination key"),
            }
        }
        partial
    }
}

impl DenominationCounts for PartialBreakdown {
    fn count_at(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied().flatten()
    }
}

impl From<Breakdown> for PartialBreakdown {
    fn from(breakdown: Breakdown) -> Self {
        let mut counts = [None; DENOMINATION_COUNT];
        for (slot, count) in counts.iter_mut().zip(breakdown.counts.iter()) {
            *slot = Some(*count);
        }
        PartialBreakdown { counts }
    }
}

fn lenient_count(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

// ============================================================================
// SERDE
// ============================================================================

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DENOMINATION_COUNT))?;
        for (denom, count) in self.iter() {
            map.serialize_entry(&denom.key(), &count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Breakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let partial = PartialBreakdown::deserialize(deserializer)?;
        Ok(partial.to_breakdown())
    }
}

impl Serialize for PartialBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let present = self.counts.iter().filter(|c| c.is_some()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for (denom, count) in DENOMINATIONS.iter().zip(self.counts.iter()) {
            if let Some(count) = count {
                map.serialize_entry(&denom.key(), count)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PartialBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(PartialBreakdown::from_raw(&raw))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn count_of(breakdown: &Breakdown, key: &str) -> u64 {
        let (i, _) = Denomination::from_key(key).unwrap();
        breakdown.count_at(i).unwrap()
    }

    #[test]
    fn test_decompose_234_23() {
        let breakdown = decompose(dec!(234.23)).unwrap();

        assert_eq!(
            breakdown.counts(),
            &[1, 0, 0, 1, 1, 0, 2, 0, 0, 1, 0, 0, 1, 1]
        );
        assert_eq!(breakdown.total(), Cents::new(23_423));
    }

    #[test]
    fn test_decompose_45_32() {
        let breakdown = decompose(dec!(45.32)).unwrap();

        assert_eq!(count_of(&breakdown, "20.00"), 2);
        assert_eq!(count_of(&breakdown, "5.00"), 1);
        assert_eq!(count_of(&breakdown, "0.20"), 1);
        assert_eq!(count_of(&breakdown, "0.10"), 1);
        assert_eq!(count_of(&breakdown, "0.02"), 1);
        assert_eq!(breakdown.non_zero().count(), 5);
        assert_eq!(breakdown.piece_count(), 6);
    }

    #[test]
    fn test_small_amounts() {
        let breakdown = decompose(dec!(0.01)).unwrap();
        assert_eq!(count_of(&breakdown, "0.01"), 1);
        assert_eq!(breakdown.piece_count(), 1);

        let breakdown = decompose(dec!(0.03)).unwrap();
        assert_eq!(count_of(&breakdown, "0.02"), 1);
        assert_eq!(count_of(&breakdown, "0.01"), 1);
        assert_eq!(breakdown.piece_count(), 2);
    }

    #[test]
    fn test_zero_amount_is_all_zero() {
        let breakdown = decompose(dec!(0)).unwrap();
        assert_eq!(breakdown, Breakdown::default());
        assert_eq!(breakdown.iter().count(), DENOMINATION_COUNT);
    }

    #[test]
    fn test_rejects_invalid_amounts() {
        assert!(decompose(dec!(-1)).unwrap_err().is_invalid_amount());
        assert!(decompose_f64(-1.0).unwrap_err().is_invalid_amount());
        assert!(decompose_f64(f64::NAN).unwrap_err().is_invalid_amount());
        assert!(decompose_f64(f64::INFINITY).unwrap_err().is_invalid_amount());
    }

    #[test]
    fn test_serializes_in_descending_key_order() {
        let breakdown = decompose(dec!(234.23)).unwrap();
        let json = serde_json::to_string(&breakdown).unwrap();

        assert_eq!(
            json,
            "{\"200.00\":1,\"100.00\":0,\"50.00\":0,\"20.00\":1,\"10.00\":1,\"5.00\":0,\
             \"2.00\":2,\"1.00\":0,\"0.50\":0,\"0.20\":1,\"0.10\":0,\"0.05\":0,\
             \"0.02\":1,\"0.01\":1}"
        );
    }

    #[test]
    fn test_partial_from_json_is_lenient() {
        let partial: PartialBreakdown =
            serde_json::from_str(r#"{"200.00": 1, "0.5": "x", "20.00": -2, "3.00": 7}"#).unwrap();

        assert_eq!(partial.get(DENOMINATIONS[0]), Some(1));
        assert_eq!(partial.get(DENOMINATIONS[8]), Some(0));
        assert_eq!(partial.get(DENOMINATIONS[3]), Some(0));
        assert_eq!(partial.get(DENOMINATIONS[1]), None);
    }

    #[test]
    fn test_breakdown_from_sparse_json_fills_zeros() {
        let breakdown: Breakdown = serde_json::from_str(r#"{"100.00": 1}"#).unwrap();
        assert_eq!(breakdown, decompose(dec!(100)).unwrap());
    }

    proptest! {
        #[test]
        fn prop_conservation(cents in 0u64..100_000_000) {
            let breakdown = Breakdown::from_cents(Cents::new(cents));
            prop_assert_eq!(breakdown.total(), Cents::new(cents));
        }

        #[test]
        fn prop_full_coverage(cents in 0u64..100_000_000) {
            let breakdown = Breakdown::from_cents(Cents::new(cents));
            for i in 0..DENOMINATION_COUNT {
                prop_assert!(breakdown.count_at(i).is_some());
            }
            let json = serde_json::to_value(breakdown).unwrap();
            prop_assert_eq!(json.as_object().unwrap().len(), DENOMINATION_COUNT);
        }

        #[test]
        fn prop_deterministic(cents in 0u64..100_000_000) {
            let amount = Cents::new(cents);
            prop_assert_eq!(Breakdown::from_cents(amount), Breakdown::from_cents(amount));
        }

        #[test]
        fn prop_remainder_below_each_denomination(cents in 0u64..100_000_000) {
            let breakdown = Breakdown::from_cents(Cents::new(cents));
            let mut remaining = cents;
            for (denom, count) in breakdown.iter() {
                remaining -= denom.cents() * count;
                prop_assert!(remaining < denom.cents());
            }
        }
    }
}
