// 🔀 Differencer - signed per-denomination change between two breakdowns
//
// delta = current - previous, over the union of denominations present in
// either input. Absent counts read as 0. Zero deltas are kept.

use crate::breakdown::DenominationCounts;
use crate::denomination::{Denomination, DENOMINATIONS, DENOMINATION_COUNT};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeSet {
    deltas: [Option<i64>; DENOMINATION_COUNT],
}

/// Compute the change from `previous` to `current`.
///
/// Passing an empty `previous` yields the current counts as positive deltas.
/// Callers that have no previous amount at all should not call this; see
/// [`crate::calculation::calculate`].
pub fn diff<C, P>(current: &C, previous: &P) -> ChangeSet
where
    C: DenominationCounts + ?Sized,
    P: DenominationCounts + ?Sized,
{
    let mut deltas = [None; DENOMINATION_COUNT];

    for (i, slot) in deltas.iter_mut().enumerate() {
        let cur = current.count_at(i);
        let prev = previous.count_at(i);
        if cur.is_none() && prev.is_none() {
            continue;
        }
        *slot = Some(signed(cur.unwrap_or(0)) - signed(prev.unwrap_or(0)));
    }

    let changes = ChangeSet { deltas };
    debug!(denominations = changes.len(), "calculated changes");
    changes
}

fn signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

impl ChangeSet {
    pub fn get(&self, denom: Denomination) -> Option<i64> {
        self.deltas[denom.index()]
    }

    pub fn delta_at(&self, index: usize) -> Option<i64> {
        self.deltas.get(index).copied().flatten()
    }

    /// Denominations in the key domain with their deltas, largest first
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, i64)> + '_ {
        DENOMINATIONS
            .iter()
            .copied()
            .zip(self.deltas.iter())
            .filter_map(|(d, delta)| delta.map(|delta| (d, delta)))
    }

    /// Number of denominations in the key domain
    pub fn len(&self) -> usize {
        self.deltas.iter().filter(|d| d.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every delta is zero
    pub fn is_unchanged(&self) -> bool {
        self.iter().all(|(_, delta)| delta == 0)
    }

    /// Element-wise negation over the same key domain
    pub fn negate(&self) -> ChangeSet {
        let mut deltas = self.deltas;
        for delta in deltas.iter_mut().flatten() {
            *delta = delta.saturating_neg();
        }
        ChangeSet { deltas }
    }

    /// Net value of the change in cents (Σ delta × denomination).
    /// Widened to i128 so any pair of u64 cent amounts fits exactly.
    pub fn value_delta_cents(&self) -> i128 {
        self.iter()
            .map(|(d, delta)| i128::from(d.cents()) * i128::from(delta))
            .sum()
    }
}

/// Format a delta with an explicit sign: "+2", "-1", "0"
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

// ============================================================================
// SERDE
// ============================================================================

impl Serialize for ChangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (denom, delta) in self.iter() {
            map.serialize_entry(&denom.key(), &delta)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChangeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut deltas = [None; DENOMINATION_COUNT];

        for (key, value) in &raw {
            match Denomination::from_key(key) {
                Some((i, _)) => deltas[i] = Some(lenient_delta(value)),
                None => warn!(key = %key, "ignoring unknown denomination key"),
            }
        }

        Ok(ChangeSet { deltas })
    }
}

fn lenient_delta(value: &serde_json::Value) -> i64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

// ============================================================================
// TESTS
// ============================================================================
