// 💶 Denominations - the fixed euro note and coin set
//
// Values are stored as integer cents, strictly descending. Every other module
// addresses a denomination by its index into DENOMINATIONS; the two-decimal
// string key ("200.00", "0.50") only exists at the serialization boundary.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Number of denominations in the fixed set
pub const DENOMINATION_COUNT: usize = 14;

/// Euro denominations in cents, largest first
pub const DENOMINATIONS: [Denomination; DENOMINATION_COUNT] = [
    Denomination::new(0, 20_000),
    Denomination::new(1, 10_000),
    Denomination::new(2, 5_000),
    Denomination::new(3, 2_000),
    Denomination::new(4, 1_000),
    Denomination::new(5, 500),
    Denomination::new(6, 200),
    Denomination::new(7, 100),
    Denomination::new(8, 50),
    Denomination::new(9, 20),
    Denomination::new(10, 10),
    Denomination::new(11, 5),
    Denomination::new(12, 2),
    Denomination::new(13, 1),
];

/// Smallest note in the euro series (5.00)
const SMALLEST_NOTE_CENTS: u64 = 500;

// ============================================================================
// DENOMINATION
// ============================================================================

/// A denomination together with its position in DENOMINATIONS. Only the
/// constant table builds these, so the index is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Denomination {
    index: usize,
    cents: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenominationKind {
    Note,
    Coin,
}

impl DenominationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenominationKind::Note => "Note",
            DenominationKind::Coin => "Coin",
        }
    }
}

impl Denomination {
    const fn new(index: usize, cents: u64) -> Self {
        Denomination { index, cents }
    }

    /// Value in cents
    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Value in euros as an exact decimal
    pub fn value(&self) -> Decimal {
        Decimal::new(self.cents as i64, 2)
    }

    pub fn kind(&self) -> DenominationKind {
        if self.cents >= SMALLEST_NOTE_CENTS {
            DenominationKind::Note
        } else {
            DenominationKind::Coin
        }
    }

    /// Canonical two-decimal key, e.g. "200.00" or "0.05"
    pub fn key(&self) -> String {
        format!("{}.{:02}", self.cents / 100, self.cents % 100)
    }

    /// Position of this denomination in DENOMINATIONS
    pub fn index(&self) -> usize {
        self.index
    }

    /// Look up a denomination by its euro key.
    ///
    /// Accepts any decimal spelling of the value ("0.5", "0.50", "200"),
    /// which keeps hand-written JSON payloads readable.
    pub fn from_key(key: &str) -> Option<(usize, Denomination)> {
        let value = Decimal::from_str(key.trim()).ok()?;
        let scaled = value.checked_mul(Decimal::ONE_HUNDRED)?;
        if scaled.fract() != Decimal::ZERO {
            return None;
        }

        DENOMINATIONS
            .iter()
            .enumerate()
            .find(|(_, d)| Decimal::from(d.cents()) == scaled)
            .map(|(i, d)| (i, *d))
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "€{}", self.key())
    }
}

/// Iterate the fixed set with indices, largest first
pub fn iter() -> impl Iterator<Item = (usize, Denomination)> {
    DENOMINATIONS.iter().copied().enumerate()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_set_is_strictly_descending() {
        for pair in DENOMINATIONS.windows(2) {
            assert!(pair[0].cents() > pair[1].cents());
        }
        assert_eq!(DENOMINATIONS[DENOMINATION_COUNT - 1].cents(), 1);
    }

    #[test]
    fn test_keys() {
        let keys: Vec<String> = DENOMINATIONS.iter().map(|d| d.key()).collect();
        assert_eq!(
            keys,
            vec![
                "200.00", "100.00", "50.00", "20.00", "10.00", "5.00", "2.00", "1.00", "0.50",
                "0.20", "0.10", "0.05", "0.02", "0.01",
            ]
        );
    }

    #[test]
    fn test_from_key_accepts_decimal_spellings() {
        assert_eq!(Denomination::from_key("50.00").map(|(i, _)| i), Some(2));
        assert_eq!(Denomination::from_key("0.5").map(|(i, _)| i), Some(8));
        assert_eq!(Denomination::from_key("200").map(|(i, _)| i), Some(0));
        assert_eq!(Denomination::from_key("0.01").map(|(i, _)| i), Some(13));
    }

    #[test]
    fn test_from_key_rejects_unknown() {
        assert!(Denomination::from_key("3.00").is_none());
        assert!(Denomination::from_key("0.001").is_none());
        assert!(Denomination::from_key("abc").is_none());
        assert!(Denomination::from_key("").is_none());
    }

    #[test]
    fn test_index_round_trips() {
        for (i, d) in iter() {
            assert_eq!(d.index(), i);
            assert_eq!(DENOMINATIONS[d.index()], d);
            assert_eq!(Denomination::from_key(&d.key()), Some((i, d)));
        }
    }

    #[test]
    fn test_kind_and_value() {
        assert_eq!(DENOMINATIONS[5].kind(), DenominationKind::Note);
        assert_eq!(DENOMINATIONS[6].kind(), DenominationKind::Coin);
        assert_eq!(DENOMINATIONS[8].value(), dec!(0.50));
        assert_eq!(DENOMINATIONS[0].to_string(), "€200.00");
    }
}
