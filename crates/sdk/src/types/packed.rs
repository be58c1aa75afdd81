//! Packed `bytes32` words emitted by the perpetual.
//!
//! Account balances are emitted as two 16-byte halves, each a sign flag byte
//! followed by a 15-byte value:
//! `position | positionIsPositive << 120 | margin << 128 | marginIsPositive << 248`.
//! Indexes (global settlement index, funding rate) as
//! `value | isPositive << 128 | timestamp << 136`.

use alloy::primitives::{B256, I256, U256};

const BALANCE_VALUE_BITS: usize = 120;
const BALANCE_POSITION_SIGN_BIT: usize = 120;
const BALANCE_MARGIN_SHIFT: usize = 128;
const BALANCE_MARGIN_SIGN_BIT: usize = 248;

const INDEX_VALUE_BITS: usize = 128;
const INDEX_SIGN_BIT: usize = 128;
const INDEX_TIMESTAMP_SHIFT: usize = 136;

fn mask(bits: usize) -> U256 { (U256::from(1u64) << bits) - U256::from(1u64) }

fn signed(is_positive: bool, value: u128) -> I256 {
    let value = I256::from_raw(U256::from(value));
    if is_positive { value } else { -value }
}

/// Account balance of margin token and position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Balance {
    pub margin_is_positive: bool,
    pub position_is_positive: bool,
    /// Absolute margin value, 120 bits.
    pub margin: u128,
    /// Absolute position value, 120 bits.
    pub position: u128,
}

impl Balance {
    pub fn from_word(word: B256) -> Self {
        let raw = U256::from_be_bytes(word.0);
        let value_mask = mask(BALANCE_VALUE_BITS);
        Self {
            margin_is_positive: raw.bit(BALANCE_MARGIN_SIGN_BIT),
            position_is_positive: raw.bit(BALANCE_POSITION_SIGN_BIT),
            margin: ((raw >> BALANCE_MARGIN_SHIFT) & value_mask).to(),
            position: (raw & value_mask).to(),
        }
    }

    pub fn to_word(&self) -> B256 {
        let value_mask = mask(BALANCE_VALUE_BITS);
        let mut raw = (U256::from(self.position) & value_mask)
            | ((U256::from(self.margin) & value_mask) << BALANCE_MARGIN_SHIFT);
        raw.set_bit(BALANCE_POSITION_SIGN_BIT, self.position_is_positive);
        raw.set_bit(BALANCE_MARGIN_SIGN_BIT, self.margin_is_positive);
        B256::from(raw.to_be_bytes::<32>())
    }

    pub fn signed_margin(&self) -> I256 { signed(self.margin_is_positive, self.margin) }

    pub fn signed_position(&self) -> I256 { signed(self.position_is_positive, self.position) }
}

/// Global index or funding rate with the timestamp it was computed at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Index {
    pub timestamp: u32,
    pub is_positive: bool,
    pub value: u128,
}

impl Index {
    pub fn from_word(word: B256) -> Self {
        let raw = U256::from_be_bytes(word.0);
        Self {
            timestamp: ((raw >> INDEX_TIMESTAMP_SHIFT) & mask(32)).to(),
            is_positive: raw.bit(INDEX_SIGN_BIT),
            value: (raw & mask(INDEX_VALUE_BITS)).to(),
        }
    }

    pub fn to_word(&self) -> B256 {
        let mut raw = U256::from(self.value) | (U256::from(self.timestamp) << INDEX_TIMESTAMP_SHIFT);
        raw.set_bit(INDEX_SIGN_BIT, self.is_positive);
        B256::from(raw.to_be_bytes::<32>())
    }

    pub fn signed_value(&self) -> I256 { signed(self.is_positive, self.value) }
}

impl From<B256> for Balance {
    fn from(word: B256) -> Self { Self::from_word(word) }
}

impl From<B256> for Index {
    fn from(word: B256) -> Self { Self::from_word(word) }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::b256;

    use super::*;

    #[test]
    fn test_balance_layout() {
        // Margin 1 and position 2, both positive
        let word = b256!("0x0100000000000000000000000000000101000000000000000000000000000002");
        let balance = Balance::from_word(word);

        assert_eq!(
            balance,
            Balance {
                margin_is_positive: true,
                position_is_positive: true,
                margin: 1,
                position: 2,
            }
        );
        assert_eq!(balance.signed_margin(), I256::ONE);
        assert_eq!(balance.signed_position(), I256::from_raw(U256::from(2u64)));
        assert_eq!(balance.to_word(), word);
    }

    #[test]
    fn test_balance_signs_are_independent() {
        // Negative margin 5, positive position 3
        let raw: U256 = U256::from(3u64)
            | (U256::from(1u64) << 120usize)
            | (U256::from(5u64) << 128usize);
        let balance = Balance::from(B256::from(raw.to_be_bytes::<32>()));

        assert!(!balance.margin_is_positive);
        assert!(balance.position_is_positive);
        assert_eq!(balance.margin, 5);
        assert_eq!(balance.position, 3);
        assert_eq!(balance.signed_margin(), -I256::from_raw(U256::from(5u64)));
        assert_eq!(balance.to_word(), B256::from(raw.to_be_bytes::<32>()));
    }

    #[test]
    fn test_balance_max_values() {
        let balance = Balance {
            margin_is_positive: false,
            position_is_positive: true,
            margin: (1 << 120) - 1,
            position: (1 << 120) - 1,
        };
        assert_eq!(Balance::from_word(balance.to_word()), balance);
    }

    #[test]
    fn test_index_layout() {
        let raw: U256 = U256::from(5u64)
            | (U256::from(1u64) << 128usize)
            | (U256::from(1_600_000_000u64) << 136usize);
        let index = Index::from(B256::from(raw.to_be_bytes::<32>()));

        assert_eq!(index, Index { timestamp: 1_600_000_000, is_positive: true, value: 5 });
        assert_eq!(index.signed_value(), I256::from_raw(U256::from(5u64)));
        assert_eq!(index.to_word(), B256::from(raw.to_be_bytes::<32>()));
    }
}
