//! Fee basis extraction from transaction records.

use crate::error::FeeError;
use crate::types::{FeeBasisKind, Transaction};

/// Pricing model of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeBasis {
    /// Legacy pricing (pre-EIP-1559).
    Classic {
        /// Gas price in wei.
        price_per_gas_unit: u128,
    },
    /// EIP-1559 pricing.
    Eip1559 {
        /// Maximum priority fee per gas in wei.
        priority_fee: u128,
        /// Maximum fee per gas in wei.
        max_fee: u128,
    },
}

impl FeeBasis {
    /// Get the basis kind.
    pub fn kind(&self) -> FeeBasisKind {
        match self {
            FeeBasis::Classic { .. } => FeeBasisKind::Classic,
            FeeBasis::Eip1559 { .. } => FeeBasisKind::Eip1559,
        }
    }

    /// Worst-case price per gas unit for estimation purposes.
    pub fn effective_gas_price(&self) -> u128 {
        match self {
            FeeBasis::Classic { price_per_gas_unit } => *price_per_gas_unit,
            FeeBasis::Eip1559 { max_fee, .. } => *max_fee,
        }
    }
}

/// Derive the fee basis a transaction specifies.
///
/// Classic wins whenever a gas amount is known and `gasPrice` is set, even if
/// the EIP-1559 fields are also present. Returns `Ok(None)` when neither model
/// is fully specified.
pub fn extract_fee_basis(
    tx: &Transaction,
    estimated_gas: Option<u128>,
) -> Result<Option<FeeBasis>, FeeError> {
    if let (Some(_), Some(gas_price)) = (estimated_gas, tx.gas_price.as_deref()) {
        return Ok(Some(FeeBasis::Classic {
            price_per_gas_unit: parse_quantity("gasPrice", gas_price)?,
        }));
    }

    if let (Some(priority_fee), Some(max_fee)) = (
        tx.max_priority_fee_per_gas.as_deref(),
        tx.max_fee_per_gas.as_deref(),
    ) {
        return Ok(Some(FeeBasis::Eip1559 {
            priority_fee: parse_quantity("maxPriorityFeePerGas", priority_fee)?,
            max_fee: parse_quantity("maxFeePerGas", max_fee)?,
        }));
    }

    Ok(None)
}

/// Parse a chain quantity given as decimal or `0x`-prefixed hex.
pub fn parse_quantity(field: &'static str, raw: &str) -> Result<u128, FeeError> {
    let invalid = || FeeError::InvalidQuantity {
        field,
        value: raw.to_string(),
    };

    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u128::from_str_radix(hex, 16)
        }
        Some(_) => return Err(invalid()),
        // from_str_radix accepts a leading '+', chain data never carries one
        None if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => {
            trimmed.parse::<u128>()
        }
        None => return Err(invalid()),
    };

    parsed.map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(
        gas_price: Option<&str>,
        max_fee: Option<&str>,
        max_priority_fee: Option<&str>,
    ) -> Transaction {
        Transaction {
            gas: Some("21000".to_string()),
            gas_price: gas_price.map(str::to_string),
            max_fee_per_gas: max_fee.map(str::to_string),
            max_priority_fee_per_gas: max_priority_fee.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_classic_takes_precedence() {
        let tx = tx(Some("50000000000"), Some("60000000000"), Some("2000000000"));
        let basis = extract_fee_basis(&tx, Some(21_000)).unwrap();
        assert_eq!(
            basis,
            Some(FeeBasis::Classic {
                price_per_gas_unit: 50_000_000_000
            })
        );
    }

    #[test]
    fn test_eip1559_only() {
        let tx = tx(None, Some("60000000000"), Some("2000000000"));
        let basis = extract_fee_basis(&tx, Some(21_000)).unwrap();
        assert_eq!(
            basis,
            Some(FeeBasis::Eip1559 {
                priority_fee: 2_000_000_000,
                max_fee: 60_000_000_000,
            })
        );
    }

    #[test]
    fn test_gas_price_without_gas_falls_through() {
        // No gas amount: the legacy branch does not apply
        let tx = tx(Some("50000000000"), Some("0x1"), Some("0x1"));
        let basis = extract_fee_basis(&tx, None).unwrap();
        assert_eq!(
            basis,
            Some(FeeBasis::Eip1559 {
                priority_fee: 1,
                max_fee: 1
            })
        );

        let legacy_only = Transaction {
            max_fee_per_gas: None,
            ..tx
        };
        assert_eq!(extract_fee_basis(&legacy_only, None).unwrap(), None);
    }

    #[test]
    fn test_no_basis() {
        assert_eq!(extract_fee_basis(&tx(None, None, None), Some(21_000)).unwrap(), None);
        // Half an EIP-1559 pair is not a basis
        assert_eq!(
            extract_fee_basis(&tx(None, Some("60000000000"), None), Some(21_000)).unwrap(),
            None
        );
    }

    #[test]
    fn test_invalid_quantity_is_typed_error() {
        let tx = tx(Some("fifty gwei"), None, None);
        let err = extract_fee_basis(&tx, Some(21_000)).unwrap_err();
        assert_eq!(
            err,
            FeeError::InvalidQuantity {
                field: "gasPrice",
                value: "fifty gwei".to_string()
            }
        );
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("gas", "21000").unwrap(), 21_000);
        assert_eq!(parse_quantity("gas", " 21000 ").unwrap(), 21_000);
        assert_eq!(parse_quantity("gas", "0x5208").unwrap(), 21_000);
        assert_eq!(parse_quantity("gas", "0X5208").unwrap(), 21_000);
        assert_eq!(parse_quantity("gas", "0").unwrap(), 0);

        for bad in ["", "0x", "-1", "+1", "1.5", "1e9", "0xzz", "NaN"] {
            assert!(parse_quantity("gas", bad).is_err(), "accepted {bad:?}");
        }

        // Overflow
        let too_big = format!("{}0", u128::MAX);
        assert!(parse_quantity("gas", &too_big).is_err());
    }

    #[test]
    fn test_basis_kind_and_effective_price() {
        let classic = FeeBasis::Classic {
            price_per_gas_unit: 1_000_000_000,
        };
        assert_eq!(classic.kind(), FeeBasisKind::Classic);
        assert_eq!(classic.effective_gas_price(), 1_000_000_000);

        let eip1559 = FeeBasis::Eip1559 {
            priority_fee: 2_000_000_000,
            max_fee: 50_000_000_000,
        };
        assert_eq!(eip1559.kind(), FeeBasisKind::Eip1559);
        assert_eq!(eip1559.effective_gas_price(), 50_000_000_000);
    }
}
