//! Sanitizing rules for product ids and ledger addresses.

use shared_types::{Address, LedgerError, ProductId};
use unicode_normalization::UnicodeNormalization;

/// Strip every non-digit character and parse the remainder.
///
/// Fails with `InvalidId` when no digits remain, when the digits are all
/// zero, or when the value does not fit `uint256`. Only ASCII digits are
/// kept; other Unicode digits are stripped like any other character.
pub fn sanitize_product_id(raw: &str) -> Result<ProductId, LedgerError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<ProductId>()
        .map_err(|e| LedgerError::InvalidId(format!("{raw:?}: {e}")))
}

/// NFKC-normalize, then keep printable non-space ASCII only.
///
/// NFKC folds compatibility forms first, so a full-width `０ｘ…` survives as
/// `0x…` instead of being stripped.
pub fn clean_address_text(raw: &str) -> String {
    raw.nfkc().filter(char::is_ascii_graphic).collect()
}

/// Clean `raw` and run the ledger address validator on the result.
pub fn sanitize_address(raw: &str) -> Result<Address, LedgerError> {
    let cleaned = clean_address_text(raw);
    Address::parse(&cleaned).map_err(|e| LedgerError::InvalidAddress(format!("{raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::U256;

    const VALID: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_product_id_strips_noise() {
        assert_eq!(sanitize_product_id(" 1001\n").unwrap().to_string(), "1001");
        assert_eq!(sanitize_product_id("ID: 10-01").unwrap().to_string(), "1001");
        assert_eq!(sanitize_product_id("#0042").unwrap().to_string(), "42");
    }

    #[test]
    fn test_product_id_rejects_empty_and_zero() {
        assert!(matches!(
            sanitize_product_id("no digits"),
            Err(LedgerError::InvalidId(_))
        ));
        assert!(matches!(sanitize_product_id(""), Err(LedgerError::InvalidId(_))));
        assert!(matches!(
            sanitize_product_id("000"),
            Err(LedgerError::InvalidId(_))
        ));
    }

    #[test]
    fn test_minus_sign_is_noise_not_sign() {
        assert_eq!(sanitize_product_id("-5").unwrap().to_string(), "5");
    }

    #[test]
    fn test_product_id_overflow_fails() {
        let huge = "9".repeat(80);
        assert!(matches!(
            sanitize_product_id(&huge),
            Err(LedgerError::InvalidId(_))
        ));
    }

    #[test]
    fn test_non_ascii_digits_are_stripped() {
        // Arabic-Indic digits are not ledger digits
        assert!(sanitize_product_id("\u{0661}\u{0662}").is_err());
        assert_eq!(sanitize_product_id("7\u{0663}").unwrap().to_string(), "7");
    }

    #[test]
    fn test_address_cleaning() {
        let noisy = format!("\u{200b} {}\t\n", VALID);
        assert_eq!(sanitize_address(&noisy).unwrap().to_string(), VALID);
    }

    #[test]
    fn test_full_width_address_is_folded() {
        let full_width: String = VALID
            .chars()
            .map(|c| char::from_u32(c as u32 - 0x21 + 0xFF01).unwrap())
            .collect();
        assert_eq!(sanitize_address(&full_width).unwrap().to_string(), VALID);
    }

    #[test]
    fn test_invalid_addresses() {
        for raw in ["not-an-address", "0x1234", "", "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"] {
            assert!(
                matches!(sanitize_address(raw), Err(LedgerError::InvalidAddress(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    proptest! {
        #[test]
        fn prop_digit_only_result(prefix in "[a-zA-Z #:-]{0,8}", n in 1u64.., suffix in "[a-zA-Z #:-]{0,8}") {
            let raw = format!("{prefix}{n}{suffix}");
            let id = sanitize_product_id(&raw).unwrap();
            prop_assert_eq!(id.value(), U256::from(n));
            prop_assert!(id.to_string().bytes().all(|b| b.is_ascii_digit()));
        }

        #[test]
        fn prop_no_digits_is_invalid(raw in "[^0-9]{0,32}") {
            prop_assert!(matches!(sanitize_product_id(&raw), Err(LedgerError::InvalidId(_))));
        }

        #[test]
        fn prop_address_sanitize_is_idempotent(bytes in any::<[u8; 20]>()) {
            let canonical = Address::from_bytes(bytes).to_string();
            let once = sanitize_address(&canonical).unwrap();
            prop_assert_eq!(once.to_string(), canonical.clone());
            let twice = sanitize_address(&once.to_string()).unwrap();
            prop_assert_eq!(twice, once);
        }
    }
}
