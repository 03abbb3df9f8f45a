//! Heuristic matching of work orders to external invoices

use bigdecimal::BigDecimal;

/// Build the fuzzy match key used to decide whether a work order was
/// billed through the external accounting system without an explicit
/// foreign-key link.
///
/// The key is `"<customer name>-<amount>"`, case sensitive and with no
/// normalization of either part, so two unrelated jobs for the same
/// customer at the same amount collide. That imprecision is accepted for
/// compatibility with the upstream dashboards this feeds; replacing the
/// heuristic with a real foreign key only requires changing the callers
/// of this one function.
pub fn billing_key(customer_name: &str, amount: &BigDecimal) -> String {
    format!("{}-{}", customer_name, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn key_joins_name_and_amount() {
        assert_eq!(billing_key("Acme", &BigDecimal::from(100)), "Acme-100");
    }

    #[test]
    fn key_is_case_sensitive() {
        assert_ne!(
            billing_key("Acme", &BigDecimal::from(100)),
            billing_key("acme", &BigDecimal::from(100))
        );
    }

    #[test]
    fn key_preserves_amount_scale() {
        // "100" and "100.00" are distinct keys; the match is textual, not
        // numeric
        assert_ne!(
            billing_key("Acme", &BigDecimal::from(100)),
            billing_key("Acme", &BigDecimal::from_str("100.00").unwrap())
        );
    }
}
