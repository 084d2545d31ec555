use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a TEXT decimal column, tolerating scientific notation.
///
/// Falls back to zero with an error log rather than failing the whole row;
/// a malformed stored decimal is a data bug, not a reason to make history
/// unreadable.
pub(crate) fn parse_decimal_string_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e_decimal) => match Decimal::from_scientific(value_str) {
            Ok(d) => d,
            Err(e_scientific) => {
                log::error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as scientific (err: {}). Falling back to ZERO.",
                    field_name, value_str, e_decimal, e_scientific
                );
                Decimal::ZERO
            }
        },
    }
}
