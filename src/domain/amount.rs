/// Amounts are stored as SQLite REAL values, exactly as entered.
/// The sign is not tied to the transaction type.
pub type Amount = f64;

/// Parse a decimal string into an amount.
/// Example: "42.5" -> 42.5, " 100 " -> 100.0, "-3" -> -3.0
pub fn parse_amount(input: &str) -> Option<Amount> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    input.parse::<Amount>().ok().filter(|value| value.is_finite())
}

/// Parse an amount, falling back to zero when the text is not a number.
/// Returns the value and whether the fallback was used.
pub fn coerce_amount(input: &str) -> (Amount, bool) {
    match parse_amount(input) {
        Some(value) => (value, false),
        None => (0.0, true),
    }
}

/// Format an amount with two decimals.
/// Example: 180.0 -> "180.00", -42.5 -> "-42.50"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}
