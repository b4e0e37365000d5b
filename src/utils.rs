// Utility functions

/// Converts a string to kebab-case, e.g. for report file names.
pub fn to_kebab_case(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "-")
}

/// Formats a price with two decimals followed by the currency label.
pub fn format_price(price: f64, currency: &str) -> String {
    if currency.is_empty() {
        format!("{:.2}", price)
    } else {
        format!("{:.2} {}", price, currency)
    }
}
