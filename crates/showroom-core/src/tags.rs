//! Product-tag normalization.
//!
//! Product tags are semantically a set of strings, but the warehouse column
//! holds whatever shape the writing client used: a JSON-array literal, a
//! comma-joined string, or a bare string. Every read normalizes to a list
//! before the value reaches the rest of the system.

/// Normalize a stored products cell to a list of tags.
///
/// # Rules
///
/// 1. Empty or whitespace-only input yields an empty list
/// 2. Input bracketed like a JSON array is parsed as one; each element is
///    stringified and trimmed
/// 3. Anything else is split on commas, trimmed, empty segments dropped
/// 4. A bare string with no commas becomes a single-element list
/// 5. Malformed bracketed input falls through to the comma rule unchanged
///
/// # Examples
///
/// ```
/// use showroom_core::normalize_products;
///
/// assert_eq!(normalize_products("A, B, C"), vec!["A", "B", "C"]);
/// assert_eq!(normalize_products(r#"["A","B","C"]"#), vec!["A", "B", "C"]);
/// assert_eq!(normalize_products("Platform"), vec!["Platform"]);
/// ```
pub fn normalize_products(raw: &str) -> Vec<String> {
    let s = raw.trim();
    if s.is_empty() {
        return Vec::new();
    }

    if s.starts_with('[') && s.ends_with(']') {
        if let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(s) {
            return values
                .into_iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                })
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    s.split(',')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

/// Join tags for human-readable display.
pub fn products_display(products: &[String]) -> String {
    products.join(", ")
}
