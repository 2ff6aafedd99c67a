//! Statement text construction for the warehouse record store.
//!
//! The warehouse accepts exactly one statement per call, so every read and
//! write is assembled here as text plus, where supported, named parameters.
//! Identifier names (table, sort column) are interpolated into the text and
//! therefore only ever come from closed allow-lists; every caller-supplied
//! value goes through [`ValueBinder`], which emits either a `:name` marker
//! or an escaped literal depending on what the backend supports.

use showroom_warehouse::Statement;

/// What the statement backend can do, fixed at store construction.
///
/// One store implementation serves both parameterized and literal-only
/// backends; the descriptor selects the behavior instead of a second code
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// Backend accepts named bound parameters alongside statement text.
    pub supports_bound_parameters: bool,
    /// Backend stores the composite document column.
    pub supports_composite_document: bool,
    /// Insert returns no generated key, so creation must read the maximum
    /// identifier afterwards.
    pub requires_post_insert_id_lookup: bool,
}

impl Default for BackendCapabilities {
    fn default() -> Self {
        Self {
            supports_bound_parameters: true,
            supports_composite_document: true,
            requires_post_insert_id_lookup: true,
        }
    }
}

/// Escape one value as a SQL string literal. Absent values become the NULL
/// literal; embedded quotes are doubled.
pub fn quote_literal(value: Option<&str>) -> String {
    match value {
        None => "NULL".to_string(),
        Some(v) => format!("'{}'", v.replace('\'', "''")),
    }
}

/// Render a product list as an `array(...)` constructor. Always inlined as
/// a literal, even on parameterized backends: the array constructor takes
/// expressions, not one bindable value. Items are trimmed and empties
/// dropped before quoting.
pub fn array_literal(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| format!("'{}'", item.replace('\'', "''")))
        .collect();
    format!("array({})", quoted.join(", "))
}

/// Accumulates the values referenced by one statement.
///
/// [`ValueBinder::push`] returns the text fragment that stands for a value
/// in the statement: a `:name` marker when the backend binds parameters
/// (the value is collected and attached in
/// [`ValueBinder::into_statement`]), or the escaped literal otherwise.
/// Either way the calling code assembles the statement text exactly once.
#[derive(Debug)]
pub struct ValueBinder {
    bound: bool,
    parameters: Vec<(String, Option<String>)>,
}

impl ValueBinder {
    pub fn new(capabilities: BackendCapabilities) -> Self {
        Self {
            bound: capabilities.supports_bound_parameters,
            parameters: Vec::new(),
        }
    }

    /// Register one value under a parameter name and return the fragment
    /// that stands for it in the statement text.
    pub fn push(&mut self, name: &str, value: Option<String>) -> String {
        if self.bound {
            self.parameters.push((name.to_string(), value));
            format!(":{}", name)
        } else {
            quote_literal(value.as_deref())
        }
    }

    /// Attach the collected values to the finished statement text.
    pub fn into_statement(self, text: impl Into<String>) -> Statement {
        let mut statement = Statement::new(text);
        for (name, value) in self.parameters {
            statement = statement.bind(name, value);
        }
        statement
    }
}
