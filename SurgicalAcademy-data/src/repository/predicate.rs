//! Structured WHERE-clause builder.
//!
//! Filters are assembled as a list of SQL fragments with positional `?`
//! placeholders plus their bound values, so user input never reaches the SQL
//! text. Column names are always crate-internal constants.

use rusqlite::types::Value;

use crate::database::functions::ICONTAINS;
use crate::models::PageRequest;

/// Conjunction of SQL conditions with their bound parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = ?`
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.clauses.push(format!("{} = ?", column));
        self.params.push(value.into());
        self
    }

    /// `column = 1` for boolean flags
    pub fn is_set(mut self, column: &str) -> Self {
        self.clauses.push(format!("{} = 1", column));
        self
    }

    /// Case-insensitive substring match of `term` against any of `columns`
    pub fn contains_any(mut self, columns: &[&str], term: &str) -> Self {
        if columns.is_empty() {
            return self;
        }

        let alternatives: Vec<String> = columns
            .iter()
            .map(|column| format!("{}({}, ?)", ICONTAINS, column))
            .collect();
        self.clauses.push(format!("({})", alternatives.join(" OR ")));
        self.params
            .extend(columns.iter().map(|_| Value::Text(term.to_string())));
        self
    }

    /// Apply `f` only when `value` is present
    pub fn with<T>(self, value: Option<T>, f: impl FnOnce(Self, T) -> Self) -> Self {
        match value {
            Some(value) => f(self, value),
            None => self,
        }
    }

    /// `WHERE ...` or an empty string
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    /// Bound values in placeholder order
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Bound values followed by `LIMIT ? OFFSET ?` values
    pub fn params_with_page(&self, page: PageRequest) -> Vec<Value> {
        let mut params = self.params.clone();
        params.push(Value::Integer(to_sql_int(page.limit)));
        params.push(Value::Integer(to_sql_int(page.offset)));
        params
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
