use super::table::Table;
use ahash::AHashMap;
use itertools::Itertools;

/// A parsed column formula from a data source's `columns` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnFormula {
    /// `DISTINCT(col)`: take the column and deduplicate downstream.
    Distinct(String),
    /// `CONCATENATE(a, b, ...)`: join the referenced columns with `" - "`.
    Concatenate(Vec<ColumnRef>),
    /// `col1,col2`: comma-separated column list, same join behavior.
    Columns(Vec<String>),
    /// A single bare column name.
    Single(String),
}

/// A column referenced inside `CONCATENATE(...)`: by header name, or by the
/// spreadsheet-style letter position the source documents sometimes carry
/// (`A1` is column 0, `B7` is column 1, and so on).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Named(String),
    Position(usize),
}

impl ColumnFormula {
    /// Parses a formula string. An absent formula falls back to the first
    /// header column.
    pub fn parse(formula: Option<&str>, first_header: &str) -> Self {
        let Some(formula) = formula.map(str::trim).filter(|f| !f.is_empty()) else {
            return ColumnFormula::Single(first_header.to_string());
        };

        if let Some(inner) = function_body(formula, "DISTINCT") {
            return ColumnFormula::Distinct(inner.trim().to_string());
        }
        if let Some(inner) = function_body(formula, "CONCATENATE") {
            let refs = inner
                .split(',')
                .map(str::trim)
                .filter(|arg| !arg.is_empty())
                .map(parse_column_ref)
                .collect();
            return ColumnFormula::Concatenate(refs);
        }
        if formula.contains(',') {
            let columns = formula
                .split(',')
                .map(str::trim)
                .filter(|col| !col.is_empty())
                .map(str::to_string)
                .collect();
            return ColumnFormula::Columns(columns);
        }
        ColumnFormula::Single(formula.to_string())
    }

    /// Whether this formula asks for DISTINCT deduplication.
    pub fn is_distinct(&self) -> bool {
        matches!(self, ColumnFormula::Distinct(_))
    }

    /// Applies the formula to one row, producing its derived string.
    /// Multi-column formulas join non-empty parts with `" - "`.
    pub fn apply(&self, row: &AHashMap<String, String>, table: &Table) -> String {
        match self {
            ColumnFormula::Distinct(column) | ColumnFormula::Single(column) => {
                row.get(column).cloned().unwrap_or_default()
            }
            ColumnFormula::Concatenate(refs) => refs
                .iter()
                .filter_map(|column_ref| {
                    let name = match column_ref {
                        ColumnRef::Named(name) => Some(name.clone()),
                        ColumnRef::Position(index) => table.headers.get(*index).cloned(),
                    }?;
                    row.get(&name).cloned()
                })
                .filter(|cell| !cell.is_empty())
                .join(" - "),
            ColumnFormula::Columns(columns) => columns
                .iter()
                .filter_map(|column| row.get(column).cloned())
                .filter(|cell| !cell.is_empty())
                .join(" - "),
        }
    }
}

/// Extracts the argument body of `NAME(...)` if `formula` is that call.
fn function_body<'a>(formula: &'a str, name: &str) -> Option<&'a str> {
    let rest = formula.strip_prefix(name)?.trim_start();
    let inner = rest.strip_prefix('(')?;
    let close = inner.rfind(')')?;
    Some(&inner[..close])
}

/// A `CONCATENATE` argument is either a header name or a spreadsheet cell
/// reference (a single letter followed by digits) mapping to a column
/// position: `A` maps to 0, `B` to 1, and so on.
fn parse_column_ref(arg: &str) -> ColumnRef {
    let mut chars = arg.chars();
    if let Some(letter) = chars.next()
        && letter.is_ascii_uppercase()
        && chars.clone().next().is_some()
        && chars.all(|c| c.is_ascii_digit())
    {
        return ColumnRef::Position((letter as u8 - b'A') as usize);
    }
    ColumnRef::Named(arg.to_string())
}
