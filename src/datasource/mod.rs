//! Reference data resolution: externally sourced enumerations (CSV-backed
//! dropdowns) turned into ordered display/value option lists.

mod formula;
mod table;

use crate::document::DataSource;
use crate::error::DataSourceError;
use crate::value::Value;
use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

pub use formula::{ColumnFormula, ColumnRef};
pub use table::{Table, parse_delimited};

/// One resolved dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOption {
    pub value: String,
    pub label: String,
}

/// Fetches the raw bytes of a named resource as text.
///
/// This is the engine's only suspension point; transport (HTTP, file system,
/// embedded fixtures) lives behind this seam so the engine itself stays
/// synchronous.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, resource: &str) -> Result<String, DataSourceError>;
}

/// Resolves data sources into `{value, label}` option lists.
pub struct OptionResolver<F: ResourceFetcher> {
    fetcher: F,
    delimiter: char,
    case_insensitive_filter: bool,
}

impl<F: ResourceFetcher> OptionResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            delimiter: ',',
            case_insensitive_filter: false,
        }
    }

    /// Opts in to case-insensitive matching of the `filter_by` leading token.
    /// The default is a case-sensitive exact match.
    pub fn with_case_insensitive_filter(mut self, enabled: bool) -> Self {
        self.case_insensitive_filter = enabled;
        self
    }

    /// Resolves a data source into its ordered option list.
    ///
    /// Rows participate only when their `active` column equals `"TRUE"`.
    /// When `filter_by` is given (dependent dropdowns), a row is retained
    /// only when its display string's leading token (the part before the
    /// first space or hyphen) matches. `DISTINCT` display formulas
    /// deduplicate by display string, keeping the backing value of the first
    /// row seen, in first-seen order.
    pub fn resolve(
        &self,
        source: &DataSource,
        filter_by: Option<&str>,
    ) -> Result<Vec<ResolvedOption>, DataSourceError> {
        let text = self.fetcher.fetch(&source.resource)?;
        let table = parse_delimited(&source.resource, &text, self.delimiter)?;

        if table.header_index("active").is_none() {
            return Err(DataSourceError::MissingColumn {
                resource: source.resource.clone(),
                column: "active".to_string(),
            });
        }

        let first_header = table.headers[0].as_str();
        let display_formula = ColumnFormula::parse(source.columns.display.as_deref(), first_header);
        let value_formula = ColumnFormula::parse(source.columns.value.as_deref(), first_header);

        let mut options = Vec::new();
        let mut seen_displays: AHashSet<String> = AHashSet::new();

        for row in &table.rows {
            if row.get("active").map(String::as_str) != Some("TRUE") {
                continue;
            }

            let display = display_formula.apply(row, &table);
            if let Some(filter) = filter_by
                && !self.leading_token_matches(&display, filter)
            {
                continue;
            }

            if display_formula.is_distinct() {
                if display.trim().is_empty() || !seen_displays.insert(display.clone()) {
                    continue;
                }
            }

            let value = value_formula.apply(row, &table);
            options.push(ResolvedOption {
                value,
                label: display,
            });
        }

        Ok(options)
    }

    /// Resolves, degrading any failure to an empty option list.
    ///
    /// This is the boundary the engine uses: dataset trouble must never
    /// crash navigation, the affected field just offers no choices.
    pub fn resolve_or_empty(
        &self,
        source: &DataSource,
        filter_by: Option<&str>,
    ) -> (Vec<ResolvedOption>, Option<DataSourceError>) {
        match self.resolve(source, filter_by) {
            Ok(options) => (options, None),
            Err(e) => {
                warn!(resource = %source.resource, error = %e, "data source degraded to empty options");
                (Vec::new(), Some(e))
            }
        }
    }

    fn leading_token_matches(&self, display: &str, filter: &str) -> bool {
        let token = display
            .split(|c| c == ' ' || c == '-')
            .next()
            .unwrap_or_default();
        if self.case_insensitive_filter {
            token.eq_ignore_ascii_case(filter)
        } else {
            token == filter
        }
    }
}

/// Guards dependent-dropdown resolutions against stale completions.
///
/// Every resolution request is keyed to the filter value it was issued
/// under. A completion is applied only when that key still equals the
/// filter's current value; results that arrive for a since-changed filter
/// are discarded, never applied.
#[derive(Debug, Default)]
pub struct OptionsCache {
    resolved: AHashMap<String, Vec<ResolvedOption>>,
}

/// The key a resolution request was issued under: field path plus the filter
/// value current at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionKey {
    pub field_path: String,
    pub filter: Option<String>,
}

impl OptionsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the intent to resolve options for `field_path` under the
    /// filter value read from the snapshot at this moment.
    pub fn begin(&self, field_path: &str, current_filter: Option<&Value>) -> ResolutionKey {
        ResolutionKey {
            field_path: field_path.to_string(),
            filter: current_filter.map(Value::to_string),
        }
    }

    /// Applies a completed resolution if its key is still current.
    /// Returns `false` (and keeps the previous options) when the filter has
    /// changed since the request was issued.
    pub fn commit(
        &mut self,
        key: ResolutionKey,
        options: Vec<ResolvedOption>,
        current_filter: Option<&Value>,
    ) -> bool {
        let current = current_filter.map(Value::to_string);
        if key.filter != current {
            debug!(
                field = %key.field_path,
                issued_under = ?key.filter,
                now = ?current,
                "discarding stale option resolution"
            );
            return false;
        }
        self.resolved.insert(key.field_path, options);
        true
    }

    pub fn options(&self, field_path: &str) -> Option<&[ResolvedOption]> {
        self.resolved.get(field_path).map(Vec::as_slice)
    }

    /// Drops cached options, e.g. when leaving the step that owns them.
    pub fn clear(&mut self) {
        self.resolved.clear();
    }
}
