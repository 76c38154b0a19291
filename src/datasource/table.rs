use crate::error::DataSourceError;
use ahash::AHashMap;

/// A parsed delimited dataset: a header row plus data rows keyed by header.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<AHashMap<String, String>>,
}

impl Table {
    /// Index of a header by exact name.
    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Parses delimited text into a [`Table`].
///
/// Quote handling follows the dataset convention: a quote character toggles
/// an "inside quotes" mode, and a delimiter inside quotes is literal. The
/// first line is the header row. Cells are trimmed; short rows pad with
/// empty strings.
pub fn parse_delimited(
    resource: &str,
    text: &str,
    delimiter: char,
) -> Result<Table, DataSourceError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header_line = lines.next().ok_or_else(|| DataSourceError::ParseError {
        resource: resource.to_string(),
        message: "dataset is empty".to_string(),
    })?;
    let headers = split_line(header_line, delimiter);
    if headers.is_empty() {
        return Err(DataSourceError::ParseError {
            resource: resource.to_string(),
            message: "header row has no columns".to_string(),
        });
    }

    let mut rows = Vec::new();
    for line in lines {
        let cells = split_line(line, delimiter);
        let mut row = AHashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            let cell = cells.get(index).cloned().unwrap_or_default();
            row.insert(header.clone(), cell);
        }
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    for c in line.chars() {
        if c == '"' {
            inside_quotes = !inside_quotes;
        } else if c == delimiter && !inside_quotes {
            cells.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    cells.push(current.trim().to_string());
    cells
}
