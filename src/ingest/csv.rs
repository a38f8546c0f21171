//! Delimited-text splitting for table ingestion.
//!
//! Supported format:
//! - UTF-8, comma-separated, one row per line
//! - blank lines are skipped and surrounding whitespace trimmed
//! - double-quoted fields may contain commas; `""` inside quotes is a literal quote
//!
//! No typing happens here; cells stay raw strings.

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Splits text into rows of raw cells.
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_csv_row)
        .collect()
}

/// Returns `true` if the row looks like a header (any cell non-numeric).
pub fn looks_like_header<S: AsRef<str>>(row: &[S]) -> bool {
    row.iter().any(|c| {
        let t = c.as_ref().trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}
