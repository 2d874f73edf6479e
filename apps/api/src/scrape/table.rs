//! Markdown job-table row parsing.
//!
//! The source document is a GitHub README whose postings live in one
//! pipe-delimited table. Parsing is positional and line-oriented: cells are
//! trusted by position once the header row has been validated, and lines
//! that do not look like rows are rejected individually rather than trying
//! to detect where the table ends.

/// The column names the jobs table must lead with, in order.
pub const EXPECTED_COLUMNS: [&str; 3] = ["Company", "Role", "Location"];

/// How a candidate header line relates to the expected jobs-table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    /// First three columns are Company | Role | Location.
    Jobs,
    /// All three expected names are present but not in the leading
    /// positions — a reordered source would silently misattribute fields,
    /// so the whole ingestion must fail instead.
    Reordered,
    /// Not the jobs table (prose, badges, some other table).
    Other,
}

/// Splits a table line into trimmed, non-empty cells. Boundary segments
/// around the outer pipes are empty after trimming and fall away here.
pub fn split_cells(line: &str) -> Vec<&str> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// A separator row is all dashes (with optional alignment colons), e.g.
/// `| --- | :--- |`.
pub fn is_separator_row(cells: &[&str]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|cell| cell.chars().all(|c| c == '-' || c == ':'))
}

pub fn classify_header(cells: &[&str]) -> HeaderMatch {
    if cells.len() >= EXPECTED_COLUMNS.len()
        && cells
            .iter()
            .zip(EXPECTED_COLUMNS)
            .all(|(cell, expected)| cell.eq_ignore_ascii_case(expected))
    {
        return HeaderMatch::Jobs;
    }
    let mentions_all = EXPECTED_COLUMNS
        .iter()
        .all(|expected| cells.iter().any(|cell| cell.eq_ignore_ascii_case(expected)));
    if mentions_all {
        HeaderMatch::Reordered
    } else {
        HeaderMatch::Other
    }
}

/// Structured fields of one accepted table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFields {
    pub company: String,
    pub role: String,
    pub location: String,
    pub url: String,
    pub date_posted: Option<String>,
}

/// Parses one row's cells. Returns `None` for anything that is not a
/// usable posting: fewer than 3 cells, or no resolvable application link in
/// the 4th cell. Rejected rows are not an error — a README table is
/// expected to contain non-row lines.
pub fn parse_row(cells: &[&str]) -> Option<RowFields> {
    if cells.len() < 3 {
        return None;
    }

    // Column 0 may embed a markdown link; the display text wins.
    let company = match markdown_link(cells[0]) {
        Some((text, _)) => text.to_string(),
        None => cells[0].to_string(),
    };
    let role = cells[1].to_string();
    let location = cells[2].to_string();

    let url = cells.get(3).and_then(|cell| extract_link(cell))?;
    let date_posted = cells.get(4).map(|cell| cell.to_string());

    Some(RowFields {
        company,
        role,
        location,
        url,
        date_posted,
    })
}

/// Extracts `(text, url)` from a markdown link like `[Acme](https://acme.com)`.
fn markdown_link(cell: &str) -> Option<(&str, &str)> {
    let open = cell.find('[')?;
    let mid = cell[open..].find("](")? + open;
    let close = cell[mid + 2..].find(')')? + mid + 2;
    Some((&cell[open + 1..mid], &cell[mid + 2..close]))
}

/// Resolves an application link from the 4th cell. Tried in order: an HTML
/// `href="…"` attribute, a parenthesized markdown link target, a bare URL.
fn extract_link(cell: &str) -> Option<String> {
    if let Some(start) = cell.find("href=\"") {
        let rest = &cell[start + 6..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }
    if let Some(open) = cell.find('(') {
        if let Some(len) = cell[open + 1..].find(')') {
            let inner = &cell[open + 1..open + 1 + len];
            if !inner.is_empty() {
                return Some(inner.to_string());
            }
        }
    }
    if cell.starts_with("http") {
        return Some(cell.to_string());
    }
    None
}
