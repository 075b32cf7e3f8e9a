//! Low-level CSV assembly: quoting, delimiters, BOM.

/// Byte order mark prefixed to every export so spreadsheet applications
/// pick up the UTF-8 encoding.
pub const BOM: char = '\u{FEFF}';

/// Placeholder for missing values.
pub const MISSING: &str = "N/A";

/// Quote one field: wrap in double quotes, doubling any embedded quotes.
#[must_use]
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Assemble a full CSV document from a header and rows.
///
/// Every field is quoted. Rows are joined with `\n` and the document
/// starts with the BOM.
#[must_use]
pub fn build(header: &[&str], rows: &[Vec<String>], delimiter: char) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_row(header.iter().map(|h| (*h).to_string()), delimiter));
    for row in rows {
        lines.push(join_row(row.iter().cloned(), delimiter));
    }
    format!("{BOM}{}", lines.join("\n"))
}

fn join_row(fields: impl Iterator<Item = String>, delimiter: char) -> String {
    fields
        .map(|f| quote(&f))
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

/// A field value, or `N/A` when absent or blank.
#[must_use]
pub fn or_missing(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_doubles_embedded_quotes() {
        assert_eq!(quote(r#"Acme "The Best" Inc"#), r#""Acme ""The Best"" Inc""#);
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn test_build_starts_with_bom_and_quotes_everything() {
        let csv = build(
            &["A", "B"],
            &[vec!["1".to_string(), "x,y".to_string()]],
            ',',
        );
        assert!(csv.starts_with('\u{FEFF}'));
        assert_eq!(&csv[3..], "\"A\",\"B\"\n\"1\",\"x,y\"");
    }

    #[test]
    fn test_build_semicolon_delimiter() {
        let csv = build(&["A", "B"], &[], ';');
        assert!(csv.ends_with("\"A\";\"B\""));
    }

    #[test]
    fn test_or_missing() {
        assert_eq!(or_missing(Some("x")), "x");
        assert_eq!(or_missing(Some("  ")), "N/A");
        assert_eq!(or_missing(None), "N/A");
    }
}
