use crate::error::{Result, TimetableError};
use crate::model::RawAssignment;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Rows read from one exported timetable sheet.
#[derive(Debug, Clone)]
pub struct SourceSheet {
    pub rows: Vec<RawAssignment>,
    /// Hex SHA-256 of the raw input bytes.
    pub fingerprint: String,
}

pub fn read_source_file(path: &Path) -> Result<SourceSheet> {
    let bytes = std::fs::read(path).map_err(|e| TimetableError::SourceRead {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_source(&bytes)
}

/// Parses a comma- or tab-separated export. The first non-blank record is the
/// header. Quoted fields may span lines.
pub fn read_source(bytes: &[u8]) -> Result<SourceSheet> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| TimetableError::SourceFormat(format!("source is not UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = split_records(text).into_iter();
    let header = records
        .by_ref()
        .find(|r| !r.trim().is_empty())
        .ok_or_else(|| TimetableError::SourceFormat("source has no header row".to_string()))?;
    let delim = detect_delimiter(header);

    let rows = records
        .filter(|r| !r.trim().is_empty())
        .map(|r| RawAssignment::from_columns(&parse_record(r, delim)))
        .collect();

    Ok(SourceSheet {
        rows,
        fingerprint: fingerprint(bytes),
    })
}

/// Cuts `text` at line breaks that fall outside double quotes. A trailing `\r`
/// before an unquoted break is dropped.
fn split_records(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, ch) in text.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\n' if !in_quotes => {
                let rec = &text[start..i];
                out.push(rec.strip_suffix('\r').unwrap_or(rec));
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < text.len() {
        let rec = &text[start..];
        out.push(rec.strip_suffix('\r').unwrap_or(rec));
    }
    out
}

fn detect_delimiter(header: &str) -> char {
    if header.matches('\t').count() > header.matches(',').count() {
        '\t'
    } else {
        ','
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Splits one record, honoring double quotes and `""` escapes.
fn parse_record(line: &str, delim: char) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                buf.push('"');
                chars.next();
                continue;
            }
            in_quotes = !in_quotes;
            continue;
        }
        if ch == delim && !in_quotes {
            out.push(std::mem::take(&mut buf));
            continue;
        }
        buf.push(ch);
    }
    out.push(buf);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_keep_delimiters() {
        let rec = parse_record(r#"a,"b,c","say ""hi""",d"#, ',');
        assert_eq!(rec, vec!["a", "b,c", r#"say "hi""#, "d"]);
    }

    #[test]
    fn line_breaks_inside_quotes_stay_in_the_record() {
        let recs = split_records("h1,h2\r\na,\"x\r\ny\"\r\nb,c");
        assert_eq!(recs, vec!["h1,h2", "a,\"x\r\ny\"", "b,c"]);
        assert_eq!(parse_record(recs[1], ','), vec!["a", "x\r\ny"]);
    }

    #[test]
    fn tab_header_selects_tab() {
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a,b,c"), ',');
    }
}
