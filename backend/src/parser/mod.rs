//! CSV decoding with encoding and delimiter auto-detection.
//!
//! Turns raw file bytes into a [`Table`]: a header row plus string rows of
//! the same width. No counting logic here.

use crate::error::{CsvError, CsvResult};

/// Delimiters tried during auto-detection, in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Parsed CSV content with metadata.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column headers, trimmed, in file order
    pub headers: Vec<String>,
    /// Data rows; every row has `headers.len()` cells
    pub rows: Vec<Vec<String>>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: u8,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        // chardet reports an empty charset for empty input
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// Latin-1 and Windows-1252 map every byte, so decoding cannot fail. A
/// leading UTF-8 byte order mark is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    decoded.trim_start_matches('\u{feff}').to_string()
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");

    let mut best = b',';
    let mut best_count = 0;

    for &sep in &CANDIDATE_DELIMITERS {
        let count = first_line.bytes().filter(|&b| b == sep).count();
        if count > best_count {
            best_count = count;
            best = sep;
        }
    }

    best
}

/// Parse CSV text with an explicit delimiter.
///
/// The first non-empty line is the header. Rows must have exactly as many
/// cells as the header. Cell values are kept verbatim.
///
/// # Example
/// ```
/// use tally::parser::parse_str;
///
/// let table = parse_str("name,borough\nRex,Brooklyn\n", b',').unwrap();
/// assert_eq!(table.headers, vec!["name", "borough"]);
/// assert_eq!(table.rows[0], vec!["Rex", "Brooklyn"]);
/// ```
pub fn parse_str(content: &str, delimiter: u8) -> CsvResult<Table> {
    parse_with_encoding(content, delimiter, "utf-8".to_string())
}

/// Parse CSV bytes, detecting encoding, and the delimiter when not given.
///
/// Valid UTF-8 is always read as UTF-8; chardet only decides for other bytes.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<u8>) -> CsvResult<Table> {
    let encoding = match std::str::from_utf8(bytes) {
        Ok(_) => "utf-8".to_string(),
        Err(_) => detect_encoding(bytes),
    };
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    parse_with_encoding(&content, delimiter, encoding)
}

fn parse_with_encoding(content: &str, delimiter: u8, encoding: String) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table {
        headers,
        rows,
        encoding,
        delimiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let table = parse_str("name;age\nAlice;30\nBob;25", b';').unwrap();

        assert_eq!(table.headers, vec!["name", "age"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Alice", "30"]);
        assert_eq!(table.rows[1], vec!["Bob", "25"]);
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name,address\nRex,\"12 Main St, Apt 4\"\n";
        let table = parse_str(csv, b',').unwrap();

        assert_eq!(table.rows[0][1], "12 Main St, Apt 4");
    }

    #[test]
    fn test_cells_not_trimmed() {
        let table = parse_str("a,b\n x ,y\n", b',').unwrap();
        assert_eq!(table.rows[0][0], " x ");
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse_str("a,b\n1,2\n\n3,4\n", b',').unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_missing_values() {
        let table = parse_str("a,b,c\n1,,3", b',').unwrap();
        assert_eq!(table.rows[0], vec!["1", "", "3"]);
    }

    #[test]
    fn test_unequal_row_rejected() {
        let err = parse_str("a,b\n1,2\n1,2,3\n", b',').unwrap_err();
        match err {
            CsvError::ParseError { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 2"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_str("", b','), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_str("\n\n", b','), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_blank_header_error() {
        assert!(matches!(parse_str(",\n1,2\n", b','), Err(CsvError::NoHeaders)));
    }

    #[test]
    fn test_header_only() {
        let table = parse_str("name,borough\n", b',').unwrap();
        assert_eq!(table.headers.len(), 2);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), b',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), b'\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), b'|');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[test]
    fn test_auto_parse() {
        let table = parse_bytes(b"name;age\nAlice;30\nBob;25", None).unwrap();

        assert_eq!(table.delimiter, b';');
        assert_eq!(table.encoding, "utf-8");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.headers, vec!["name", "age"]);
    }

    #[test]
    fn test_explicit_delimiter_wins() {
        // Semicolons dominate the header but the caller asked for commas.
        let table = parse_bytes(b"a;b;c,d\n1;2;3,4\n", Some(b',')).unwrap();
        assert_eq!(table.headers, vec!["a;b;c", "d"]);
    }

    #[test]
    fn test_bom_stripped() {
        let table = parse_bytes(b"\xEF\xBB\xBFname,age\nRex,3\n", None).unwrap();
        assert_eq!(table.headers[0], "name");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        assert_eq!(decode_content(bytes, "iso-8859-1"), "Société");
    }

    #[test]
    fn test_valid_utf8_never_redetected() {
        // Short accented UTF-8 can look like Latin-1 to chardet.
        let table = parse_bytes(b"name\n\xC3\x89CLAIR\n", None).unwrap();

        assert_eq!(table.encoding, "utf-8");
        assert_eq!(table.rows[0], vec!["ÉCLAIR"]);
    }
}
