use std::path::{Path, PathBuf};

use super::model::CsvDataset;

/// Delimiters tried by [`sniff_delimiter`], in order of preference.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// How many non-empty lines are inspected when sniffing.
const SNIFF_LINES: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not UTF-8 encoded text", path.display())]
    Encoding { path: PathBuf },

    #[error("{} has no header row", path.display())]
    NoHeader { path: PathBuf },

    #[error("{} line {line}: found {found} fields, header has {expected}", path.display())]
    TooManyFields {
        path: PathBuf,
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a CSV file, detecting its delimiter from the content.
pub fn load_csv(path: &Path) -> Result<CsvDataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| LoadError::Encoding {
        path: path.to_path_buf(),
    })?;

    let dataset = parse_csv(&text, path)?;
    log::info!(
        "Loaded {} rows x {} columns from {} (delimiter {:?})",
        dataset.len(),
        dataset.column_names.len(),
        path.display(),
        dataset.delimiter as char
    );
    Ok(dataset)
}

/// Parse CSV text already in memory. `path` is only recorded for messages.
pub fn parse_csv(text: &str, path: &Path) -> Result<CsvDataset, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = sniff_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let parse_err = |source: csv::Error| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let column_names: Vec<String> = reader
        .headers()
        .map_err(parse_err)?
        .iter()
        .map(str::to_string)
        .collect();
    if column_names.is_empty() {
        return Err(LoadError::NoHeader {
            path: path.to_path_buf(),
        });
    }

    // Short rows are padded with empty cells; rows with extra fields are
    // rejected. Whitespace-only lines come through as a single empty cell.
    let expected = column_names.len();
    let mut rows = Vec::new();
    for rec in reader.records() {
        let rec = rec.map_err(parse_err)?;
        if rec.len() == 1 && rec[0].is_empty() {
            continue;
        }
        if rec.len() > expected {
            return Err(LoadError::TooManyFields {
                path: path.to_path_buf(),
                line: rec.position().map_or(0, |p| p.line()),
                found: rec.len(),
                expected,
            });
        }
        let mut cells: Vec<String> = rec.iter().map(str::to_string).collect();
        cells.resize(expected, String::new());
        rows.push(cells);
    }

    Ok(CsvDataset {
        path: path.to_path_buf(),
        delimiter,
        column_names,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Delimiter detection
// ---------------------------------------------------------------------------

/// Guess the field delimiter from the first lines of `text`.
///
/// A candidate must appear in the header line. Among those, one that occurs
/// the same number of times on every sampled line wins over one that does
/// not; ties go to the higher header count, then to candidate order.
/// Falls back to `,` (single-column files).
pub fn sniff_delimiter(text: &str) -> u8 {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let Some(header) = lines.first() else {
        return b',';
    };

    let mut best: Option<(bool, usize, u8)> = None;
    for &delim in &CANDIDATE_DELIMITERS {
        let header_count = count_unquoted(header, delim);
        if header_count == 0 {
            continue;
        }
        let consistent = lines
            .iter()
            .all(|line| count_unquoted(line, delim) == header_count);

        let better = match best {
            None => true,
            Some((best_consistent, best_count, _)) => {
                (consistent, header_count) > (best_consistent, best_count)
            }
        };
        if better {
            best = Some((consistent, header_count, delim));
        }
    }

    best.map(|(_, _, d)| d).unwrap_or(b',')
}

/// Occurrences of `delim` outside double-quoted sections of `line`.
fn count_unquoted(line: &str, delim: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &b in line.as_bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delim && !in_quotes {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn parse(text: &str) -> Result<CsvDataset, LoadError> {
        parse_csv(text, Path::new("test.csv"))
    }

    #[test]
    fn sniffs_common_delimiters() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n"), b',');
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\n1\t2\n"), b'\t');
        assert_eq!(sniff_delimiter("a|b\n1|2\n"), b'|');
    }

    #[test]
    fn sniff_prefers_consistent_delimiter() {
        // Decimal commas inside semicolon-separated data.
        let text = "latitude;longitude;name\n1,5;2,5;A\n3;4;B\n";
        assert_eq!(sniff_delimiter(text), b';');
    }

    #[test]
    fn sniff_ignores_quoted_delimiters() {
        let text = "name;latitude;longitude\n\"Smith, John\";1;2\n";
        assert_eq!(sniff_delimiter(text), b';');
    }

    #[test]
    fn sniff_falls_back_to_comma() {
        assert_eq!(sniff_delimiter("latitude\n1\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn parses_rows_in_order_with_trimmed_cells() {
        let ds = parse("\u{feff}Latitude; Longitude ;name\n1.0;2.0; A \n3;4;B\n").unwrap();
        assert_eq!(ds.delimiter, b';');
        assert_eq!(ds.column_names, vec!["Latitude", "Longitude", "name"]);
        assert_eq!(ds.rows, vec![vec!["1.0", "2.0", "A"], vec!["3", "4", "B"]]);
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let ds = parse("latitude,longitude\n").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.column_names.len(), 2);
    }

    #[test]
    fn empty_file_is_rejected() {
        assert_matches!(parse(""), Err(LoadError::NoHeader { .. }));
    }

    #[test]
    fn row_with_extra_fields_is_rejected() {
        assert_matches!(
            parse("latitude,longitude\n1,2\n3,4,5\n"),
            Err(LoadError::TooManyFields { line: 3, found: 3, expected: 2, .. })
        );
    }

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let ds = parse("latitude,longitude,name\n1,2\n3,4,B\n5\n").unwrap();
        assert_eq!(
            ds.rows,
            vec![vec!["1", "2", ""], vec!["3", "4", "B"], vec!["5", "", ""]]
        );
    }

    #[test]
    fn whitespace_only_lines_are_skipped() {
        let ds = parse("latitude,longitude\n1,2\n   \n\t\n3,4\n").unwrap();
        assert_eq!(ds.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert_matches!(load_csv(&missing), Err(LoadError::Read { .. }));
    }

    #[test]
    fn non_utf8_file_is_an_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.csv");
        std::fs::write(&path, b"name,latitude,longitude\n\xe9t\xe9,1,2\n").unwrap();
        assert_matches!(load_csv(&path), Err(LoadError::Encoding { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pts.csv");
        std::fs::write(&path, "latitude,longitude\n1,2\n").unwrap();
        let ds = load_csv(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.path, path);
    }
}
