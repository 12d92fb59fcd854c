//! Parser for nmcli terse (`-t` / `-g`) output
//!
//! Terse output separates fields with `:` and escapes literal `:` and `\`
//! inside values with a backslash, so `Cafe\:2G:AA\:BB` holds the two fields
//! `Cafe:2G` and `AA:BB`.

const DELIMITER: char = ':';
const ESCAPE: char = '\\';

/// Split one terse line on unescaped delimiters, unescaping each field.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(escaped) => current.push(escaped),
                // dangling escape at end of line
                None => current.push(ESCAPE),
            },
            DELIMITER => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);

    fields
}

/// Parse every non-empty line of a terse table into its fields.
pub fn rows(output: &str) -> impl Iterator<Item = Vec<String>> + '_ {
    output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(split_fields)
}

/// Canonical form used to compare BSSIDs: no backslashes, trimmed, lowercase.
pub fn normalize_bssid(value: &str) -> String {
    value.replace(ESCAPE, "").trim().to_lowercase()
}
