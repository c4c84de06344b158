//! Palette file parser.
//!
//! Parses palette text into a [`Palette`]. One entry per line:
//!
//! ```text
//! r #ff0000 Red            # trailing comment
//! g 00ff00 Leaf green
//! #0000ff Blue             # legacy: symbol omitted
//! ```
//!
//! The hex token may drop its `#`. Any other `#` that starts or sits inside
//! a token begins a comment. Lines without a symbol get the next unused
//! default symbol once the whole file has been read.

use std::collections::HashSet;

use crate::error::{XsError, Result};
use crate::types::{default_symbols, Colour, Palette, PaletteEntry};

const LINE_HELP: &str = "Expected `SYMBOL HEXCOLOR NAME`, e.g. `r #ff0000 Red`";

/// A parsed line before default symbols are assigned.
#[derive(Debug, PartialEq)]
struct RawEntry {
    symbol: Option<char>,
    colour: Colour,
    name: Option<String>,
}

/// Parse palette text.
///
/// Fails on the first malformed line; no partial palette is returned.
pub fn parse_palette(source: &str) -> Result<Palette> {
    let mut raw = Vec::new();
    let mut used = HashSet::new();

    for (i, line) in source.lines().enumerate() {
        let line_no = i + 1;
        let entry = parse_line(line).map_err(|message| XsError::Format {
            line: line_no,
            message,
            help: Some(LINE_HELP.to_string()),
        })?;

        let Some(entry) = entry else {
            continue;
        };

        if let Some(symbol) = entry.symbol {
            if !used.insert(symbol) {
                return Err(XsError::Format {
                    line: line_no,
                    message: format!("Symbol '{}' is already used", symbol),
                    help: Some("Every palette entry needs its own symbol".to_string()),
                });
            }
        }
        raw.push((line_no, entry));
    }

    let mut spare = default_symbols().filter(|c| !used.contains(c));
    let mut entries = Vec::with_capacity(raw.len());

    for (line_no, entry) in raw {
        let symbol = match entry.symbol {
            Some(symbol) => symbol,
            None => spare.next().ok_or_else(|| XsError::Format {
                line: line_no,
                message: "No default symbols left for this colour".to_string(),
                help: Some("Give the entry an explicit symbol".to_string()),
            })?,
        };
        entries.push(PaletteEntry::new(symbol, entry.colour, entry.name));
    }

    Palette::new(entries)
}

/// Parse one line. `Ok(None)` for blank and comment-only lines.
fn parse_line(line: &str) -> std::result::Result<Option<RawEntry>, String> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (first, rest) = split_token(line);

    // Legacy form without a symbol: `#RRGGBB( NAME)?`
    if is_legacy_hex(first) {
        return Ok(Some(RawEntry {
            symbol: None,
            colour: parse_hex_token(first)?,
            name: name_of(rest),
        }));
    }

    let mut chars = first.chars();
    let symbol = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(format!(
                "Symbol must be exactly one character, got '{}'",
                first
            ))
        }
    };

    if rest.is_empty() {
        return Err(format!("Missing colour after symbol '{}'", symbol));
    }

    let (hex, name) = split_token(rest);

    Ok(Some(RawEntry {
        symbol: Some(symbol),
        colour: parse_hex_token(hex)?,
        name: name_of(name),
    }))
}

/// Truncate a line at its comment, keeping the `#` that opens the hex token.
fn strip_comment(line: &str) -> &str {
    let hex_token = if is_legacy_hex(split_token(line.trim_start()).0) {
        0
    } else {
        1
    };

    let mut token = 0;
    let mut in_token = false;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if in_token {
                in_token = false;
                token += 1;
            }
            continue;
        }

        let token_start = !in_token;
        in_token = true;

        if c == '#' && !(token_start && token == hex_token) {
            return &line[..i];
        }
    }

    line
}

/// Split off the first whitespace-delimited token.
fn split_token(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (s, ""),
    }
}

fn is_legacy_hex(token: &str) -> bool {
    token
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn parse_hex_token(token: &str) -> std::result::Result<Colour, String> {
    Colour::from_hex(token).map_err(|_| format!("Invalid hex colour '{}'", token))
}

fn name_of(rest: &str) -> Option<String> {
    let name = rest.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_palette() {
        let palette = parse_palette("r #ff0000 Red\ng 00ff00 Green\n").unwrap();

        assert_eq!(palette.len(), 2);
        let red = palette.get(0).unwrap();
        assert_eq!(red.symbol(), 'r');
        assert_eq!(red.colour(), Colour::rgb(255, 0, 0));
        assert_eq!(red.name(), Some("Red"));

        let green = palette.lookup_by_symbol('g').unwrap();
        assert_eq!(green.colour(), Colour::rgb(0, 255, 0));
        assert_eq!(green.name(), Some("Green"));

        assert!(matches!(
            palette.lookup_by_symbol('b'),
            Err(XsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_name_keeps_inner_spaces() {
        let palette = parse_palette("s 87ceeb   Sky   blue  \n").unwrap();
        assert_eq!(palette.get(0).unwrap().name(), Some("Sky   blue"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let source = r#"
# Reds
r #ff0000 Red   # primary

   # indented comment
o ffa500 Orange#ish
"#;
        let palette = parse_palette(source).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0).unwrap().name(), Some("Red"));
        assert_eq!(palette.get(1).unwrap().name(), Some("Orange"));
    }

    #[test]
    fn test_missing_name() {
        let palette = parse_palette("k #000000\n").unwrap();
        assert_eq!(palette.get(0).unwrap().name(), None);
    }

    #[test]
    fn test_legacy_without_symbol() {
        let source = "! #ffffff White\n#000000 Black\n#808080\n";
        let palette = parse_palette(source).unwrap();

        assert_eq!(palette.len(), 3);
        // '!' is taken explicitly, so defaults start at '"'
        assert_eq!(palette.get(1).unwrap().symbol(), '"');
        assert_eq!(palette.get(1).unwrap().name(), Some("Black"));
        assert_eq!(palette.get(2).unwrap().symbol(), '$');
        assert_eq!(palette.get(2).unwrap().colour(), Colour::rgb(128, 128, 128));
    }

    #[test]
    fn test_legacy_comment_after_hex() {
        let palette = parse_palette("#102030 # just a colour\n").unwrap();
        assert_eq!(palette.get(0).unwrap().colour(), Colour::rgb(0x10, 0x20, 0x30));
        assert_eq!(palette.get(0).unwrap().name(), None);
    }

    #[test]
    fn test_implied_symbols_skip_later_explicit_ones() {
        let palette = parse_palette("#000000\n! #ffffff White\n").unwrap();
        assert_eq!(palette.get(0).unwrap().symbol(), '"');
        assert_eq!(palette.get(1).unwrap().symbol(), '!');
    }

    #[test]
    fn test_unicode_symbol() {
        let palette = parse_palette("★ #ffd700 Gold\n").unwrap();
        assert_eq!(palette.get(0).unwrap().symbol(), '★');
    }

    #[test]
    fn test_error_wrong_token_count() {
        let err = parse_palette("r #ff0000 Red\nq\n").unwrap_err();
        assert!(matches!(err, XsError::Format { line: 2, .. }));
    }

    #[test]
    fn test_error_long_symbol() {
        let err = parse_palette("red #ff0000 Red\n").unwrap_err();
        assert!(matches!(err, XsError::Format { line: 1, .. }));
    }

    #[test]
    fn test_error_bad_hex() {
        let err = parse_palette("r #ff0000 Red\n\ng #00gg00 Green\n").unwrap_err();
        assert!(matches!(err, XsError::Format { line: 3, .. }));

        assert!(parse_palette("r #fff Red\n").is_err());
    }

    #[test]
    fn test_error_duplicate_symbol() {
        let err = parse_palette("r #ff0000 Red\nr #aa0000 Dark red\n").unwrap_err();
        assert!(matches!(err, XsError::Format { line: 2, .. }));
    }

    #[test]
    fn test_empty_source() {
        let palette = parse_palette("\n# nothing here\n").unwrap();
        assert!(palette.is_empty());
    }

    #[test]
    fn test_round_trip_through_display() {
        let source = "r #ff0000 Red\ng #00ff00 Green\n#0000ff\n";
        let palette = parse_palette(source).unwrap();
        let reparsed = parse_palette(&palette.to_string()).unwrap();
        assert_eq!(palette, reparsed);
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("r #ff0000 Red # c"), "r #ff0000 Red ");
        assert_eq!(strip_comment("# only a comment"), "");
        assert_eq!(strip_comment("#ff0000 Red #c"), "#ff0000 Red ");
        assert_eq!(strip_comment("r ff0000 Red"), "r ff0000 Red");
        assert_eq!(strip_comment("r# ff0000"), "r");
    }
}
