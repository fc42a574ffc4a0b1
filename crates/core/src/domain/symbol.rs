use std::collections::HashSet;

pub const DEFAULT_SYMBOLS: &str = "AAPL,MSFT,GOOGL,AMZN,NVDA";
pub const MAX_SYMBOLS: usize = 20;

/// Turns a raw `symbols` query value into the resolver's input list.
///
/// Entries are trimmed, uppercased, deduplicated in first-seen order and capped at
/// [`MAX_SYMBOLS`]. A missing or blank value selects [`DEFAULT_SYMBOLS`].
pub fn parse_symbols(param: Option<&str>) -> Vec<String> {
    let raw = param
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SYMBOLS);

    let mut seen = HashSet::new();
    raw.split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .take(MAX_SYMBOLS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_default_list_when_missing() {
        assert_eq!(
            parse_symbols(None),
            vec!["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA"]
        );
        assert_eq!(parse_symbols(Some("  ")).len(), 5);
    }

    #[test]
    fn trims_uppercases_and_dedupes() {
        assert_eq!(
            parse_symbols(Some(" aapl, msft ,,AAPL,nvda")),
            vec!["AAPL", "MSFT", "NVDA"]
        );
    }

    #[test]
    fn caps_at_twenty_entries() {
        let param: Vec<String> = (0..30).map(|i| format!("S{i}")).collect();
        let parsed = parse_symbols(Some(&param.join(",")));
        assert_eq!(parsed.len(), MAX_SYMBOLS);
        assert_eq!(parsed[0], "S0");
        assert_eq!(parsed[19], "S19");
    }

    #[test]
    fn separators_only_yield_empty_list() {
        assert!(parse_symbols(Some(",, ,")).is_empty());
    }
}
