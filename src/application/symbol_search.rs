use crate::domain::analysis::SymbolInfo;

/// Case-insensitive substring match on ticker or company name.
/// An empty or blank query keeps every entry.
pub fn filter_symbols<'a>(symbols: &'a [SymbolInfo], query: &str) -> Vec<&'a SymbolInfo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return symbols.iter().collect();
    }

    symbols
        .iter()
        .filter(|info| {
            info.symbol.to_lowercase().contains(&needle)
                || info.name.to_lowercase().contains(&needle)
        })
        .collect()
}
