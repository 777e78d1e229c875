/// Case-insensitive substring match on a display name. Case folding is done in
/// Rust because SQLite's `LIKE` only folds ASCII letters. An empty term matches
/// every name.
pub fn matches_search(name: &str, search_term: &str) -> bool {
    if search_term.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&search_term.to_lowercase())
}
