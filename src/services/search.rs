use crate::models::Movie;

/// Autocomplete results are capped at this many titles
pub const SEARCH_LIMIT: usize = 50;

/// Case-insensitive title search for autocomplete
///
/// Titles starting with the query come first, then titles merely containing
/// it. Catalog order is kept within each group. A blank query matches nothing.
pub fn search_titles<'a>(movies: &'a [Movie], query: &str, limit: usize) -> Vec<&'a Movie> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut prefix = Vec::new();
    let mut infix = Vec::new();
    for movie in movies {
        let title = movie.title.to_lowercase();
        if title.starts_with(&query) {
            prefix.push(movie);
        } else if title.contains(&query) {
            infix.push(movie);
        }
    }

    prefix.into_iter().chain(infix).take(limit).collect()
}
