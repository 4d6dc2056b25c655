//! Route matching for configured stubs and statistics records.
//!
//! Every registry entry is identified by a path and a method. The matching
//! rules are shared through the [`Routable`] trait so that file stubs, content
//! stubs and route statistics all resolve requests the same way.

/// Path and method of an inbound request.
///
/// The path is the raw request target, query string included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestKey<'a> {
    pub path: &'a str,
    pub method: &'a str,
}

impl<'a> RequestKey<'a> {
    /// Create a new request key.
    ///
    /// # Parameters
    ///
    /// - `path` - Request path including any query string
    /// - `method` - Request method, compared case-sensitively
    ///
    /// # Returns
    ///
    /// Returns a new `RequestKey` instance.
    pub const fn new(path: &'a str, method: &'a str) -> Self {
        Self { path, method }
    }

    /// Request path with the query string removed.
    pub fn path_without_query(&self) -> &'a str {
        self.path.split_once('?').map_or(self.path, |(path, _)| path)
    }
}

/// An entry addressable by path and method.
///
/// Implementors only expose their identity; the matching rule itself lives in
/// [`Routable::matches`] so every collection applies it identically.
pub trait Routable {
    /// Configured path, compared verbatim.
    fn path(&self) -> &str;

    /// Configured method, compared verbatim.
    fn method(&self) -> &str;

    /// Whether the request query string is ignored when comparing paths.
    fn skip_query_params(&self) -> bool;

    /// Check if this entry answers the given request.
    ///
    /// # Parameters
    ///
    /// - `key` - Request path and method
    ///
    /// # Returns
    ///
    /// Returns `true` if both the (possibly query-stripped) path and the method are equal.
    fn matches(&self, key: &RequestKey<'_>) -> bool {
        let searched = if self.skip_query_params() { key.path_without_query() } else { key.path };
        self.path() == searched && self.method() == key.method
    }
}

/// Collect the positions of every entry matching the request, in registration order.
///
/// # Parameters
///
/// - `entries` - Collection to scan
/// - `key` - Request path and method
///
/// # Returns
///
/// Returns the store positions of all matches, possibly empty.
pub fn find_all<T: Routable>(entries: &[T], key: &RequestKey<'_>) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.matches(key))
        .map(|(position, _)| position)
        .collect()
}

/// Find the most recently registered entry matching the request.
///
/// # Parameters
///
/// - `entries` - Collection to scan
/// - `key` - Request path and method
///
/// # Returns
///
/// Returns the store position of the last match, or `None`.
pub fn find_last<T: Routable>(entries: &[T], key: &RequestKey<'_>) -> Option<usize> {
    entries.iter().rposition(|entry| entry.matches(key))
}

/// Find the most recently registered entry with exactly this path and method.
///
/// Unlike [`find_last`], the query string is never stripped.
pub fn find_exact<T: Routable>(entries: &[T], path: &str, method: &str) -> Option<usize> {
    entries.iter().rposition(|entry| entry.path() == path && entry.method() == method)
}
