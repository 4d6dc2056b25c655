//! Round-robin rotation among content stubs sharing a route.

/// Select the earliest matching entry and rotate the matched subset left.
///
/// The entry at matched position `j` is replaced by the entry at matched
/// position `(j + 1) % k`, where positions are store positions. Entries that
/// did not match are left where they are, so repeated calls cycle through the
/// matches in registration order.
///
/// # Parameters
///
/// - `entries` - The full collection, reordered in place
/// - `positions` - Ascending store positions of the matching entries
///
/// # Returns
///
/// Returns a copy of the selected entry, or `None` if nothing matched.
pub fn next_in_rotation<T: Clone>(entries: &mut [T], positions: &[usize]) -> Option<T> {
    let first = *positions.first()?;
    let selected = entries.get(first)?.clone();
    rotate_left(entries, positions);
    Some(selected)
}

/// Shift the entries at `positions` one slot towards the front, wrapping the first to the back.
fn rotate_left<T>(entries: &mut [T], positions: &[usize]) {
    for pair in positions.windows(2) {
        entries.swap(pair[0], pair[1]);
    }
}
