//! Line equality and window containment.
//!
//! Lines compare equal when they match after trimming surrounding
//! whitespace, so re-indented or trailing-space edits never count as
//! changes. Containment is checked over explicit windows of a sequence
//! rather than over slices so callers can pass positions straight from the
//! diff records.

use crate::types::MergeError;

/// Whitespace-insensitive line equality. Two blank lines are equal.
pub fn lines_equal(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

/// A contiguous run of `len` items starting at `start`.
#[derive(Debug)]
pub struct Window<'a, T> {
    items: &'a [T],
    start: usize,
    len: usize,
}

// A window is a borrowed view: it is `Copy` for any `T`.
impl<T> Clone for Window<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Window<'_, T> {}

impl<'a, T> Window<'a, T> {
    /// Validates the bounds up front so the containment check never indexes
    /// out of range.
    pub fn new(items: &'a [T], start: usize, len: usize) -> Result<Self, MergeError> {
        let fits = start
            .checked_add(len)
            .is_some_and(|end| end <= items.len());
        if !fits {
            return Err(MergeError::WindowOutOfRange {
                start,
                len,
                available: items.len(),
            });
        }
        Ok(Self { items, start, len })
    }

    pub fn as_slice(&self) -> &'a [T] {
        &self.items[self.start..self.start + self.len]
    }
}

/// Whether `contained` occurs contiguously inside `contains`.
///
/// The first element of `contained` is looked up once, scanning `contains`
/// forward from its start. Only that first anchor is tried: the rest of
/// `contained` must follow it element for element.
pub fn is_subset_of<T, F>(contained: Window<'_, T>, contains: Window<'_, T>, eq: F) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    let needle = contained.as_slice();
    let haystack = contains.as_slice();

    let Some(head) = needle.first() else {
        return true;
    };
    if needle.len() > haystack.len() {
        return false;
    }

    let Some(anchor) = haystack.iter().position(|item| eq(head, item)) else {
        return false;
    };
    if haystack.len() - anchor < needle.len() {
        return false;
    }

    needle
        .iter()
        .zip(&haystack[anchor..])
        .skip(1)
        .all(|(a, b)| eq(a, b))
}

/// [`is_subset_of`] over line windows, using [`lines_equal`].
pub fn is_line_subset_of<S: AsRef<str>>(contained: Window<'_, S>, contains: Window<'_, S>) -> bool {
    is_subset_of(contained, contains, |a, b| lines_equal(a.as_ref(), b.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window<'a>(items: &'a [&'a str], start: usize, len: usize) -> Window<'a, &'a str> {
        Window::new(items, start, len).unwrap()
    }

    #[test]
    fn test_trimmed_equality() {
        assert!(lines_equal("  foo();", "foo();\t"));
        assert!(lines_equal("", "   "));
        assert!(lines_equal("\t", ""));
        assert!(!lines_equal("foo", "Foo"));
        assert!(!lines_equal("foo", ""));
        assert!(!lines_equal("a b", "a  b"));
    }

    #[test]
    fn test_window_bounds() {
        let items = ["a", "b", "c"];
        assert!(Window::new(&items, 0, 3).is_ok());
        assert!(Window::new(&items, 3, 0).is_ok());
        assert_eq!(
            Window::new(&items, 2, 2).unwrap_err(),
            MergeError::WindowOutOfRange {
                start: 2,
                len: 2,
                available: 3
            }
        );
        assert!(Window::new(&items, 4, 0).is_err());
        assert!(Window::new(&items, 1, usize::MAX).is_err());
    }

    #[test]
    fn test_prefix_is_contained() {
        let first = ["A", "M1", "M2"];
        let second = ["A", "M1"];
        assert!(is_line_subset_of(window(&second, 1, 1), window(&first, 1, 2)));
        assert!(!is_line_subset_of(window(&first, 1, 2), window(&second, 1, 1)));
    }

    #[test]
    fn test_contained_in_middle() {
        let outer = ["x", "a", "b", "y"];
        let inner = ["a ", " b"];
        assert!(is_line_subset_of(window(&inner, 0, 2), window(&outer, 0, 4)));
    }

    #[test]
    fn test_not_enough_room_after_anchor() {
        let outer = ["x", "y", "a"];
        let inner = ["a", "b"];
        assert!(!is_line_subset_of(window(&inner, 0, 2), window(&outer, 0, 3)));
    }

    #[test]
    fn test_only_first_anchor_is_tried() {
        let outer = ["m", "a", "m", "b"];
        let inner = ["m", "b"];
        assert!(!is_line_subset_of(window(&inner, 0, 2), window(&outer, 0, 4)));
    }

    #[test]
    fn test_search_stays_inside_window() {
        let outer = ["a", "b", "c"];
        let inner = ["a"];
        assert!(!is_line_subset_of(window(&inner, 0, 1), window(&outer, 1, 2)));
    }

    #[test]
    fn test_empty_window_is_contained() {
        let outer = ["a"];
        let inner: [&str; 0] = [];
        assert!(is_line_subset_of(window(&inner, 0, 0), window(&outer, 0, 1)));
    }

    #[test]
    fn test_custom_equality() {
        let outer = [1, 2, 3, 4];
        let inner = [12, 13];
        let contained = Window::new(&inner, 0, 2).unwrap();
        let contains = Window::new(&outer, 0, 4).unwrap();
        assert!(is_subset_of(contained, contains, |a, b| a % 10 == b % 10));
    }
}
