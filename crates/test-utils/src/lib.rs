//! Fixtures for the meteorad-tiles workspace tests: ASCII-row rasters,
//! padded captures, a synthetic radar disk, small palettes and scratch
//! directories.

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Assert that pixel `(x, y)` of a mask set is claimed by exactly the named
/// layers.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_claimed_by;
///
/// assert_claimed_by!(completed, (2, 0), ["a", "b"]);
/// ```
#[macro_export]
macro_rules! assert_claimed_by {
    ($set:expr, ($x:expr, $y:expr), [$($name:expr),* $(,)?]) => {{
        let expected: Vec<&str> = vec![$($name),*];
        let actual: Vec<&str> = $set
            .iter()
            .filter(|(_, mask)| mask.get($x, $y))
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            actual, expected,
            "pixel ({}, {}) claimed by {:?}, expected {:?}",
            $x, $y, actual, expected
        );
    }};
}
