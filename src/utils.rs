//! # Utility Functions Module
//!
//! Small helpers for building the argument vectors handed to pngcrush.

/// Converts an iterable of string-like items to `Vec<String>`.
///
/// # Example
/// ```rust
/// use pngcrush_batch::utils::to_string_vec;
///
/// let level = 3;
/// let args = to_string_vec(["-rem", "alla", "-l", &level.to_string()]);
/// assert_eq!(args, vec!["-rem", "alla", "-l", "3"]);
/// ```
pub fn to_string_vec<T, I>(items: I) -> Vec<String>
where
    T: ToString,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(|item| item.to_string()).collect()
}

/// Builds an argument vector from mixed string-like values.
///
/// # Example
/// ```rust
/// use pngcrush_batch::args;
///
/// let level = 9;
/// let args = args!["-brute", "-l", level];
/// assert_eq!(args, vec!["-brute", "-l", "9"]);
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {
        $crate::utils::to_string_vec([$($item.to_string()),*])
    };
}
