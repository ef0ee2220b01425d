//! Contiguous token-sequence search.
//!
//! Comparison is on token text only; positions are ignored. Both sides are
//! generic over `AsRef<str>` so plain string slices work as well as
//! [`Token`](crate::Token) values.
//!
//! An empty needle never matches, and neither does a needle longer than the
//! haystack. The scan is a naive sliding window: token lists here are short
//! (product models, listing titles) and setup cost would dominate anything
//! smarter.

fn matches_at<H, N>(haystack: &[H], needle: &[N], start: usize) -> bool
where
    H: AsRef<str>,
    N: AsRef<str>,
{
    haystack[start..start + needle.len()]
        .iter()
        .zip(needle)
        .all(|(h, n)| h.as_ref() == n.as_ref())
}

fn starts<'a, H, N>(haystack: &'a [H], needle: &'a [N]) -> impl Iterator<Item = usize> + 'a
where
    H: AsRef<str>,
    N: AsRef<str>,
{
    let last = if needle.is_empty() || needle.len() > haystack.len() {
        None
    } else {
        Some(haystack.len() - needle.len())
    };
    last.into_iter()
        .flat_map(|last| 0..=last)
        .filter(move |&start| matches_at(haystack, needle, start))
}

/// Lowest index `i` where `needle` occurs as a contiguous sublist of
/// `haystack`, or `None`.
pub fn find_first<H, N>(haystack: &[H], needle: &[N]) -> Option<usize>
where
    H: AsRef<str>,
    N: AsRef<str>,
{
    starts(haystack, needle).next()
}

/// Every start index of `needle` in `haystack`, ascending. Occurrences may
/// overlap.
pub fn find_all<H, N>(haystack: &[H], needle: &[N]) -> Vec<usize>
where
    H: AsRef<str>,
    N: AsRef<str>,
{
    starts(haystack, needle).collect()
}

/// True iff [`find_first`] succeeds.
pub fn contains<H, N>(haystack: &[H], needle: &[N]) -> bool
where
    H: AsRef<str>,
    N: AsRef<str>,
{
    find_first(haystack, needle).is_some()
}
