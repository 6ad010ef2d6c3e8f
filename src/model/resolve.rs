//! Ordered-candidate resolution for records whose fields come under several aliases.
//!
//! Candidates are listed in precedence order; blank strings count as absent.

/// Returns the first candidate holding a non-blank value.
pub fn first_present<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    first_where(candidates, |it| !it.trim().is_empty())
}

/// Returns the first candidate `present` accepts. Later candidates are never
/// consulted once one is accepted, even if it turns out to be unusable.
pub fn first_where<T, I, F>(candidates: I, present: F) -> Option<T>
where
    I: IntoIterator<Item = Option<T>>,
    F: FnMut(&T) -> bool,
{
    candidates.into_iter().flatten().find(present)
}
