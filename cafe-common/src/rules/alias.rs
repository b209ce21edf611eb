//! Alias lookup over closed enumerations
//!
//! Every enumerated value the platform accepts from text carries a static
//! table of accepted spellings. Matching is exact and case-sensitive; what
//! happens on a miss is decided per call site by [`Lookup`].

/// An enumeration with a static alias table
pub trait Aliased: Copy + Sized + 'static {
    /// Each variant with the spellings that resolve to it, in declaration order
    const ALIASES: &'static [(Self, &'static [&'static str])];
}

/// Behavior when no alias matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Resolve unmatched input to the given default
    Fallback(T),
    /// Leave unmatched input unresolved
    Strict,
}

/// Resolve `input` against `T`'s alias table
///
/// Returns `None` only under [`Lookup::Strict`] when nothing matches.
pub fn resolve<T: Aliased>(input: &str, lookup: Lookup<T>) -> Option<T> {
    let found = T::ALIASES
        .iter()
        .find(|(_, names)| names.contains(&input))
        .map(|(value, _)| *value);

    match (found, lookup) {
        (Some(value), _) => Some(value),
        (None, Lookup::Fallback(default)) => Some(default),
        (None, Lookup::Strict) => None,
    }
}
