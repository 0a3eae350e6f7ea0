//! # Override Precedence
//!
//! Settings in the gateway are layered: a caller-supplied value, then an
//! environment override, then a computed default. The rule is always the
//! same — walk the sources in order and take the first one that is not
//! blank — so it lives here once instead of being re-spelled at every
//! lookup site.
//!
//! [`Precedence`] evaluates its candidates lazily: a candidate that would
//! touch the filesystem or compute a default is never run once an earlier
//! source has produced a value.
//!
//! Values are returned verbatim. Whitespace is trimmed only to decide
//! blankness; an accepted value keeps its original spelling.

use std::fmt;

/// Returns true when `value` is empty or contains only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns the first non-blank value, verbatim.
pub fn first_non_blank<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values.into_iter().flatten().find(|v| !is_blank(v))
}

/// Parses a boolean-like toggle.
///
/// Case-insensitive after trimming: `1`, `true`, `yes`, `on` enable;
/// `0`, `false`, `no`, `off` disable. Absent, blank, and unrecognized
/// values yield `default`.
pub fn parse_toggle(raw: Option<&str>, default: bool) -> bool {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// A value accepted by [`Precedence::resolve`], tagged with the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The accepted value, untrimmed.
    pub value: String,
    /// Label of the candidate that supplied the value.
    pub source: &'static str,
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.value, self.source)
    }
}

type Candidate<'a> = Box<dyn FnOnce() -> Option<String> + 'a>;

/// An ordered list of lazily evaluated candidate sources.
///
/// ```
/// use mesh_core::Precedence;
///
/// let resolved = Precedence::new()
///     .value("flag", Some("   "))
///     .candidate("env", || Some("from-env".to_string()))
///     .candidate("default", || unreachable!("env already won"))
///     .resolve();
/// assert_eq!(resolved.map(|r| r.source), Some("env"));
/// ```
#[derive(Default)]
pub struct Precedence<'a> {
    candidates: Vec<(&'static str, Candidate<'a>)>,
}

impl<'a> Precedence<'a> {
    /// Create an empty precedence chain.
    pub fn new() -> Self {
        Self { candidates: Vec::new() }
    }

    /// Append a lazily evaluated candidate.
    #[must_use]
    pub fn candidate<F>(mut self, source: &'static str, provider: F) -> Self
    where
        F: FnOnce() -> Option<String> + 'a,
    {
        self.candidates.push((source, Box::new(provider)));
        self
    }

    /// Append an already-known candidate value.
    #[must_use]
    pub fn value(self, source: &'static str, value: Option<&str>) -> Self {
        let owned = value.map(str::to_owned);
        self.candidate(source, move || owned)
    }

    /// Number of registered candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true when no candidates are registered.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Evaluate candidates in order and return the first non-blank value.
    pub fn resolve(self) -> Option<Resolved> {
        for (source, provider) in self.candidates {
            match provider() {
                Some(value) if !is_blank(&value) => {
                    tracing::debug!(source, "override precedence resolved");
                    return Some(Resolved { value, source });
                }
                _ => tracing::trace!(source, "precedence candidate skipped"),
            }
        }
        None
    }
}

impl fmt::Debug for Precedence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<&str> = self.candidates.iter().map(|(s, _)| *s).collect();
        f.debug_struct("Precedence").field("sources", &sources).finish()
    }
}
