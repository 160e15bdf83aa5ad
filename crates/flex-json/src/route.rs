//! Routes: ordered lists of keys addressing a node inside a value tree.
//!
//! A [`PathStep`] is either a mapping key or a sequence index. Routes are
//! plain values; extending one produces a new route and never touches the
//! original.

use std::fmt;

use crate::error::{JsonError, JsonResult};

/// One step of a [`Route`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Mapping key.
    Key(String),
    /// Sequence index.
    Index(usize),
}

impl PathStep {
    pub fn is_key(&self) -> bool {
        matches!(self, PathStep::Key(_))
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PathStep::Index(_))
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathStep::Key(key) => Some(key),
            PathStep::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathStep::Key(_) => None,
            PathStep::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => write!(f, ".{key}"),
            PathStep::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_owned())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<&String> for PathStep {
    fn from(key: &String) -> Self {
        PathStep::Key(key.clone())
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

/// An ordered, possibly empty, list of [`PathStep`]s.
///
/// # Example
///
/// ```
/// use flex_json::{route, PathStep, Route};
///
/// let r = route!["users", 0, "name"];
/// assert_eq!(r.len(), 3);
/// assert_eq!(r.to_string(), "$.users[0].name");
/// assert_eq!(r.child("first").len(), 4);
/// assert_eq!(Route::root().child(PathStep::Index(2)).to_pointer(), "/2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Route(Vec<PathStep>);

impl Route {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }

    /// The empty route, addressing the root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathStep> {
        self.0.iter()
    }

    /// Returns `self` followed by every step of `other`.
    pub fn join(&self, other: &Route) -> Route {
        let mut steps = Vec::with_capacity(self.0.len() + other.0.len());
        steps.extend_from_slice(&self.0);
        steps.extend_from_slice(&other.0);
        Route(steps)
    }

    /// Returns `self` followed by `step`.
    pub fn child(&self, step: impl Into<PathStep>) -> Route {
        let mut steps = Vec::with_capacity(self.0.len() + 1);
        steps.extend_from_slice(&self.0);
        steps.push(step.into());
        Route(steps)
    }

    pub fn parent(&self) -> Option<Route> {
        self.0
            .split_last()
            .map(|(_, parent)| Route(parent.to_vec()))
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.0.last()
    }

    /// Returns `true` when `other` lies strictly below `self`.
    pub fn is_ancestor_of(&self, other: &Route) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Parses an RFC 6901 pointer.
    ///
    /// Tokens that are canonical non-negative integers (`0`, `17`, not `017`)
    /// become [`PathStep::Index`]; everything else becomes a key.
    ///
    /// ```
    /// use flex_json::{route, Route};
    ///
    /// assert_eq!(Route::from_pointer("").unwrap(), Route::root());
    /// assert_eq!(Route::from_pointer("/a~1b/0/~0k").unwrap(), route!["a/b", 0, "~k"]);
    /// assert!(Route::from_pointer("a/b").is_err());
    /// ```
    pub fn from_pointer(pointer: &str) -> JsonResult<Route> {
        if pointer.is_empty() {
            return Ok(Route::root());
        }
        if !pointer.starts_with('/') {
            return Err(JsonError::PointerInvalid(pointer.to_string()));
        }
        let steps = pointer
            .split('/')
            .skip(1)
            .map(|token| {
                if is_valid_index(token) {
                    // Canonical digit strings only fail to parse on overflow.
                    token
                        .parse::<usize>()
                        .map(PathStep::Index)
                        .map_err(|_| JsonError::PointerInvalid(pointer.to_string()))
                } else {
                    Ok(PathStep::Key(unescape_component(token)))
                }
            })
            .collect::<JsonResult<Vec<_>>>()?;
        Ok(Route(steps))
    }

    /// Formats the route as an RFC 6901 pointer.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for step in &self.0 {
            out.push('/');
            match step {
                PathStep::Key(key) => out.push_str(&escape_component(key)),
                PathStep::Index(index) => out.push_str(&index.to_string()),
            }
        }
        out
    }
}

/// Decodes one pointer token: `~1` becomes `/`, then `~0` becomes `~`.
fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    component.replace("~1", "/").replace("~0", "~")
}

/// Encodes a key as a pointer token.
fn escape_component(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for ch in component.chars() {
        match ch {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            other => out.push(other),
        }
    }
    out
}

/// Canonical decimal index: digits only, no leading zero.
fn is_valid_index(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return false;
    }
    bytes.iter().all(u8::is_ascii_digit)
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for step in &self.0 {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl AsRef<[PathStep]> for Route {
    fn as_ref(&self) -> &[PathStep] {
        &self.0
    }
}

impl From<PathStep> for Route {
    fn from(step: PathStep) -> Self {
        Route(vec![step])
    }
}

impl From<&str> for Route {
    fn from(key: &str) -> Self {
        Route(vec![PathStep::from(key)])
    }
}

impl From<String> for Route {
    fn from(key: String) -> Self {
        Route(vec![PathStep::Key(key)])
    }
}

impl From<usize> for Route {
    fn from(index: usize) -> Self {
        Route(vec![PathStep::Index(index)])
    }
}

impl From<Vec<PathStep>> for Route {
    fn from(steps: Vec<PathStep>) -> Self {
        Route(steps)
    }
}

impl From<&[PathStep]> for Route {
    fn from(steps: &[PathStep]) -> Self {
        Route(steps.to_vec())
    }
}

impl From<&Route> for Route {
    fn from(route: &Route) -> Self {
        route.clone()
    }
}

impl FromIterator<PathStep> for Route {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Route(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds a [`Route`] from a mixed list of keys and indices.
///
/// ```
/// use flex_json::{route, PathStep};
///
/// let r = route!["a", 0, "b"];
/// assert_eq!(r.steps()[1], PathStep::Index(0));
/// assert!(route![].is_empty());
/// ```
#[macro_export]
macro_rules! route {
    () => {
        $crate::Route::root()
    };
    ($($step:expr),+ $(,)?) => {
        $crate::Route::new(vec![$($crate::PathStep::from($step)),+])
    };
}
