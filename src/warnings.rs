//! Advisory warnings returned alongside every Cloud Controller operation.
//!
//! Every REST call yields a result together with zero or more human-readable
//! warnings. Aggregate operations concatenate the warnings of each sub-call in
//! the order the sub-calls were issued and hand the whole sequence back to the
//! caller, on the success path and on the error path alike.
//!
//! The usual shape of an aggregate operation is:
//!
//! ```ignore
//! let mut warnings = Warnings::new();
//! let result: ActionResult<Summary> = async {
//!     let org = warnings.absorb(self.get_organization(guid).await)?;
//!     let spaces = warnings.absorb(self.get_spaces(&org).await)?;
//!     Ok(Summary { org, spaces })
//! }
//! .await;
//! Warned::new(result, warnings)
//! ```
//!
//! [`Warnings::absorb`] appends before it yields the inner result, so a
//! failing sub-call can never drop its warnings.

use std::slice;

use serde::Serialize;

/// An ordered sequence of advisory strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Warnings(Vec<String>);

impl Warnings {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a single warning.
    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    /// Appends every warning from `other`, preserving order.
    pub fn append(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Appends the warnings carried by `reply` and yields its value.
    ///
    /// The append happens unconditionally, before the caller gets a chance to
    /// inspect the value, which is what keeps warnings from a failing call.
    pub fn absorb<T>(&mut self, reply: Warned<T>) -> T {
        let Warned { value, warnings } = reply;
        self.append(warnings);
        value
    }

    /// Returns `true` when no warnings have been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of recorded warnings.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the warnings in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Borrows the warnings as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consumes the sequence, returning the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Warnings {
    fn from(warnings: Vec<String>) -> Self {
        Self(warnings)
    }
}

impl<S: Into<String>> FromIterator<S> for Warnings {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for Warnings {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A value paired with the warnings gathered while producing it.
///
/// Client calls return `Warned<Result<T, ApiError>>` and actor operations
/// return `Warned<Result<T, ActionError>>`, the Rust rendering of a
/// `(result, warnings, error)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Warned<T> {
    /// The produced value.
    pub value: T,
    /// Warnings gathered while producing it.
    pub warnings: Warnings,
}

impl<T> Warned<T> {
    /// Pairs `value` with `warnings`.
    pub const fn new(value: T, warnings: Warnings) -> Self {
        Self { value, warnings }
    }

    /// Wraps `value` with no warnings.
    pub const fn bare(value: T) -> Self {
        Self::new(value, Warnings::new())
    }

    /// Transforms the value while keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Warned<U> {
        Warned::new(f(self.value), self.warnings)
    }

    /// Splits into the value and its warnings.
    pub fn into_parts(self) -> (T, Warnings) {
        (self.value, self.warnings)
    }
}

impl<T, E> Warned<Result<T, E>> {
    /// Converts the error type while keeping the warnings.
    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Warned<Result<T, F>> {
        self.map(|result| result.map_err(f))
    }

    /// Converts the error type through `From`.
    pub fn err_into<F: From<E>>(self) -> Warned<Result<T, F>> {
        self.map_err(F::from)
    }
}
