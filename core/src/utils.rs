//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret for `Debug` output.
///
/// - Empty input prints as `EMPTY`.
/// - Input shorter than 12 chars is fully masked.
/// - Longer input keeps its first and last three chars, so two different
///   digests can still be told apart in logs.
///
/// Plaintext secrets such as passwords should use [`Redact::full`], which
/// never shows any char.
pub struct Redact<'a> {
    value: &'a str,
    full: bool,
}

impl<'a> Redact<'a> {
    /// Mask every char of `value`, only emptiness stays visible.
    pub fn full(value: impl Into<Redact<'a>>) -> Self {
        Self {
            full: true,
            ..value.into()
        }
    }
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact { value, full: false }
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact::from(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact::from(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.value;
        let length = value.len();
        if length == 0 {
            return f.write_str("EMPTY");
        }
        if self.full
            || length < 12
            || !value.is_char_boundary(3)
            || !value.is_char_boundary(length - 3)
        {
            return f.write_str("***");
        }

        write!(f, "{}***{}", &value[..3], &value[length - 3..])
    }
}
