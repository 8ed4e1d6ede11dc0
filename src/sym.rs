//! The immutable byte-string value type underlying identifiers and literals
//! in Turing machine source text, and the case-insensitive state-name
//! wrapper built on top of it.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::TurError;

/// An immutable byte string with value semantics.
///
/// Supports length, bounds-checked byte access, case-sensitive and
/// case-insensitive (ASCII-fold) equality, and decimal parsing. Cloning a
/// `Symbol` copies its bytes; there is no shared/aliased storage between
/// instances.
#[derive(Debug, Clone, Eq)]
pub struct Symbol(Vec<u8>);

impl Symbol {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Symbol(bytes.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the byte at `index`. Fatal (panics) on an out-of-range index,
    /// matching the core contract's treatment of symbol indexing as a
    /// programming error rather than a recoverable one.
    pub fn byte_at(&self, index: usize) -> u8 {
        self.0[index]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("<invalid utf8>")
    }

    /// ASCII case-insensitive equality.
    pub fn eq_ignore_ascii_case(&self, other: &Symbol) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    pub fn eq_ignore_ascii_case_str(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.as_bytes())
    }

    /// Parses the symbol as a signed decimal integer. A leading `-` is
    /// permitted; any other non-digit byte is fatal.
    pub fn parse_i64(&self) -> Result<i64, TurError> {
        let s = self.as_str();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TurError::Parse {
                line: 0,
                message: format!("'{s}' is not a valid integer"),
            });
        }

        let magnitude: i64 = digits.parse().map_err(|_| TurError::Parse {
            line: 0,
            message: format!("'{s}' is out of range"),
        })?;

        Ok(if negative { -magnitude } else { magnitude })
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol(s.as_bytes().to_vec())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol(s.into_bytes())
    }
}

/// A non-empty, case-insensitive identifier drawn from `[A-Za-z0-9]+`.
///
/// Two `StateName`s that differ only in ASCII case compare and hash equal,
/// so this type can be used directly as a `HashMap` key without a separate
/// lowercasing step at every lookup site. The original casing is preserved
/// for display.
#[derive(Debug, Clone, Eq)]
pub struct StateName(Symbol);

impl StateName {
    pub fn new(text: impl Into<Symbol>) -> Self {
        StateName(text.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The reserved sink state name, matched case-insensitively.
    pub fn is_halt(&self) -> bool {
        self.0.eq_ignore_ascii_case_str("halt")
    }
}

impl PartialEq for StateName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Hash for StateName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.as_bytes() {
            b.to_ascii_lowercase().hash(state);
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateName {
    fn from(s: &str) -> Self {
        StateName(Symbol::from(s))
    }
}

impl From<String> for StateName {
    fn from(s: String) -> Self {
        StateName(Symbol::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_equality() {
        let a = StateName::from("Scan");
        let b = StateName::from("sCAN");
        assert_eq!(a, b);
    }

    #[test]
    fn preserves_display_casing() {
        let a = StateName::from("Scan");
        assert_eq!(a.as_str(), "Scan");
    }

    #[test]
    fn halt_is_case_insensitive() {
        assert!(StateName::from("HALT").is_halt());
        assert!(StateName::from("Halt").is_halt());
        assert!(!StateName::from("halting").is_halt());
    }

    #[test]
    fn decimal_parse_accepts_leading_minus() {
        let s = Symbol::from("-42");
        assert_eq!(s.parse_i64().unwrap(), -42);
    }

    #[test]
    fn decimal_parse_rejects_non_digits() {
        let s = Symbol::from("12x");
        assert!(s.parse_i64().is_err());
    }

    #[test]
    fn byte_string_equality_is_case_sensitive() {
        let a = Symbol::from("Name");
        let b = Symbol::from("name");
        assert_ne!(a, b);
        assert!(a.eq_ignore_ascii_case(&b));
    }

    #[test]
    #[should_panic]
    fn byte_at_out_of_range_is_fatal() {
        let s = Symbol::from("ab");
        let _ = s.byte_at(5);
    }
}
