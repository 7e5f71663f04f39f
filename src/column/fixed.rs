//! Fixed-length string buffers
//!
//! Null-padded byte arrays that compare byte-wise over their full width.

use std::fmt;

/// A null-padded, fixed-width UTF-8 buffer
///
/// Bytes after the first zero are always zero, so array comparison matches a
/// bounded `strncmp` over `N` bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FixedStr<const N: usize>([u8; N]);

impl<const N: usize> FixedStr<N> {
    pub const EMPTY: Self = Self([0; N]);

    /// Copy `s`, truncated to at most `N - 1` bytes on a char boundary.
    /// Input stops at an embedded NUL.
    pub fn new(s: &str) -> Self {
        let s = match s.find('\0') {
            Some(nul) => &s[..nul],
            None => s,
        };
        let mut end = s.len().min(N.saturating_sub(1));
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        let mut buf = [0u8; N];
        buf[..end].copy_from_slice(&s.as_bytes()[..end]);
        Self(buf)
    }

    /// Encode a lookup key: raw prefix of up to `N` bytes, no terminator
    /// reserved. A key longer than any storable value never compares equal.
    pub(crate) fn probe(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }

    /// Copy raw bytes up to the first NUL or `N` bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let end = bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(bytes.len())
            .min(N);
        let mut buf = [0u8; N];
        buf[..end].copy_from_slice(&bytes[..end]);
        Self(buf)
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Number of bytes before the first NUL
    pub fn len(&self) -> usize {
        self.0.iter().position(|&b| b == 0).unwrap_or(N)
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// Decoded contents. Buffers read from foreign snapshots may hold invalid
    /// UTF-8; the longest valid prefix is returned in that case.
    pub fn as_str(&self) -> &str {
        let bytes = &self.0[..self.len()];
        match std::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> PartialEq<str> for FixedStr<N> {
    fn eq(&self, other: &str) -> bool {
        *self == Self::probe(other)
    }
}

impl<const N: usize> PartialEq<&str> for FixedStr<N> {
    fn eq(&self, other: &&str) -> bool {
        *self == Self::probe(other)
    }
}
