//! Score storage and the one-token lookahead buffer.

use core::fmt;

/// Capacity of the token buffer, terminator included.
pub const TOKEN_CAPACITY: usize = 8;

/// Read-only access to score bytes, wherever they are stored.
pub trait Score {
    /// Declared length in bytes.
    fn len(&self) -> usize;

    /// Byte at `offset`, `None` past the declared length.
    fn byte_at(&self, offset: usize) -> Option<u8>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Score for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }
}

impl<const N: usize> Score for [u8; N] {
    fn len(&self) -> usize {
        N
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }
}

impl Score for str {
    fn len(&self) -> usize {
        str::len(self)
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.as_bytes().get(offset).copied()
    }
}

impl<S: Score + ?Sized> Score for &S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        (**self).byte_at(offset)
    }
}

/// A score whose declared length may be shorter than its backing storage,
/// e.g. a fixed block of program memory holding a shorter melody.
#[derive(Debug, Clone, Copy)]
pub struct Bounded<S> {
    inner: S,
    len: usize,
}

impl<S: Score> Bounded<S> {
    /// The declared length is capped to what `inner` can actually serve.
    pub fn new(inner: S, len: usize) -> Self {
        let len = len.min(inner.len());
        Self { inner, len }
    }
}

impl<S: Score> Score for Bounded<S> {
    fn len(&self) -> usize {
        self.len
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        if offset < self.len {
            self.inner.byte_at(offset)
        } else {
            None
        }
    }
}

fn is_delimiter(byte: u8) -> bool {
    byte == b' ' || byte == 0
}

/// Holds the next token, not yet decoded.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenBuffer {
    bytes: [u8; TOKEN_CAPACITY],
    len: usize,
}

impl TokenBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; TOKEN_CAPACITY],
            len: 0,
        }
    }

    /// Token bytes, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.bytes = [0; TOKEN_CAPACITY];
        self.len = 0;
    }

    /// Copy the token starting at `*offset` and move `*offset` past it.
    ///
    /// Stops on a delimiter (consumed, not stored), at the end of the score,
    /// or when only the terminator slot is left. A longer token is cut there
    /// and its remainder is read as the next token. Returns `false` without
    /// touching the buffer when `*offset` is already at the end.
    pub fn fill<S: Score + ?Sized>(&mut self, score: &S, offset: &mut usize) -> bool {
        let end = score.len();
        if *offset >= end {
            return false;
        }

        let mut len = 0;
        let mut delimited = false;
        while len < TOKEN_CAPACITY - 1 && *offset < end {
            let Some(byte) = score.byte_at(*offset) else {
                break;
            };
            *offset += 1;
            if is_delimiter(byte) {
                delimited = true;
                break;
            }
            self.bytes[len] = byte;
            len += 1;
        }
        self.bytes[len] = 0;
        self.len = len;

        // a full buffer still swallows the delimiter that follows it
        if !delimited && *offset < end {
            match score.byte_at(*offset) {
                Some(byte) if is_delimiter(byte) => *offset += 1,
                _ => log::warn!("token truncated at offset {}", *offset),
            }
        }
        true
    }
}

impl Default for TokenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = core::str::from_utf8(self.as_bytes()).unwrap_or("<binary>");
        f.debug_tuple("TokenBuffer").field(&text).finish()
    }
}
