//! Growable output buffer for math rendering.

use super::types::MathResult;

/// Owned UTF-8 output accumulator.
///
/// Capacity doubles when exhausted and always keeps one spare byte beyond the
/// content. Growth goes through `try_reserve_exact`, so allocation failure
/// surfaces as [`super::MathError::Allocation`] instead of aborting.
#[derive(Debug, Default)]
pub struct ByteBuffer {
    inner: String,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    fn grow_for(&mut self, additional: usize) -> MathResult<()> {
        let needed = self.inner.len() + additional + 1;
        let capacity = self.inner.capacity();
        if needed <= capacity {
            return Ok(());
        }
        let target = needed.max(capacity.saturating_mul(2)).max(16);
        self.inner.try_reserve_exact(target - self.inner.len())?;
        Ok(())
    }

    pub fn push_str(&mut self, s: &str) -> MathResult<()> {
        self.grow_for(s.len())?;
        self.inner.push_str(s);
        Ok(())
    }

    pub fn push(&mut self, c: char) -> MathResult<()> {
        self.grow_for(c.len_utf8())?;
        self.inner.push(c);
        Ok(())
    }

    pub fn last_char(&self) -> Option<char> {
        self.inner.chars().next_back()
    }

    /// True when the buffer is empty or ends in whitespace.
    pub fn at_break(&self) -> bool {
        self.last_char().is_none_or(char::is_whitespace)
    }

    /// True when the buffer has content on its current line.
    pub fn mid_line(&self) -> bool {
        self.last_char().is_some_and(|c| c != '\n')
    }

    pub fn into_string(self) -> String {
        self.inner
    }
}
