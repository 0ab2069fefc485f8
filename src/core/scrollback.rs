//! Console scrollback buffer.

/// Append-only output buffer shown to the user.
///
/// Unbounded unless a limit is set, in which case whole leading lines are
/// dropped until the text fits.
#[derive(Debug, Clone, Default)]
pub struct Scrollback {
    text: String,
    limit: Option<usize>,
    /// Number of times the buffer was cleared.
    clears: u64,
}

/// A point in a [`Scrollback`]'s history, see [`Scrollback::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbackMark {
    clears: u64,
}

impl Scrollback {
    /// Create an empty, unbounded buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer holding at most `limit` bytes.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Get the size limit.
    #[inline]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Change the size limit, trimming immediately if needed.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.trim();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Get the buffer length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
        self.trim();
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.text.clear();
        self.clears += 1;
    }

    /// Record the current position.
    pub fn mark(&self) -> ScrollbackMark {
        ScrollbackMark { clears: self.clears }
    }

    /// Check if the buffer was cleared since `mark`.
    pub fn cleared_since(&self, mark: ScrollbackMark) -> bool {
        self.clears != mark.clears
    }

    fn trim(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.text.len() <= limit {
            return;
        }

        let excess = self.text.len() - limit;
        // First line start at or after `excess`
        let cut = self.text.as_bytes()[excess - 1..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.text.len(), |pos| excess + pos);
        self.text.drain(..cut);
    }
}
