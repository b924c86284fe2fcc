//! Caller-managed growable output buffer for incremental printing.

use thiserror::Error;

/// Failure to grow an output buffer.
///
/// Growth is the only fallible step of buffered printing; every write site
/// checks it before touching the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error("out of memory growing the print buffer")]
    OutOfMemory,
}

/// A growable UTF-8 output buffer with power-of-two growth.
///
/// [`PrintBuffer`] is the destination of [`crate::print_into`]: callers can
/// render several values into one buffer, reuse it across calls with
/// [`PrintBuffer::clear`], and pre-size it to avoid regrowth. Growth is
/// fallible and geometric: the capacity is raised to the next power of two at
/// or above the requested total.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrintBuffer {
    data: String,
}

impl PrintBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer with at least `capacity` bytes reserved.
    ///
    /// # Errors
    ///
    /// [`PrintError::OutOfMemory`] if the reservation fails.
    pub fn with_capacity(capacity: usize) -> Result<Self, PrintError> {
        let mut buffer = Self::new();
        buffer.ensure(capacity)?;
        Ok(buffer)
    }

    /// Ensures room for `additional` more bytes, growing to the next power
    /// of two at or above the required total.
    ///
    /// # Errors
    ///
    /// [`PrintError::OutOfMemory`] if the allocation fails or the requested
    /// size overflows.
    pub fn ensure(&mut self, additional: usize) -> Result<(), PrintError> {
        let needed = self
            .data
            .len()
            .checked_add(additional)
            .ok_or(PrintError::OutOfMemory)?;
        if needed <= self.data.capacity() {
            return Ok(());
        }
        let target = needed
            .checked_next_power_of_two()
            .ok_or(PrintError::OutOfMemory)?;
        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|_| PrintError::OutOfMemory)
    }

    /// Appends `text`, growing first if necessary.
    ///
    /// # Errors
    ///
    /// [`PrintError::OutOfMemory`] if growth fails; the buffer is unchanged.
    pub fn write_str(&mut self, text: &str) -> Result<(), PrintError> {
        self.ensure(text.len())?;
        self.data.push_str(text);
        Ok(())
    }

    /// Content length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocated capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The rendered text so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Consumes the buffer, returning the rendered text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.data
    }

    /// Discards the content, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}
