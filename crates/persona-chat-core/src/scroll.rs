use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScrollError {
    #[error("message list has not been laid out yet")]
    Detached,
}

/// Deferred scroll-to-bottom for the message list.
///
/// Mutations only raise the request; the host applies it once the list has
/// been measured, so the target reflects the rows that were just added.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    offset: u16,
    pending_bottom: bool,
    total_rows: u16,
    visible_rows: u16,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_bottom(&mut self) {
        self.pending_bottom = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending_bottom
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn max_offset(&self) -> u16 {
        self.total_rows.saturating_sub(self.visible_rows)
    }

    /// Record the latest geometry and honour a pending request.
    ///
    /// Returns `Ok(true)` when the offset jumped to the end. A zero-height
    /// list can't be scrolled; the request then stays pending.
    pub fn apply_pending(&mut self, total_rows: u16, visible_rows: u16) -> Result<bool, ScrollError> {
        self.total_rows = total_rows;
        self.visible_rows = visible_rows;

        if !self.pending_bottom {
            self.offset = self.offset.min(self.max_offset());
            return Ok(false);
        }

        if visible_rows == 0 {
            return Err(ScrollError::Detached);
        }

        self.offset = self.max_offset();
        self.pending_bottom = false;
        Ok(true)
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }
}
