use persona_chat_core::ViewportCorrector;

/// Terminal side of the viewport corrections.
///
/// Resetting to origin asks the main loop for a full repaint, which clears
/// artifacts a resize can leave behind.
#[derive(Debug, Default)]
pub struct TerminalViewport {
    width: u16,
    height: u16,
    needs_repaint: bool,
}

impl TerminalViewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            needs_repaint: false,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }
}

impl ViewportCorrector for TerminalViewport {
    fn viewport_height(&self) -> u16 {
        self.height
    }

    fn reset_to_origin(&mut self) {
        self.needs_repaint = true;
    }
}
