//! Viewport corrections for hosts whose visible area shrinks and recovers
//! underneath the chat (on-screen keyboards, terminal panes being resized).
//!
//! The reconciler only decides *what* to correct and *when*; scheduling the
//! delayed corrections and touching the real surface are up to the host,
//! through [`ViewportCorrector`]. None of the corrections are cancellable and
//! all of them are idempotent, so overlapping events just repeat work.

use std::time::Duration;

/// Recovering above this share of the baseline counts as "keyboard closed".
pub const KEYBOARD_CLOSED_RATIO: f32 = 0.9;

pub const KEYBOARD_CLOSED_FOLLOW_UP: Duration = Duration::from_millis(100);
pub const BLUR_DELAY: Duration = Duration::from_millis(100);
pub const SUBMIT_DELAY: Duration = Duration::from_millis(100);
pub const WINDOW_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// The surface the corrections act on
pub trait ViewportCorrector {
    fn viewport_height(&self) -> u16;
    fn reset_to_origin(&mut self);
}

/// Corrector for hosts without a viewport to fix
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopViewport;

impl ViewportCorrector for NoopViewport {
    fn viewport_height(&self) -> u16 {
        0
    }

    fn reset_to_origin(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionAction {
    ResetToOrigin,
    /// Take a fresh baseline height, then reset to origin
    Rebaseline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    pub delay: Duration,
    pub action: CorrectionAction,
}

impl Correction {
    pub fn now(action: CorrectionAction) -> Self {
        Self { delay: Duration::ZERO, action }
    }

    pub fn after(delay: Duration, action: CorrectionAction) -> Self {
        Self { delay, action }
    }

    pub fn is_immediate(&self) -> bool {
        self.delay.is_zero()
    }
}

#[derive(Debug, Clone)]
pub struct ViewportReconciler {
    baseline_height: u16,
}

impl ViewportReconciler {
    pub fn new(baseline_height: u16) -> Self {
        Self { baseline_height }
    }

    pub fn baseline_height(&self) -> u16 {
        self.baseline_height
    }

    pub fn on_viewport_resize(&self, height: u16) -> Vec<Correction> {
        let threshold = f32::from(self.baseline_height) * KEYBOARD_CLOSED_RATIO;
        if f32::from(height) > threshold {
            vec![
                Correction::now(CorrectionAction::ResetToOrigin),
                Correction::after(KEYBOARD_CLOSED_FOLLOW_UP, CorrectionAction::ResetToOrigin),
            ]
        } else {
            Vec::new()
        }
    }

    pub fn on_window_resize(&self) -> Vec<Correction> {
        vec![Correction::after(WINDOW_SETTLE_DELAY, CorrectionAction::Rebaseline)]
    }

    pub fn on_input_blur(&self) -> Vec<Correction> {
        vec![Correction::after(BLUR_DELAY, CorrectionAction::ResetToOrigin)]
    }

    pub fn on_submit(&self) -> Vec<Correction> {
        vec![Correction::after(SUBMIT_DELAY, CorrectionAction::ResetToOrigin)]
    }

    pub fn apply(&mut self, action: CorrectionAction, corrector: &mut dyn ViewportCorrector) {
        match action {
            CorrectionAction::ResetToOrigin => corrector.reset_to_origin(),
            CorrectionAction::Rebaseline => {
                self.baseline_height = corrector.viewport_height();
                tracing::debug!(baseline = self.baseline_height, "viewport baseline recaptured");
                corrector.reset_to_origin();
            }
        }
    }
}
