use std::sync::Arc;

use persona_chat_core::{
    ChatBackend, ChatRequest, ChatSession, Correction, CorrectionAction, Personality, SendFailure,
    ViewportReconciler,
};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use crate::tui::AppEvent;
use crate::viewport::TerminalViewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub session: ChatSession,
    pub cursor: usize, // char index into the draft

    // Animation state
    pub animation_frame: u8, // 0-2 for the typing indicator

    // Personality picker state
    pub show_personality_picker: bool,
    pub personality_picker_state: ListState,

    // Chat pane area for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,

    // Viewport corrections
    pub reconciler: ViewportReconciler,
    pub viewport: TerminalViewport,

    backend: Arc<dyn ChatBackend>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        personality: Personality,
        events: mpsc::UnboundedSender<AppEvent>,
        (width, height): (u16, u16),
    ) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            session: ChatSession::new(personality),
            cursor: 0,

            animation_frame: 0,

            show_personality_picker: false,
            personality_picker_state: ListState::default(),

            chat_area: None,

            reconciler: ViewportReconciler::new(height),
            viewport: TerminalViewport::new(width, height),

            backend,
            events,
        }
    }

    /// Enter without Shift: drop input focus, then send the draft.
    pub fn submit(&mut self) {
        self.blur_input();

        if let Some(request) = self.session.begin_send() {
            self.cursor = 0;
            self.animation_frame = 0;
            self.dispatch(request);
        }

        let corrections = self.reconciler.on_submit();
        self.schedule(corrections);
    }

    /// Run the request off the event loop; the result comes back as `AppEvent::Reply`.
    fn dispatch(&self, request: ChatRequest) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();

        tokio::spawn(async move {
            let request_task = tokio::spawn(async move { backend.send(&request).await });
            let result = match request_task.await {
                Ok(result) => result,
                Err(e) => Err(SendFailure::Interrupted(e.to_string())),
            };
            let _ = events.send(AppEvent::Reply(result));
        });
    }

    pub fn finish_request(&mut self, result: Result<String, SendFailure>) {
        let outcome = self.session.complete_send(result);
        tracing::debug!(?outcome, "chat request finished");
    }

    pub fn focus_input(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    pub fn blur_input(&mut self) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        self.input_mode = InputMode::Normal;
        let corrections = self.reconciler.on_input_blur();
        self.schedule(corrections);
    }

    /// Terminal resized. A width change is treated as a window change
    /// (rebaseline); every height change goes through the keyboard heuristic.
    pub fn on_resize(&mut self, width: u16, height: u16) {
        let window_changed = width != self.viewport.width();
        self.viewport.set_size(width, height);

        let mut corrections = self.reconciler.on_viewport_resize(height);
        if window_changed {
            corrections.extend(self.reconciler.on_window_resize());
        }
        self.schedule(corrections);
    }

    /// Apply immediate corrections now and post the rest back after their delay.
    pub fn schedule(&mut self, corrections: Vec<Correction>) {
        for correction in corrections {
            if correction.is_immediate() {
                self.apply_correction(correction.action);
                continue;
            }

            let events = self.events.clone();
            tokio::spawn(async move {
                tokio::time::sleep(correction.delay).await;
                // The loop may already be gone; nothing left to correct then
                let _ = events.send(AppEvent::Correct(correction.action));
            });
        }
    }

    pub fn apply_correction(&mut self, action: CorrectionAction) {
        self.reconciler.apply(action, &mut self.viewport);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Personality picker
    pub fn open_personality_picker(&mut self) {
        self.show_personality_picker = true;
        self.personality_picker_state
            .select(Some(self.session.personality().index()));
    }

    pub fn close_personality_picker(&mut self) {
        self.show_personality_picker = false;
    }

    pub fn personality_picker_nav_down(&mut self) {
        let len = Personality::all().len();
        let i = self.personality_picker_state.selected().unwrap_or(0);
        self.personality_picker_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn personality_picker_nav_up(&mut self) {
        let i = self.personality_picker_state.selected().unwrap_or(0);
        self.personality_picker_state.select(Some(i.saturating_sub(1)));
    }

    pub fn confirm_personality_picker(&mut self) {
        let selected = self
            .personality_picker_state
            .selected()
            .and_then(|i| Personality::all().get(i).copied());
        if let Some(personality) = selected {
            self.select_personality(personality);
        }
        self.close_personality_picker();
    }

    pub fn select_personality(&mut self, personality: Personality) {
        self.session.change_personality(personality);
    }

    pub fn scroll_chat_up(&mut self, rows: u16) {
        self.session.scroll_mut().scroll_up(rows);
    }

    pub fn scroll_chat_down(&mut self, rows: u16) {
        self.session.scroll_mut().scroll_down(rows);
    }

    /// Rows in the chat pane, minus borders
    pub fn chat_page_height(&self) -> u16 {
        self.chat_area
            .map(|r| r.height.saturating_sub(2))
            .unwrap_or(10)
            .max(1)
    }
}
