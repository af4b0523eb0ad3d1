use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use persona_chat_core::{KeyIntent, Personality};
use ratatui::layout::Rect;

use crate::app::{App, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(width, height) => app.on_resize(width, height),
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Reply(result) => app.finish_request(result),
        AppEvent::Correct(action) => app.apply_correction(action),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_personality_picker {
        handle_picker(app, key);
        return;
    }

    if key.code == KeyCode::Char('p') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.open_personality_picker();
        return;
    }

    // Alt+1..6 switches personality directly
    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c) = key.code {
            if let Some(personality) = quick_switch(c) {
                app.select_personality(personality);
                return;
            }
        }
    }

    match key.code {
        KeyCode::PageUp => {
            let page = app.chat_page_height();
            app.scroll_chat_up(page);
            return;
        }
        KeyCode::PageDown => {
            let page = app.chat_page_height();
            app.scroll_chat_down(page);
            return;
        }
        _ => {}
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn quick_switch(c: char) -> Option<Personality> {
    let index = c.to_digit(10)?.checked_sub(1)? as usize;
    Personality::all().get(index).copied()
}

fn handle_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_personality_picker(),
        KeyCode::Char('j') | KeyCode::Down => app.personality_picker_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.personality_picker_nav_up(),
        KeyCode::Enter => app.confirm_personality_picker(),
        _ => {}
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Enter => app.focus_input(),

        KeyCode::Tab | KeyCode::Char('p') => app.open_personality_picker(),

        KeyCode::Char('j') | KeyCode::Down => app.scroll_chat_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::Char('g') => app.session.scroll_mut().scroll_to_top(),
        KeyCode::Char('G') => app.session.scroll_mut().request_bottom(),

        KeyCode::Char(c) => {
            if let Some(personality) = quick_switch(c) {
                app.select_personality(personality);
            }
        }

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.blur_input(),
        KeyCode::Tab => app.open_personality_picker(),
        // Alt+Enter stands in for Shift+Enter where the terminal drops Shift
        KeyCode::Enter => {
            let newline_modifier = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);
            match KeyIntent::from_enter(newline_modifier) {
                KeyIntent::Submit => app.submit(),
                KeyIntent::Newline => insert_char(app, '\n'),
            }
        }
        // Ctrl+J is a raw line feed
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => insert_char(app, '\n'),
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let draft = app.session.draft_mut();
                let byte_pos = char_to_byte_index(draft, app.cursor);
                draft.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let draft = app.session.draft_mut();
            if app.cursor < draft.chars().count() {
                let byte_pos = char_to_byte_index(draft, app.cursor);
                draft.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.session.draft().chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.session.draft().chars().count();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => insert_char(app, c),
        _ => {}
    }
}

fn insert_char(app: &mut App, c: char) {
    let draft = app.session.draft_mut();
    let byte_pos = char_to_byte_index(draft, app.cursor);
    draft.insert(byte_pos, c);
    app.cursor += 1;
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_chat_down(3),
        MouseEventKind::ScrollUp => app.scroll_chat_up(3),
        _ => {}
    }
}
