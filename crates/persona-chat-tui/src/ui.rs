use persona_chat_core::{Message, Personality, Sender};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, InputMode};

const MAX_INPUT_ROWS: usize = 5;

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c != '*' || chars.peek() != Some(&'*') {
            current_text.push(c);
            continue;
        }

        // Consume the second *
        chars.next();

        // Find closing **
        let mut bold_text = String::new();
        let mut found_close = false;
        while let Some(c) = chars.next() {
            if c == '*' && chars.peek() == Some(&'*') {
                chars.next();
                found_close = true;
                break;
            }
            bold_text.push(c);
        }

        if found_close && !bold_text.is_empty() {
            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }
            spans.push(Span::styled(
                bold_text,
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else {
            // No closing **, treat as literal
            current_text.push_str("**");
            current_text.push_str(&bold_text);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    Line::from(spans)
}

type StyledChar = (char, Style);

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

fn styled_width(chars: &[StyledChar]) -> usize {
    chars.iter().map(|(c, _)| char_width(*c)).sum()
}

/// How many leading chars of `word` fit in `width` columns (at least one)
fn split_index(word: &[StyledChar], width: usize) -> usize {
    let mut used = 0;
    for (i, (c, _)) in word.iter().enumerate() {
        let w = char_width(*c);
        if used + w > width {
            return i.max(1);
        }
        used += w;
    }
    word.len()
}

/// Merge runs of equally styled chars back into spans
fn into_line(row: Vec<StyledChar>) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut style: Option<Style> = None;

    for (c, s) in row {
        if let Some(current) = style {
            if current != s {
                spans.push(Span::styled(std::mem::take(&mut text), current));
            }
        }
        style = Some(s);
        text.push(c);
    }
    if let Some(current) = style {
        spans.push(Span::styled(text, current));
    }

    Line::from(spans)
}

/// Wrap a styled line to `width` display columns, one `Line` per row.
/// Breaks at word boundaries; words wider than the row are split. Styles
/// carry across rows, so a bold phrase stays bold after wrapping.
fn wrap_line_to_width(line: &Line<'_>, width: usize) -> Vec<Line<'static>> {
    let width = if width == 0 { usize::MAX } else { width };

    let mut words: Vec<Vec<StyledChar>> = Vec::new();
    let mut word: Vec<StyledChar> = Vec::new();
    for span in &line.spans {
        for c in span.content.chars() {
            if c.is_whitespace() {
                if !word.is_empty() {
                    words.push(std::mem::take(&mut word));
                }
            } else {
                word.push((c, span.style));
            }
        }
    }
    if !word.is_empty() {
        words.push(word);
    }

    let mut rows: Vec<Vec<StyledChar>> = Vec::new();
    let mut current: Vec<StyledChar> = Vec::new();
    let mut current_width = 0;

    for mut word in words {
        // Oversized word: flush, then hard-split
        while styled_width(&word) > width {
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            let rest = word.split_off(split_index(&word, width));
            rows.push(word);
            word = rest;
        }

        if word.is_empty() {
            continue;
        }
        let word_width = styled_width(&word);

        if current.is_empty() {
            current = word;
            current_width = word_width;
        } else if current_width.saturating_add(1 + word_width) <= width {
            // The gap takes the style only when both neighbours share it
            let before = current.last().map(|(_, s)| *s);
            let after = word.first().map(|(_, s)| *s);
            let gap = if before == after { before.unwrap_or_default() } else { Style::default() };
            current.push((' ', gap));
            current.extend(word);
            current_width += 1 + word_width;
        } else {
            rows.push(std::mem::take(&mut current));
            current = word;
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        rows.push(current);
    }

    if rows.is_empty() {
        return vec![Line::default()];
    }

    rows.into_iter().map(into_line).collect()
}

/// Build the chat pane's rows, already wrapped to `width`, so the row count
/// is exact for scrolling.
fn chat_lines(messages: &[Message], busy: bool, animation_frame: u8, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in messages {
        match msg.from {
            Sender::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for raw in msg.text.lines() {
                    lines.extend(wrap_line_to_width(&Line::raw(raw), width));
                }
            }
            Sender::Bot => {
                lines.push(Line::from(Span::styled(
                    "Bot:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                for raw in msg.text.lines() {
                    lines.extend(wrap_line_to_width(&parse_markdown_line(raw), width));
                }
            }
            Sender::System => {
                let notice = Line::from(Span::styled(
                    msg.text.as_str(),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ));
                lines.extend(wrap_line_to_width(&notice, width));
            }
        }
        lines.push(Line::default());
    }

    if busy {
        lines.push(Line::from(Span::styled(
            "Bot:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// Row and display column of a char index within a multi-line draft
fn cursor_row_col(text: &str, cursor: usize) -> (usize, usize) {
    let mut row = 0;
    let mut col = 0;
    for c in text.chars().take(cursor) {
        if c == '\n' {
            row += 1;
            col = 0;
        } else {
            col += char_width(c);
        }
    }
    (row, col)
}

/// The part of `line` between display columns `skip` and `skip + take`
fn slice_columns(line: &str, skip: usize, take: usize) -> String {
    let mut skipped = 0;
    let mut used = 0;
    let mut out = String::new();
    for c in line.chars() {
        let w = char_width(c);
        if skipped < skip {
            skipped += w;
            continue;
        }
        if used + w > take {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let draft_rows = app.session.draft().split('\n').count().clamp(1, MAX_INPUT_ROWS);

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(draft_rows as u16 + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.show_personality_picker {
        render_personality_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let personality = app.session.personality();

    let title = Line::from(vec![
        Span::styled(" Persona Chat ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(personality.label(), Style::default().fg(Color::White).bold()),
        Span::styled(
            format!(" · {}", personality.description()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing
    app.chat_area = Some(area);

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_rows = area.height.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Chat · {} ", app.session.personality().label()));

    let messages = app.session.conversation().messages();
    if messages.is_empty() && !app.session.is_busy() {
        let placeholder = Paragraph::new(Text::from(Span::styled(
            "Say hello to start the conversation...",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let lines = chat_lines(messages, app.session.is_busy(), app.animation_frame, inner_width);
    let total_rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);

    app.session.reconcile_scroll(total_rows, visible_rows);

    let chat = Paragraph::new(lines)
        .block(block)
        .scroll((app.session.scroll().offset(), 0));
    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let title = if app.session.is_busy() {
        " Message (waiting for reply) "
    } else {
        " Message "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let draft = app.session.draft();
    let (cursor_row, cursor_col) = cursor_row_col(draft, app.cursor);

    // Scroll offsets that keep the cursor visible
    let row_offset = if inner_height > 0 && cursor_row >= inner_height {
        cursor_row - inner_height + 1
    } else {
        0
    };
    let col_offset = if inner_width > 0 && cursor_col >= inner_width {
        cursor_col - inner_width + 1
    } else {
        0
    };

    let visible: Vec<Line> = draft
        .split('\n')
        .skip(row_offset)
        .take(inner_height.max(1))
        .map(|line| Line::from(slice_columns(line, col_offset, inner_width)))
        .collect();

    let input = Paragraph::new(visible)
        .style(Style::default().fg(Color::Cyan))
        .block(block);
    frame.render_widget(input, area);

    // Show cursor when editing
    if editing && !app.show_personality_picker {
        frame.set_cursor_position((
            area.x + 1 + (cursor_col - col_offset) as u16,
            area.y + 1 + (cursor_row - row_offset) as u16,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" CHAT ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" TYPING ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if app.show_personality_picker {
        vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" select ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" cancel ", label_style),
        ]
    } else {
        match app.input_mode {
            InputMode::Editing => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
                Span::styled(" Shift/Alt+Enter ", key_style),
                Span::styled(" newline ", label_style),
                Span::styled(" Tab ", key_style),
                Span::styled(" personality ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" stop typing ", label_style),
            ],
            InputMode::Normal => vec![
                Span::styled(" i ", key_style),
                Span::styled(" type ", label_style),
                Span::styled(" j/k ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" p ", key_style),
                Span::styled(" personality ", label_style),
                Span::styled(" 1-6 ", key_style),
                Span::styled(" quick switch ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ],
        }
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_personality_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let personalities = Personality::all();

    // Calculate popup size and position (centered)
    let popup_width = 48.min(area.width.saturating_sub(4));
    let popup_height = (personalities.len() as u16 + 2).min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Select Personality ");

    let current = app.session.personality();
    let items: Vec<ListItem> = personalities
        .iter()
        .map(|p| {
            let is_current = *p == current;
            let prefix = if is_current { "* " } else { "  " };
            let style = if is_current {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{}", prefix, p.label()), style),
                Span::styled(format!("  {}", p.description()), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.personality_picker_state);
}
