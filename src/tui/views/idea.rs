//! Step 1: idea entry.
//!
//! A multi-line textarea plus a guarded submit. Submit is suppressed
//! while the input is blank or a generation call is in flight.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::super::theme;
use super::super::widgets::InputBuffer;

/// Intent produced by the idea view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeaIntent {
    /// Submit the idea for question generation.
    Submit(String),
}

pub struct IdeaViewState {
    pub input: InputBuffer,
}

impl IdeaViewState {
    pub fn new() -> Self {
        Self {
            input: InputBuffer::new(),
        }
    }

    /// Handle input. Returns an intent when the user submits.
    ///
    /// `loading` suppresses both editing of the submit guard and the
    /// submit action itself (the session is logically locked).
    pub fn handle_input(&mut self, event: &Event, loading: bool) -> Option<IdeaIntent> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        if loading {
            return None;
        }

        match (*modifiers, *code) {
            // Ctrl+S or Ctrl+Enter submits
            (KeyModifiers::CONTROL, KeyCode::Char('s'))
            | (KeyModifiers::CONTROL, KeyCode::Enter) => {
                if self.input.is_empty() {
                    None
                } else {
                    Some(IdeaIntent::Submit(self.input.text().to_string()))
                }
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Enter) => {
                self.input.insert_newline();
                None
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => {
                self.input.backspace();
                None
            }
            (KeyModifiers::NONE, KeyCode::Delete) => {
                self.input.delete();
                None
            }
            (KeyModifiers::NONE, KeyCode::Left) => {
                self.input.move_left();
                None
            }
            (KeyModifiers::NONE, KeyCode::Right) => {
                self.input.move_right();
                None
            }
            (KeyModifiers::NONE, KeyCode::Home) => {
                self.input.move_home();
                None
            }
            (KeyModifiers::NONE, KeyCode::End) => {
                self.input.move_end();
                None
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.input.insert_char(c);
                None
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.input.clear();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, loading: bool, spinner: &str) {
        let chunks = Layout::vertical([
            Constraint::Length(2), // Tagline
            Constraint::Min(6),    // Textarea
            Constraint::Length(2), // Submit hint / spinner
        ])
        .split(area);

        let tagline = Paragraph::new(Line::from(Span::styled(
            "Turn a simple idea into a world-class prompt.",
            theme::muted(),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(tagline, chunks[0]);

        let block = if loading {
            theme::block_default("Your Idea")
        } else {
            theme::block_focused("Your Idea")
        };
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        let text = if self.input.text().is_empty() && !loading {
            Paragraph::new(Line::from(Span::styled(
                "e.g., Explain quantum physics to a 5-year-old, or write a spooky story about a lighthouse…",
                theme::dim(),
            )))
        } else {
            Paragraph::new(self.input.text())
        };
        frame.render_widget(text.wrap(ratatui::widgets::Wrap { trim: false }), inner);

        // Cursor (only while editable)
        if !loading {
            let (line, col) = self.input.cursor_line_col();
            let x = inner.x + (col as u16).min(inner.width.saturating_sub(1));
            let y = inner.y + (line as u16).min(inner.height.saturating_sub(1));
            frame.set_cursor_position((x, y));
        }

        let hint = if loading {
            Line::from(vec![
                Span::styled(spinner.to_string(), theme::heading()),
                Span::styled(" Analyzing Request…", theme::muted()),
            ])
        } else if self.input.is_empty() {
            Line::from(Span::styled("Type your idea to begin", theme::dim()))
        } else {
            Line::from(vec![
                Span::styled("Ctrl+S", theme::key_hint()),
                Span::raw(" "),
                Span::styled("Analyze Idea", theme::highlight()),
            ])
        };
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[2]);
    }
}
