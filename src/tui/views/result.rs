//! Step 3: result display.
//!
//! Shows the synthesized prompt verbatim in a bordered, scrollable
//! block, with copy-to-clipboard and a reset back to idea entry.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::super::theme;

/// Intent produced by the result view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultIntent {
    /// Copy the final prompt to the system clipboard.
    Copy,
    /// Start a new session from idea entry.
    Reset,
}

pub struct ResultViewState {
    scroll: u16,
}

impl ResultViewState {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }

    pub fn handle_input(&mut self, event: &Event) -> Option<ResultIntent> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('c')) => Some(ResultIntent::Copy),
            (KeyModifiers::NONE, KeyCode::Char('n')) => Some(ResultIntent::Reset),
            (KeyModifiers::NONE, KeyCode::Char('j')) | (KeyModifiers::NONE, KeyCode::Down) => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            (KeyModifiers::NONE, KeyCode::Char('k')) | (KeyModifiers::NONE, KeyCode::Up) => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            (KeyModifiers::NONE, KeyCode::Char('g')) => {
                self.scroll = 0;
                None
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, prompt: &str) {
        let chunks = Layout::vertical([
            Constraint::Length(2), // Heading
            Constraint::Min(5),    // Prompt block
            Constraint::Length(2), // Actions
        ])
        .split(area);

        let heading = Paragraph::new(vec![
            Line::from(Span::styled("Prompt Engineered.", theme::title())),
            Line::from(Span::styled(
                "Ready to deploy to your favorite LLM.",
                theme::muted(),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(heading, chunks[0]);

        let block = theme::block_focused("Final Output");
        let paragraph = Paragraph::new(prompt.to_string())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, chunks[1]);

        let actions = Line::from(vec![
            Span::styled("c", theme::key_hint()),
            Span::raw(":copy prompt  "),
            Span::styled("n", theme::key_hint()),
            Span::raw(":start new  "),
            Span::styled("j/k", theme::key_hint()),
            Span::raw(":scroll"),
        ]);
        frame.render_widget(
            Paragraph::new(actions).alignment(Alignment::Center),
            chunks[2],
        );
    }
}
