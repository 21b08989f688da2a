//! Step 2: refinement question form.
//!
//! One labeled input per question with focus cycling, a completion
//! gauge, and a submit guarded on every answer being non-empty.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

use super::super::theme;
use super::super::widgets::InputBuffer;

/// Rows consumed per question: label, answer, spacer.
const ROWS_PER_QUESTION: usize = 3;

/// Intent produced by the question form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionsIntent {
    /// An answer changed; the session should be updated.
    AnswerChanged(usize, String),
    /// Submit all answers for final-prompt synthesis.
    Submit,
}

pub struct QuestionsViewState {
    questions: Vec<String>,
    inputs: Vec<InputBuffer>,
    focus: usize,
    scroll_top: usize,
}

impl QuestionsViewState {
    pub fn new(questions: Vec<String>) -> Self {
        let inputs = questions.iter().map(|_| InputBuffer::new()).collect();
        Self {
            questions,
            inputs,
            focus: 0,
            scroll_top: 0,
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + 1) % self.inputs.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
        }
    }

    /// Handle input. Returns an intent for the app to apply.
    pub fn handle_input(&mut self, event: &Event, loading: bool) -> Option<QuestionsIntent> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        if loading || self.inputs.is_empty() {
            return None;
        }

        match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s'))
            | (KeyModifiers::CONTROL, KeyCode::Enter) => Some(QuestionsIntent::Submit),
            (KeyModifiers::NONE, KeyCode::Tab)
            | (KeyModifiers::NONE, KeyCode::Down)
            | (KeyModifiers::NONE, KeyCode::Enter) => {
                self.focus_next();
                None
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) | (KeyModifiers::NONE, KeyCode::Up) => {
                self.focus_prev();
                None
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => {
                self.inputs[self.focus].backspace();
                self.changed()
            }
            (KeyModifiers::NONE, KeyCode::Delete) => {
                self.inputs[self.focus].delete();
                self.changed()
            }
            (KeyModifiers::NONE, KeyCode::Left) => {
                self.inputs[self.focus].move_left();
                None
            }
            (KeyModifiers::NONE, KeyCode::Right) => {
                self.inputs[self.focus].move_right();
                None
            }
            (KeyModifiers::NONE, KeyCode::Home) => {
                self.inputs[self.focus].move_home();
                None
            }
            (KeyModifiers::NONE, KeyCode::End) => {
                self.inputs[self.focus].move_end();
                None
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.inputs[self.focus].insert_char(c);
                self.changed()
            }
            _ => None,
        }
    }

    fn changed(&self) -> Option<QuestionsIntent> {
        Some(QuestionsIntent::AnswerChanged(
            self.focus,
            self.inputs[self.focus].text().to_string(),
        ))
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        percent: u16,
        all_answered: bool,
        loading: bool,
        spinner: &str,
    ) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // Heading
            Constraint::Length(1), // Progress gauge
            Constraint::Length(1), // Spacer
            Constraint::Min(4),    // Questions
            Constraint::Length(2), // Submit hint
        ])
        .split(area);

        let heading = Line::from(vec![
            Span::styled("Refine Your Vision", theme::title()),
            Span::raw("   "),
            Span::styled(format!("{percent}% complete"), theme::muted()),
        ]);
        frame.render_widget(Paragraph::new(heading), chunks[0]);

        let gauge = Gauge::default()
            .gauge_style(theme::border_focused())
            .ratio(f64::from(percent) / 100.0)
            .label("");
        frame.render_widget(gauge, chunks[1]);

        self.render_questions(frame, chunks[3], loading);

        let hint = if loading {
            Line::from(vec![
                Span::styled(spinner.to_string(), theme::heading()),
                Span::styled(" Constructing Master Prompt…", theme::muted()),
            ])
        } else if all_answered {
            Line::from(vec![
                Span::styled("Ctrl+S", theme::key_hint()),
                Span::raw(" "),
                Span::styled("Generate Optimized Prompt", theme::highlight()),
            ])
        } else {
            Line::from(Span::styled(
                "Answer every question to continue — Tab/↑↓ to move",
                theme::dim(),
            ))
        };
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[4]);
    }

    fn render_questions(&mut self, frame: &mut Frame, area: Rect, loading: bool) {
        let visible = (area.height as usize / ROWS_PER_QUESTION).max(1);

        // Keep the focused question on screen.
        if self.focus < self.scroll_top {
            self.scroll_top = self.focus;
        } else if self.focus >= self.scroll_top + visible {
            self.scroll_top = self.focus + 1 - visible;
        }

        let mut y = area.y;
        for (idx, question) in self
            .questions
            .iter()
            .enumerate()
            .skip(self.scroll_top)
            .take(visible)
        {
            let focused = idx == self.focus && !loading;

            let label = Line::from(vec![
                Span::styled(format!("{:02}. ", idx + 1), theme::heading()),
                Span::styled(question.clone(), Style::default().fg(theme::TEXT)),
            ]);
            frame.render_widget(
                Paragraph::new(label),
                Rect::new(area.x, y, area.width, 1),
            );

            let answer = self.inputs[idx].text();
            let answer_line = if answer.is_empty() && !focused {
                Line::from(Span::styled("    Your answer…", theme::dim()))
            } else {
                Line::from(vec![
                    Span::styled(
                        if focused { "  ▸ " } else { "    " },
                        theme::highlight(),
                    ),
                    Span::raw(answer.to_string()),
                ])
            };
            let answer_area = Rect::new(area.x, y + 1, area.width, 1);
            frame.render_widget(Paragraph::new(answer_line), answer_area);

            if focused {
                let col = 4 + self.inputs[idx].cursor_line_col().1;
                let x = answer_area.x + (col as u16).min(answer_area.width.saturating_sub(1));
                frame.set_cursor_position((x, answer_area.y));
            }

            y += ROWS_PER_QUESTION as u16;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn view() -> QuestionsViewState {
        QuestionsViewState::new(vec!["Q1?".into(), "Q2?".into(), "Q3?".into()])
    }

    #[test]
    fn test_typing_emits_answer_changed() {
        let mut v = view();
        let intent = v.handle_input(&key(KeyCode::Char('a'), KeyModifiers::NONE), false);
        assert_eq!(
            intent,
            Some(QuestionsIntent::AnswerChanged(0, "a".to_string()))
        );
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut v = view();
        assert_eq!(v.focus(), 0);
        v.handle_input(&key(KeyCode::Tab, KeyModifiers::NONE), false);
        assert_eq!(v.focus(), 1);
        v.handle_input(&key(KeyCode::Tab, KeyModifiers::NONE), false);
        v.handle_input(&key(KeyCode::Tab, KeyModifiers::NONE), false);
        assert_eq!(v.focus(), 0); // wraps
        v.handle_input(&key(KeyCode::Up, KeyModifiers::NONE), false);
        assert_eq!(v.focus(), 2); // wraps backward
    }

    #[test]
    fn test_submit_intent() {
        let mut v = view();
        let intent = v.handle_input(&key(KeyCode::Char('s'), KeyModifiers::CONTROL), false);
        assert_eq!(intent, Some(QuestionsIntent::Submit));
    }

    #[test]
    fn test_input_suppressed_while_loading() {
        let mut v = view();
        assert!(v
            .handle_input(&key(KeyCode::Char('a'), KeyModifiers::NONE), true)
            .is_none());
        assert!(v
            .handle_input(&key(KeyCode::Char('s'), KeyModifiers::CONTROL), true)
            .is_none());
    }

    #[test]
    fn test_edits_target_focused_field() {
        let mut v = view();
        v.handle_input(&key(KeyCode::Tab, KeyModifiers::NONE), false);
        let intent = v.handle_input(&key(KeyCode::Char('b'), KeyModifiers::NONE), false);
        assert_eq!(
            intent,
            Some(QuestionsIntent::AnswerChanged(1, "b".to_string()))
        );
    }
}
