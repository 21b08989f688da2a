//! Step indicator: one segment per wizard step.
//!
//! The active step renders as a wide filled bar, completed steps as
//! short filled segments, pending steps as short dim segments.

use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::super::theme;

pub struct StepIndicator {
    current: usize,
    total: usize,
}

impl StepIndicator {
    /// `current` is 1-based.
    pub fn new(current: usize, total: usize) -> Self {
        Self {
            current: current.clamp(1, total.max(1)),
            total: total.max(1),
        }
    }

    fn segments(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::with_capacity(self.total * 2);
        for step in 1..=self.total {
            let span = if step == self.current {
                Span::styled("━━━━━━", theme::heading())
            } else if step < self.current {
                Span::styled("━━", theme::border_focused())
            } else {
                Span::styled("━━", theme::dim())
            };
            spans.push(span);
            if step != self.total {
                spans.push(Span::raw("  "));
            }
        }
        spans
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(self.segments());
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_count_includes_separators() {
        let indicator = StepIndicator::new(2, 3);
        // 3 segments + 2 separators
        assert_eq!(indicator.segments().len(), 5);
    }

    #[test]
    fn test_current_clamped_into_range() {
        let indicator = StepIndicator::new(9, 3);
        assert_eq!(indicator.current, 3);
        let indicator = StepIndicator::new(0, 3);
        assert_eq!(indicator.current, 1);
    }

    #[test]
    fn test_active_segment_is_wide() {
        let indicator = StepIndicator::new(1, 3);
        let segments = indicator.segments();
        assert_eq!(segments[0].content, "━━━━━━");
        assert_eq!(segments[2].content, "━━");
    }
}
