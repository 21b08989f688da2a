use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::core::wizard::{Step, SubmitOutcome, WizardSession};

use super::events::{AppEvent, Notification, NotificationLevel};
use super::services::Services;
use super::theme;
use super::views::idea::{IdeaIntent, IdeaViewState};
use super::views::questions::{QuestionsIntent, QuestionsViewState};
use super::views::result::{ResultIntent, ResultViewState};
use super::widgets::StepIndicator;

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Message shown when a generation call exhausts its retries.
const BUSY_MESSAGE: &str = "AI busy — try again shortly.";

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// The wizard session state machine.
    session: WizardSession,
    /// Step 1 view state.
    idea: IdeaViewState,
    /// Step 2 view state (built when questions arrive).
    questions: Option<QuestionsViewState>,
    /// Step 3 view state.
    result: ResultViewState,
    /// Active notifications (max 3 visible).
    notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    show_help: bool,
    /// Tick counter driving the spinner animation.
    tick_count: u64,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        Self {
            running: true,
            session: WizardSession::new(),
            idea: IdeaViewState::new(),
            questions: None,
            result: ResultViewState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            tick_count: 0,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Ctrl+C always quits
                if is_ctrl_c(&crossterm_event) {
                    self.running = false;
                    return;
                }

                // Priority 2: Help modal consumes input when open
                if self.show_help {
                    if is_close_help(&crossterm_event) {
                        self.show_help = false;
                    }
                    return;
                }

                // Priority 3: Current step view
                if self.dispatch_view_input(&crossterm_event) {
                    return;
                }

                // Priority 4: Global keybindings for non-text-entry steps
                self.handle_global_input(&crossterm_event);
            }
            AppEvent::QuestionsReady(questions) => {
                log::info!("Received {} refinement questions", questions.len());
                self.questions = Some(QuestionsViewState::new(questions.clone()));
                self.session.questions_ready(questions);
            }
            AppEvent::PromptReady(prompt) => {
                log::info!("Final prompt synthesized ({} chars)", prompt.len());
                self.result = ResultViewState::new();
                self.session.prompt_ready(prompt);
            }
            AppEvent::GenerationFailed(error) => {
                log::warn!("Generation failed: {error}");
                self.session.call_failed(BUSY_MESSAGE);
                self.push_notification(BUSY_MESSAGE.to_string(), NotificationLevel::Warning);
            }
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Tick => self.on_tick(),
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    /// Dispatch input to the current step's view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        let loading = self.session.is_loading();
        match self.session.step() {
            Step::IdeaEntry => {
                if let Some(intent) = self.idea.handle_input(event, loading) {
                    self.handle_idea_intent(intent);
                    return true;
                }
                // Text entry consumes printable keys even without an intent
                is_text_entry_key(event)
            }
            Step::Questions => {
                let intent = self
                    .questions
                    .as_mut()
                    .and_then(|view| view.handle_input(event, loading));
                if let Some(intent) = intent {
                    self.handle_questions_intent(intent);
                    return true;
                }
                is_text_entry_key(event)
            }
            Step::Result => {
                if let Some(intent) = self.result.handle_input(event) {
                    self.handle_result_intent(intent);
                    return true;
                }
                false
            }
        }
    }

    fn handle_global_input(&mut self, event: &Event) {
        let Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return;
        };

        match code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    // ── Intent handling ─────────────────────────────────────────────────

    fn handle_idea_intent(&mut self, intent: IdeaIntent) {
        let IdeaIntent::Submit(text) = intent;
        if self.session.submit_idea(&text) != SubmitOutcome::StartGeneration {
            return;
        }

        let idea = self.session.idea().to_string();
        let refiner = self.services.refiner.clone();
        let tx = self.services.event_tx.clone();

        tokio::spawn(async move {
            match refiner.generate_questions(&idea).await {
                Ok(questions) => {
                    let _ = tx.send(AppEvent::QuestionsReady(questions));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::GenerationFailed(e.to_string()));
                }
            }
        });
    }

    fn handle_questions_intent(&mut self, intent: QuestionsIntent) {
        match intent {
            QuestionsIntent::AnswerChanged(index, text) => {
                self.session.set_answer(index, text);
            }
            QuestionsIntent::Submit => {
                let Some(pairs) = self.session.submit_answers() else {
                    return;
                };

                let idea = self.session.idea().to_string();
                let refiner = self.services.refiner.clone();
                let tx = self.services.event_tx.clone();

                tokio::spawn(async move {
                    match refiner.generate_final_prompt(&idea, &pairs).await {
                        Ok(prompt) => {
                            let _ = tx.send(AppEvent::PromptReady(prompt));
                        }
                        Err(e) => {
                            let _ = tx.send(AppEvent::GenerationFailed(e.to_string()));
                        }
                    }
                });
            }
        }
    }

    fn handle_result_intent(&mut self, intent: ResultIntent) {
        match intent {
            ResultIntent::Copy => match copy_to_clipboard(self.session.final_prompt()) {
                Ok(()) => {
                    self.push_notification("Copied!".to_string(), NotificationLevel::Success);
                }
                Err(e) => {
                    // Never blocking: the prompt stays on screen either way.
                    log::error!("Clipboard copy failed: {e}");
                    self.push_notification(
                        "Clipboard unavailable".to_string(),
                        NotificationLevel::Warning,
                    );
                }
            },
            ResultIntent::Reset => {
                log::info!("Session reset to idea entry");
                self.session.reset();
                self.idea.reset();
                self.questions = None;
                self.result = ResultViewState::new();
            }
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: 40,
        });

        while self.notifications.len() > 3 {
            self.notifications.remove(0);
        }
    }

    /// Tick: advance the spinner, decrement notification TTLs.
    fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[(self.tick_count / 2) as usize % SPINNER_FRAMES.len()]
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(2), // Header + step indicator
            Constraint::Min(8),    // Current step
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.render_header(frame, chunks[0]);
        self.render_step(frame, chunks[1]);
        self.render_status_bar(frame, chunks[2]);

        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

        let title = Line::from(Span::styled("PromptForge", theme::title()));
        frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), rows[0]);

        StepIndicator::new(self.session.step().position(), Step::COUNT)
            .render(frame, rows[1]);
    }

    fn render_step(&mut self, frame: &mut Frame, area: Rect) {
        // Inset the content like the original's centered column
        let inner = Layout::horizontal([
            Constraint::Min(1),
            Constraint::Percentage(80),
            Constraint::Min(1),
        ])
        .split(area)[1];

        let loading = self.session.is_loading();
        let spinner = self.spinner();

        match self.session.step() {
            Step::IdeaEntry => self.idea.render(frame, inner, loading, spinner),
            Step::Questions => {
                let percent = self.session.completion_percent();
                let all_answered = self.session.all_answered();
                if let Some(view) = self.questions.as_mut() {
                    view.render(frame, inner, percent, all_answered, loading, spinner);
                }
            }
            Step::Result => self.result.render(frame, inner, self.session.final_prompt()),
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let state = if self.session.is_loading() {
            Span::styled("generating", Style::default().fg(theme::PRIMARY_LIGHT))
        } else {
            Span::styled("ready", theme::muted())
        };

        let status_msg = match self.session.status() {
            Some(msg) => Span::styled(format!(" {msg} "), Style::default().fg(theme::WARNING)),
            None => Span::raw(""),
        };

        let step_label = match self.session.step() {
            Step::IdeaEntry => "Idea",
            Step::Questions => "Questions",
            Step::Result => "Result",
        };

        let status = Line::from(vec![
            Span::styled(" PromptForge ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(
                format!("{step_label} {}/{}", self.session.step().position(), Step::COUNT),
                Style::default().fg(theme::PRIMARY_LIGHT),
            ),
            Span::raw(" │ "),
            state,
            status_msg,
            Span::raw(" │ "),
            Span::styled("Ctrl+C", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 40.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color)),
                    Span::raw(&n.message),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(50, 60, area);

        let keybindings = [
            ("Global:", ""),
            ("Ctrl+C", "Quit"),
            ("? (result step)", "Toggle this help"),
            ("", ""),
            ("Idea step:", ""),
            ("Ctrl+S", "Analyze idea"),
            ("Enter", "New line"),
            ("", ""),
            ("Questions step:", ""),
            ("Tab / Shift+Tab", "Next / previous question"),
            ("Ctrl+S", "Generate optimized prompt"),
            ("", ""),
            ("Result step:", ""),
            ("c", "Copy prompt to clipboard"),
            ("n", "Start a new session"),
            ("j/k", "Scroll"),
            ("q", "Quit"),
        ];

        let mut lines = vec![Line::raw("")];
        for (key, desc) in keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {key}"),
                    theme::title(),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{:<18}", key), theme::heading()),
                    Span::raw(desc),
                ]));
            }
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("Esc", theme::heading()),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

// ── Input helpers ───────────────────────────────────────────────────────────

fn is_ctrl_c(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            ..
        })
    )
}

fn is_close_help(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Esc | KeyCode::Char('?'),
            kind: KeyEventKind::Press,
            ..
        })
    )
}

/// Keys that belong to the text-entry views even when no intent fires,
/// so global bindings (like 'q') never swallow typed characters.
fn is_text_entry_key(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char(_)
                | KeyCode::Backspace
                | KeyCode::Delete
                | KeyCode::Enter
                | KeyCode::Tab
                | KeyCode::BackTab
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Up
                | KeyCode::Down
                | KeyCode::Home
                | KeyCode::End,
            ..
        })
    )
}

fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
