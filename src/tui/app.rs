use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::config::AppConfig;

use super::events::{Action, AppEvent};
use super::layout::HostLayout;
use super::services::Services;
use super::theme;
use super::views::chat_panel::ChatPanelView;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// The floating chat button / panel.
    pub chat: ChatPanelView,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        services: Services,
        config: &AppConfig,
    ) -> Self {
        let chat = ChatPanelView::new(&config.assistant, services.event_tx.clone());
        Self {
            running: true,
            chat,
            show_help: false,
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
                    self.handle_event(AppEvent::Tick);
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

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Open panel
                if self.chat.handle_input(&crossterm_event, &self.services) {
                    return;
                }

                // Priority 3: Global keybindings
                if let Some(action) = self.map_input_to_action(&crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Tick => self.chat.on_tick(),
            AppEvent::GenerationFinished(outcome) => {
                self.chat.on_generation_finished(outcome);
            }
            AppEvent::TranscriptChanged => self.chat.on_transcript_changed(),
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: &Event) -> Option<Action> {
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
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::CONTROL, KeyCode::Char(' ')) => Some(Action::TogglePanel),
            (_, KeyCode::Esc) if self.chat.is_open() => Some(Action::ClosePanel),
            // Plain keys only reach here while the panel is closed
            (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('c') | KeyCode::Enter => Some(Action::TogglePanel),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::TogglePanel => self.chat.toggle(),
            Action::ClosePanel => self.chat.close(),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(theme::BG_BASE)), area);

        let layout = HostLayout::compute(area);
        self.render_header(frame, layout.header);
        self.render_body(frame, layout.body);
        self.render_footer(frame, layout.footer);

        // Overlays
        self.chat.render(frame, layout.body);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled(" Resume Builder ", theme::button()),
            Span::raw(" "),
            Span::styled(format!("v{}", crate::VERSION), theme::muted()),
        ]))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme::dim()),
        );
        frame.render_widget(header, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                "  Build a resume that gets read.",
                Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::from(Span::styled(
                "  Stuck on wording, structure, or what to include?",
                theme::muted(),
            )),
            Line::from(Span::styled(
                "  Open the assistant in the corner and ask.",
                theme::muted(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = if self.chat.is_open() {
            vec![
                Span::styled(" Enter", theme::key_hint()),
                Span::raw(":send "),
                Span::styled("↑↓", theme::key_hint()),
                Span::raw(":scroll "),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(":close "),
                Span::styled("Ctrl+C", theme::key_hint()),
                Span::raw(":quit"),
            ]
        } else {
            vec![
                Span::styled(" c", theme::key_hint()),
                Span::raw(":chat "),
                Span::styled("?", theme::key_hint()),
                Span::raw(":help "),
                Span::styled("q", theme::key_hint()),
                Span::raw(":quit"),
            ]
        };
        frame.render_widget(Paragraph::new(Line::from(hints)), area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 60, area);

        let keybindings = [
            ("c / Enter", "Open the chat panel"),
            ("Ctrl+Space", "Toggle the chat panel"),
            ("Esc", "Close the chat panel"),
            ("Enter", "Send message (panel open)"),
            ("↑ ↓ PgUp PgDn", "Scroll the conversation"),
            ("Ctrl+U", "Clear the message field"),
            ("q", "Quit (panel closed)"),
            ("Ctrl+C", "Quit"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                " Keybindings",
                Style::default()
                    .fg(theme::PRIMARY_SOFT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];

        for (key, desc) in keybindings {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{key:<16}"), theme::key_hint()),
                Span::raw(desc),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("?", theme::key_hint()),
            Span::raw(" or "),
            Span::styled("Esc", theme::key_hint()),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme::border_focused());

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
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
