//! Floating chat panel: the closed-state button, the open panel, and the
//! key handling that drives the chat session.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState,
    },
    Frame,
};
use textwrap::core::display_width;
use tokio::sync::mpsc;

use crate::config::AssistantConfig;
use crate::core::assistant::{ChatFailure, ChatSession, PanelState};
use crate::tui::events::AppEvent;
use crate::tui::layout::{floating_button, floating_panel};
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::bubble::{message_lines, thinking_lines};
use crate::tui::widgets::input_line::InputLine;

const BUTTON_LABEL: &str = "💬 Chat";
const INPUT_PLACEHOLDER: &str = "Ask about resumes...";

pub struct ChatPanelView {
    session: ChatSession,
    input: InputLine,
    /// Lines scrolled from the top when not following the latest message.
    scroll_offset: usize,
    auto_scroll: bool,
    /// Replies that landed while the panel was hidden.
    unread: usize,
    tick: u64,
}

impl ChatPanelView {
    /// Create the view and wire the session's post-append hook into the
    /// app event channel.
    pub fn new(config: &AssistantConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let mut session = ChatSession::new(config);
        session.set_transcript_hook(move |_| {
            let _ = event_tx.send(AppEvent::TranscriptChanged);
        });

        Self {
            session,
            input: InputLine::new(),
            scroll_offset: 0,
            auto_scroll: true,
            unread: 0,
            tick: 0,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    pub fn unread(&self) -> usize {
        self.unread
    }

    pub fn toggle(&mut self) {
        self.session.toggle_panel();
        if self.session.is_open() {
            self.unread = 0;
            self.scroll_to_bottom();
        }
    }

    pub fn close(&mut self) {
        self.session.close_panel();
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    // ── Session events ───────────────────────────────────────────────

    /// Post-append hook target: follow the newest message.
    pub fn on_transcript_changed(&mut self) {
        self.scroll_to_bottom();
    }

    /// Land the outstanding reply. A reply that lands while the panel is
    /// hidden is counted on the button.
    pub fn on_generation_finished(&mut self, outcome: Result<String, ChatFailure>) {
        if self.session.finish_submit(outcome) && !self.session.is_open() {
            self.unread += 1;
        }
    }

    // ── Input handling ───────────────────────────────────────────────

    /// Returns true if the event was consumed (don't pass to global handler).
    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        if !self.session.is_open() {
            return false;
        }

        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(*code, *modifiers, services),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.scroll_up(3);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.scroll_down(3);
                    true
                }
                _ => false,
            },
            Event::Paste(text) => {
                text.chars()
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .filter(|c| !c.is_control())
                    .for_each(|c| self.input.insert_char(c));
                self.sync_pending_input();
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, services: &Services) -> bool {
        // These always fall through to global
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return false,
            (KeyModifiers::CONTROL, KeyCode::Char(' ')) => return false,
            (_, KeyCode::Esc) => return false,
            _ => {}
        }

        match (modifiers, code) {
            (_, KeyCode::Enter) => {
                self.submit(services);
            }
            (_, KeyCode::Backspace) => {
                self.input.backspace();
                self.sync_pending_input();
            }
            (_, KeyCode::Delete) => {
                self.input.delete();
                self.sync_pending_input();
            }
            (_, KeyCode::Left) => self.input.move_left(),
            (_, KeyCode::Right) => self.input.move_right(),
            (_, KeyCode::Home) => self.input.move_home(),
            (_, KeyCode::End) => self.input.move_end(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                self.input.clear();
                self.sync_pending_input();
            }
            (_, KeyCode::Up) => self.scroll_up(1),
            (_, KeyCode::Down) => self.scroll_down(1),
            (_, KeyCode::PageUp) => self.scroll_up(10),
            (_, KeyCode::PageDown) => self.scroll_down(10),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.input.insert_char(c);
                self.sync_pending_input();
            }
            _ => {} // Consume but ignore other keys while open
        }
        true
    }

    fn sync_pending_input(&mut self) {
        self.session.update_pending_input(self.input.text());
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Start a submission and run the call on its own task. The outcome
    /// always comes back as `GenerationFinished`, even if the call panics,
    /// so the in-flight state is always released.
    fn submit(&mut self, services: &Services) {
        let Some(request) = self.session.begin_submit() else {
            return;
        };
        self.input.clear();

        let llm = services.llm.clone();
        let tx = services.event_tx.clone();

        tokio::spawn(async move {
            let call = tokio::spawn(async move { llm.chat(request).await });
            let outcome = match call.await {
                Ok(Ok(response)) => Ok(response.content),
                Ok(Err(e)) => Err(ChatFailure::classify(&e)),
                Err(e) => {
                    log::error!("Generation task failed: {e}");
                    Err(ChatFailure::Unknown(e.to_string()))
                }
            };
            let _ = tx.send(AppEvent::GenerationFinished(outcome));
        });
    }

    // ── Scrolling ────────────────────────────────────────────────────

    fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
        self.auto_scroll = false;
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
        self.auto_scroll = false;
    }

    fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Draw the button or the panel over `anchor` (the host body).
    pub fn render(&mut self, frame: &mut Frame, anchor: Rect) {
        match self.session.panel() {
            PanelState::Closed | PanelState::Backgrounded => self.render_button(frame, anchor),
            PanelState::Open(_) => self.render_panel(frame, anchor),
        }
    }

    fn render_button(&self, frame: &mut Frame, anchor: Rect) {
        let label = if self.unread > 0 {
            format!("{BUTTON_LABEL} ({})", self.unread)
        } else if self.session.request_in_flight() {
            format!("{BUTTON_LABEL} …")
        } else {
            BUTTON_LABEL.to_string()
        };
        let width = Line::raw(label.as_str()).width() as u16;
        let area = floating_button(anchor, width);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(theme::button());

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(Line::styled(label, theme::button()))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
    }

    fn render_panel(&mut self, frame: &mut Frame, anchor: Rect) {
        let area = floating_panel(anchor);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_SURFACE));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Messages
            Constraint::Length(3), // Input
        ])
        .split(inner);

        self.render_header(frame, chunks[0]);
        self.render_messages(frame, chunks[1]);
        self.render_input(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(" Resume Assistant", theme::title()),
                Span::styled("  Esc to close ", theme::header()),
            ]),
            Line::styled(" Ask me anything!", Style::default().fg(theme::PRIMARY_SOFT)),
        ])
        .style(theme::header());
        frame.render_widget(header, area);
    }

    fn render_messages(&mut self, frame: &mut Frame, area: Rect) {
        // Leave the last column for the scrollbar
        let text_width = area.width.saturating_sub(1);

        let mut all_lines: Vec<Line> = Vec::new();
        all_lines.push(Line::raw(""));
        for message in self.session.transcript() {
            all_lines.extend(message_lines(message, text_width));
        }
        if self.session.request_in_flight() {
            all_lines.extend(thinking_lines(self.tick));
        }

        let visible_height = area.height as usize;
        let total = all_lines.len();
        let max_scroll = total.saturating_sub(visible_height);
        if self.auto_scroll {
            self.scroll_offset = max_scroll;
        } else {
            self.scroll_offset = self.scroll_offset.min(max_scroll);
        }

        let visible: Vec<Line> = all_lines
            .into_iter()
            .skip(self.scroll_offset)
            .take(visible_height)
            .collect();

        let text_area = Rect {
            width: text_width,
            ..area
        };
        frame.render_widget(Paragraph::new(visible), text_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .thumb_style(Style::default().fg(theme::PRIMARY_SOFT))
                    .track_style(theme::dim()),
                area,
                &mut scrollbar_state,
            );
        }
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let sending = self.session.request_in_flight();
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(theme::dim());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let send_hint = if sending {
            Span::styled(" ⏎ ", theme::dim())
        } else if self.session.can_submit() {
            Span::styled(" ⏎ ", theme::button())
        } else {
            Span::styled(" ⏎ ", theme::muted())
        };

        // Text column width minus the leading space and the send hint
        let field_width = inner.width.saturating_sub(4) as usize;
        let line = if self.input.text().is_empty() {
            Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    format!("{INPUT_PLACEHOLDER:<field_width$}"),
                    Style::default()
                        .fg(theme::TEXT_MUTED)
                        .add_modifier(Modifier::ITALIC),
                ),
                send_hint,
            ])
        } else {
            let (window, cursor) = self.input.window(field_width);
            let (before, rest) = window.split_at(cursor);
            let mut chars = rest.chars();
            let at = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
            let after = chars.as_str();
            let used = display_width(before) + display_width(&at) + display_width(after);

            Line::from(vec![
                Span::raw(" "),
                Span::styled(before.to_string(), Style::default().fg(theme::TEXT)),
                Span::styled(at, Style::default().bg(theme::TEXT).fg(theme::BG_BASE)),
                Span::styled(after.to_string(), Style::default().fg(theme::TEXT)),
                Span::raw(" ".repeat(field_width.saturating_sub(used))),
                send_hint,
            ])
        };

        frame.render_widget(Paragraph::new(line), inner);
    }
}
