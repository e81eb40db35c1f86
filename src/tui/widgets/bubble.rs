//! Chat bubbles: wraps transcript messages into padded, aligned lines.

use ratatui::{
    layout::Alignment,
    style::Style,
    text::{Line, Span},
};
use textwrap::core::display_width;

use crate::core::llm::{ChatMessage, MessageRole};
use crate::tui::theme;

/// Bubbles take at most this share of the transcript width.
pub const BUBBLE_WIDTH_PERCENT: usize = 80;
const MIN_BUBBLE_WIDTH: usize = 8;

/// Outer width (padding included) available to a bubble.
pub fn bubble_width(inner_width: u16) -> usize {
    (inner_width as usize * BUBBLE_WIDTH_PERCENT / 100).max(MIN_BUBBLE_WIDTH)
}

/// Lines for one message: wrapped body with one cell of padding each side,
/// right-aligned for the user, followed by a spacer line.
pub fn message_lines(message: &ChatMessage, inner_width: u16) -> Vec<Line<'static>> {
    let (style, alignment) = match message.role() {
        MessageRole::User => (theme::user_bubble(), Alignment::Right),
        MessageRole::Assistant => (theme::assistant_bubble(), Alignment::Left),
    };

    let mut lines = padded_block(message.content(), bubble_width(inner_width), style, alignment);
    lines.push(Line::raw(""));
    lines
}

/// Animated placeholder shown while a reply is outstanding.
pub fn thinking_lines(tick: u64) -> Vec<Line<'static>> {
    const FRAMES: [&str; 4] = ["●∙∙", "∙●∙", "∙∙●", "∙●∙"];
    let frame = FRAMES[(tick / 4) as usize % FRAMES.len()];
    vec![
        Line::from(Span::styled(format!(" {frame} "), theme::assistant_bubble())),
        Line::raw(""),
    ]
}

fn padded_block(
    text: &str,
    outer_width: usize,
    style: Style,
    alignment: Alignment,
) -> Vec<Line<'static>> {
    let text_width = outer_width.saturating_sub(2).max(1);
    let wrapped = textwrap::wrap(text, text_width);
    let block_width = wrapped
        .iter()
        .map(|l| display_width(l))
        .max()
        .unwrap_or(0);

    wrapped
        .iter()
        .map(|l| {
            let pad = block_width - display_width(l);
            let body = format!(" {l}{} ", " ".repeat(pad));
            Line::from(Span::styled(body, style)).alignment(alignment)
        })
        .collect()
}
