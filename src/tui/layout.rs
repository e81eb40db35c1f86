//! Layout computation for the host screen and the floating chat overlay.

use ratatui::layout::{Constraint, Layout, Rect};

/// Preferred size of the open panel.
pub const PANEL_WIDTH: u16 = 48;
pub const PANEL_HEIGHT: u16 = 24;
/// Gap kept between the overlay and the edge of its anchor area.
pub const OVERLAY_MARGIN: u16 = 1;
/// Height of the floating button badge.
pub const BUTTON_HEIGHT: u16 = 3;

/// Computed regions of the host screen for a single frame.
pub struct HostLayout {
    pub header: Rect,
    pub body: Rect,
    /// Key hint bar (bottom row).
    pub footer: Rect,
}

impl HostLayout {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

        HostLayout {
            header: rows[0],
            body: rows[1],
            footer: rows[2],
        }
    }
}

/// Rect anchored to the bottom-right corner of `anchor`, shrunk to fit
/// inside it with `OVERLAY_MARGIN` on every side.
fn bottom_right(anchor: Rect, width: u16, height: u16) -> Rect {
    let max_w = anchor.width.saturating_sub(OVERLAY_MARGIN * 2);
    let max_h = anchor.height.saturating_sub(OVERLAY_MARGIN * 2);
    let width = width.min(max_w);
    let height = height.min(max_h);

    Rect::new(
        anchor.x + anchor.width.saturating_sub(width + OVERLAY_MARGIN),
        anchor.y + anchor.height.saturating_sub(height + OVERLAY_MARGIN),
        width,
        height,
    )
}

/// Area of the open chat panel.
pub fn floating_panel(anchor: Rect) -> Rect {
    bottom_right(anchor, PANEL_WIDTH, PANEL_HEIGHT)
}

/// Area of the closed-state chat button for a label of `label_width` cells.
pub fn floating_button(anchor: Rect, label_width: u16) -> Rect {
    // Border on both sides plus one cell of padding
    bottom_right(anchor, label_width + 4, BUTTON_HEIGHT)
}
