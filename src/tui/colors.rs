//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Status};

pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
pub const GOLD: Color = Color::Rgb(255, 215, 0);
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Accent for a status: headers of kanban columns, table cells, calendar entries.
pub fn status_color(status: Status) -> Color {
    match status {
        Status::Pending => GOLD,
        Status::InProgress => Color::Cyan,
        Status::InReview => Color::Magenta,
        Status::Completed => Color::Green,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Gray,
        Priority::Medium => Color::White,
        Priority::High => Color::LightRed,
        Priority::Urgent => Color::Red,
    }
}
