//! Colors used by the timeline widget.
//!
//! Follows the active egui visuals: `TimelineTheme::for_visuals` picks the
//! light or dark palette so the widget matches the surrounding application.

use egui::Color32;

/// All colors painted by [`super::TimelineView`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineTheme {
    pub is_dark: bool,

    /// Grid background
    pub background: Color32,

    /// Background of weekend columns
    pub weekend_background: Color32,

    /// Background of the column containing today
    pub today_background: Color32,

    pub header_background: Color32,

    pub group_background: Color32,

    /// Vertical slot and horizontal row separators
    pub grid_line: Color32,

    /// Default event fill when the event has no color of its own
    pub event_fill: Color32,

    pub preview_fill: Color32,

    pub more_indicator: Color32,

    pub text_primary: Color32,

    pub text_secondary: Color32,
}

impl TimelineTheme {
    pub fn light() -> Self {
        Self {
            is_dark: false,
            background: Color32::from_rgb(255, 255, 255),
            weekend_background: Color32::from_rgb(248, 248, 250),
            today_background: Color32::from_rgb(230, 240, 255),
            header_background: Color32::from_rgb(245, 245, 245),
            group_background: Color32::from_rgb(236, 238, 242),
            grid_line: Color32::from_rgb(220, 220, 220),
            event_fill: Color32::from_rgb(100, 150, 200),
            preview_fill: Color32::from_rgba_unmultiplied(100, 150, 255, 90),
            more_indicator: Color32::from_rgb(120, 120, 120),
            text_primary: Color32::from_rgb(40, 40, 40),
            text_secondary: Color32::from_rgb(100, 100, 100),
        }
    }

    pub fn dark() -> Self {
        Self {
            is_dark: true,
            background: Color32::from_rgb(40, 40, 40),
            weekend_background: Color32::from_rgb(35, 35, 38),
            today_background: Color32::from_rgb(50, 60, 80),
            header_background: Color32::from_rgb(30, 30, 30),
            group_background: Color32::from_rgb(48, 50, 56),
            grid_line: Color32::from_rgb(60, 60, 60),
            event_fill: Color32::from_rgb(80, 120, 170),
            preview_fill: Color32::from_rgba_unmultiplied(100, 150, 255, 70),
            more_indicator: Color32::from_rgb(170, 170, 170),
            text_primary: Color32::from_rgb(240, 240, 240),
            text_secondary: Color32::from_rgb(170, 170, 170),
        }
    }

    pub fn for_visuals(visuals: &egui::Visuals) -> Self {
        if visuals.dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Parse `#rrggbb` or `#rgb` into a color.
pub fn parse_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().trim_start_matches('#');
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color32::from_rgb(r, g, b))
        }
        3 => {
            let mut channels = [0u8; 3];
            for (slot, c) in channels.iter_mut().zip(hex.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 16 + v;
            }
            Some(Color32::from_rgb(channels[0], channels[1], channels[2]))
        }
        _ => None,
    }
}
