//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Consumption series color.
pub const CONSUMPTION_COLOR: Color = Color::Cyan;
/// Solar series color.
pub const SOLAR_COLOR: Color = Color::Yellow;
/// Grid import share in the source mix gauge.
pub const GRID_COLOR: Color = Color::DarkGray;
/// Self-sufficiency color when high (>= 50%).
pub const SUFFICIENCY_HIGH: Color = Color::Green;
/// Self-sufficiency color when medium (>= 20%).
pub const SUFFICIENCY_MID: Color = Color::Yellow;
/// Self-sufficiency color when low (< 20%).
pub const SUFFICIENCY_LOW: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Focused range end.
pub const FOCUS_FG: Color = Color::Magenta;
/// Load error text.
pub const ERROR_FG: Color = Color::Red;

/// Returns a color for a self-sufficiency percentage.
pub fn sufficiency_color(pct: f64) -> Color {
    if pct >= 50.0 {
        SUFFICIENCY_HIGH
    } else if pct >= 20.0 {
        SUFFICIENCY_MID
    } else {
        SUFFICIENCY_LOW
    }
}

/// Computes Y-axis bounds from chart series with 10% padding.
pub fn auto_bounds_y(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let all = series.iter().flat_map(|s| s.iter()).map(|&(_, y)| y);
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
