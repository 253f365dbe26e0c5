//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, Gauge, Paragraph,
};

use super::runtime::{App, RangeEnd};
use super::style;
use crate::aggregate::{DateRange, RangeSummary};

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // body
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match (app.range, app.summary.as_ref()) {
        (Some(range), Some(summary)) => render_dashboard(frame, app, range, summary, chunks[1]),
        _ => render_pending(frame, app, chunks[1]),
    }
    render_footer(frame, app, chunks[2]);
}

/// Header bar: title, selected range with the focused end highlighted.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " ENERGY DASHBOARD ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    match app.range {
        Some(range) => {
            let focus = Style::default()
                .fg(style::FOCUS_FG)
                .add_modifier(Modifier::BOLD);
            let (start_style, end_style) = match app.focus {
                RangeEnd::Start => (focus, Style::default()),
                RangeEnd::End => (Style::default(), focus),
            };
            spans.push(Span::styled(range.start.to_string(), start_style));
            spans.push(Span::raw(" → "));
            spans.push(Span::styled(range.end.to_string(), end_style));
            if let Some(bounds) = app.bounds() {
                spans.push(Span::raw(format!(
                    " │ data {} → {}",
                    bounds.min, bounds.max
                )));
            }
        }
        None if app.is_pending() => spans.push(Span::raw("PENDING")),
        None => spans.push(Span::raw("NO DATA")),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Shown until a processed table with rows has been loaded.
fn render_pending(frame: &mut Frame, app: &App, area: Rect) {
    let message = if app.is_pending() {
        "Processed data not available yet. Run the pipeline, then press r to reload."
    } else {
        "The processed table holds no rows."
    };
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_dashboard(
    frame: &mut Frame,
    app: &App,
    range: DateRange,
    summary: &RangeSummary,
    area: Rect,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // KPI cards
            Constraint::Min(8),     // power flow
            Constraint::Length(12), // hourly profile + source mix
        ])
        .split(area);

    render_kpis(frame, summary, rows[0]);
    render_power_flow(frame, app, range, rows[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[2]);
    render_hourly_profile(frame, summary, bottom[0]);
    render_source_mix(frame, summary, bottom[1]);
}

/// Four metric cards across the top.
fn render_kpis(frame: &mut Frame, s: &RangeSummary, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let items = [
        (
            " Total Consumption ",
            format!("{:.0} kWh", s.total_consumption),
            style::CONSUMPTION_COLOR,
        ),
        (
            " Solar Generation ",
            format!("{:.0} kWh", s.total_solar),
            style::SOLAR_COLOR,
        ),
        (
            " Self-Sufficiency ",
            format!("{:.1} %", s.self_sufficiency_pct),
            style::sufficiency_color(s.self_sufficiency_pct),
        ),
        (
            " Carbon Offset ",
            format!("{:.0} kg CO2", s.carbon_offset_kg),
            style::SUFFICIENCY_HIGH,
        ),
    ];

    for ((title, value, color), card) in items.into_iter().zip(cards.iter()) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(paragraph, *card);
    }
}

/// Consumption vs solar over the selected range.
fn render_power_flow(frame: &mut Frame, app: &App, range: DateRange, area: Rect) {
    let origin = range.start.and_time(chrono::NaiveTime::MIN);
    let hours = |ts: chrono::NaiveDateTime| (ts - origin).num_hours() as f64;

    let consumption: Vec<(f64, f64)> = app
        .flow
        .iter()
        .map(|p| (hours(p.timestamp), p.consumption_kwh))
        .collect();
    let solar: Vec<(f64, f64)> = app
        .flow
        .iter()
        .map(|p| (hours(p.timestamp), p.solar_generation_kwh))
        .collect();

    let y_bounds = style::auto_bounds_y(&[&consumption, &solar]);
    let x_hi = consumption.last().map_or(1.0, |p| p.0).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("Consumption")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::CONSUMPTION_COLOR))
            .data(&consumption),
        Dataset::default()
            .name("Solar")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::SOLAR_COLOR))
            .data(&solar),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Power Flow (kWh per hour) ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_hi])
                .labels(vec![range.start.to_string(), range.end.to_string()]),
        )
        .y_axis(
            Axis::default()
                .title("kWh")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.0}", y_bounds[0]),
                    format!("{:.0}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Mean consumption and solar per hour of day, one bar group per hour.
fn render_hourly_profile(frame: &mut Frame, s: &RangeSummary, area: Rect) {
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title(" Hourly Profile (avg kWh) ")
                .borders(Borders::ALL),
        )
        .bar_width(1)
        .bar_gap(0)
        .group_gap(1);

    for h in &s.hourly_profile {
        let bars = [
            Bar::default()
                .value(h.consumption_kwh.max(0.0).round() as u64)
                .text_value(String::new())
                .style(Style::default().fg(style::CONSUMPTION_COLOR)),
            Bar::default()
                .value(h.solar_generation_kwh.max(0.0).round() as u64)
                .text_value(String::new())
                .style(Style::default().fg(style::SOLAR_COLOR)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(format!("{:02}", h.hour)))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

/// Grid import vs solar as a single split gauge plus totals.
fn render_source_mix(frame: &mut Frame, s: &RangeSummary, area: Rect) {
    let block = Block::default().title(" Source Mix ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let share = s.source_mix.solar_share();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(style::SOLAR_COLOR).bg(style::GRID_COLOR))
        .ratio(share.clamp(0.0, 1.0))
        .label(format!("solar {:.1}%", share * 100.0));
    frame.render_widget(gauge, parts[0]);

    let lines = vec![
        Line::from(Span::styled(
            format!("solar {:>8.0} kWh", s.source_mix.solar_gen),
            Style::default().fg(style::SOLAR_COLOR),
        )),
        Line::from(format!("grid  {:>8.0} kWh", s.source_mix.grid_import)),
    ];
    frame.render_widget(Paragraph::new(lines), parts[2]);
}

/// Footer with keybinding hints, or the last load error.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.error {
        Some(e) => Line::from(Span::styled(
            format!(" load failed: {e}"),
            Style::default().fg(style::ERROR_FG),
        )),
        None => Line::from(Span::styled(
            " q:Quit  Tab:Start/End  ←/→:Move  [/]:Pan  d:Default range  r:Reload",
            Style::default().fg(style::FOOTER_FG),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TariffConfig;
    use crate::dashboard::{self, DashboardState};
    use crate::readings::CleanedReading;
    use chrono::NaiveDate;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn pending_screen_mentions_pipeline() {
        let app = App::from_state(DashboardState::Pending, TariffConfig::default());
        let text = buffer_text(&app);
        assert!(text.contains("PENDING"));
        assert!(text.contains("Run the pipeline"));
    }

    #[test]
    fn dashboard_renders_cards() {
        let rows = (0..24)
            .map(|h| CleanedReading {
                timestamp: NaiveDate::from_ymd_opt(2024, 6, 1)
                    .unwrap()
                    .and_hms_opt(h, 0, 0)
                    .unwrap(),
                consumption_kwh: 60.0,
                solar_generation_kwh: if (6..=18).contains(&h) { 20.0 } else { 0.0 },
                temperature_c: 20.0,
                net_grid_load: 0.0,
                is_self_sufficient: false,
                estimated_cost: 0.0,
            })
            .collect();
        let state = DashboardState::Ready(dashboard::Dataset::new(rows, TariffConfig::default()));
        let app = App::from_state(state, TariffConfig::default());
        let text = buffer_text(&app);
        assert!(text.contains("Total Consumption"));
        assert!(text.contains("1440 kWh"));
        assert!(text.contains("Source Mix"));
    }
}
