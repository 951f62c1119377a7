//! TUI rendering: a grid of live trend lines.
//!
//! ┌──────────────────────────────────────────────┐
//! │  Sparkline   3 charts   250ms   ticks 412    │
//! ├──────────────────────┬───────────────────────┤
//! │ chart-1a2b  +0.412   │ chart-9f3c  -0.107    │
//! │   ⠤⠒⠉⠑⠢⣀⡠⠔⠊         │      ⡠⠊⠉⠒⠤⣀            │
//! ├──────────────────────┼───────────────────────┤
//! │ chart-77d0  +0.030   │                       │
//! │  ⣀⡠⠤⠒⠉⠉⠒⠢⢄⣀        │                       │
//! ├──────────────────────┴───────────────────────┤
//! │  tab: focus  p: pause  +/-: speed  q: quit   │
//! └──────────────────────────────────────────────┘
//!
//! Each chart paints into a `DisplayList` sized to its cell in braille dots
//! (2x4 per terminal cell); this module replays the recorded ops onto a
//! `Canvas` with the y axis flipped.

use super::app::App;
use ratatui::{
    prelude::*,
    widgets::{
        canvas::{self, Canvas, Line as CanvasLine, Points},
        *,
    },
};
use sparkline_core::{Chart, DisplayList, DrawOp, Surface};

/// Braille dots per terminal cell.
const DOTS_X: u32 = 2;
const DOTS_Y: u32 = 4;

/// Up to this many charts stack in one column.
const SINGLE_COLUMN_MAX: usize = 3;

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(4),    // charts
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_grid(f, rows[1], app);
    draw_keys(f, rows[2]);
}

/// Grid cells for `n` charts inside the full terminal `area`.
///
/// Mirrors the vertical split in [`draw`] so the app can size surfaces
/// before the frame is drawn.
pub fn chart_rects(area: Rect, n: usize) -> Vec<Rect> {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);
    grid_cells(rows[1], n)
}

fn grid_cells(area: Rect, n: usize) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }
    let cols = if n <= SINGLE_COLUMN_MAX { 1 } else { 2 };
    let row_count = n.div_ceil(cols);

    let row_rects = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, row_count as u32); row_count])
        .split(area);

    row_rects
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
                .split(*row)
                .to_vec()
        })
        .take(n)
        .collect()
}

/// Pixel size of the surface that fits inside a bordered grid cell.
pub fn surface_size(cell: Rect) -> (u32, u32) {
    let inner = Block::bordered().inner(cell);
    (
        u32::from(inner.width) * DOTS_X,
        u32::from(inner.height) * DOTS_Y,
    )
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let state = if app.is_paused() {
        Span::styled("  paused", Style::default().bold().fg(Color::Red))
    } else {
        Span::styled("  live", Style::default().fg(Color::Green))
    };
    let status = app
        .status()
        .map(|s| format!("  {s} "))
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" Sparkline ", Style::default().bold().fg(Color::Cyan)),
            Span::styled(
                format!(
                    "  {} charts  {}ms  ticks {}",
                    app.charts().len(),
                    app.interval_ms(),
                    app.total_ticks()
                ),
                Style::default().fg(Color::DarkGray),
            ),
            state,
            Span::styled(status, Style::default().fg(Color::Yellow)),
        ]));

    f.render_widget(block, area);
}

fn draw_grid(f: &mut Frame, area: Rect, app: &App) {
    let cells = grid_cells(area, app.charts().len());
    for (i, (chart, cell)) in app.charts().iter().zip(cells).enumerate() {
        draw_chart(f, cell, app, chart, i == app.focus());
    }
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App, chart: &Chart, focused: bool) {
    let id = chart.id().as_str();
    let short = id.get(..14).unwrap_or(id);
    let latest = chart
        .window()
        .latest()
        .map(|v| format!("{v:+.3}"))
        .unwrap_or_else(|| "—".into());

    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::bordered().border_style(border).title(Line::from(vec![
        Span::styled(format!(" {short} "), Style::default().bold()),
        Span::styled(
            format!("{}  ", chart.style().label()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{latest} "), Style::default().fg(Color::Cyan)),
    ]));

    if app.is_detached(chart) {
        let msg = Paragraph::new("surface detached (d to reattach)")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let Some(surface) = app.surface(chart) else {
        f.render_widget(block, area);
        return;
    };

    let color = if focused { Color::Yellow } else { Color::Green };
    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, f64::from(surface.width())])
        .y_bounds([0.0, f64::from(surface.height())])
        .paint(|ctx| paint_ops(ctx, surface, color));

    f.render_widget(canvas, area);
}

/// Replay recorded ops, flipping y from surface (down) to canvas (up).
fn paint_ops(ctx: &mut canvas::Context<'_>, surface: &DisplayList, color: Color) {
    let h = f64::from(surface.height());
    for op in surface.ops() {
        match *op {
            DrawOp::Line(a, b) => ctx.draw(&CanvasLine {
                x1: a.x,
                y1: h - a.y,
                x2: b.x,
                y2: h - b.y,
                color,
            }),
            DrawOp::Point(p) => ctx.draw(&Points {
                coords: &[(p.x, h - p.y)],
                color,
            }),
        }
    }
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let keys = Line::from(vec![
        Span::styled(" tab", Style::default().bold().fg(Color::Cyan)),
        Span::raw(" focus  "),
        Span::styled("p", Style::default().bold().fg(Color::Cyan)),
        Span::raw(" pause  "),
        Span::styled("+/-", Style::default().bold().fg(Color::Cyan)),
        Span::raw(" speed  "),
        Span::styled("a/x", Style::default().bold().fg(Color::Cyan)),
        Span::raw(" add/remove  "),
        Span::styled("d", Style::default().bold().fg(Color::Cyan)),
        Span::raw(" detach  "),
        Span::styled("r", Style::default().bold().fg(Color::Cyan)),
        Span::raw(" redraw  "),
        Span::styled("s", Style::default().bold().fg(Color::Cyan)),
        Span::raw(" save  "),
        Span::styled("q", Style::default().bold().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]);
    f.render_widget(Paragraph::new(keys), area);
}
