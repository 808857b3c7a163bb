//! Layout, hit-testing and drawing of the panel.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use kitpanel_core::knob::RotaryControl;
use kitpanel_types::{ControlId, InstrumentId};

use crate::app::App;

pub const KNOB_COLUMNS: usize = 4;
pub const KNOB_ROWS: usize = 3;
/// Width of one instrument tab: " cymbal6 " is the longest.
pub const TAB_WIDTH: u16 = 9;
pub const TOGGLE_WIDTH: u16 = 10;
const ARC_CELLS: usize = 15;

/// Screen regions for one frame, reused for mouse hit-testing.
#[derive(Debug, Clone)]
pub struct PanelLayout {
    pub tabs: Rect,
    pub header: Rect,
    pub knobs: Vec<(ControlId, Rect)>,
    pub toggles: Vec<(ControlId, Rect)>,
    pub readout: Rect,
    pub status: Rect,
}

fn contains(r: Rect, column: u16, row: u16) -> bool {
    column >= r.x && column < r.x.saturating_add(r.width) && row >= r.y && row < r.y.saturating_add(r.height)
}

impl PanelLayout {
    pub fn new(area: Rect) -> Self {
        let [tabs, header, grid, toggle_row, readout, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(KNOB_ROWS as u16 * 4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let rows = Layout::vertical([Constraint::Ratio(1, KNOB_ROWS as u32); KNOB_ROWS]).split(grid);
        let mut knobs = Vec::with_capacity(ControlId::KNOBS.len());
        for (r, row) in rows.iter().enumerate() {
            let cells =
                Layout::horizontal([Constraint::Ratio(1, KNOB_COLUMNS as u32); KNOB_COLUMNS]).split(*row);
            for (c, cell) in cells.iter().enumerate() {
                if let Some(control) = ControlId::KNOBS.get(r * KNOB_COLUMNS + c) {
                    knobs.push((*control, *cell));
                }
            }
        }

        let toggles = ControlId::TOGGLES
            .iter()
            .enumerate()
            .map(|(i, control)| {
                let x = toggle_row.x.saturating_add(i as u16 * TOGGLE_WIDTH);
                let width = TOGGLE_WIDTH.min(toggle_row.right().saturating_sub(x));
                (*control, Rect::new(x, toggle_row.y, width, toggle_row.height))
            })
            .collect();

        Self {
            tabs,
            header,
            knobs,
            toggles,
            readout,
            status,
        }
    }

    pub fn knob_at(&self, column: u16, row: u16) -> Option<ControlId> {
        self.knobs
            .iter()
            .find(|(_, r)| contains(*r, column, row))
            .map(|(c, _)| *c)
    }

    pub fn toggle_at(&self, column: u16, row: u16) -> Option<ControlId> {
        self.toggles
            .iter()
            .find(|(_, r)| contains(*r, column, row))
            .map(|(c, _)| *c)
    }

    pub fn tab_at(&self, column: u16, row: u16) -> Option<InstrumentId> {
        if !contains(self.tabs, column, row) {
            return None;
        }
        InstrumentId::from_index(usize::from((column - self.tabs.x) / TAB_WIDTH))
    }

    pub fn on_header(&self, column: u16, row: u16) -> bool {
        contains(self.header, column, row)
    }
}

/// Filled arc as a bar of cells, proportional to the knob's angular position.
pub fn arc_bar(knob: &RotaryControl) -> String {
    let swept = (knob.angle() - kitpanel_core::knob::ARC_START_DEG) / kitpanel_core::knob::ARC_SWEEP_DEG;
    let filled = (swept.clamp(0.0, 1.0) * ARC_CELLS as f64).round() as usize;
    let mut bar = "━".repeat(filled);
    bar.push_str(&"·".repeat(ARC_CELLS - filled));
    bar
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

pub fn render(frame: &mut Frame, app: &App, layout: &PanelLayout) {
    let panel = &app.panel;
    let active = panel.active_id();

    let tabs: Vec<Span> = InstrumentId::ALL
        .iter()
        .map(|id| {
            let text = format!("{:^width$}", id.as_str(), width = TAB_WIDTH as usize);
            if *id == active {
                Span::styled(text, Style::default().fg(Color::Black).bg(Color::Cyan))
            } else {
                Span::styled(text, Style::default().fg(Color::Gray))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(tabs)), layout.tabs);

    let header = Line::from(vec![
        Span::styled(
            panel.active_name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  type: "),
        Span::styled(panel.active_type().to_string(), Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(header), layout.header);

    for (control, rect) in &layout.knobs {
        let Some(knob) = panel.knob(*control) else {
            continue;
        };
        let border = if knob.is_dragging() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(control.label());
        let mut lines = vec![Line::from(Span::styled(arc_bar(knob), Style::default().fg(Color::Cyan)))];
        if knob.readout_visible() {
            lines.push(Line::from(Span::styled(
                knob.readout(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("{:+.0}°", knob.angle()),
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(lines).block(block), *rect);
    }

    for (control, rect) in &layout.toggles {
        let on = panel.toggle(*control).unwrap_or(false);
        let mark = if on { "[x]" } else { "[ ]" };
        let style = if on {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!("{} {}", mark, control.label()), style)),
            *rect,
        );
    }

    frame.render_widget(
        Paragraph::new(Span::styled(app.readout.text(), Style::default().fg(Color::White))),
        layout.readout,
    );

    let flags = panel.router().config();
    let mut status = format!(
        "ui:{} log:{} host:{} ({})",
        on_off(flags.ui_updates),
        on_off(flags.console_logging),
        on_off(flags.host_bridge),
        app.host_label(),
    );
    if let Some(message) = app.status() {
        status.push_str("  ");
        status.push_str(message);
    }
    frame.render_widget(
        Paragraph::new(Span::styled(status, Style::default().fg(Color::DarkGray))),
        layout.status,
    );
}
