//! Input handling for the terminal panel.

use crossbeam_channel::Receiver;

use kitpanel_core::bridge::ChannelBridge;
use kitpanel_core::host::HostCommand;
use kitpanel_core::input::PointerEvent;
use kitpanel_core::panel::DrumPanel;
use kitpanel_core::router::{HostBridge, SharedReadout};
use kitpanel_types::{catalog, round_to_tenth, ControlId, HostEvent, PanelEvent};

use crate::backend::{KeyCode, MouseEvent, MouseEventKind};
use crate::view::PanelLayout;

/// Terminal rows are coarse; one row of mouse travel counts as this many pixels.
pub const PIXELS_PER_ROW: f64 = 5.0;

/// Knob change per scroll-wheel notch.
pub const SCROLL_STEP: f64 = 0.1;

pub struct App {
    pub panel: DrumPanel,
    pub readout: SharedReadout,
    host_label: String,
    preview: Option<Receiver<HostEvent>>,
    status: Option<String>,
}

impl App {
    pub fn new(mut panel: DrumPanel) -> Self {
        let readout = SharedReadout::new();
        panel.router_mut().set_readout(readout.clone());
        panel.mount();
        Self {
            panel,
            readout,
            host_label: "no host".to_string(),
            preview: None,
            status: None,
        }
    }

    pub fn set_bridge(&mut self, bridge: impl HostBridge + 'static, label: impl Into<String>) {
        self.panel.router_mut().set_bridge(bridge);
        self.host_label = label.into();
        self.preview = None;
    }

    /// Attach an in-process host that decodes every event into engine writes
    /// and reports the last one on the status line.
    pub fn attach_preview_host(&mut self) {
        let (bridge, rx) = ChannelBridge::unbounded();
        self.set_bridge(bridge, "preview");
        self.preview = Some(rx);
    }

    pub fn host_label(&self) -> &str {
        &self.host_label
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns false when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Escape => return false,
            KeyCode::Tab | KeyCode::Right => {
                let next = self.panel.active_id().next();
                self.panel.activate(next);
            }
            KeyCode::BackTab | KeyCode::Left => {
                let prev = self.panel.active_id().prev();
                self.panel.activate(prev);
            }
            KeyCode::Char('m') => self.flip(ControlId::Mute),
            KeyCode::Char('s') => self.flip(ControlId::Solo),
            KeyCode::Char('t') => self.next_type(),
            KeyCode::Char('v') => {
                let on = !self.panel.router().config().ui_updates;
                self.panel.router_mut().set_ui_updates(on);
            }
            KeyCode::Char('l') => {
                let on = !self.panel.router().config().console_logging;
                self.panel.router_mut().set_console_logging(on);
            }
            KeyCode::Char('h') => {
                let on = !self.panel.router().config().host_bridge;
                self.panel.router_mut().set_host_bridge(on);
            }
            _ => {}
        }
        self.after_input();
        true
    }

    pub fn handle_mouse(&mut self, event: MouseEvent, layout: &PanelLayout) {
        let y = f64::from(event.row) * PIXELS_PER_ROW;
        match event.kind {
            MouseEventKind::Down => {
                if let Some(control) = layout.knob_at(event.column, event.row) {
                    self.panel.pointer(PointerEvent::Down { control, y });
                } else if let Some(control) = layout.toggle_at(event.column, event.row) {
                    self.flip(control);
                } else if let Some(id) = layout.tab_at(event.column, event.row) {
                    self.panel.activate(id);
                } else if layout.on_header(event.column, event.row) {
                    self.next_type();
                }
            }
            MouseEventKind::Drag => {
                self.panel.pointer(PointerEvent::Move { y });
            }
            MouseEventKind::Up => {
                self.panel.pointer(PointerEvent::Up);
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some(control) = layout.knob_at(event.column, event.row) {
                    let step = if event.kind == MouseEventKind::ScrollUp {
                        SCROLL_STEP
                    } else {
                        -SCROLL_STEP
                    };
                    self.nudge(control, step);
                }
            }
        }
        self.after_input();
    }

    fn flip(&mut self, control: ControlId) {
        let on = !self.panel.toggle(control).unwrap_or(false);
        self.panel.set_toggle(control, on);
    }

    fn next_type(&mut self) {
        let next = catalog::next_after(self.panel.active_type());
        if !self.panel.select_type(next) {
            self.status = Some(format!("type {} rejected", next));
        }
    }

    fn nudge(&mut self, control: ControlId, step: f64) {
        let Some(current) = self.panel.knob_value(control) else {
            return;
        };
        let id = format!("{}:{}", self.panel.active_id(), control);
        self.panel.receive(&id, round_to_tenth(current + step));
    }

    fn after_input(&mut self) {
        for event in self.panel.drain_events() {
            match event {
                PanelEvent::InstrumentChanged { name, .. } => {
                    self.status = Some(format!("Active drum: {}", name));
                }
                PanelEvent::TypeChanged { type_id, .. } => {
                    self.status = Some(format!("Type: {}", type_id));
                }
                PanelEvent::ControlChanged(_) => {}
            }
        }
        self.poll_host();
    }

    fn poll_host(&mut self) {
        let Some(rx) = &self.preview else {
            return;
        };
        let range = self.panel.knob_range();
        let last = rx
            .try_iter()
            .filter_map(|e| HostCommand::decode_in(&e, range))
            .last();
        match last {
            Some(HostCommand::SetParam { slot, param, value }) => {
                self.status = Some(format!("engine: slot {} param {} = {:.2}", slot, param, value));
            }
            Some(HostCommand::SetType { slot, preset }) => {
                self.status = Some(format!("engine: slot {} preset {}", slot, preset));
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitpanel_core::config::Config;
    use kitpanel_types::InstrumentId;
    use ratatui::layout::Rect;

    fn app() -> (App, PanelLayout) {
        let app = App::new(DrumPanel::new(&Config::default()));
        (app, PanelLayout::new(Rect::new(0, 0, 120, 40)))
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row }
    }

    #[test]
    fn tab_keys_cycle_instruments() {
        let (mut app, _) = app();
        assert!(app.handle_key(KeyCode::BackTab));
        assert_eq!(app.panel.active_id(), InstrumentId::Cymbal6);
        assert!(app.handle_key(KeyCode::Tab));
        assert!(app.handle_key(KeyCode::Tab));
        assert_eq!(app.panel.active_id(), InstrumentId::Drum2);
        assert_eq!(app.status(), Some("Active drum: Snare"));
        assert!(!app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn mouse_drag_moves_knob_and_readout() {
        let (mut app, layout) = app();
        let (control, rect) = layout.knobs[0];
        assert_eq!(control, ControlId::Pitch);
        let (x, y) = (rect.x + 1, rect.y + 5);
        app.handle_mouse(click(MouseEventKind::Down, x, y), &layout);
        // 4 rows up = 20px = +2.0
        app.handle_mouse(click(MouseEventKind::Drag, x + 30, y - 4), &layout);
        app.handle_mouse(click(MouseEventKind::Up, x + 30, y - 4), &layout);
        assert_eq!(app.panel.active().knob(ControlId::Pitch), Some(7.0));
        assert_eq!(app.readout.text(), "drum1 - pitch-knob: 7");
        assert_eq!(app.panel.dragging(), None);
    }

    #[test]
    fn toggles_and_flags_from_keys() {
        let (mut app, _) = app();
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.panel.toggle(ControlId::Mute), Some(true));
        assert_eq!(app.readout.text(), "drum1 - mute-checkbox: true");

        app.handle_key(KeyCode::Char('v'));
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.panel.toggle(ControlId::Mute), Some(false));
        assert_eq!(app.readout.text(), "drum1 - mute-checkbox: true");
        assert!(!app.panel.router().config().ui_updates);
    }

    #[test]
    fn scroll_nudges_through_receive() {
        let (mut app, layout) = app();
        let (_, rect) = layout.knobs[1];
        app.handle_mouse(click(MouseEventKind::ScrollUp, rect.x + 1, rect.y + 1), &layout);
        assert_eq!(app.panel.active().knob(ControlId::Decay), Some(5.1));
        assert_eq!(app.readout.text(), "drum1 - decay-knob: 5.1");
    }

    #[test]
    fn preview_host_reports_engine_writes() {
        let (mut app, layout) = app();
        app.attach_preview_host();
        assert_eq!(app.host_label(), "preview");
        app.handle_key(KeyCode::Char('t'));
        assert_eq!(app.panel.active_type(), "dw12");
        assert_eq!(app.status(), Some("engine: slot 0 preset dw12"));

        let (_, rect) = layout.knobs[0];
        app.handle_mouse(click(MouseEventKind::Down, rect.x + 1, rect.y + 5), &layout);
        app.handle_mouse(click(MouseEventKind::Drag, rect.x + 1, rect.y + 1), &layout);
        assert_eq!(app.status(), Some("engine: slot 0 param 0 = 0.70"));
    }

    #[test]
    fn preview_host_follows_configured_range() {
        let config = Config::from_toml_str("[controls]\nmin = 0.0\nmax = 20.0").unwrap();
        let mut app = App::new(DrumPanel::new(&config));
        let layout = PanelLayout::new(Rect::new(0, 0, 120, 40));
        app.attach_preview_host();
        // pitch starts at 10 of 0..20; 4 rows up adds 4.0
        let (_, rect) = layout.knobs[0];
        app.handle_mouse(click(MouseEventKind::Down, rect.x + 1, rect.y + 5), &layout);
        app.handle_mouse(click(MouseEventKind::Drag, rect.x + 1, rect.y + 1), &layout);
        assert_eq!(app.panel.active().knob(ControlId::Pitch), Some(14.0));
        assert_eq!(app.status(), Some("engine: slot 0 param 0 = 0.70"));
    }

    #[test]
    fn clicking_a_tab_switches() {
        let (mut app, layout) = app();
        app.handle_mouse(click(MouseEventKind::Down, crate::view::TAB_WIDTH * 8 + 3, 0), &layout);
        assert_eq!(app.panel.active_id(), InstrumentId::Cymbal3);
    }
}
