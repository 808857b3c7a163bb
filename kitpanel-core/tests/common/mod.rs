#![allow(dead_code)]
//! Test harness utilities for kitpanel-core integration tests.

use crossbeam_channel::Receiver;

use kitpanel_core::bridge::ChannelBridge;
use kitpanel_core::config::Config;
use kitpanel_core::input::PointerEvent;
use kitpanel_core::panel::DrumPanel;
use kitpanel_core::router::{Routed, SharedReadout};
use kitpanel_types::{ControlId, HostEvent};

/// A mounted panel with a readout and an in-process host attached.
pub struct Harness {
    pub panel: DrumPanel,
    pub readout: SharedReadout,
    pub host: Receiver<HostEvent>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let mut panel = DrumPanel::new(config);
        let readout = SharedReadout::new();
        panel.router_mut().set_readout(readout.clone());
        let (bridge, host) = ChannelBridge::unbounded();
        panel.router_mut().set_bridge(bridge);
        panel.mount();
        Self {
            panel,
            readout,
            host,
        }
    }

    /// Press on `control` at `from_y`, move to `to_y`, release.
    pub fn drag(&mut self, control: ControlId, from_y: f64, to_y: f64) -> Vec<Routed> {
        self.panel.pointer(PointerEvent::Down { control, y: from_y });
        let routed = self.panel.pointer(PointerEvent::Move { y: to_y });
        self.panel.pointer(PointerEvent::Up);
        routed
    }

    pub fn host_events(&self) -> Vec<HostEvent> {
        self.host.try_iter().collect()
    }
}
