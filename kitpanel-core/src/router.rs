//! Fan-out of control changes to the readout, the log and the host bridge.

use std::cell::RefCell;
use std::rc::Rc;

use kitpanel_types::{ControlAddress, ControlChange, HostEvent, InstrumentId};

/// Which sinks receive routed changes. Each flag is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    pub ui_updates: bool,
    pub console_logging: bool,
    pub host_bridge: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            ui_updates: true,
            console_logging: true,
            host_bridge: true,
        }
    }
}

/// Display target for the formatted message.
pub trait ReadoutSink {
    fn show(&mut self, message: &str);
}

/// Readout backed by a shared string, read back by whoever draws it.
#[derive(Debug, Clone, Default)]
pub struct SharedReadout(Rc<RefCell<String>>);

impl SharedReadout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.0.borrow().clone()
    }
}

impl ReadoutSink for SharedReadout {
    fn show(&mut self, message: &str) {
        let mut text = self.0.borrow_mut();
        text.clear();
        text.push_str(message);
    }
}

/// Automation interface of an embedding host.
pub trait HostBridge {
    fn emit(&mut self, event: &HostEvent);

    /// Whether a host is actually attached. Absent bridges are skipped silently.
    fn is_present(&self) -> bool {
        true
    }
}

/// Bridge used when no host is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHostBridge;

impl HostBridge for NoHostBridge {
    fn emit(&mut self, _event: &HostEvent) {}

    fn is_present(&self) -> bool {
        false
    }
}

/// Which sinks a single change actually reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub visual: bool,
    pub log: bool,
    pub host: bool,
}

impl Delivery {
    pub fn count(&self) -> usize {
        [self.visual, self.log, self.host].iter().filter(|d| **d).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// Formatted and handed to the enabled sinks.
    Delivered { message: String, delivery: Delivery },
    /// The `active-drum` meta-control: the caller should switch to this id.
    SelectInstrument(String),
}

pub struct ControlRouter {
    config: RouterConfig,
    readout: Option<Box<dyn ReadoutSink>>,
    bridge: Box<dyn HostBridge>,
}

impl Default for ControlRouter {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl ControlRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            readout: None,
            bridge: Box::new(NoHostBridge),
        }
    }

    pub fn config(&self) -> RouterConfig {
        self.config
    }

    pub fn set_config(&mut self, config: RouterConfig) {
        self.config = config;
    }

    pub fn set_ui_updates(&mut self, on: bool) {
        self.config.ui_updates = on;
    }

    pub fn set_console_logging(&mut self, on: bool) {
        self.config.console_logging = on;
    }

    pub fn set_host_bridge(&mut self, on: bool) {
        self.config.host_bridge = on;
    }

    pub fn set_readout(&mut self, readout: impl ReadoutSink + 'static) {
        self.readout = Some(Box::new(readout));
    }

    pub fn clear_readout(&mut self) {
        self.readout = None;
    }

    pub fn set_bridge(&mut self, bridge: impl HostBridge + 'static) {
        self.bridge = Box::new(bridge);
    }

    pub fn has_host(&self) -> bool {
        self.bridge.is_present()
    }

    /// Human-readable form shared by every sink.
    pub fn format(change: &ControlChange) -> String {
        match &change.address {
            ControlAddress::Scoped {
                instrument,
                control,
            } => format!("{} - {}: {}", instrument, control, change.value),
            address => format!("{}: {}", address, change.value),
        }
    }

    /// Deliver one change to every enabled sink, in order: readout, log, host.
    pub fn route(&mut self, change: &ControlChange) -> Routed {
        if change.address == ControlAddress::ActiveInstrument {
            let value = change.value.to_string();
            let target = value.split_whitespace().next().unwrap_or_default();
            return Routed::SelectInstrument(target.to_string());
        }

        let message = Self::format(change);
        let mut delivery = Delivery::default();

        if self.config.ui_updates {
            if let Some(readout) = self.readout.as_mut() {
                readout.show(&message);
                delivery.visual = true;
            }
        }

        if self.config.console_logging {
            log::info!(target: "router", "Control changed: {}", message);
            delivery.log = true;
        }

        if self.config.host_bridge && self.bridge.is_present() {
            if let Some(event) = HostEvent::from_change(change) {
                self.bridge.emit(&event);
                delivery.host = true;
            }
        }

        Routed::Delivered { message, delivery }
    }

    pub fn note_active_instrument(&self, id: InstrumentId) {
        if self.config.console_logging {
            log::info!(target: "router", "Active drum changed: {}", id);
        }
    }
}

impl std::fmt::Debug for ControlRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlRouter")
            .field("config", &self.config)
            .field("readout", &self.readout.is_some())
            .field("host", &self.bridge.is_present())
            .finish()
    }
}
