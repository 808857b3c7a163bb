//! # kitpanel-core
//!
//! Interaction and state core for a twelve-voice drum control panel,
//! independent of any UI framework.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kitpanel_core::config::Config;
//! use kitpanel_core::input::PointerEvent;
//! use kitpanel_core::panel::DrumPanel;
//! use kitpanel_core::router::SharedReadout;
//! use kitpanel_types::ControlId;
//!
//! let config = Config::load();
//! let mut panel = DrumPanel::new(&config);
//! let readout = SharedReadout::new();
//! panel.router_mut().set_readout(readout.clone());
//! panel.mount();
//!
//! panel.pointer(PointerEvent::Down { control: ControlId::Pitch, y: 120.0 });
//! panel.pointer(PointerEvent::Move { y: 100.0 });
//! panel.pointer(PointerEvent::Up);
//! assert_eq!(readout.text(), "drum1 - pitch-knob: 7");
//!
//! panel.switch_active("cymbal3");
//! for event in panel.drain_events() { /* redraw */ }
//! ```
//!
//! ## Module Overview
//!
//! - [`knob`]: `RotaryControl`: drag gesture to bounded value, angle mapping, arc geometry
//! - [`bank`]: the panel's twelve knobs and two toggles
//! - [`input`]: `PointerSurface` with scoped `Listener` registration
//! - [`store`]: `InstrumentStore`: per-instrument values, active instrument, type policy
//! - [`router`]: `ControlRouter`: formatting and fan-out to readout, log and host bridge
//! - [`bridge`]: channel, OSC and JSON-lines host bridges
//! - [`host`]: decoding of host events into engine slot/parameter writes
//! - [`config`]: TOML configuration (embedded defaults + user override)
//! - [`panel`]: `DrumPanel`, the composition of all of the above

pub mod bank;
pub mod bridge;
pub mod config;
pub mod host;
pub mod input;
pub mod knob;
pub mod panel;
pub mod router;
pub mod store;
