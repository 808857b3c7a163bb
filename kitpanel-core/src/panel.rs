//! The drum panel: store, controls and router wired into one data flow.
//!
//! A drag on a knob produces a value, the store records it against the
//! active instrument, and the router fans the scoped change out to its
//! sinks. Switching instruments runs the other way: the store swaps the
//! active instrument and every control is redrawn from stored state without
//! emitting anything.

use kitpanel_types::{
    ControlAddress, ControlChange, ControlId, ControlKind, ControlValue, InstrumentId, PanelEvent,
};

use crate::bank::ControlBank;
use crate::config::Config;
use crate::input::{Listener, PointerEvent, PointerSurface};
use crate::knob::{RotaryControl, DEFAULT_MAX, DEFAULT_MIN};
use crate::router::{ControlRouter, Routed};
use crate::store::{Instrument, InstrumentStore, StoreSettings};

/// Scoped control name carrying an instrument-type selection.
pub const TYPE_CONTROL: &str = "type";

#[derive(Debug)]
pub struct DrumPanel {
    store: InstrumentStore,
    bank: ControlBank,
    router: ControlRouter,
    surface: PointerSurface,
    listeners: Vec<(ControlId, Listener)>,
    events: Vec<PanelEvent>,
}

impl Default for DrumPanel {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl DrumPanel {
    pub fn new(config: &Config) -> Self {
        Self::with_surface(config, PointerSurface::new())
    }

    /// Panel whose knobs listen on a surface shared with other components.
    pub fn with_surface(config: &Config, surface: PointerSurface) -> Self {
        let (min, max) = config.knob_range();
        let mut bank = ControlBank::new(min, max);
        let knob_default = RotaryControl::new(min, max).midpoint();
        let store = InstrumentStore::new(StoreSettings {
            knob_default,
            initial: config.initial_instrument(),
            type_policy: config.type_policy(),
        });
        bank.resync(store.active());

        Self {
            store,
            bank,
            router: ControlRouter::new(config.router()),
            surface,
            listeners: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Register every knob with the pointer surface. Idempotent.
    pub fn mount(&mut self) {
        if !self.listeners.is_empty() {
            return;
        }
        for control in ControlId::KNOBS {
            self.listeners.push((control, self.surface.listen()));
        }
        log::debug!(target: "panel", "mounted {} knobs", self.listeners.len());
    }

    /// Release every listener and abandon any drag in progress.
    pub fn unmount(&mut self) {
        self.bank.end_drags();
        self.listeners.clear();
        log::debug!(target: "panel", "unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        !self.listeners.is_empty()
    }

    fn listening(&self, control: ControlId) -> bool {
        self.listeners
            .iter()
            .any(|(c, guard)| *c == control && self.surface.is_listening(guard))
    }

    /// Feed one pointer event. Returns what each resulting change reached,
    /// in delivery order.
    pub fn pointer(&mut self, event: PointerEvent) -> Vec<Routed> {
        match event {
            PointerEvent::Down { control, y } => {
                if control.kind() == ControlKind::Knob && self.listening(control) {
                    self.bank.end_drags();
                    if let Some(knob) = self.bank.knob_mut(control) {
                        knob.begin_drag(y);
                    }
                }
                Vec::new()
            }
            PointerEvent::Move { y } => {
                let mounted: Vec<ControlId> = self.listeners.iter().map(|(c, _)| *c).collect();
                let mut routed = Vec::new();
                for control in mounted {
                    let emitted = self.bank.knob_mut(control).and_then(|k| k.drag_to(y));
                    if let Some(value) = emitted {
                        routed.push(self.commit(control, ControlValue::Number(value)));
                    }
                }
                routed
            }
            PointerEvent::Up => {
                if self.is_mounted() {
                    self.bank.end_drags();
                }
                Vec::new()
            }
        }
    }

    /// Record a control value on the active instrument and route it.
    fn commit(&mut self, control: ControlId, value: ControlValue) -> Routed {
        self.store.record_value(control, value.clone());
        let change = ControlChange::scoped(self.store.active_id(), control, value);
        self.dispatch(change)
    }

    fn dispatch(&mut self, change: ControlChange) -> Routed {
        let routed = self.router.route(&change);
        match &routed {
            Routed::SelectInstrument(target) => {
                let target = target.clone();
                self.switch_active(&target);
            }
            Routed::Delivered { .. } => self.events.push(PanelEvent::ControlChanged(change)),
        }
        routed
    }

    /// Flip a mute/solo toggle. `None` when `control` is a knob.
    pub fn set_toggle(&mut self, control: ControlId, on: bool) -> Option<Routed> {
        if !self.bank.set_toggle(control, on) {
            return None;
        }
        Some(self.commit(control, ControlValue::Toggle(on)))
    }

    /// Select the active instrument's preset. False when the type policy rejects it.
    pub fn select_type(&mut self, type_id: &str) -> bool {
        let instrument = self.store.active_id();
        let change = ControlChange::new(
            ControlAddress::Scoped {
                instrument,
                control: TYPE_CONTROL.to_string(),
            },
            type_id,
        );
        self.apply_type(change).is_some()
    }

    /// Record a scoped type change on the active instrument, then route it.
    /// Rejected or non-text types change nothing and reach no sink.
    fn apply_type(&mut self, change: ControlChange) -> Option<Routed> {
        let instrument = change.instrument()?;
        let type_id = change.value.as_text()?.to_string();
        if !self.store.record_type(&type_id) {
            log::debug!(target: "panel", "type {:?} rejected", type_id);
            return None;
        }
        let routed = self.router.route(&change);
        self.events.push(PanelEvent::TypeChanged {
            instrument,
            type_id,
        });
        Some(routed)
    }

    /// Make `raw` the active instrument and redraw every control from its
    /// stored values. Unknown ids change nothing and return false.
    pub fn switch_active(&mut self, raw: &str) -> bool {
        match self.store.activate_str(raw) {
            Some(id) => {
                self.activated(id);
                true
            }
            None => {
                log::debug!(target: "panel", "unknown instrument {:?}", raw);
                false
            }
        }
    }

    pub fn activate(&mut self, id: InstrumentId) {
        self.store.activate(id);
        self.activated(id);
    }

    fn activated(&mut self, id: InstrumentId) {
        self.bank.end_drags();
        self.bank.resync(self.store.active());
        self.router.note_active_instrument(id);
        self.events.push(PanelEvent::InstrumentChanged {
            instrument: id,
            name: self.store.active().name.clone(),
        });
    }

    /// Boundary entry for an externally supplied identifier and value.
    ///
    /// Scoped changes to a known control of the active instrument are
    /// stored and redrawn first, coerced to the control's kind. A type for
    /// the active instrument goes through the type policy and yields `None`
    /// when rejected. Everything else is routed as given.
    pub fn receive(&mut self, raw_id: &str, value: impl Into<ControlValue>) -> Option<Routed> {
        let change = ControlChange::parse(raw_id, value);
        let active = change.instrument() == Some(self.store.active_id());
        if active && change.address.control() == TYPE_CONTROL {
            return self.apply_type(change);
        }
        let change = if active { self.absorb(change) } else { change };
        Some(self.dispatch(change))
    }

    fn absorb(&mut self, change: ControlChange) -> ControlChange {
        let Some(control) = ControlId::parse(change.address.control()) else {
            return change;
        };

        let value = match control.kind() {
            ControlKind::Knob => {
                let Some(knob) = self.bank.knob_mut(control) else {
                    return change;
                };
                match &change.value {
                    ControlValue::Number(v) => knob.set_value(*v),
                    ControlValue::Text(s) => knob.set_value_text(s),
                    ControlValue::Toggle(b) => knob.set_value(f64::from(u8::from(*b))),
                }
                ControlValue::Number(knob.value())
            }
            ControlKind::Toggle => {
                let on = match &change.value {
                    ControlValue::Toggle(b) => *b,
                    ControlValue::Number(v) => *v != 0.0,
                    ControlValue::Text(s) => s.trim() == "true",
                };
                self.bank.set_toggle(control, on);
                ControlValue::Toggle(on)
            }
        };
        self.store.record_value(control, value.clone());
        ControlChange::new(change.address, value)
    }

    pub fn active_id(&self) -> InstrumentId {
        self.store.active_id()
    }

    pub fn active(&self) -> &Instrument {
        self.store.active()
    }

    pub fn active_name(&self) -> &str {
        &self.store.active().name
    }

    pub fn active_type(&self) -> &str {
        &self.store.active().type_id
    }

    pub fn knob(&self, control: ControlId) -> Option<&RotaryControl> {
        self.bank.knob(control)
    }

    /// Range shared by every knob on the panel.
    pub fn knob_range(&self) -> (f64, f64) {
        self.bank
            .knob(ControlId::Pitch)
            .map_or((DEFAULT_MIN, DEFAULT_MAX), |k| (k.min(), k.max()))
    }

    pub fn knob_value(&self, control: ControlId) -> Option<f64> {
        self.bank.knob(control).map(RotaryControl::value)
    }

    pub fn toggle(&self, control: ControlId) -> Option<bool> {
        self.bank.toggle(control)
    }

    pub fn dragging(&self) -> Option<ControlId> {
        self.bank.dragging()
    }

    pub fn store(&self) -> &InstrumentStore {
        &self.store
    }

    pub fn bank(&self) -> &ControlBank {
        &self.bank
    }

    pub fn router(&self) -> &ControlRouter {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut ControlRouter {
        &mut self.router
    }

    pub fn surface(&self) -> &PointerSurface {
        &self.surface
    }

    /// Take every upward notification raised since the last call.
    pub fn drain_events(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events)
    }
}
