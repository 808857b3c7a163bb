//! Per-instrument parameter state for the twelve fixed voices.

use kitpanel_types::{ControlId, ControlKind, ControlValue, InstrumentId, TypePolicy};

/// One voice: its display name, selected preset and a value for every control.
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    pub id: InstrumentId,
    pub name: String,
    pub type_id: String,
    values: [ControlValue; ControlId::COUNT],
}

impl Instrument {
    /// Fresh voice: every knob at `knob_default`, every toggle off.
    pub fn new(id: InstrumentId, knob_default: f64) -> Self {
        Self {
            id,
            name: id.default_name().to_string(),
            type_id: id.default_type().to_string(),
            values: std::array::from_fn(|i| match ControlId::ALL[i].kind() {
                ControlKind::Knob => ControlValue::Number(knob_default),
                ControlKind::Toggle => ControlValue::Toggle(false),
            }),
        }
    }

    pub fn value(&self, control: ControlId) -> &ControlValue {
        &self.values[control.index()]
    }

    pub fn knob(&self, control: ControlId) -> Option<f64> {
        self.value(control).as_number()
    }

    pub fn toggle(&self, control: ControlId) -> Option<bool> {
        self.value(control).as_toggle()
    }

    pub fn values(&self) -> impl Iterator<Item = (ControlId, &ControlValue)> {
        ControlId::ALL.iter().copied().zip(self.values.iter())
    }
}

pub struct StoreSettings {
    pub knob_default: f64,
    pub initial: InstrumentId,
    pub type_policy: TypePolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            knob_default: 5.0,
            initial: InstrumentId::default(),
            type_policy: TypePolicy::default(),
        }
    }
}

/// Owns every instrument and tracks which one is active.
///
/// Writes only ever touch the active instrument.
#[derive(Debug, Clone)]
pub struct InstrumentStore {
    instruments: [Instrument; InstrumentId::COUNT],
    active: InstrumentId,
    type_policy: TypePolicy,
}

impl Default for InstrumentStore {
    fn default() -> Self {
        Self::new(StoreSettings::default())
    }
}

impl InstrumentStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            instruments: InstrumentId::ALL.map(|id| Instrument::new(id, settings.knob_default)),
            active: settings.initial,
            type_policy: settings.type_policy,
        }
    }

    pub fn active_id(&self) -> InstrumentId {
        self.active
    }

    pub fn active(&self) -> &Instrument {
        self.get(self.active)
    }

    pub fn get(&self, id: InstrumentId) -> &Instrument {
        &self.instruments[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn type_policy(&self) -> TypePolicy {
        self.type_policy
    }

    pub fn set_type_policy(&mut self, policy: TypePolicy) {
        self.type_policy = policy;
    }

    pub fn activate(&mut self, id: InstrumentId) {
        self.active = id;
    }

    /// Activate an instrument by wire id. Unknown ids leave the store untouched.
    pub fn activate_str(&mut self, raw: &str) -> Option<InstrumentId> {
        let id = InstrumentId::parse(raw)?;
        self.activate(id);
        Some(id)
    }

    /// Store `value` under `control` on the active instrument.
    ///
    /// Returns false, storing nothing, when the value's kind does not match
    /// the control (a number for a toggle, text for anything).
    pub fn record_value(&mut self, control: ControlId, value: ControlValue) -> bool {
        if !value.fits(control.kind()) {
            log::debug!(target: "store", "rejected {:?} for {}", value, control);
            return false;
        }
        self.instruments[self.active.index()].values[control.index()] = value;
        true
    }

    /// Set the active instrument's preset, subject to the type policy.
    pub fn record_type(&mut self, type_id: &str) -> bool {
        if !self.type_policy.admits(type_id) {
            log::debug!(target: "store", "type {:?} not in catalog", type_id);
            return false;
        }
        self.instruments[self.active.index()].type_id = type_id.to_string();
        true
    }
}
