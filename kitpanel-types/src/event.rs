use serde::{Deserialize, Serialize};

use crate::{ControlAddress, ControlId, ControlValue, InstrumentId};

/// A single control change, the unit every component exchanges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlChange {
    pub address: ControlAddress,
    pub value: ControlValue,
}

impl ControlChange {
    pub fn new(address: ControlAddress, value: impl Into<ControlValue>) -> Self {
        Self {
            address,
            value: value.into(),
        }
    }

    /// Change to `control` on `instrument`.
    pub fn scoped(instrument: InstrumentId, control: ControlId, value: impl Into<ControlValue>) -> Self {
        Self::new(ControlAddress::scoped(instrument, control), value)
    }

    pub fn bare(id: impl Into<String>, value: impl Into<ControlValue>) -> Self {
        Self::new(ControlAddress::Bare(id.into()), value)
    }

    /// Build from a wire identifier and value.
    pub fn parse(raw_id: &str, value: impl Into<ControlValue>) -> Self {
        Self::new(ControlAddress::parse(raw_id), value)
    }

    pub fn instrument(&self) -> Option<InstrumentId> {
        self.address.instrument()
    }
}

/// Notifications the panel raises towards whoever embeds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PanelEvent {
    ControlChanged(ControlChange),
    TypeChanged {
        instrument: InstrumentId,
        type_id: String,
    },
    InstrumentChanged {
        instrument: InstrumentId,
        name: String,
    },
}

/// Structured event forwarded to a host automation bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum HostEvent {
    #[serde(rename = "controlChange")]
    ControlChange {
        drum: InstrumentId,
        control: String,
        value: ControlValue,
    },
    #[serde(rename = "genericEvent")]
    GenericEvent { id: String, value: ControlValue },
}

impl HostEvent {
    pub const CONTROL_CHANGE: &'static str = "controlChange";
    pub const GENERIC_EVENT: &'static str = "genericEvent";

    /// Host event for a change, or `None` for the `active-drum` meta-control,
    /// which never leaves the panel.
    pub fn from_change(change: &ControlChange) -> Option<Self> {
        match &change.address {
            ControlAddress::ActiveInstrument => None,
            ControlAddress::Bare(id) => Some(HostEvent::GenericEvent {
                id: id.clone(),
                value: change.value.clone(),
            }),
            ControlAddress::Scoped {
                instrument,
                control,
            } => Some(HostEvent::ControlChange {
                drum: *instrument,
                control: control.clone(),
                value: change.value.clone(),
            }),
        }
    }

    /// Event name as the host registers listeners for it.
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::ControlChange { .. } => Self::CONTROL_CHANGE,
            HostEvent::GenericEvent { .. } => Self::GENERIC_EVENT,
        }
    }

    pub fn value(&self) -> &ControlValue {
        match self {
            HostEvent::ControlChange { value, .. } | HostEvent::GenericEvent { value, .. } => value,
        }
    }
}
