//! Host-side decoding of bridge events into engine parameter writes.
//!
//! The synthesis engine has ten voice slots and six parameters per voice.
//! Panel instruments are mapped onto slots with the v1 filter-bank remap:
//! the voice index is `N` for `drumN` and `6 + N` for `cymbalN`, the slot is
//! the index minus one, and slots from six upwards shift down one more. Two
//! instruments therefore share slot 5 and `cymbal6` has no slot at all.

use kitpanel_types::{ControlValue, HostEvent, InstrumentId};

use crate::knob::{DEFAULT_MAX, DEFAULT_MIN};

pub const MAX_ENGINE_VOICES: usize = 10;
pub const CYMBAL_INDEX_OFFSET: usize = 6;

/// Control name that selects the voice's preset instead of a parameter.
pub const TYPE_CONTROL: &str = "type";

/// Parameter index for each control the engine understands.
pub const PARAMETER_MAP: &[(&str, usize)] = &[
    ("pitch-knob", 0),
    ("decay-knob", 1),
    ("attack-knob", 2),
    ("tone-knob", 3),
    ("velocityLayer", 4),
    ("busComp", 5),
];


#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    SetType { slot: usize, preset: String },
    SetParam { slot: usize, param: usize, value: f32 },
}

/// One-based voice index as the host numbers instruments.
pub fn voice_index(id: InstrumentId) -> usize {
    let n = id.index() % CYMBAL_INDEX_OFFSET + 1;
    if id.is_cymbal() {
        CYMBAL_INDEX_OFFSET + n
    } else {
        n
    }
}

/// Engine slot for an instrument, if it has one.
pub fn engine_slot(id: InstrumentId) -> Option<usize> {
    let mut slot = voice_index(id) - 1;
    if slot >= CYMBAL_INDEX_OFFSET {
        slot -= 1;
    }
    (slot < MAX_ENGINE_VOICES).then_some(slot)
}

pub fn parameter_index(control: &str) -> Option<usize> {
    PARAMETER_MAP
        .iter()
        .find(|(name, _)| *name == control)
        .map(|(_, index)| *index)
}

fn value_text(value: &ControlValue) -> Option<String> {
    let text = value.to_string();
    (!text.is_empty()).then_some(text)
}

impl HostCommand {
    /// Decode a bridge event from a panel with the default 0..10 knob range.
    pub fn decode(event: &HostEvent) -> Option<HostCommand> {
        Self::decode_in(event, (DEFAULT_MIN, DEFAULT_MAX))
    }

    /// Decode a bridge event, normalizing knob values from `range` onto the
    /// engine's 0..1. Anything the engine cannot act on is `None`.
    pub fn decode_in(event: &HostEvent, range: (f64, f64)) -> Option<HostCommand> {
        let HostEvent::ControlChange {
            drum,
            control,
            value,
        } = event
        else {
            return None;
        };
        let slot = engine_slot(*drum)?;

        if control == TYPE_CONTROL {
            let preset = value_text(value)?;
            log::debug!(target: "host", "slot {} preset {}", slot, preset);
            return Some(HostCommand::SetType { slot, preset });
        }

        let param = parameter_index(control)?;
        let raw = match value {
            ControlValue::Number(v) => *v,
            ControlValue::Text(s) if !s.is_empty() => ControlValue::parse_number(s),
            _ => return None,
        };
        let (min, max) = range;
        if max <= min {
            return None;
        }
        let value = ((raw - min) / (max - min)) as f32;
        if !(0.0..=1.0).contains(&value) {
            log::debug!(target: "host", "dropping out-of-range {} for slot {}", value, slot);
            return None;
        }
        Some(HostCommand::SetParam { slot, param, value })
    }

    pub fn slot(&self) -> usize {
        match self {
            HostCommand::SetType { slot, .. } | HostCommand::SetParam { slot, .. } => *slot,
        }
    }
}
