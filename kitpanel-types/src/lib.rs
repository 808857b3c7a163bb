//! # kitpanel-types
//!
//! Shared type definitions for the kitpanel drum control surface.
//! This crate contains the closed identifier sets and the event vocabulary
//! exchanged between the controls, the parameter store, the router and the host.

mod address;
pub mod catalog;
mod event;
mod value;

pub use address::{ControlAddress, ACTIVE_INSTRUMENT_CONTROL, SCOPE_SEPARATOR};
pub use catalog::TypePolicy;
pub use event::{ControlChange, HostEvent, PanelEvent};
pub use value::{round_to_tenth, ControlValue};

use serde::{Deserialize, Serialize};

/// One of the twelve fixed voices of the kit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentId {
    #[default]
    Drum1,
    Drum2,
    Drum3,
    Drum4,
    Drum5,
    Drum6,
    Cymbal1,
    Cymbal2,
    Cymbal3,
    Cymbal4,
    Cymbal5,
    Cymbal6,
}

impl InstrumentId {
    pub const COUNT: usize = 12;

    /// All instruments in panel order (drums first, then cymbals).
    pub const ALL: [InstrumentId; Self::COUNT] = [
        InstrumentId::Drum1,
        InstrumentId::Drum2,
        InstrumentId::Drum3,
        InstrumentId::Drum4,
        InstrumentId::Drum5,
        InstrumentId::Drum6,
        InstrumentId::Cymbal1,
        InstrumentId::Cymbal2,
        InstrumentId::Cymbal3,
        InstrumentId::Cymbal4,
        InstrumentId::Cymbal5,
        InstrumentId::Cymbal6,
    ];

    /// Stable position in [`InstrumentId::ALL`], used to index fixed-size storage.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentId::Drum1 => "drum1",
            InstrumentId::Drum2 => "drum2",
            InstrumentId::Drum3 => "drum3",
            InstrumentId::Drum4 => "drum4",
            InstrumentId::Drum5 => "drum5",
            InstrumentId::Drum6 => "drum6",
            InstrumentId::Cymbal1 => "cymbal1",
            InstrumentId::Cymbal2 => "cymbal2",
            InstrumentId::Cymbal3 => "cymbal3",
            InstrumentId::Cymbal4 => "cymbal4",
            InstrumentId::Cymbal5 => "cymbal5",
            InstrumentId::Cymbal6 => "cymbal6",
        }
    }

    /// Parse a wire identifier such as `"drum1"` or `"cymbal3"`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == s)
    }

    pub fn is_cymbal(self) -> bool {
        self.index() >= 6
    }

    /// Display name the voice starts with.
    pub fn default_name(self) -> &'static str {
        match self {
            InstrumentId::Drum1 => "Kick",
            InstrumentId::Drum2 => "Snare",
            InstrumentId::Drum3 => "Tom 1",
            InstrumentId::Drum4 => "Tom 2",
            InstrumentId::Drum5 => "Tom 3",
            InstrumentId::Drum6 => "Floor Tom",
            InstrumentId::Cymbal1 => "Hi-Hat",
            InstrumentId::Cymbal2 => "Crash 1",
            InstrumentId::Cymbal3 => "Crash 2",
            InstrumentId::Cymbal4 => "Ride",
            InstrumentId::Cymbal5 => "Splash",
            InstrumentId::Cymbal6 => "China",
        }
    }

    /// Physical-model preset selected at creation.
    pub fn default_type(self) -> &'static str {
        match self {
            InstrumentId::Drum1 | InstrumentId::Cymbal1 | InstrumentId::Cymbal5 => "yamaha10",
            InstrumentId::Drum2 | InstrumentId::Cymbal2 | InstrumentId::Cymbal6 => "dw12",
            InstrumentId::Drum3 | InstrumentId::Drum5 | InstrumentId::Cymbal3 => "pearl14",
            InstrumentId::Drum4 | InstrumentId::Drum6 | InstrumentId::Cymbal4 => "ludwig13",
        }
    }

    /// Next instrument in panel order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// Previous instrument in panel order, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::COUNT - 1) % Self::COUNT]
    }
}

impl std::fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InstrumentId {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownIdentifier(s.to_string()))
    }
}

/// Whether a control is a continuous knob or a boolean toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    Knob,
    Toggle,
}

/// A named parameter on every instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlId {
    #[serde(rename = "pitch-knob")]
    Pitch,
    #[serde(rename = "decay-knob")]
    Decay,
    #[serde(rename = "attack-knob")]
    Attack,
    #[serde(rename = "tone-knob")]
    Tone,
    #[serde(rename = "ring-knob")]
    Ring,
    #[serde(rename = "tension-knob")]
    Tension,
    #[serde(rename = "size-knob")]
    Size,
    #[serde(rename = "density-knob")]
    Density,
    #[serde(rename = "damping-knob")]
    Damping,
    #[serde(rename = "velocity-knob")]
    Velocity,
    #[serde(rename = "volume-knob")]
    Volume,
    #[serde(rename = "pan-knob")]
    Pan,
    #[serde(rename = "mute-checkbox")]
    Mute,
    #[serde(rename = "solo-checkbox")]
    Solo,
}

impl ControlId {
    pub const COUNT: usize = 14;

    /// Knobs in layout order: three rows of four.
    pub const KNOBS: [ControlId; 12] = [
        ControlId::Pitch,
        ControlId::Decay,
        ControlId::Attack,
        ControlId::Tone,
        ControlId::Ring,
        ControlId::Tension,
        ControlId::Size,
        ControlId::Density,
        ControlId::Damping,
        ControlId::Velocity,
        ControlId::Volume,
        ControlId::Pan,
    ];

    pub const TOGGLES: [ControlId; 2] = [ControlId::Mute, ControlId::Solo];

    pub const ALL: [ControlId; Self::COUNT] = [
        ControlId::Pitch,
        ControlId::Decay,
        ControlId::Attack,
        ControlId::Tone,
        ControlId::Ring,
        ControlId::Tension,
        ControlId::Size,
        ControlId::Density,
        ControlId::Damping,
        ControlId::Velocity,
        ControlId::Volume,
        ControlId::Pan,
        ControlId::Mute,
        ControlId::Solo,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> ControlKind {
        match self {
            ControlId::Mute | ControlId::Solo => ControlKind::Toggle,
            _ => ControlKind::Knob,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControlId::Pitch => "pitch-knob",
            ControlId::Decay => "decay-knob",
            ControlId::Attack => "attack-knob",
            ControlId::Tone => "tone-knob",
            ControlId::Ring => "ring-knob",
            ControlId::Tension => "tension-knob",
            ControlId::Size => "size-knob",
            ControlId::Density => "density-knob",
            ControlId::Damping => "damping-knob",
            ControlId::Velocity => "velocity-knob",
            ControlId::Volume => "volume-knob",
            ControlId::Pan => "pan-knob",
            ControlId::Mute => "mute-checkbox",
            ControlId::Solo => "solo-checkbox",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlId::Pitch => "Pitch",
            ControlId::Decay => "Decay",
            ControlId::Attack => "Attack",
            ControlId::Tone => "Tone",
            ControlId::Ring => "Ring",
            ControlId::Tension => "Tension",
            ControlId::Size => "Size",
            ControlId::Density => "Density",
            ControlId::Damping => "Damping",
            ControlId::Velocity => "Velocity",
            ControlId::Volume => "Volume",
            ControlId::Pan => "Pan",
            ControlId::Mute => "Mute",
            ControlId::Solo => "Solo",
        }
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ControlId {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownIdentifier(s.to_string()))
    }
}

/// Returned by `FromStr` for identifiers outside the closed sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIdentifier(pub String);

impl std::fmt::Display for UnknownIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown identifier: {}", self.0)
    }
}

impl std::error::Error for UnknownIdentifier {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_ids_parse_their_own_names() {
        for id in InstrumentId::ALL {
            assert_eq!(InstrumentId::parse(id.as_str()), Some(id));
            assert_eq!(InstrumentId::from_index(id.index()), Some(id));
        }
        assert_eq!(InstrumentId::parse("drum7"), None);
        assert_eq!(InstrumentId::parse("Drum1"), None);
    }

    #[test]
    fn six_drums_and_six_cymbals() {
        let cymbals = InstrumentId::ALL.iter().filter(|i| i.is_cymbal()).count();
        assert_eq!(cymbals, 6);
        assert!(!InstrumentId::Drum6.is_cymbal());
        assert!(InstrumentId::Cymbal1.is_cymbal());
    }

    #[test]
    fn next_and_prev_wrap() {
        assert_eq!(InstrumentId::Cymbal6.next(), InstrumentId::Drum1);
        assert_eq!(InstrumentId::Drum1.prev(), InstrumentId::Cymbal6);
        assert_eq!(InstrumentId::Drum6.next(), InstrumentId::Cymbal1);
    }

    #[test]
    fn control_kinds() {
        assert!(ControlId::KNOBS.iter().all(|c| c.kind() == ControlKind::Knob));
        assert!(ControlId::TOGGLES.iter().all(|c| c.kind() == ControlKind::Toggle));
        for c in ControlId::ALL {
            assert_eq!(ControlId::ALL[c.index()], c);
            assert_eq!(c.as_str().parse::<ControlId>(), Ok(c));
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&InstrumentId::Cymbal3).unwrap(), "\"cymbal3\"");
        assert_eq!(serde_json::to_string(&ControlId::Mute).unwrap(), "\"mute-checkbox\"");
        let parsed: ControlId = serde_json::from_str("\"pan-knob\"").unwrap();
        assert_eq!(parsed, ControlId::Pan);
    }
}
