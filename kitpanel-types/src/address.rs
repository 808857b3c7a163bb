use serde::{Deserialize, Serialize};

use crate::{ControlId, InstrumentId};

/// Separator between the instrument and control halves of a composite identifier.
pub const SCOPE_SEPARATOR: char = ':';

/// Reserved meta-control whose value names the instrument to make active.
pub const ACTIVE_INSTRUMENT_CONTROL: &str = "active-drum";

/// Where a control change came from.
///
/// Wire identifiers are parsed into this once, at the boundary; nothing
/// downstream splits strings again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlAddress {
    /// The `active-drum` meta-control, bare or instrument-scoped.
    ActiveInstrument,
    /// A control that belongs to no instrument.
    Bare(String),
    /// A control on one instrument, written `instrument:control` on the wire.
    Scoped {
        instrument: InstrumentId,
        control: String,
    },
}

impl ControlAddress {
    /// Parse a wire identifier.
    ///
    /// A composite identifier whose instrument half is not a known instrument
    /// stays bare, keeping the full text as its id.
    pub fn parse(raw: &str) -> Self {
        if raw == ACTIVE_INSTRUMENT_CONTROL {
            return ControlAddress::ActiveInstrument;
        }
        match raw.split_once(SCOPE_SEPARATOR) {
            Some((_, ACTIVE_INSTRUMENT_CONTROL)) => ControlAddress::ActiveInstrument,
            Some((instrument, control)) => match InstrumentId::parse(instrument) {
                Some(instrument) => ControlAddress::Scoped {
                    instrument,
                    control: control.to_string(),
                },
                None => ControlAddress::Bare(raw.to_string()),
            },
            None => ControlAddress::Bare(raw.to_string()),
        }
    }

    pub fn scoped(instrument: InstrumentId, control: ControlId) -> Self {
        ControlAddress::Scoped {
            instrument,
            control: control.as_str().to_string(),
        }
    }

    pub fn instrument(&self) -> Option<InstrumentId> {
        match self {
            ControlAddress::Scoped { instrument, .. } => Some(*instrument),
            _ => None,
        }
    }

    /// The control half for scoped addresses, the whole id for bare ones.
    pub fn control(&self) -> &str {
        match self {
            ControlAddress::ActiveInstrument => ACTIVE_INSTRUMENT_CONTROL,
            ControlAddress::Bare(id) => id,
            ControlAddress::Scoped { control, .. } => control,
        }
    }
}

impl std::fmt::Display for ControlAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlAddress::ActiveInstrument => f.write_str(ACTIVE_INSTRUMENT_CONTROL),
            ControlAddress::Bare(id) => f.write_str(id),
            ControlAddress::Scoped {
                instrument,
                control,
            } => write!(f, "{}{}{}", instrument, SCOPE_SEPARATOR, control),
        }
    }
}
