//! The on-screen controls: twelve knobs and two toggles.

use kitpanel_types::{ControlId, ControlKind};

use crate::knob::RotaryControl;
use crate::store::Instrument;

#[derive(Debug, Clone)]
pub struct ControlBank {
    knobs: [RotaryControl; 12],
    toggles: [bool; 2],
}

impl Default for ControlBank {
    fn default() -> Self {
        Self::new(crate::knob::DEFAULT_MIN, crate::knob::DEFAULT_MAX)
    }
}

impl ControlBank {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            knobs: std::array::from_fn(|_| RotaryControl::new(min, max)),
            toggles: [false; 2],
        }
    }

    pub fn knob(&self, control: ControlId) -> Option<&RotaryControl> {
        match control.kind() {
            ControlKind::Knob => self.knobs.get(control.index()),
            ControlKind::Toggle => None,
        }
    }

    pub fn knob_mut(&mut self, control: ControlId) -> Option<&mut RotaryControl> {
        match control.kind() {
            ControlKind::Knob => self.knobs.get_mut(control.index()),
            ControlKind::Toggle => None,
        }
    }

    pub fn knobs(&self) -> impl Iterator<Item = (ControlId, &RotaryControl)> {
        ControlId::KNOBS.iter().copied().zip(self.knobs.iter())
    }

    pub fn toggle(&self, control: ControlId) -> Option<bool> {
        toggle_slot(control).map(|i| self.toggles[i])
    }

    pub fn set_toggle(&mut self, control: ControlId, on: bool) -> bool {
        match toggle_slot(control) {
            Some(i) => {
                self.toggles[i] = on;
                true
            }
            None => false,
        }
    }

    /// Redisplay every control from stored values without emitting anything.
    pub fn resync(&mut self, instrument: &Instrument) {
        for (control, knob) in ControlId::KNOBS.iter().zip(self.knobs.iter_mut()) {
            let v = instrument.knob(*control).unwrap_or_else(|| knob.midpoint());
            knob.set_value(v);
        }
        for (i, control) in ControlId::TOGGLES.iter().enumerate() {
            self.toggles[i] = instrument.toggle(*control).unwrap_or(false);
        }
    }

    /// Abandon any drag in progress. Returns how many were cancelled.
    pub fn end_drags(&mut self) -> usize {
        self.knobs.iter_mut().map(|k| k.end_drag()).filter(|ended| *ended).count()
    }

    pub fn dragging(&self) -> Option<ControlId> {
        self.knobs().find(|(_, k)| k.is_dragging()).map(|(c, _)| c)
    }
}

fn toggle_slot(control: ControlId) -> Option<usize> {
    ControlId::TOGGLES.iter().position(|t| *t == control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitpanel_types::{ControlValue, InstrumentId};

    #[test]
    fn knob_lookup_rejects_toggles() {
        let bank = ControlBank::default();
        assert!(bank.knob(ControlId::Mute).is_none());
        assert_eq!(bank.knob(ControlId::Pan).map(|k| k.value()), Some(5.0));
        assert_eq!(bank.toggle(ControlId::Solo), Some(false));
        assert_eq!(bank.toggle(ControlId::Pitch), None);
    }

    #[test]
    fn resync_is_silent_and_complete() {
        let mut bank = ControlBank::default();
        let mut store = crate::store::InstrumentStore::default();
        store.activate(InstrumentId::Drum2);
        store.record_value(ControlId::Decay, ControlValue::Number(1.5));
        store.record_value(ControlId::Solo, ControlValue::Toggle(true));

        bank.resync(store.active());
        assert_eq!(bank.knob(ControlId::Decay).map(|k| k.value()), Some(1.5));
        assert_eq!(bank.knob(ControlId::Pitch).map(|k| k.value()), Some(5.0));
        assert_eq!(bank.toggle(ControlId::Solo), Some(true));
        assert_eq!(bank.toggle(ControlId::Mute), Some(false));
    }

    #[test]
    fn resync_clamps_out_of_range_values() {
        let mut bank = ControlBank::new(0.0, 1.0);
        let mut store = crate::store::InstrumentStore::default();
        store.record_value(ControlId::Volume, ControlValue::Number(8.0));
        bank.resync(store.active());
        assert_eq!(bank.knob(ControlId::Volume).map(|k| k.value()), Some(1.0));
    }

    #[test]
    fn end_drags_counts() {
        let mut bank = ControlBank::default();
        if let Some(k) = bank.knob_mut(ControlId::Ring) {
            k.begin_drag(10.0);
        }
        assert_eq!(bank.dragging(), Some(ControlId::Ring));
        assert_eq!(bank.end_drags(), 1);
        assert_eq!(bank.end_drags(), 0);
        assert_eq!(bank.dragging(), None);
    }
}
