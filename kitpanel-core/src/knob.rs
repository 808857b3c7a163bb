//! Rotary control: a bounded value driven by vertical drag gestures.
//!
//! The value is shown as a position on a 270° arc centred at twelve o'clock,
//! from -135° (minimum) to +135° (maximum).

use kitpanel_types::round_to_tenth;

/// Fraction of the full range moved per pixel of vertical drag.
pub const DRAG_SENSITIVITY: f64 = 0.01;

/// Angle of the minimum value, in degrees clockwise from twelve o'clock.
pub const ARC_START_DEG: f64 = -135.0;

/// Angular span between minimum and maximum.
pub const ARC_SWEEP_DEG: f64 = 270.0;

pub const DEFAULT_MIN: f64 = 0.0;
pub const DEFAULT_MAX: f64 = 10.0;

/// Pointer position and value captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    y: f64,
    value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotaryControl {
    value: f64,
    min: f64,
    max: f64,
    drag: Option<DragAnchor>,
}

impl Default for RotaryControl {
    fn default() -> Self {
        Self::new(DEFAULT_MIN, DEFAULT_MAX)
    }
}

impl RotaryControl {
    /// New control resting at the midpoint of its range.
    pub fn new(min: f64, max: f64) -> Self {
        let (min, max) = sanitize_range(min, max);
        Self {
            value: min + (max - min) / 2.0,
            min,
            max,
            drag: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn midpoint(&self) -> f64 {
        self.min + (self.max - self.min) / 2.0
    }

    /// Replace the bounds and re-clamp the current value into them.
    pub fn set_range(&mut self, min: f64, max: f64) {
        let (min, max) = sanitize_range(min, max);
        self.min = min;
        self.max = max;
        self.value = self.clamp(self.value);
    }

    /// Silent assignment used for resynchronisation. Never emits a change.
    pub fn set_value(&mut self, v: f64) {
        let v = if v.is_finite() { v } else { 0.0 };
        self.value = self.clamp(v);
    }

    /// Assign from externally supplied text; non-numeric input counts as 0.
    pub fn set_value_text(&mut self, raw: &str) {
        self.set_value(kitpanel_types::ControlValue::parse_number(raw));
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The control is drawn highlighted and shows its readout only mid-drag.
    pub fn readout_visible(&self) -> bool {
        self.is_dragging()
    }

    pub fn begin_drag(&mut self, y: f64) {
        self.drag = Some(DragAnchor {
            y: if y.is_finite() { y } else { 0.0 },
            value: self.value,
        });
    }

    /// Track the pointer. Returns the value to emit, rounded to one decimal,
    /// or `None` when no drag is in progress.
    pub fn drag_to(&mut self, y: f64) -> Option<f64> {
        let anchor = self.drag?;
        if !y.is_finite() {
            return None;
        }
        let delta = (anchor.y - y) * DRAG_SENSITIVITY * (self.max - self.min);
        self.value = self.clamp(anchor.value + delta);
        Some(round_to_tenth(self.value))
    }

    /// Leave the dragging state. Returns whether a drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn value_to_angle(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            return ARC_START_DEG;
        }
        ARC_START_DEG + (v - self.min) / span * ARC_SWEEP_DEG
    }

    pub fn angle_to_value(&self, angle: f64) -> f64 {
        self.min + (angle - ARC_START_DEG) / ARC_SWEEP_DEG * (self.max - self.min)
    }

    /// Current indicator angle in degrees.
    pub fn angle(&self) -> f64 {
        self.value_to_angle(self.value)
    }

    /// Numeric readout text, one decimal place.
    pub fn readout(&self) -> String {
        format!("{:.1}", self.value)
    }

    /// The highlighted arc from the minimum position to the current one.
    pub fn active_arc(&self, geometry: KnobGeometry) -> ArcPath {
        ArcPath::between(geometry, ARC_START_DEG, self.angle())
    }

    fn clamp(&self, v: f64) -> f64 {
        v.max(self.min).min(self.max)
    }
}

fn sanitize_range(min: f64, max: f64) -> (f64, f64) {
    let min = if min.is_finite() { min } else { DEFAULT_MIN };
    let max = if max.is_finite() { max } else { DEFAULT_MAX };
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

/// Size of the drawn knob in view-box units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobGeometry {
    pub center: f64,
    pub radius: f64,
}

impl Default for KnobGeometry {
    fn default() -> Self {
        Self {
            center: 50.0,
            radius: 40.0,
        }
    }
}

impl KnobGeometry {
    /// The indicator ring sits just outside the knob body.
    pub fn arc_radius(&self) -> f64 {
        self.radius + 10.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub radius: f64,
    pub large_arc: bool,
}

impl ArcPath {
    /// Arc between two knob angles (degrees clockwise from twelve o'clock).
    pub fn between(geometry: KnobGeometry, from_deg: f64, to_deg: f64) -> Self {
        // Screen angles are measured from three o'clock
        let start = from_deg - 90.0;
        let end = to_deg - 90.0;
        let r = geometry.arc_radius();
        let point = |deg: f64| {
            let rad = deg.to_radians();
            (geometry.center + r * rad.cos(), geometry.center + r * rad.sin())
        };
        Self {
            start: point(start),
            end: point(end),
            radius: r,
            large_arc: end - start > 180.0,
        }
    }

    /// SVG path data for the arc, drawn clockwise.
    pub fn to_svg(&self) -> String {
        format!(
            "M {},{} A {},{} 0 {} 1 {},{}",
            self.start.0,
            self.start.1,
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            self.end.0,
            self.end.1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn starts_at_midpoint() {
        let knob = RotaryControl::new(0.0, 10.0);
        assert_eq!(knob.value(), 5.0);
        assert!(approx(knob.angle(), 0.0));
        assert_eq!(knob.readout(), "5.0");
        assert!(!knob.readout_visible());
    }

    #[test]
    fn angle_endpoints() {
        let knob = RotaryControl::new(-20.0, 60.0);
        assert!(approx(knob.value_to_angle(-20.0), -135.0));
        assert!(approx(knob.value_to_angle(60.0), 135.0));
        assert!(approx(knob.value_to_angle(20.0), 0.0));
    }

    #[test]
    fn angle_round_trip() {
        for (min, max) in [(0.0, 10.0), (-1.0, 1.0), (20.0, 20000.0), (0.001, 0.002)] {
            let knob = RotaryControl::new(min, max);
            for i in 0..=50 {
                let v = min + (max - min) * i as f64 / 50.0;
                let back = knob.angle_to_value(knob.value_to_angle(v));
                assert!((back - v).abs() <= 1e-9 * (max - min).abs().max(1.0), "{v} -> {back}");
            }
        }
    }

    #[test]
    fn angle_is_monotonic() {
        let knob = RotaryControl::new(0.0, 10.0);
        let mut last = f64::NEG_INFINITY;
        for i in 0..=100 {
            let a = knob.value_to_angle(i as f64 / 10.0);
            assert!(a > last);
            last = a;
        }
    }

    #[test]
    fn drag_up_raises_value() {
        let mut knob = RotaryControl::new(0.0, 10.0);
        knob.begin_drag(100.0);
        assert!(knob.readout_visible());
        // 20px * 0.01 * 10 = +2.0
        assert_eq!(knob.drag_to(80.0), Some(7.0));
        assert!(approx(knob.value(), 7.0));
        assert_eq!(knob.drag_to(110.0), Some(4.0));
        assert!(knob.end_drag());
        assert!(!knob.readout_visible());
        assert!(approx(knob.value(), 4.0));
    }

    #[test]
    fn drag_is_relative_to_anchor() {
        let mut knob = RotaryControl::new(0.0, 10.0);
        knob.begin_drag(50.0);
        knob.drag_to(40.0);
        knob.drag_to(30.0);
        // Each move is measured from the anchor, not the previous move
        assert!(approx(knob.value(), 7.0));
    }

    #[test]
    fn drag_clamps_overshoot() {
        let mut knob = RotaryControl::new(0.0, 10.0);
        knob.begin_drag(0.0);
        assert_eq!(knob.drag_to(-1.0e9), Some(10.0));
        assert_eq!(knob.drag_to(1.0e9), Some(0.0));
        for y in [-5000.0, 3.3, 77.7, 12345.6, -0.5] {
            knob.drag_to(y);
            assert!((0.0..=10.0).contains(&knob.value()));
        }
    }

    #[test]
    fn emitted_value_is_rounded_but_state_is_not() {
        let mut knob = RotaryControl::new(0.0, 10.0);
        knob.begin_drag(0.0);
        // 3px * 0.1 = 0.3 -> 5.3; 3.3px -> 5.33
        assert_eq!(knob.drag_to(-3.3), Some(5.3));
        assert!(approx(knob.value(), 5.33));
        assert_eq!(knob.readout(), "5.3");
    }

    #[test]
    fn move_without_drag_does_nothing() {
        let mut knob = RotaryControl::new(0.0, 10.0);
        assert_eq!(knob.drag_to(-500.0), None);
        assert_eq!(knob.value(), 5.0);
        assert!(!knob.end_drag());
    }

    #[test]
    fn set_value_clamps_and_sanitizes() {
        let mut knob = RotaryControl::new(0.0, 10.0);
        knob.set_value(42.0);
        assert_eq!(knob.value(), 10.0);
        knob.set_value(-3.0);
        assert_eq!(knob.value(), 0.0);
        knob.set_value(f64::NAN);
        assert_eq!(knob.value(), 0.0);
        knob.set_value_text("6.5");
        assert_eq!(knob.value(), 6.5);
        knob.set_value_text("eleven");
        assert_eq!(knob.value(), 0.0);

        let mut offset = RotaryControl::new(2.0, 4.0);
        offset.set_value_text("garbage");
        // Defaults to 0, then clamps up to the minimum
        assert_eq!(offset.value(), 2.0);
    }

    #[test]
    fn set_range_reclamps_only() {
        let mut knob = RotaryControl::new(0.0, 10.0);
        knob.set_value(8.0);
        knob.set_range(0.0, 20.0);
        assert_eq!(knob.value(), 8.0);
        knob.set_range(0.0, 6.0);
        assert_eq!(knob.value(), 6.0);
        knob.set_range(9.0, 1.0);
        assert_eq!((knob.min(), knob.max()), (1.0, 9.0));
    }

    #[test]
    fn degenerate_range_is_stable() {
        let mut knob = RotaryControl::new(3.0, 3.0);
        assert_eq!(knob.value(), 3.0);
        assert_eq!(knob.angle(), ARC_START_DEG);
        knob.begin_drag(0.0);
        assert_eq!(knob.drag_to(-100.0), Some(3.0));
    }

    #[test]
    fn arc_large_flag_past_half_sweep() {
        let mut knob = RotaryControl::new(0.0, 10.0);
        let geometry = KnobGeometry::default();
        knob.set_value(0.0);
        assert!(!knob.active_arc(geometry).large_arc);
        knob.set_value(6.0);
        // 0.6 * 270 = 162 degrees
        assert!(!knob.active_arc(geometry).large_arc);
        knob.set_value(7.0);
        // 189 degrees
        assert!(knob.active_arc(geometry).large_arc);
    }

    #[test]
    fn arc_endpoints_on_ring() {
        let knob = RotaryControl::new(0.0, 10.0);
        let geometry = KnobGeometry::default();
        let arc = knob.active_arc(geometry);
        assert_eq!(arc.radius, 50.0);
        // Midpoint sits at twelve o'clock
        assert!(approx(arc.end.0, 50.0));
        assert!(approx(arc.end.1, 0.0));
        assert!(arc.to_svg().starts_with("M "));
        assert!(arc.to_svg().contains(" 0 0 1 "));
    }
}
