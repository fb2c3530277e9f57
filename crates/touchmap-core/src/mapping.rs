//! Mapping vocabulary: axes, binding modes, response curves and the per-pad mapping bundle.
//!
//! Everything here is plain data. Processing lives in `touchmap-pad`, matching lives in
//! `touchmap-templates`.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

// -------------------------------------------------------------------------------------------------
// Axes
// -------------------------------------------------------------------------------------------------

/// One of the three logical axes of a pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    /// Derived from contact geometry or dynamics (see `GestureMode`).
    Gesture,
}

impl Axis {
    /// Processing order within one contact frame.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Gesture];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Gesture => "gesture",
        }
    }
}

/// A value for each of the three axes. Every pad-level per-axis table uses this, so "three axes
/// always present" holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct AxisMap<T> {
    pub x: T,
    pub y: T,
    pub gesture: T,
}

impl<T> AxisMap<T> {
    pub fn new(x: T, y: T, gesture: T) -> Self {
        Self { x, y, gesture }
    }

    pub fn from_fn(mut f: impl FnMut(Axis) -> T) -> Self {
        Self {
            x: f(Axis::X),
            y: f(Axis::Y),
            gesture: f(Axis::Gesture),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Axis, &T) -> U) -> AxisMap<U> {
        AxisMap {
            x: f(Axis::X, &self.x),
            y: f(Axis::Y, &self.y),
            gesture: f(Axis::Gesture, &self.gesture),
        }
    }

    /// Iterate in processing order (x, y, gesture).
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &T)> {
        Axis::ALL.into_iter().map(move |a| (a, &self[a]))
    }
}

impl<T> Index<Axis> for AxisMap<T> {
    type Output = T;

    fn index(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Gesture => &self.gesture,
        }
    }
}

impl<T> IndexMut<Axis> for AxisMap<T> {
    fn index_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Gesture => &mut self.gesture,
        }
    }
}

/// Lowercase and strip separators so `ease-in`, `ease_in` and `easeIn` compare equal.
fn fold_ident(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

// -------------------------------------------------------------------------------------------------
// Bindings
// -------------------------------------------------------------------------------------------------

/// Target of an axis: a parameter id, or nothing.
///
/// Serialized as the parameter id, with `"none"` for the unbound case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Binding {
    #[default]
    None,
    Param(String),
}

impl Binding {
    pub fn param(id: impl Into<String>) -> Self {
        Binding::from(Some(id.into()))
    }

    pub fn param_id(&self) -> Option<&str> {
        match self {
            Binding::None => None,
            Binding::Param(id) => Some(id),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Binding::Param(_))
    }
}

impl From<Option<String>> for Binding {
    fn from(raw: Option<String>) -> Self {
        match raw {
            Some(id) if !id.trim().is_empty() && id != "none" => Binding::Param(id),
            _ => Binding::None,
        }
    }
}

impl From<Binding> for String {
    fn from(b: Binding) -> Self {
        match b {
            Binding::None => "none".to_string(),
            Binding::Param(id) => id,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Modes / curves / gesture strategies
// -------------------------------------------------------------------------------------------------

/// How a shaped axis value is mapped onto its parameter's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum AxisMode {
    /// Direct range map: 0 -> min, 1 -> max.
    #[default]
    Absolute,
    /// Symmetric about the range center: 0.5 -> midpoint.
    Bipolar,
    /// Offset from the value captured when the contact session started.
    Relative,
}

impl AxisMode {
    pub const ALL: [AxisMode; 3] = [AxisMode::Absolute, AxisMode::Bipolar, AxisMode::Relative];

    pub fn name(self) -> &'static str {
        match self {
            AxisMode::Absolute => "absolute",
            AxisMode::Bipolar => "bipolar",
            AxisMode::Relative => "relative",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match fold_ident(s).as_str() {
            "absolute" | "abs" | "direct" => Some(AxisMode::Absolute),
            "bipolar" | "center" | "centered" => Some(AxisMode::Bipolar),
            "relative" | "rel" | "offset" => Some(AxisMode::Relative),
            _ => None,
        }
    }
}

impl From<String> for AxisMode {
    fn from(s: String) -> Self {
        AxisMode::parse(&s).unwrap_or_else(|| {
            tracing::warn!(mode = %s, "unknown axis mode, using absolute");
            AxisMode::Absolute
        })
    }
}

impl From<AxisMode> for &'static str {
    fn from(m: AxisMode) -> Self {
        m.name()
    }
}

/// Response-shaping curve applied after inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Curve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Expo,
}

impl Curve {
    pub const ALL: [Curve; 5] = [
        Curve::Linear,
        Curve::EaseIn,
        Curve::EaseOut,
        Curve::EaseInOut,
        Curve::Expo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::EaseIn => "ease-in",
            Curve::EaseOut => "ease-out",
            Curve::EaseInOut => "ease-in-out",
            Curve::Expo => "expo",
        }
    }

    /// Accepts common aliases: `ease-in`, `ease_in`, `easeIn`, `in`, etc.
    pub fn parse(s: &str) -> Option<Self> {
        match fold_ident(s).as_str() {
            "linear" | "lin" => Some(Curve::Linear),
            "easein" | "in" => Some(Curve::EaseIn),
            "easeout" | "out" => Some(Curve::EaseOut),
            "easeinout" | "inout" => Some(Curve::EaseInOut),
            "expo" | "exponential" | "exp" => Some(Curve::Expo),
            _ => None,
        }
    }
}

impl From<String> for Curve {
    fn from(s: String) -> Self {
        Curve::parse(&s).unwrap_or_else(|| {
            tracing::warn!(curve = %s, "unknown curve, using linear");
            Curve::Linear
        })
    }
}

impl From<Curve> for &'static str {
    fn from(c: Curve) -> Self {
        c.name()
    }
}

/// Strategy used to derive the gesture axis from the contact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum GestureMode {
    /// Mean distance of contacts from their centroid.
    #[default]
    Spread,
    /// Mean contact pressure.
    Pressure,
    /// Centroid speed.
    Velocity,
}

impl GestureMode {
    pub const ALL: [GestureMode; 3] = [
        GestureMode::Spread,
        GestureMode::Pressure,
        GestureMode::Velocity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GestureMode::Spread => "spread",
            GestureMode::Pressure => "pressure",
            GestureMode::Velocity => "velocity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match fold_ident(s).as_str() {
            "spread" | "pinch" => Some(GestureMode::Spread),
            "pressure" | "force" => Some(GestureMode::Pressure),
            "velocity" | "speed" => Some(GestureMode::Velocity),
            _ => None,
        }
    }
}

impl From<String> for GestureMode {
    fn from(s: String) -> Self {
        GestureMode::parse(&s).unwrap_or_else(|| {
            tracing::warn!(gesture_mode = %s, "unknown gesture mode, using spread");
            GestureMode::Spread
        })
    }
}

impl From<GestureMode> for &'static str {
    fn from(g: GestureMode) -> Self {
        g.name()
    }
}

// -------------------------------------------------------------------------------------------------
// Per-axis and per-pad mapping
// -------------------------------------------------------------------------------------------------

/// Response shaping for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    pub curve: Curve,
    pub invert: bool,
    /// Raw smoothing slider value in `[0, smoothingMax]`.
    pub smoothing: f32,
}

/// Everything configurable about one axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisMapping {
    pub binding: Binding,
    pub mode: AxisMode,
    pub settings: AxisSettings,
}

/// The persisted configuration of one pad.
///
/// Serialized in the flat shape the preset layer stores:
/// `{axisBindings, axisModes, axisSettings, gestureMode, templateId}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "MappingRecord", into = "MappingRecord")]
pub struct PadMapping {
    pub axes: AxisMap<AxisMapping>,
    pub gesture_mode: GestureMode,
    /// The matched template, or `None` for "custom".
    pub template_id: Option<String>,
}

impl PadMapping {
    pub fn axis(&self, axis: Axis) -> &AxisMapping {
        &self.axes[axis]
    }

    pub fn binding(&self, axis: Axis) -> &Binding {
        &self.axes[axis].binding
    }

    pub fn mode(&self, axis: Axis) -> AxisMode {
        self.axes[axis].mode
    }

    pub fn settings(&self, axis: Axis) -> &AxisSettings {
        &self.axes[axis].settings
    }

    /// Convenience seed: bind x/y/gesture to the given ids, everything else default.
    pub fn with_bindings(x: Binding, y: Binding, gesture: Binding) -> Self {
        let mut mapping = PadMapping::default();
        mapping.axes.x.binding = x;
        mapping.axes.y.binding = y;
        mapping.axes.gesture.binding = gesture;
        mapping
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MappingRecord {
    axis_bindings: AxisMap<Binding>,
    axis_modes: AxisMap<AxisMode>,
    axis_settings: AxisMap<AxisSettings>,
    gesture_mode: GestureMode,
    template_id: Option<String>,
}

impl From<MappingRecord> for PadMapping {
    fn from(r: MappingRecord) -> Self {
        PadMapping {
            axes: AxisMap::from_fn(|a| AxisMapping {
                binding: r.axis_bindings[a].clone(),
                mode: r.axis_modes[a],
                settings: r.axis_settings[a],
            }),
            gesture_mode: r.gesture_mode,
            template_id: r.template_id,
        }
    }
}

impl From<PadMapping> for MappingRecord {
    fn from(m: PadMapping) -> Self {
        MappingRecord {
            axis_bindings: m.axes.map(|_, a| a.binding.clone()),
            axis_modes: m.axes.map(|_, a| a.mode),
            axis_settings: m.axes.map(|_, a| a.settings),
            gesture_mode: m.gesture_mode,
            template_id: m.template_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_aliases_resolve() {
        assert_eq!(Curve::parse("ease-in-out"), Some(Curve::EaseInOut));
        assert_eq!(Curve::parse("easeInOut"), Some(Curve::EaseInOut));
        assert_eq!(Curve::parse("ease_out"), Some(Curve::EaseOut));
        assert_eq!(Curve::parse("wobble"), None);
    }

    #[test]
    fn unknown_identifiers_fall_back() {
        let curve: Curve = serde_json::from_str("\"wobble\"").unwrap();
        assert_eq!(curve, Curve::Linear);
        let mode: AxisMode = serde_json::from_str("\"sideways\"").unwrap();
        assert_eq!(mode, AxisMode::Absolute);
        let gesture: GestureMode = serde_json::from_str("\"twirl\"").unwrap();
        assert_eq!(gesture, GestureMode::Spread);
    }

    #[test]
    fn binding_none_round_trips_as_string() {
        assert_eq!(Binding::from(Some("none".to_string())), Binding::None);
        assert_eq!(Binding::from(None), Binding::None);
        let json = serde_json::to_string(&Binding::None).unwrap();
        assert_eq!(json, "\"none\"");
        let b: Binding = serde_json::from_str("\"hue\"").unwrap();
        assert_eq!(b.param_id(), Some("hue"));
    }

    #[test]
    fn axis_map_indexes_in_processing_order() {
        let m = AxisMap::new(1, 2, 3);
        let order: Vec<_> = m.iter().map(|(a, v)| (a, *v)).collect();
        assert_eq!(
            order,
            vec![(Axis::X, 1), (Axis::Y, 2), (Axis::Gesture, 3)]
        );
        assert_eq!(m[Axis::Gesture], 3);
    }

    #[test]
    fn pad_mapping_uses_flat_record_shape() {
        let mut mapping =
            PadMapping::with_bindings(Binding::param("zoom"), Binding::None, Binding::None);
        mapping.axes.x.mode = AxisMode::Bipolar;
        mapping.axes.x.settings.curve = Curve::Expo;

        let value = serde_json::to_value(&mapping).unwrap();
        assert_eq!(value["axisBindings"]["x"], "zoom");
        assert_eq!(value["axisBindings"]["y"], "none");
        assert_eq!(value["axisModes"]["x"], "bipolar");
        assert_eq!(value["axisSettings"]["x"]["curve"], "expo");
        assert_eq!(value["gestureMode"], "spread");

        let back: PadMapping = serde_json::from_value(value).unwrap();
        assert_eq!(back, mapping);
    }

    #[test]
    fn partial_record_fills_defaults() {
        let mapping: PadMapping =
            serde_json::from_str(r#"{"axisBindings": {"y": "speed"}}"#).unwrap();
        assert_eq!(mapping.binding(Axis::X), &Binding::None);
        assert_eq!(mapping.binding(Axis::Y).param_id(), Some("speed"));
        assert_eq!(mapping.mode(Axis::Y), AxisMode::Absolute);
        assert_eq!(mapping.template_id, None);
    }
}
