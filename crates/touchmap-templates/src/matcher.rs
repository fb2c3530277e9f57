//! Template detection.
//!
//! Detection compares configuration only (bindings, modes, settings, gesture mode). It never looks
//! at contact state, so hosts call it on edit events rather than per frame.

use touchmap_core::{AxisMapping, PadMapping};

use crate::{AxisOverride, Template};

/// Absorbs float noise on top of the configured smoothing tolerance.
const SMOOTHING_EPSILON: f32 = 1e-6;

impl AxisOverride {
    /// True when every pinned field agrees with `axis`.
    pub fn matches(&self, axis: &AxisMapping, tolerance: f32) -> bool {
        if let Some(binding) = &self.binding {
            if *binding != axis.binding {
                return false;
            }
        }
        if let Some(mode) = self.mode {
            if mode != axis.mode {
                return false;
            }
        }
        if let Some(curve) = self.curve {
            if curve != axis.settings.curve {
                return false;
            }
        }
        if let Some(invert) = self.invert {
            if invert != axis.settings.invert {
                return false;
            }
        }
        if let Some(smoothing) = self.smoothing {
            if (smoothing - axis.settings.smoothing).abs() > tolerance + SMOOTHING_EPSILON {
                return false;
            }
        }
        true
    }
}

impl Template {
    /// True when `mapping` agrees with every field this template pins.
    pub fn matches(&self, mapping: &PadMapping, tolerance: f32) -> bool {
        if let Some(gesture_mode) = self.gesture_mode {
            if gesture_mode != mapping.gesture_mode {
                return false;
            }
        }
        self.axes
            .iter()
            .all(|(axis, o)| o.matches(mapping.axis(axis), tolerance))
    }
}

/// First template (in iteration order) that `mapping` matches.
pub fn detect<'a>(
    mapping: &PadMapping,
    templates: impl IntoIterator<Item = &'a Template>,
    tolerance: f32,
) -> Option<&'a Template> {
    templates
        .into_iter()
        .find(|t| t.matches(mapping, tolerance))
}

impl crate::TemplateLibrary {
    pub fn detect(&self, mapping: &PadMapping, tolerance: f32) -> Option<&Template> {
        detect(mapping, self.iter(), tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateLibrary;
    use touchmap_core::{Axis, AxisMode, Binding, Curve, GestureMode};

    const TOL: f32 = 0.015;

    fn glide_mapping() -> PadMapping {
        let mut m = PadMapping::default();
        for axis in [Axis::X, Axis::Y] {
            m.axes[axis].settings.curve = Curve::EaseInOut;
            m.axes[axis].settings.smoothing = 0.6;
        }
        m.axes.gesture.settings.curve = Curve::EaseOut;
        m.axes.gesture.settings.smoothing = 0.6;
        m
    }

    #[test]
    fn default_mapping_is_direct_xy() {
        let lib = TemplateLibrary::builtin();
        let hit = lib.detect(&PadMapping::default(), TOL).map(|t| t.id.as_str());
        assert_eq!(hit, Some("direct-xy"));
    }

    #[test]
    fn smoothing_within_tolerance_matches() {
        let lib = TemplateLibrary::builtin();
        let mut m = glide_mapping();
        m.axes.x.settings.smoothing = 0.61;
        assert_eq!(lib.detect(&m, TOL).map(|t| t.id.as_str()), Some("glide"));

        m.axes.x.settings.smoothing = 0.62;
        assert_eq!(lib.detect(&m, TOL), None);
    }

    #[test]
    fn gesture_mode_is_checked_when_pinned() {
        let lib = TemplateLibrary::builtin();
        let mut m = glide_mapping();
        m.gesture_mode = GestureMode::Pressure;
        assert_eq!(lib.detect(&m, TOL), None);
    }

    #[test]
    fn pinned_binding_must_agree() {
        let glide = TemplateLibrary::builtin().get("glide").cloned().unwrap();
        let mut pinned = glide.clone();
        pinned.axes.x.binding = Some(Binding::param("zoom"));

        let mut m = glide_mapping();
        assert!(glide.matches(&m, TOL));
        assert!(!pinned.matches(&m, TOL));

        m.axes.x.binding = Binding::param("zoom");
        assert!(pinned.matches(&m, TOL));
    }

    #[test]
    fn explicit_none_binding_is_not_a_wildcard() {
        let mut t = TemplateLibrary::builtin().get("direct-xy").cloned().unwrap();
        t.axes.gesture.binding = Some(Binding::None);

        let mut m = PadMapping::default();
        assert!(t.matches(&m, TOL));
        m.axes.gesture.binding = Binding::param("warp");
        assert!(!t.matches(&m, TOL));
    }

    #[test]
    fn mode_mismatch_falls_through_to_next_template() {
        let lib = TemplateLibrary::builtin();
        let mut m = PadMapping::default();
        m.axes.x.mode = AxisMode::Bipolar;
        m.axes.y.mode = AxisMode::Bipolar;
        assert_eq!(lib.detect(&m, TOL).map(|t| t.id.as_str()), Some("centered-xy"));
    }
}
