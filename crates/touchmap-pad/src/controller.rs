//! Event and edit surface for one pad.
//!
//! Contact events run the per-frame pipeline and never touch template state. Edits (bindings,
//! modes, settings, templates) run template detection and emit one mapping notification each.
//! [`BulkEdit`] scopes a group of edits so they coalesce into a single detection pass and a
//! single notification when the outermost guard drops.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Instant;

use touchmap_core::{
    Axis, AxisMode, Binding, Curve, EngineConfig, GestureMode, PadMapping, ParameterStore,
};
use touchmap_templates::{Template, TemplateLibrary};

use crate::contacts::ContactId;
use crate::pad::{FrameReadout, MappingSnapshot, Pad, PadId, PadSeed};

/// Receives a snapshot after each discrete edit or template application.
pub type MappingListener = Box<dyn FnMut(&MappingSnapshot)>;

/// Contact input from the UI layer (or any other driver).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    Start {
        id: ContactId,
        x: f32,
        y: f32,
        pressure: Option<f32>,
    },
    Move {
        id: ContactId,
        x: f32,
        y: f32,
        pressure: Option<f32>,
    },
    End {
        id: ContactId,
    },
}

pub struct PadController {
    pad: Pad,
    templates: Arc<TemplateLibrary>,
    listener: Option<MappingListener>,
    suppress_depth: u32,
    pending_detect: bool,
    pending_notify: bool,
}

impl fmt::Debug for PadController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PadController")
            .field("pad", &self.pad)
            .field("templates", &self.templates.len())
            .field("listener", &self.listener.is_some())
            .field("suppress_depth", &self.suppress_depth)
            .finish()
    }
}

impl PadController {
    /// Create a pad and resolve its initial template association (no notification).
    pub fn new(
        id: PadId,
        seed: PadSeed,
        config: &EngineConfig,
        templates: Arc<TemplateLibrary>,
    ) -> Self {
        let mapping = match seed {
            PadSeed::Default => config.default_mapping.clone(),
            PadSeed::Explicit(mapping) => mapping,
        };
        let mut controller = Self {
            pad: Pad::new(id, mapping, config.tuning),
            templates,
            listener: None,
            suppress_depth: 0,
            pending_detect: false,
            pending_notify: false,
        };
        controller.refresh_template();
        controller
    }

    pub fn set_listener(&mut self, listener: impl FnMut(&MappingSnapshot) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn id(&self) -> PadId {
        self.pad.id()
    }

    pub fn pad(&self) -> &Pad {
        &self.pad
    }

    pub fn mapping(&self) -> &PadMapping {
        self.pad.mapping()
    }

    pub fn template_id(&self) -> Option<&str> {
        self.pad.mapping().template_id.as_deref()
    }

    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }

    pub fn snapshot(&self) -> MappingSnapshot {
        self.pad.snapshot()
    }

    // ---------------------------------------------------------------------------------------------
    // Contact events
    // ---------------------------------------------------------------------------------------------

    /// Process one contact event. Returns the frame readout, or `None` when the event produced
    /// no frame (unknown contact, or the last contact lifted).
    pub fn handle<S>(
        &mut self,
        store: &mut S,
        event: ContactEvent,
        now: Instant,
    ) -> Option<FrameReadout>
    where
        S: ParameterStore + ?Sized,
    {
        match event {
            ContactEvent::Start { id, x, y, pressure } => {
                self.pad.contact_start(store, id, x, y, pressure, now)
            }
            ContactEvent::Move { id, x, y, pressure } => {
                self.pad.contact_move(store, id, x, y, pressure, now)
            }
            ContactEvent::End { id } => self.pad.contact_end(store, id, now),
        }
    }

    pub fn on_contact_start<S>(
        &mut self,
        store: &mut S,
        id: ContactId,
        x: f32,
        y: f32,
        pressure: Option<f32>,
    ) -> Option<FrameReadout>
    where
        S: ParameterStore + ?Sized,
    {
        self.handle(store, ContactEvent::Start { id, x, y, pressure }, Instant::now())
    }

    pub fn on_contact_move<S>(
        &mut self,
        store: &mut S,
        id: ContactId,
        x: f32,
        y: f32,
        pressure: Option<f32>,
    ) -> Option<FrameReadout>
    where
        S: ParameterStore + ?Sized,
    {
        self.handle(store, ContactEvent::Move { id, x, y, pressure }, Instant::now())
    }

    pub fn on_contact_end<S>(&mut self, store: &mut S, id: ContactId) -> Option<FrameReadout>
    where
        S: ParameterStore + ?Sized,
    {
        self.handle(store, ContactEvent::End { id }, Instant::now())
    }

    pub fn cancel_contacts(&mut self) {
        self.pad.cancel_contacts();
    }

    // ---------------------------------------------------------------------------------------------
    // Edits
    // ---------------------------------------------------------------------------------------------

    pub fn set_binding(&mut self, axis: Axis, binding: Binding) -> bool {
        let changed = self.pad.set_binding(axis, binding);
        self.edited(changed)
    }

    pub fn set_mode(&mut self, axis: Axis, mode: AxisMode) -> bool {
        let changed = self.pad.set_mode(axis, mode);
        self.edited(changed)
    }

    pub fn set_curve(&mut self, axis: Axis, curve: Curve) -> bool {
        let changed = self.pad.set_curve(axis, curve);
        self.edited(changed)
    }

    pub fn set_invert(&mut self, axis: Axis, invert: bool) -> bool {
        let changed = self.pad.set_invert(axis, invert);
        self.edited(changed)
    }

    pub fn set_smoothing(&mut self, axis: Axis, smoothing: f32) -> bool {
        let changed = self.pad.set_smoothing(axis, smoothing);
        self.edited(changed)
    }

    pub fn set_gesture_mode(&mut self, mode: GestureMode) -> bool {
        let changed = self.pad.set_gesture_mode(mode);
        self.edited(changed)
    }

    /// Open a scope in which edits are coalesced.
    pub fn bulk_edit(&mut self) -> BulkEdit<'_> {
        BulkEdit::new(self)
    }

    /// Apply a template from the library atomically.
    ///
    /// Returns `false` for unknown ids; the pad then reverts to "custom" (no template), which is
    /// a state transition rather than an error.
    pub fn apply_template(&mut self, id: &str) -> bool {
        let library = Arc::clone(&self.templates);
        let Some(template) = library.get(id) else {
            tracing::debug!(pad = self.id().0, template = id, "unknown template, pad is custom");
            let changed = self.pad.set_template_id(None);
            self.request_notify(changed);
            return false;
        };

        let mut edit = self.bulk_edit();
        for axis in Axis::ALL {
            let o = &template.axes[axis];
            if let Some(binding) = &o.binding {
                edit.set_binding(axis, binding.clone());
            }
            if let Some(mode) = o.mode {
                edit.set_mode(axis, mode);
            }
            if let Some(curve) = o.curve {
                edit.set_curve(axis, curve);
            }
            if let Some(invert) = o.invert {
                edit.set_invert(axis, invert);
            }
            if let Some(smoothing) = o.smoothing {
                edit.set_smoothing(axis, smoothing);
            }
        }
        if let Some(mode) = template.gesture_mode {
            edit.set_gesture_mode(mode);
        }

        // Pinned values outside the pad's accepted range were clamped by the setters; the
        // association then comes from detection instead.
        let tolerance = edit.pad.tuning().template_tolerance;
        if template.matches(edit.pad.mapping(), tolerance) {
            edit.pad.set_template_id(Some(template.id.clone()));
            edit.pending_detect = false;
        } else {
            tracing::debug!(
                pad = edit.id().0,
                template = %template.id,
                "template values were clamped, re-detecting"
            );
            edit.pending_detect = true;
        }
        // Every application notifies, even when nothing changed.
        edit.pending_notify = true;
        tracing::debug!(pad = edit.id().0, template = %template.id, "template applied");
        true
    }

    /// Replace the whole mapping (e.g. when a preset is recalled). One notification; the
    /// template association is re-detected rather than trusted.
    pub fn restore(&mut self, mapping: PadMapping) {
        let mut edit = self.bulk_edit();
        for axis in Axis::ALL {
            let a = mapping.axis(axis);
            edit.set_binding(axis, a.binding.clone());
            edit.set_mode(axis, a.mode);
            edit.set_curve(axis, a.settings.curve);
            edit.set_invert(axis, a.settings.invert);
            edit.set_smoothing(axis, a.settings.smoothing);
        }
        edit.set_gesture_mode(mapping.gesture_mode);
        edit.pending_detect = true;
        edit.pending_notify = true;
    }

    /// The template this pad's configuration currently matches. The associated template wins
    /// when it still matches; otherwise the first match in library order.
    pub fn detect(&self) -> Option<&Template> {
        let tolerance = self.pad.tuning().template_tolerance;
        let mapping = self.pad.mapping();
        mapping
            .template_id
            .as_deref()
            .and_then(|id| self.templates.get(id))
            .filter(|t| t.matches(mapping, tolerance))
            .or_else(|| self.templates.detect(mapping, tolerance))
    }

    // ---------------------------------------------------------------------------------------------
    // Detection / notification plumbing
    // ---------------------------------------------------------------------------------------------

    fn edited(&mut self, changed: bool) -> bool {
        if !changed {
            return false;
        }
        if self.suppress_depth > 0 {
            self.pending_detect = true;
            self.pending_notify = true;
        } else {
            self.refresh_template();
            self.notify();
        }
        true
    }

    fn request_notify(&mut self, changed: bool) {
        if !changed {
            return;
        }
        if self.suppress_depth > 0 {
            self.pending_notify = true;
        } else {
            self.notify();
        }
    }

    /// Re-run detection and store the result. Returns whether the association changed.
    fn refresh_template(&mut self) -> bool {
        let detected = self.detect().map(|t| t.id.clone());
        let changed = self.pad.set_template_id(detected);
        if changed {
            tracing::debug!(
                pad = self.id().0,
                template = self.template_id().unwrap_or("custom"),
                "template association changed"
            );
        }
        changed
    }

    fn notify(&mut self) {
        let snapshot = self.pad.snapshot();
        if let Some(listener) = self.listener.as_mut() {
            listener(&snapshot);
        }
    }

    fn flush(&mut self) {
        if std::mem::take(&mut self.pending_detect) {
            self.refresh_template();
        }
        if std::mem::take(&mut self.pending_notify) {
            self.notify();
        }
    }
}

/// Scoped suppression of detection and notification.
///
/// While any guard is alive, edits only record that detection and a notification are owed.
/// Dropping the outermost guard settles both, exactly once, even when the scope unwinds.
pub struct BulkEdit<'a> {
    controller: &'a mut PadController,
}

impl<'a> BulkEdit<'a> {
    fn new(controller: &'a mut PadController) -> Self {
        controller.suppress_depth += 1;
        Self { controller }
    }
}

impl fmt::Debug for BulkEdit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkEdit")
            .field("pad", &self.controller.id())
            .field("depth", &self.controller.suppress_depth)
            .finish()
    }
}

impl Deref for BulkEdit<'_> {
    type Target = PadController;

    fn deref(&self) -> &PadController {
        &*self.controller
    }
}

impl DerefMut for BulkEdit<'_> {
    fn deref_mut(&mut self) -> &mut PadController {
        &mut *self.controller
    }
}

impl Drop for BulkEdit<'_> {
    fn drop(&mut self) {
        self.controller.suppress_depth -= 1;
        if self.controller.suppress_depth == 0 {
            self.controller.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use touchmap_core::{MemoryStore, ParamDef};
    use touchmap_templates::AxisOverride;

    fn store() -> MemoryStore {
        let mut s = MemoryStore::new();
        s.define("zoom", ParamDef::float(0.0, 10.0), 4.0);
        s.define("hue", ParamDef::float(0.0, 1.0), 0.5);
        s.define("warp", ParamDef::float(-1.0, 1.0), 0.0);
        s
    }

    fn performance_template() -> Template {
        Template {
            id: "perform".to_string(),
            name: "Perform".to_string(),
            description: String::new(),
            axes: touchmap_core::AxisMap::new(
                AxisOverride {
                    binding: Some(Binding::param("zoom")),
                    ..AxisOverride::shaped(AxisMode::Relative, Curve::Linear, 0.0)
                },
                AxisOverride {
                    binding: Some(Binding::param("hue")),
                    ..AxisOverride::shaped(AxisMode::Absolute, Curve::EaseOut, 0.3)
                },
                AxisOverride {
                    binding: Some(Binding::param("warp")),
                    ..AxisOverride::shaped(AxisMode::Bipolar, Curve::Linear, 0.0)
                },
            ),
            gesture_mode: Some(GestureMode::Spread),
        }
    }

    fn controller() -> PadController {
        let lib = TemplateLibrary::new(vec![performance_template()]);
        PadController::new(
            PadId(1),
            PadSeed::Default,
            &EngineConfig::default(),
            Arc::new(lib),
        )
    }

    fn record(c: &mut PadController) -> Rc<RefCell<Vec<MappingSnapshot>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        c.set_listener(move |snap| sink.borrow_mut().push(snap.clone()));
        seen
    }

    #[test]
    fn default_seed_is_custom() {
        let c = controller();
        assert_eq!(c.template_id(), None);
        assert!(c.detect().is_none());
    }

    #[test]
    fn apply_then_detect_round_trips() {
        let mut c = controller();
        assert!(c.apply_template("perform"));
        assert_eq!(c.template_id(), Some("perform"));
        assert_eq!(c.detect().map(|t| t.id.as_str()), Some("perform"));

        c.set_binding(Axis::Y, Binding::param("zoom"));
        assert_eq!(c.detect().map(|t| t.id.as_str()), None);
        assert_eq!(c.template_id(), None, "edit drops the pad back to custom");
    }

    #[test]
    fn apply_emits_exactly_one_notification() {
        let mut c = controller();
        let seen = record(&mut c);

        c.apply_template("perform");
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].mapping.template_id.as_deref(), Some("perform"));
        assert_eq!(seen[0].pad_id, PadId(1));
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let mut c = controller();
        let seen = record(&mut c);

        c.apply_template("perform");
        let once = c.mapping().clone();
        c.apply_template("perform");
        assert_eq!(c.mapping(), &once);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2, "each apply notifies once");
        assert_eq!(seen[0], seen[1]);
    }

    fn heavy_template() -> Template {
        Template {
            id: "heavy".to_string(),
            name: "Heavy".to_string(),
            description: String::new(),
            axes: touchmap_core::AxisMap::new(
                AxisOverride {
                    binding: Some(Binding::param("zoom")),
                    smoothing: Some(5.0),
                    ..AxisOverride::default()
                },
                AxisOverride::default(),
                AxisOverride::default(),
            ),
            gesture_mode: None,
        }
    }

    #[test]
    fn clamped_template_values_fall_back_to_detection() {
        let lib = TemplateLibrary::new(vec![heavy_template()]);
        let mut c = PadController::new(
            PadId(3),
            PadSeed::Default,
            &EngineConfig::default(),
            Arc::new(lib),
        );
        let seen = record(&mut c);

        assert!(c.apply_template("heavy"));
        assert_eq!(c.mapping().axes.x.settings.smoothing, 1.0);
        assert_eq!(
            c.template_id(),
            c.detect().map(|t| t.id.as_str()),
            "stored association agrees with detection"
        );
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn seeds_are_clamped_like_edits() {
        let mut seed = PadMapping::default();
        seed.axes.x.settings.smoothing = 3.0;
        seed.axes.y.settings.smoothing = -1.0;
        seed.axes.gesture.settings.smoothing = f32::NAN;
        let c = PadController::new(
            PadId(4),
            PadSeed::Explicit(seed),
            &EngineConfig::default(),
            Arc::new(TemplateLibrary::empty()),
        );
        let s = &c.mapping().axes;
        assert_eq!(s.x.settings.smoothing, 1.0);
        assert_eq!(s.y.settings.smoothing, 0.0);
        assert_eq!(s.gesture.settings.smoothing, 0.0);

        let mut config = EngineConfig::default();
        config.default_mapping.axes.y.settings.smoothing = 9.0;
        let c = PadController::new(
            PadId(5),
            PadSeed::Default,
            &config,
            Arc::new(TemplateLibrary::empty()),
        );
        assert_eq!(c.snapshot().mapping.axes.y.settings.smoothing, 1.0);
    }

    #[test]
    fn unknown_template_reverts_to_custom() {
        let mut c = controller();
        c.apply_template("perform");
        let before = c.mapping().axes.clone();

        assert!(!c.apply_template("nope"));
        assert_eq!(c.template_id(), None);
        assert_eq!(c.mapping().axes, before, "fields are untouched");
    }

    #[test]
    fn single_edit_detects_and_notifies_once() {
        let mut c = controller();
        c.apply_template("perform");
        let seen = record(&mut c);

        assert!(c.set_curve(Axis::X, Curve::Expo));
        assert!(!c.set_curve(Axis::X, Curve::Expo), "no-op edits are silent");
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].mapping.template_id, None);
    }

    #[test]
    fn manual_edits_can_land_on_a_template() {
        let mut c = controller();
        let t = performance_template();
        {
            let mut edit = c.bulk_edit();
            for axis in Axis::ALL {
                let o = &t.axes[axis];
                edit.set_binding(axis, o.binding.clone().unwrap());
                edit.set_mode(axis, o.mode.unwrap());
                edit.set_curve(axis, o.curve.unwrap());
            }
            // slightly off but within tolerance
            edit.set_smoothing(Axis::Y, 0.31);
            assert_eq!(edit.template_id(), None, "detection waits for the scope to end");
        }
        assert_eq!(c.template_id(), Some("perform"));
    }

    #[test]
    fn nested_bulk_edits_flush_once_at_the_outermost_scope() {
        let mut c = controller();
        let seen = record(&mut c);
        {
            let mut outer = c.bulk_edit();
            outer.set_invert(Axis::X, true);
            {
                let mut inner = outer.bulk_edit();
                inner.set_invert(Axis::Y, true);
            }
            assert!(seen.borrow().is_empty());
            outer.set_gesture_mode(GestureMode::Pressure);
        }
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].mapping.gesture_mode, GestureMode::Pressure);
    }

    #[test]
    fn restore_replaces_mapping_and_redetects() {
        let mut c = controller();
        let mut recalled = c.mapping().clone();
        recalled.axes.x.settings.smoothing = 0.25;
        recalled.template_id = Some("stale".to_string());

        let seen = record(&mut c);
        c.restore(recalled);
        assert!((c.mapping().axes.x.settings.smoothing - 0.25).abs() < 1e-6);
        assert_eq!(c.template_id(), None);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn smoothing_edits_are_clamped() {
        let mut c = controller();
        c.set_smoothing(Axis::X, 7.0);
        assert_eq!(c.mapping().axes.x.settings.smoothing, 1.0);
        c.set_smoothing(Axis::X, -2.0);
        assert_eq!(c.mapping().axes.x.settings.smoothing, 0.0);
    }

    #[test]
    fn contact_frames_never_notify_or_redetect() {
        let mut c = controller();
        c.apply_template("perform");
        let seen = record(&mut c);
        let mut s = store();
        let t0 = Instant::now();

        c.handle(
            &mut s,
            ContactEvent::Start { id: ContactId(1), x: 0.2, y: 0.2, pressure: None },
            t0,
        );
        c.handle(
            &mut s,
            ContactEvent::Move { id: ContactId(1), x: 0.9, y: 0.1, pressure: None },
            t0 + Duration::from_millis(16),
        );
        c.handle(&mut s, ContactEvent::End { id: ContactId(1) }, t0 + Duration::from_millis(32));

        assert!(seen.borrow().is_empty());
        assert_eq!(c.template_id(), Some("perform"));
    }

    #[test]
    fn relative_sessions_capture_fresh_baselines() {
        let mut c = controller();
        c.set_binding(Axis::X, Binding::param("zoom"));
        c.set_mode(Axis::X, AxisMode::Relative);
        let mut s = store();
        let t0 = Instant::now();

        let frame = c
            .handle(
                &mut s,
                ContactEvent::Start { id: ContactId(1), x: 0.5, y: 0.5, pressure: None },
                t0,
            )
            .unwrap();
        assert_eq!(c.pad().axis_state(Axis::X).baseline, Some(4.0));
        assert!((frame.x.parameter_value.unwrap() - 4.0).abs() < 1e-6);

        let frame = c
            .handle(
                &mut s,
                ContactEvent::Move { id: ContactId(1), x: 1.0, y: 0.5, pressure: None },
                t0 + Duration::from_millis(16),
            )
            .unwrap();
        // 4 + 0.5 * 10 * 0.4
        assert!((frame.x.parameter_value.unwrap() - 6.0).abs() < 1e-5);

        let lifted = c.handle(&mut s, ContactEvent::End { id: ContactId(1) }, t0);
        assert!(lifted.is_none());
        assert_eq!(c.pad().axis_state(Axis::X).baseline, None);

        let frame = c
            .handle(
                &mut s,
                ContactEvent::Start { id: ContactId(2), x: 0.5, y: 0.5, pressure: None },
                t0 + Duration::from_secs(1),
            )
            .unwrap();
        let baseline = c.pad().axis_state(Axis::X).baseline.unwrap();
        assert!((baseline - 6.0).abs() < 1e-5, "new session captures the new value");
        assert!((frame.x.parameter_value.unwrap() - baseline).abs() < 1e-5);
    }

    #[test]
    fn switching_mode_mid_session_drops_baseline() {
        let mut c = controller();
        c.set_binding(Axis::X, Binding::param("zoom"));
        c.set_mode(Axis::X, AxisMode::Relative);
        let mut s = store();
        let t0 = Instant::now();
        c.handle(
            &mut s,
            ContactEvent::Start { id: ContactId(1), x: 0.5, y: 0.5, pressure: None },
            t0,
        );
        assert!(c.pad().axis_state(Axis::X).baseline.is_some());

        c.set_mode(Axis::X, AxisMode::Absolute);
        assert_eq!(c.pad().axis_state(Axis::X).baseline, None);
    }

    #[test]
    fn frames_write_all_bound_axes_in_order() {
        let mut c = controller();
        c.apply_template("perform");
        let mut s = store();
        let t0 = Instant::now();

        c.handle(
            &mut s,
            ContactEvent::Start { id: ContactId(1), x: 0.2, y: 0.5, pressure: None },
            t0,
        );
        let frame = c
            .handle(
                &mut s,
                ContactEvent::Start { id: ContactId(2), x: 0.8, y: 0.5, pressure: None },
                t0 + Duration::from_millis(10),
            )
            .unwrap();

        let order: Vec<String> = s.writes().iter().skip(3).map(|w| w.id.clone()).collect();
        assert_eq!(order, vec!["zoom", "hue", "warp"]);

        // warp: bipolar over [-1, 1] driven by spread ~0.417
        let expected = -1.0 + 2.0 * ((0.3 - 0.05) / 0.6);
        assert!((frame.gesture.parameter_value.unwrap() - expected).abs() < 1e-3);
        assert!(s.writes().iter().all(|w| w.origin == "touchpad"));
    }

    #[test]
    fn velocity_holds_across_same_instant_frames() {
        let mut c = controller();
        c.set_binding(Axis::Gesture, Binding::param("hue"));
        c.set_gesture_mode(GestureMode::Velocity);
        let mut s = store();
        let t0 = Instant::now();
        let start = |id, x| ContactEvent::Start { id: ContactId(id), x, y: 0.5, pressure: None };
        let slide = |id, x| ContactEvent::Move { id: ContactId(id), x, y: 0.5, pressure: None };

        c.handle(&mut s, start(1, 0.2), t0);
        c.handle(&mut s, start(2, 0.4), t0);

        let batch = t0 + Duration::from_millis(100);
        c.handle(&mut s, slide(1, 0.3), batch);
        let after_first = s.value("hue").unwrap();
        c.handle(&mut s, slide(2, 0.5), batch);
        let after_second = s.value("hue").unwrap();

        assert!(after_first > 0.0);
        assert_eq!(after_second, after_first);
    }

    #[test]
    fn unbound_axes_still_report() {
        let mut c = controller();
        let mut s = store();
        let frame = c
            .on_contact_start(&mut s, ContactId(1), 0.25, 0.75, Some(0.9))
            .unwrap();
        assert!((frame.x.display_value() - 0.25).abs() < 1e-6);
        assert!((frame.y.display_value() - 0.75).abs() < 1e-6);
        // one contact under spread reports its pressure
        assert!((frame.gesture.display_value() - 0.9).abs() < 1e-6);
        assert!(s.writes().is_empty());
        assert_eq!(c.pad().readout(Axis::Y).map(|r| r.normalized_input), Some(0.75));
    }

    #[test]
    fn snapshot_serializes_flat() {
        let mut c = controller();
        c.apply_template("perform");
        let value = serde_json::to_value(c.snapshot()).unwrap();
        assert_eq!(value["padId"], 1);
        assert_eq!(value["templateId"], "perform");
        assert_eq!(value["axisBindings"]["x"], "zoom");
        assert_eq!(value["axisModes"]["gesture"], "bipolar");
    }
}
