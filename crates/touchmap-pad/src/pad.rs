//! One independent touch surface: mapping, per-axis state, contacts and gesture memory bundled
//! in a single value.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use touchmap_core::{
    Axis, AxisMap, AxisMode, Binding, Curve, GestureMode, PadMapping, ParameterStore, Tuning,
};

use crate::axis::{AxisProcessor, AxisResolution, AxisState};
use crate::contacts::{ContactId, ContactTracker, Point};
use crate::gesture::GestureInterpreter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PadId(pub u32);

/// Initial configuration for a new pad.
#[derive(Debug, Clone, Default)]
pub enum PadSeed {
    /// Use the engine's configured default mapping.
    #[default]
    Default,
    Explicit(PadMapping),
}

/// Resolutions for all three axes of one contact frame.
pub type FrameReadout = AxisMap<AxisResolution>;

/// Mapping-change notification payload, in the shape the preset layer persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSnapshot {
    pub pad_id: PadId,
    #[serde(flatten)]
    pub mapping: PadMapping,
}

/// Raw smoothing into `[0, max]`; non-finite input lands on 0.
fn clamp_smoothing(raw: f32, max: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, max)
    } else {
        0.0
    }
}

/// Pad state. Setters keep the per-axis runtime state consistent with the mapping: filter
/// memory is dropped when binding, curve, invert or smoothing change, and baselines are dropped
/// when binding or mode change.
#[derive(Debug, Clone)]
pub struct Pad {
    id: PadId,
    mapping: PadMapping,
    axes: AxisMap<AxisState>,
    contacts: ContactTracker,
    gesture: GestureInterpreter,
    centroid: Option<Point>,
    readout: AxisMap<Option<AxisResolution>>,
    processor: AxisProcessor,
}

impl Pad {
    /// Seeded smoothing values are clamped the same way [`Pad::set_smoothing`] clamps edits.
    pub fn new(id: PadId, mut mapping: PadMapping, tuning: Tuning) -> Self {
        for axis in Axis::ALL {
            let settings = &mut mapping.axes[axis].settings;
            settings.smoothing = clamp_smoothing(settings.smoothing, tuning.smoothing_max);
        }
        Self {
            id,
            mapping,
            axes: AxisMap::default(),
            contacts: ContactTracker::new(),
            gesture: GestureInterpreter::new(),
            centroid: None,
            readout: AxisMap::default(),
            processor: AxisProcessor::new(tuning),
        }
    }

    pub fn id(&self) -> PadId {
        self.id
    }

    pub fn mapping(&self) -> &PadMapping {
        &self.mapping
    }

    pub fn tuning(&self) -> &Tuning {
        self.processor.tuning()
    }

    pub fn axis_state(&self, axis: Axis) -> &AxisState {
        &self.axes[axis]
    }

    pub fn contacts(&self) -> &ContactTracker {
        &self.contacts
    }

    pub fn gesture(&self) -> &GestureInterpreter {
        &self.gesture
    }

    pub fn centroid(&self) -> Option<Point> {
        self.centroid
    }

    /// Last resolution per axis, for readouts.
    pub fn readout(&self, axis: Axis) -> Option<&AxisResolution> {
        self.readout[axis].as_ref()
    }

    pub fn snapshot(&self) -> MappingSnapshot {
        MappingSnapshot {
            pad_id: self.id,
            mapping: self.mapping.clone(),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Field edits (return whether anything changed)
    // ---------------------------------------------------------------------------------------------

    pub fn set_binding(&mut self, axis: Axis, binding: Binding) -> bool {
        if self.mapping.axes[axis].binding == binding {
            return false;
        }
        self.mapping.axes[axis].binding = binding;
        self.axes[axis].reset_filter();
        self.axes[axis].clear_baseline();
        true
    }

    pub fn set_mode(&mut self, axis: Axis, mode: AxisMode) -> bool {
        if self.mapping.axes[axis].mode == mode {
            return false;
        }
        self.mapping.axes[axis].mode = mode;
        self.axes[axis].clear_baseline();
        true
    }

    pub fn set_curve(&mut self, axis: Axis, curve: Curve) -> bool {
        if self.mapping.axes[axis].settings.curve == curve {
            return false;
        }
        self.mapping.axes[axis].settings.curve = curve;
        self.axes[axis].reset_filter();
        true
    }

    pub fn set_invert(&mut self, axis: Axis, invert: bool) -> bool {
        if self.mapping.axes[axis].settings.invert == invert {
            return false;
        }
        self.mapping.axes[axis].settings.invert = invert;
        self.axes[axis].reset_filter();
        true
    }

    /// Out-of-range values are clamped to `[0, smoothing_max]`.
    pub fn set_smoothing(&mut self, axis: Axis, smoothing: f32) -> bool {
        let smoothing = clamp_smoothing(smoothing, self.tuning().smoothing_max);
        if self.mapping.axes[axis].settings.smoothing == smoothing {
            return false;
        }
        self.mapping.axes[axis].settings.smoothing = smoothing;
        self.axes[axis].reset_filter();
        true
    }

    pub fn set_gesture_mode(&mut self, mode: GestureMode) -> bool {
        if self.mapping.gesture_mode == mode {
            return false;
        }
        self.mapping.gesture_mode = mode;
        true
    }

    pub fn set_template_id(&mut self, id: Option<String>) -> bool {
        if self.mapping.template_id == id {
            return false;
        }
        self.mapping.template_id = id;
        true
    }

    // ---------------------------------------------------------------------------------------------
    // Contact frames
    // ---------------------------------------------------------------------------------------------

    pub fn contact_start<S>(
        &mut self,
        store: &mut S,
        id: ContactId,
        x: f32,
        y: f32,
        pressure: Option<f32>,
        now: Instant,
    ) -> Option<FrameReadout>
    where
        S: ParameterStore + ?Sized,
    {
        if self.contacts.add(id, x, y, pressure) {
            tracing::debug!(pad = self.id.0, "contact session start");
            for axis in Axis::ALL {
                self.processor
                    .capture_baseline(&self.mapping.axes[axis], &mut self.axes[axis], &*store);
            }
        }
        Some(self.run_frame(store, now))
    }

    /// Moves for contacts that never started are ignored.
    pub fn contact_move<S>(
        &mut self,
        store: &mut S,
        id: ContactId,
        x: f32,
        y: f32,
        pressure: Option<f32>,
        now: Instant,
    ) -> Option<FrameReadout>
    where
        S: ParameterStore + ?Sized,
    {
        if !self.contacts.update(id, x, y, pressure) {
            return None;
        }
        Some(self.run_frame(store, now))
    }

    /// Lifting the last contact ends the session and produces no frame.
    pub fn contact_end<S>(
        &mut self,
        store: &mut S,
        id: ContactId,
        now: Instant,
    ) -> Option<FrameReadout>
    where
        S: ParameterStore + ?Sized,
    {
        if !self.contacts.remove(id) {
            return None;
        }
        if self.contacts.is_empty() {
            self.end_session();
            return None;
        }
        Some(self.run_frame(store, now))
    }

    /// Drop all contacts (e.g. the surface lost pointer capture).
    pub fn cancel_contacts(&mut self) {
        if !self.contacts.is_empty() {
            self.contacts.clear();
            self.end_session();
        }
    }

    fn end_session(&mut self) {
        tracing::debug!(pad = self.id.0, "contact session end");
        for axis in Axis::ALL {
            self.axes[axis].clear_baseline();
        }
        self.gesture.reset();
        self.centroid = None;
    }

    fn run_frame<S>(&mut self, store: &mut S, now: Instant) -> FrameReadout
    where
        S: ParameterStore + ?Sized,
    {
        let centroid = self.contacts.centroid().unwrap_or_default();
        self.centroid = Some(centroid);

        let gesture = self.gesture.compute(
            self.mapping.gesture_mode,
            self.contacts.contacts(),
            Some(centroid),
            now,
            self.processor.tuning(),
        );

        tracing::trace!(pad = self.id.0, x = centroid.x, y = centroid.y, gesture, "frame");

        // fixed order: x, y, gesture
        let x = self.process_axis(store, Axis::X, centroid.x);
        let y = self.process_axis(store, Axis::Y, centroid.y);
        let gesture = self.process_axis(store, Axis::Gesture, gesture);
        AxisMap::new(x, y, gesture)
    }

    fn process_axis<S>(&mut self, store: &mut S, axis: Axis, raw: f32) -> AxisResolution
    where
        S: ParameterStore + ?Sized,
    {
        let resolution = self.processor.process(
            &self.mapping.axes[axis],
            &mut self.axes[axis],
            true,
            store,
            raw,
        );
        self.readout[axis] = Some(resolution);
        resolution
    }
}
