//! Per-axis processing: invert -> curve -> smoothing -> mode resolution -> clamp and commit.

use touchmap_core::{
    AxisMapping, AxisMode, AxisSettings, ParamDef, ParameterStore, Tuning, TOUCHPAD_ORIGIN,
};

use crate::contacts::unit;
use crate::curves;

/// Filter and baseline memory for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisState {
    /// Parameter value captured at session start. Only set in relative mode while touched.
    pub baseline: Option<f32>,
    /// Last smoothed value, the low-pass filter memory.
    pub smoothed: Option<f32>,
}

impl AxisState {
    /// Forget filter memory so the next sample passes through without lag.
    pub fn reset_filter(&mut self) {
        self.smoothed = None;
    }

    pub fn clear_baseline(&mut self) {
        self.baseline = None;
    }
}

/// Result of processing one axis for one frame. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisResolution {
    /// Raw sample after clamping (before inversion).
    pub normalized_input: f32,
    /// After inversion and curve.
    pub shaped: f32,
    /// After the low-pass filter; this is what mode resolution sees.
    pub smoothed: f32,
    /// Committed parameter value, or `None` when the axis is unbound or the parameter is unknown.
    pub parameter_value: Option<f32>,
}

impl AxisResolution {
    /// Value for readouts: the parameter value when bound, the normalized value otherwise.
    pub fn display_value(&self) -> f32 {
        self.parameter_value.unwrap_or(self.smoothed)
    }
}

/// Map the raw smoothing control onto the filter factor in `[0, smoothing_cap]`.
pub fn normalized_smoothing(raw: f32, tuning: &Tuning) -> f32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    (raw / tuning.smoothing_max).clamp(0.0, tuning.smoothing_cap)
}

/// One step of the exponential low-pass filter. The first sample seeds the filter.
pub fn smooth(previous: Option<f32>, shaped: f32, factor: f32) -> f32 {
    match previous {
        Some(prev) if factor > 0.0 => prev + (shaped - prev) * (1.0 - factor),
        _ => shaped,
    }
}

/// Map a smoothed [0, 1] value onto the parameter range. Endpoints (and the bipolar center)
/// land exactly on the declared values.
pub fn resolve_mode(
    mode: AxisMode,
    smoothed: f32,
    def: &ParamDef,
    baseline: f32,
    strength: f32,
) -> f32 {
    let (min, max) = (def.min, def.max);
    match mode {
        AxisMode::Absolute => {
            if smoothed <= 0.0 {
                min
            } else if smoothed >= 1.0 {
                max
            } else {
                min + (max - min) * smoothed
            }
        }
        AxisMode::Bipolar => {
            let center = (min + max) * 0.5;
            let amplitude = (max - min) * 0.5;
            if smoothed <= 0.0 {
                min
            } else if smoothed >= 1.0 {
                max
            } else if smoothed == 0.5 {
                center
            } else {
                center + (smoothed - 0.5) * 2.0 * amplitude
            }
        }
        AxisMode::Relative => baseline + (smoothed - 0.5) * (max - min) * strength,
    }
}

/// Stateless pipeline driver; state lives in [`AxisState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisProcessor {
    tuning: Tuning,
}

impl AxisProcessor {
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Steps 1-2: inversion then curve. Returns `(normalized_input, shaped)`.
    pub fn shape(&self, settings: &AxisSettings, raw: f32) -> (f32, f32) {
        let input = unit(raw);
        let v = if settings.invert { 1.0 - input } else { input };
        (input, curves::apply(settings.curve, v))
    }

    /// Capture the relative-mode baseline at the start of a contact session.
    pub fn capture_baseline<S>(&self, mapping: &AxisMapping, state: &mut AxisState, store: &S)
    where
        S: ParameterStore + ?Sized,
    {
        if mapping.mode != AxisMode::Relative {
            return;
        }
        if let Some(id) = mapping.binding.param_id() {
            if store.definition(id).is_some() {
                state.baseline = Some(store.get(id));
            }
        }
    }

    /// Run the full pipeline for one axis and commit the result to `store`.
    ///
    /// `touched` says whether a contact session is active; a relative axis without a baseline
    /// captures one from the live value only while touched.
    pub fn process<S>(
        &self,
        mapping: &AxisMapping,
        state: &mut AxisState,
        touched: bool,
        store: &mut S,
        raw: f32,
    ) -> AxisResolution
    where
        S: ParameterStore + ?Sized,
    {
        let (normalized_input, shaped) = self.shape(&mapping.settings, raw);

        let factor = normalized_smoothing(mapping.settings.smoothing, &self.tuning);
        let smoothed = smooth(state.smoothed, shaped, factor);
        state.smoothed = Some(smoothed);

        if mapping.mode != AxisMode::Relative {
            state.clear_baseline();
        }

        let mut resolution = AxisResolution {
            normalized_input,
            shaped,
            smoothed,
            parameter_value: None,
        };

        let Some(id) = mapping.binding.param_id() else {
            return resolution;
        };
        let Some(def) = store.definition(id) else {
            tracing::trace!(param = id, "bound parameter has no definition, skipping write");
            return resolution;
        };

        let baseline = match (mapping.mode, state.baseline) {
            (AxisMode::Relative, Some(b)) => b,
            (AxisMode::Relative, None) => {
                let live = store.get(id);
                if touched {
                    state.baseline = Some(live);
                }
                live
            }
            _ => 0.0,
        };

        let value = resolve_mode(
            mapping.mode,
            smoothed,
            &def,
            baseline,
            self.tuning.relative_strength,
        );
        let committed = store.clamp_to_definition(id, value);
        store.set(id, committed, TOUCHPAD_ORIGIN);

        resolution.parameter_value = Some(committed);
        resolution
    }
}
