#![forbid(unsafe_code)]

//! Named, reusable pad configurations.
//!
//! A template pins any subset of a pad's per-axis binding, mode, curve, invert flag and smoothing,
//! plus optionally the gesture mode. Fields a template leaves out are wildcards: they are neither
//! checked by [`Template::matches`] nor written when the template is applied.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

use std::collections::HashSet;
use std::path::Path;

use touchmap_core::{Axis, AxisMap, AxisMode, Binding, Curve, GestureMode, MapError};

mod json;
pub mod matcher;

pub use matcher::detect;

// -------------------------------------------------------------------------------------------------
// Template data
// -------------------------------------------------------------------------------------------------

/// What a template pins for one axis. `None` = wildcard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisOverride {
    pub binding: Option<Binding>,
    pub mode: Option<AxisMode>,
    pub curve: Option<Curve>,
    pub invert: Option<bool>,
    pub smoothing: Option<f32>,
}

impl AxisOverride {
    /// Pin mode and shaping, leave the binding open.
    pub fn shaped(mode: AxisMode, curve: Curve, smoothing: f32) -> Self {
        Self {
            binding: None,
            mode: Some(mode),
            curve: Some(curve),
            invert: Some(false),
            smoothing: Some(smoothing),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        *self == AxisOverride::default()
    }
}

/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub axes: AxisMap<AxisOverride>,
    pub gesture_mode: Option<GestureMode>,
}

// -------------------------------------------------------------------------------------------------
// Library
// -------------------------------------------------------------------------------------------------

/// An ordered collection of templates with unique ids. Detection returns the first match in
/// library order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    /// Build a library, keeping the first template for each id.
    pub fn new(templates: Vec<Template>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(templates.len());
        for t in templates {
            if seen.insert(t.id.clone()) {
                kept.push(t);
            } else {
                tracing::warn!(id = %t.id, "duplicate template id, keeping the first");
            }
        }
        Self { templates: kept }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Clamp every pinned smoothing value into `[0, max]`, so applying a template never stores
    /// a value the pad would have to clamp again.
    pub fn limit_smoothing(&mut self, max: f32) {
        for t in &mut self.templates {
            for axis in Axis::ALL {
                let Some(raw) = t.axes[axis].smoothing else {
                    continue;
                };
                let limited = raw.clamp(0.0, max);
                if limited != raw {
                    tracing::warn!(
                        id = %t.id,
                        axis = axis.name(),
                        smoothing = raw,
                        limited,
                        "template smoothing out of range, clamping"
                    );
                    t.axes[axis].smoothing = Some(limited);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Built-in behaviour templates (safe fallback when no JSON is provided).
    ///
    /// These pin modes and shaping only; bindings stay wildcards so they match any parameter
    /// assignment.
    pub fn builtin() -> Self {
        use AxisMode::*;
        use Curve::*;

        let direct = Template {
            id: "direct-xy".to_string(),
            name: "Direct XY".to_string(),
            description: "Position maps straight onto both parameters.".to_string(),
            axes: AxisMap::new(
                AxisOverride::shaped(Absolute, Linear, 0.0),
                AxisOverride::shaped(Absolute, Linear, 0.0),
                AxisOverride::default(),
            ),
            gesture_mode: None,
        };

        let centered = Template {
            id: "centered-xy".to_string(),
            name: "Centered XY".to_string(),
            description: "Pad center is the parameter midpoint on both axes.".to_string(),
            axes: AxisMap::new(
                AxisOverride::shaped(Bipolar, Linear, 0.0),
                AxisOverride::shaped(Bipolar, Linear, 0.0),
                AxisOverride::default(),
            ),
            gesture_mode: None,
        };

        let glide = Template {
            id: "glide".to_string(),
            name: "Glide".to_string(),
            description: "Eased, heavily smoothed sweeps with pinch on the gesture axis."
                .to_string(),
            axes: AxisMap::new(
                AxisOverride::shaped(Absolute, EaseInOut, 0.6),
                AxisOverride::shaped(Absolute, EaseInOut, 0.6),
                AxisOverride::shaped(Absolute, EaseOut, 0.6),
            ),
            gesture_mode: Some(GestureMode::Spread),
        };

        let nudge = Template {
            id: "nudge".to_string(),
            name: "Nudge".to_string(),
            description: "Touches offset the current values instead of jumping to them."
                .to_string(),
            axes: AxisMap::new(
                AxisOverride::shaped(Relative, Linear, 0.2),
                AxisOverride::shaped(Relative, Linear, 0.2),
                AxisOverride::shaped(Relative, Linear, 0.3),
            ),
            gesture_mode: Some(GestureMode::Velocity),
        };

        let swell = Template {
            id: "pressure-swell".to_string(),
            name: "Pressure Swell".to_string(),
            description: "Finger pressure swells the gesture parameter.".to_string(),
            axes: AxisMap::new(
                AxisOverride::default(),
                AxisOverride::default(),
                AxisOverride::shaped(Absolute, EaseIn, 0.4),
            ),
            gesture_mode: Some(GestureMode::Pressure),
        };

        Self::new(vec![direct, centered, glide, nudge, swell])
    }

    /// Parse a template file body.
    ///
    /// The root may be `{"templates": [...]}` or a bare array. Entries missing an id or a
    /// `bindings` object are skipped; a document with no usable entries is an error.
    pub fn from_json_str(text: &str) -> Result<Self, MapError> {
        let entries = json::parse_root(text)?;
        if entries.is_empty() {
            return Err(MapError::other("json has no templates"));
        }

        let templates: Vec<Template> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| json::parse_entry(index, value))
            .collect();

        if templates.is_empty() {
            return Err(MapError::other("json templates had no valid entries"));
        }

        let lib = Self::new(templates);
        tracing::debug!(count = lib.len(), "templates loaded");
        Ok(lib)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|e| e.at_path(path))
    }
}
