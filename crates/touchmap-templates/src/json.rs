//! On-disk template format and its conversion into [`Template`].

use serde::Deserialize;
use serde_json::Value;

use touchmap_core::{AxisMap, AxisMode, Binding, Curve, GestureMode, MapError};

use crate::{AxisOverride, Template};

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRoot {
    Wrapped { templates: Vec<Value> },
    Bare(Vec<Value>),
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct JsonSettings {
    curve: AxisMap<Option<Curve>>,
    invert: AxisMap<Option<bool>>,
    smoothing: AxisMap<Option<f32>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonTemplate {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    /// Required. `"none"` pins an axis to unbound; `null` or an absent key is a wildcard.
    #[serde(default)]
    bindings: Option<AxisMap<Option<Binding>>>,
    #[serde(default)]
    modes: AxisMap<Option<AxisMode>>,
    #[serde(default)]
    settings: JsonSettings,
    #[serde(default)]
    gesture_mode: Option<GestureMode>,
}

pub(crate) fn parse_root(text: &str) -> Result<Vec<Value>, MapError> {
    let root: JsonRoot = serde_json::from_str(text)?;
    Ok(match root {
        JsonRoot::Wrapped { templates } => templates,
        JsonRoot::Bare(entries) => entries,
    })
}

/// Convert one entry, or log why it was skipped.
pub(crate) fn parse_entry(index: usize, value: Value) -> Option<Template> {
    let raw: JsonTemplate = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(index, error = %e, "skipping malformed template entry");
            return None;
        }
    };

    let Some(id) = raw.id.filter(|id| !id.trim().is_empty()) else {
        tracing::warn!(index, "skipping template entry without an id");
        return None;
    };
    let Some(bindings) = raw.bindings else {
        tracing::warn!(index, id = %id, "skipping template entry without bindings");
        return None;
    };

    let axes = AxisMap::from_fn(|a| AxisOverride {
        binding: bindings[a].clone(),
        mode: raw.modes[a],
        curve: raw.settings.curve[a],
        invert: raw.settings.invert[a],
        smoothing: raw.settings.smoothing[a]
            .filter(|s| s.is_finite())
            .map(|s| s.max(0.0)),
    });

    Some(Template {
        name: raw.name.unwrap_or_else(|| id.clone()),
        id,
        description: raw.description,
        axes,
        gesture_mode: raw.gesture_mode,
    })
}
