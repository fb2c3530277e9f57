//! Contract with the external parameter store, plus an in-memory store for headless hosts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Origin tag attached to every write made by a pad.
pub const TOUCHPAD_ORIGIN: &str = "touchpad";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    #[default]
    Float,
    /// Values are rounded to whole numbers when committed.
    Int,
}

/// Declared range and type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub min: f32,
    pub max: f32,
    #[serde(default, rename = "type")]
    pub kind: ParamKind,
}

impl ParamDef {
    pub fn float(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            kind: ParamKind::Float,
        }
    }

    pub fn int(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            kind: ParamKind::Int,
        }
    }

    /// Lower and upper bound, tolerant of a reversed declaration.
    pub fn bounds(&self) -> (f32, f32) {
        (self.min.min(self.max), self.min.max(self.max))
    }

    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    /// Clamp (and round, for integer parameters) into the declared range.
    /// Non-finite input lands on the lower bound.
    pub fn clamp(&self, value: f32) -> f32 {
        let (lo, hi) = self.bounds();
        let v = if value.is_finite() {
            value.clamp(lo, hi)
        } else {
            lo
        };
        match self.kind {
            ParamKind::Float => v,
            ParamKind::Int => v.round().clamp(lo, hi),
        }
    }
}

/// The read/write surface pads use. Storage and change broadcast belong to the implementor.
pub trait ParameterStore {
    fn definition(&self, id: &str) -> Option<ParamDef>;

    fn get(&self, id: &str) -> f32;

    fn set(&mut self, id: &str, value: f32, origin: &str);

    fn clamp_to_definition(&self, id: &str, value: f32) -> f32 {
        match self.definition(id) {
            Some(def) => def.clamp(value),
            None => value,
        }
    }
}

/// One recorded write.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamWrite {
    pub id: String,
    pub value: f32,
    pub origin: String,
}

/// `HashMap`-backed store that journals every write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    defs: HashMap<String, ParamDef>,
    values: HashMap<String, f32>,
    journal: Vec<ParamWrite>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter with an initial value (clamped into range).
    pub fn define(&mut self, id: impl Into<String>, def: ParamDef, initial: f32) -> &mut Self {
        let id = id.into();
        self.values.insert(id.clone(), def.clamp(initial));
        self.defs.insert(id, def);
        self
    }

    pub fn value(&self, id: &str) -> Option<f32> {
        self.values.get(id).copied()
    }

    pub fn writes(&self) -> &[ParamWrite] {
        &self.journal
    }

    pub fn take_writes(&mut self) -> Vec<ParamWrite> {
        std::mem::take(&mut self.journal)
    }
}

impl ParameterStore for MemoryStore {
    fn definition(&self, id: &str) -> Option<ParamDef> {
        self.defs.get(id).copied()
    }

    fn get(&self, id: &str) -> f32 {
        self.values.get(id).copied().unwrap_or(0.0)
    }

    fn set(&mut self, id: &str, value: f32, origin: &str) {
        self.values.insert(id.to_string(), value);
        self.journal.push(ParamWrite {
            id: id.to_string(),
            value,
            origin: origin.to_string(),
        });
    }
}
