#![forbid(unsafe_code)]

//! Shared vocabulary for touchmap crates: errors, configuration, the parameter-store contract
//! and the per-pad mapping bundle.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod mapping;
pub mod params;

pub use config::{load_engine_config_from, load_typed_json, EngineConfig, Tuning};
pub use error::MapError;
pub use mapping::{
    Axis, AxisMap, AxisMapping, AxisMode, AxisSettings, Binding, Curve, GestureMode, PadMapping,
};
pub use params::{MemoryStore, ParamDef, ParamKind, ParamWrite, ParameterStore, TOUCHPAD_ORIGIN};
