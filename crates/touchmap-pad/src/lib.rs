#![forbid(unsafe_code)]

//! Multi-touch gesture-to-parameter mapping.
//!
//! A [`PadController`] turns contact events into three shaped axis values (x, y and a derived
//! gesture) and commits them to a [`touchmap_core::ParameterStore`]. Edits to the pad's mapping
//! go through the controller too, which keeps template detection and change notification off
//! the per-frame path.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod axis;
pub mod contacts;
pub mod controller;
pub mod curves;
pub mod gesture;
pub mod pad;
pub mod surface;

pub use axis::{AxisProcessor, AxisResolution, AxisState};
pub use contacts::{Contact, ContactId, ContactTracker, Point};
pub use controller::{BulkEdit, ContactEvent, MappingListener, PadController};
pub use gesture::GestureInterpreter;
pub use pad::{FrameReadout, MappingSnapshot, Pad, PadId, PadSeed};
pub use surface::PadSurface;
