//! A set of independent pads sharing one template library and engine config.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use touchmap_core::{EngineConfig, ParameterStore};
use touchmap_templates::TemplateLibrary;

use crate::controller::{ContactEvent, PadController};
use crate::pad::{FrameReadout, PadId, PadSeed};

#[derive(Debug)]
pub struct PadSurface {
    config: EngineConfig,
    templates: Arc<TemplateLibrary>,
    pads: BTreeMap<PadId, PadController>,
    next_id: u32,
}

impl PadSurface {
    /// Template smoothing is limited to the configured slider range up front.
    pub fn new(config: EngineConfig, mut templates: TemplateLibrary) -> Self {
        templates.limit_smoothing(config.tuning.smoothing_max);
        Self {
            config,
            templates: Arc::new(templates),
            pads: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }

    /// Create a pad with the next free id.
    pub fn add_pad(&mut self, seed: PadSeed) -> PadId {
        while self.pads.contains_key(&PadId(self.next_id)) {
            self.next_id += 1;
        }
        let id = PadId(self.next_id);
        self.next_id += 1;
        self.insert_pad(id, seed);
        id
    }

    /// Create (or replace) a pad under a caller-chosen id.
    pub fn insert_pad(&mut self, id: PadId, seed: PadSeed) -> &mut PadController {
        let controller = PadController::new(id, seed, &self.config, Arc::clone(&self.templates));
        tracing::debug!(pad = id.0, template = ?controller.template_id(), "pad created");
        match self.pads.entry(id) {
            Entry::Occupied(mut slot) => {
                slot.insert(controller);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(controller),
        }
    }

    pub fn remove_pad(&mut self, id: PadId) -> bool {
        self.pads.remove(&id).is_some()
    }

    pub fn pad(&self, id: PadId) -> Option<&PadController> {
        self.pads.get(&id)
    }

    pub fn pad_mut(&mut self, id: PadId) -> Option<&mut PadController> {
        self.pads.get_mut(&id)
    }

    pub fn pads(&self) -> impl Iterator<Item = &PadController> {
        self.pads.values()
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    /// Route a contact event to its pad. Events for unknown pads are dropped.
    pub fn handle<S>(
        &mut self,
        store: &mut S,
        pad: PadId,
        event: ContactEvent,
        now: Instant,
    ) -> Option<FrameReadout>
    where
        S: ParameterStore + ?Sized,
    {
        match self.pads.get_mut(&pad) {
            Some(controller) => controller.handle(store, event, now),
            None => {
                tracing::trace!(pad = pad.0, "event for unknown pad dropped");
                None
            }
        }
    }
}
