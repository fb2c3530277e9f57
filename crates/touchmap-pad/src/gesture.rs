//! Derives the scalar gesture axis from the contact set.

use std::time::Instant;

use touchmap_core::{GestureMode, Tuning};

use crate::contacts::{unit, Contact, Point};

/// Motion memory for the velocity strategy.
///
/// Every call to [`GestureInterpreter::compute`] with a later timestamp refreshes the memory,
/// whichever strategy is selected, so switching to velocity mid-session measures from the latest
/// frame. Frames sharing a timestamp (one batch of input) report the last velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureInterpreter {
    previous_centroid: Option<Point>,
    previous_at: Option<Instant>,
    last_velocity: f32,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_centroid(&self) -> Option<Point> {
        self.previous_centroid
    }

    pub fn previous_at(&self) -> Option<Instant> {
        self.previous_at
    }

    /// Forget motion history (called when a contact session ends).
    pub fn reset(&mut self) {
        self.previous_centroid = None;
        self.previous_at = None;
        self.last_velocity = 0.0;
    }

    /// Gesture value in [0, 1].
    pub fn compute(
        &mut self,
        mode: GestureMode,
        contacts: &[Contact],
        centroid: Option<Point>,
        now: Instant,
        tuning: &Tuning,
    ) -> f32 {
        let value = match mode {
            GestureMode::Pressure => mean_pressure(contacts, tuning.default_pressure),
            GestureMode::Velocity => self.velocity(centroid, now, tuning.velocity_scale),
            GestureMode::Spread => spread(contacts, centroid, tuning),
        };

        if self.previous_at.map_or(true, |at| now > at) {
            self.previous_centroid = centroid;
            self.previous_at = Some(now);
        }

        unit(value)
    }

    fn velocity(&mut self, centroid: Option<Point>, now: Instant, scale: f32) -> f32 {
        let (Some(current), Some(previous), Some(at)) =
            (centroid, self.previous_centroid, self.previous_at)
        else {
            self.last_velocity = 0.0;
            return 0.0;
        };
        let dt = now.saturating_duration_since(at).as_secs_f32();
        if dt <= 0.0 {
            return self.last_velocity;
        }
        self.last_velocity = unit(current.distance(previous) / dt * scale);
        self.last_velocity
    }
}

fn pressure_of(contact: &Contact, default_pressure: f32) -> f32 {
    contact.pressure.unwrap_or(default_pressure)
}

/// Mean contact pressure; 0 with no contacts.
pub fn mean_pressure(contacts: &[Contact], default_pressure: f32) -> f32 {
    if contacts.is_empty() {
        return 0.0;
    }
    let total: f32 = contacts
        .iter()
        .map(|c| pressure_of(c, default_pressure))
        .sum();
    unit(total / contacts.len() as f32)
}

/// Mean distance from the centroid, remapped from the spread window onto [0, 1].
/// A lone contact has no spread, so it reports its pressure instead.
pub fn spread(contacts: &[Contact], centroid: Option<Point>, tuning: &Tuning) -> f32 {
    match contacts {
        [] => 0.0,
        [only] => unit(pressure_of(only, tuning.default_pressure)),
        _ => {
            let Some(center) = centroid else {
                return 0.0;
            };
            let mean = contacts
                .iter()
                .map(|c| c.position.distance(center))
                .sum::<f32>()
                / contacts.len() as f32;
            let window = tuning.maximum_spread - tuning.minimum_spread;
            if window <= 0.0 {
                return 0.0;
            }
            unit((mean - tuning.minimum_spread) / window)
        }
    }
}
