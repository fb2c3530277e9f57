//! Active contacts for one pad and their centroid.

use smallvec::SmallVec;

/// Clamp into [0, 1]; non-finite input lands on 0.
pub(crate) fn unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactId(pub u32);

/// Normalized pad position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One active pointer/finger. Position is pre-clamped to [0, 1]; `pressure` is `None` when the
/// device does not report it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub position: Point,
    pub pressure: Option<f32>,
}

impl Contact {
    fn new(id: ContactId, x: f32, y: f32, pressure: Option<f32>) -> Self {
        Self {
            id,
            position: Point::new(unit(x), unit(y)),
            pressure: pressure.filter(|p| p.is_finite()).map(unit),
        }
    }
}

/// Insertion-ordered contact set. Ten fingers fit inline; more spill to the heap.
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    contacts: SmallVec<[Contact; 10]>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contact. Returns `true` when this contact opened a new session (the set was empty).
    /// Re-adding a known id updates it in place.
    pub fn add(&mut self, id: ContactId, x: f32, y: f32, pressure: Option<f32>) -> bool {
        if self.update(id, x, y, pressure) {
            return false;
        }
        let opened = self.contacts.is_empty();
        self.contacts.push(Contact::new(id, x, y, pressure));
        opened
    }

    /// Move a known contact. Returns `false` for ids that are not active.
    pub fn update(&mut self, id: ContactId, x: f32, y: f32, pressure: Option<f32>) -> bool {
        match self.contacts.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                *c = Contact::new(id, x, y, pressure);
                true
            }
            None => false,
        }
    }

    /// Remove a contact. Returns `false` for ids that are not active.
    pub fn remove(&mut self, id: ContactId) -> bool {
        match self.contacts.iter().position(|c| c.id == id) {
            Some(index) => {
                self.contacts.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Arithmetic mean of all active positions, or `None` when empty.
    pub fn centroid(&self) -> Option<Point> {
        if self.contacts.is_empty() {
            return None;
        }
        let n = self.contacts.len() as f32;
        let (sx, sy) = self
            .contacts
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.position.x, sy + c.position.y));
        Some(Point::new(sx / n, sy / n))
    }
}
