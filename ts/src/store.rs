//! StopStore - the ordered, versioned stop set

use tracing::debug;

use crate::Stop;

/// Ordered stop set with a version counter.
///
/// The version starts at 0 and increments on every successful mutation.
/// Reads never change it. Consumers capture `version()` before issuing an
/// asynchronous call and compare on completion; a mismatch means the stop
/// set moved underneath them and the result must be dropped.
#[derive(Debug, Default, Clone)]
pub struct StopStore {
    stops: Vec<Stop>,
    version: u64,
}

impl StopStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stops in order
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Current version; bumped by every successful mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of stops
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// True when no stops are present
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Whether a stop with this id is present
    pub fn contains(&self, id: &str) -> bool {
        self.stops.iter().any(|s| s.id == id)
    }

    /// Add a stop at the end of the sequence.
    ///
    /// A stop whose id is already present is ignored; returns whether the
    /// store changed.
    pub fn add(&mut self, stop: Stop) -> bool {
        if self.contains(&stop.id) {
            debug!(id = %stop.id, "add: duplicate id ignored");
            return false;
        }
        debug!(id = %stop.id, name = %stop.name, "add: stop added");
        self.stops.push(stop);
        self.version += 1;
        true
    }

    /// Remove the stop with this id; returns whether the store changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.stops.len();
        self.stops.retain(|s| s.id != id);
        if self.stops.len() == before {
            return false;
        }
        debug!(%id, "remove: stop removed");
        self.version += 1;
        true
    }

    /// Reorder stops to follow the given id sequence.
    ///
    /// Ids not present in the store are ignored. Stops absent from the
    /// sequence keep their relative order after the listed ones. A
    /// sequence that leaves the order unchanged still counts as a
    /// mutation only if it actually moved something.
    pub fn reorder(&mut self, order: &[String]) -> bool {
        let original: Vec<String> = self.stops.iter().map(|s| s.id.clone()).collect();

        let mut remaining = std::mem::take(&mut self.stops);
        let mut reordered: Vec<Stop> = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(pos) = remaining.iter().position(|s| &s.id == id) {
                reordered.push(remaining.remove(pos));
            }
        }
        // Unlisted stops trail in their existing order
        reordered.append(&mut remaining);

        let changed = reordered
            .iter()
            .map(|s| s.id.as_str())
            .ne(original.iter().map(String::as_str));
        self.stops = reordered;
        if changed {
            debug!(count = self.stops.len(), "reorder: applied new order");
            self.version += 1;
        }
        changed
    }

    /// Remove all stops
    pub fn clear(&mut self) -> bool {
        if self.stops.is_empty() {
            return false;
        }
        debug!(count = self.stops.len(), "clear: removing all stops");
        self.stops.clear();
        self.version += 1;
        true
    }
}
