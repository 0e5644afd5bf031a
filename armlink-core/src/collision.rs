//! Collision tracking.
//!
//! The core does not detect collisions — that is physics-engine work — it
//! consumes notifications through [`CollisionTracker::on_collision`]. The
//! tracker replaces the original global event broadcaster with an explicit
//! subscriber list owned by the dispatcher, so teardown is deterministic.

/// Kind of a reported collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    /// No collision recorded.
    None,

    /// Collision with the environment, including self-collision.
    Environment,

    /// Collision with the current target.
    Target,
}

/// Handle returned by [`CollisionTracker::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Handler = Box<dyn FnMut(CollisionKind, &str)>;

/// Latched per-episode collision flag plus a notification fan-out.
///
/// The flag is set by `Environment`-kind events and stays set until
/// [`clear`](CollisionTracker::clear) — called exactly once per Reset.
/// `Target`-kind events are observed (subscribers are notified) but never
/// latch the flag: touching the target is a distinct concept from crashing
/// into the environment. Self-collision arrives as `Environment` with a
/// distinct tag and latches like any environment hit.
pub struct CollisionTracker {
    detected: bool,
    last_kind: CollisionKind,
    subscribers: Vec<(SubscriberId, Handler)>,
    next_id: u64,
}

impl CollisionTracker {
    /// Creates a tracker with no collision recorded.
    pub fn new() -> Self {
        Self {
            detected: false,
            last_kind: CollisionKind::None,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a handler called for every reported collision event.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(CollisionKind, &str) + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Removes a previously registered handler.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    /// Reports a collision event.
    pub fn on_collision(&mut self, kind: CollisionKind, tag: &str) {
        for (_, handler) in self.subscribers.iter_mut() {
            handler(kind, tag);
        }

        // Only environment hits count as a penalty-relevant collision.
        if kind == CollisionKind::Environment {
            self.detected = true;
            self.last_kind = kind;
        }
    }

    /// Whether an environment collision has been latched.
    pub fn detected(&self) -> bool {
        self.detected
    }

    /// Kind of the last latched collision.
    pub fn last_kind(&self) -> CollisionKind {
        self.last_kind
    }

    /// Clears the latched state.
    pub fn clear(&mut self) {
        self.detected = false;
        self.last_kind = CollisionKind::None;
    }
}

impl Default for CollisionTracker {
    fn default() -> Self {
        Self::new()
    }
}
