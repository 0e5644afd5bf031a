//! Target spawning port.

/// Capability exposed by the target-spawning subsystem.
pub trait TargetPort {
    /// Position of the current target in meters, `None` when no target
    /// exists.
    fn position(&self) -> Option<[f32; 3]>;

    /// Whether the current target is classified as vertically oriented.
    fn is_vertical(&self) -> bool;

    /// Replaces the current target with a newly spawned random one.
    fn spawn_random(&mut self);
}
