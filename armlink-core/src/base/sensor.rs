//! Proximity sensor port.

/// Capability exposed by a proximity/laser sensor.
pub trait SensorPort {
    /// Whether the sensor currently detects an object.
    fn hit(&self) -> bool;

    /// Distance to the detected object in meters, or the maximum range
    /// when nothing is detected.
    fn distance(&self) -> f32;

    /// Advances the sensor by one tick (polling, raycasting).
    fn tick(&mut self);
}
