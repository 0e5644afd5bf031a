//! Laser sensor backend.
use armlink_core::SensorPort;

/// Default detection range in meters.
const DEFAULT_MAX_RANGE: f32 = 1.0;

/// Laser sensor fed by the host.
///
/// Raycasting against scene geometry is an external concern; this
/// implementation only holds the reading contract. A host injects readings
/// through [`set_reading`](SimLaser::set_reading); while nothing is
/// injected the sensor reports the neutral no-detection state, distance
/// pegged at the maximum range.
pub struct SimLaser {
    max_range: f32,
    hit: bool,
    distance: f32,
    pending: Option<(bool, f32)>,
}

impl SimLaser {
    /// Creates a sensor with the default range.
    pub fn new() -> Self {
        Self::with_range(DEFAULT_MAX_RANGE)
    }

    /// Creates a sensor with the given maximum range in meters.
    pub fn with_range(max_range: f32) -> Self {
        Self {
            max_range,
            hit: false,
            distance: max_range,
            pending: None,
        }
    }

    /// Injects the reading picked up on the next tick.
    pub fn set_reading(&mut self, hit: bool, distance: f32) {
        self.pending = Some((hit, distance.min(self.max_range)));
    }
}

impl Default for SimLaser {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for SimLaser {
    fn hit(&self) -> bool {
        self.hit
    }

    fn distance(&self) -> f32 {
        self.distance
    }

    fn tick(&mut self) {
        match self.pending.take() {
            Some((hit, distance)) => {
                self.hit = hit;
                self.distance = distance;
            }
            None => {
                self.hit = false;
                self.distance = self.max_range;
            }
        }
    }
}
