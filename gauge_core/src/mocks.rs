//! Stand-in collaborators for gauges that lack real ones.

/// Zero sensor for gauges without a reference mark; never active.
///
/// Non-zeroable gauges never poll their sensor, so this only fills the slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSensor;

impl gauge_traits::ZeroSensor for NoSensor {
    fn is_active(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(false)
    }
}
