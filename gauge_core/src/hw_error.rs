//! Maps `Box<dyn Error>` from trait boundaries to typed `GaugeError`.
//!
//! The traits in `gauge_traits` use `Box<dyn Error + Send + Sync>` so any
//! backend can plug in; this module converts those to our typed error enum,
//! with an optional feature-gated path for `gauge_hardware::HwError`.

use crate::error::GaugeError;

/// Map a trait-boundary error to a typed `GaugeError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to the error's message.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> GaugeError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<gauge_hardware::HwError>() {
            return GaugeError::HardwareFault(hw.to_string());
        }
    }

    GaugeError::Hardware(e.to_string())
}
