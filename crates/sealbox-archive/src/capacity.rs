//! Payload ceiling based on available memory
//!
//! The whole container, its ciphertext and the artifact are held in memory at
//! once, so a selection is rejected up front if it cannot reasonably fit.

use sysinfo::System;
use tracing::{debug, warn};

use sealbox_core::config::CapacityConfig;
use sealbox_core::{SealError, SealResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityGate {
    max_bytes: u64,
}

impl CapacityGate {
    /// Gate with a fixed ceiling.
    pub fn with_limit(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Gate from config: `max_bytes` if set, else a share of available memory.
    pub fn from_config(config: &CapacityConfig) -> Self {
        if let Some(max_bytes) = config.max_bytes {
            return Self::with_limit(max_bytes);
        }
        let available = available_memory();
        Self::with_limit(memory_ceiling(
            available,
            config.memory_fraction,
            config.fallback_bytes,
        ))
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn check_fits(&self, total_bytes: u64) -> SealResult<()> {
        if total_bytes > self.max_bytes {
            return Err(SealError::SizeExceeded {
                total: total_bytes,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Currently available system memory in bytes, `None` if it cannot be read.
pub fn available_memory() -> Option<u64> {
    let mut sys = System::new();
    sys.refresh_memory();
    match sys.available_memory() {
        0 => {
            warn!("available memory could not be queried");
            None
        }
        bytes => {
            debug!(bytes, "available memory");
            Some(bytes)
        }
    }
}

/// `fraction` of `available`, or `fallback` when memory is unknown.
pub fn memory_ceiling(available: Option<u64>, fraction: f64, fallback: u64) -> u64 {
    match available {
        Some(bytes) => (bytes as f64 * fraction.clamp(0.0, 1.0)) as u64,
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealbox_core::config::DEFAULT_FALLBACK_BYTES;

    #[test]
    fn ceiling_is_eighty_percent_of_available() {
        assert_eq!(memory_ceiling(Some(1000), 0.8, DEFAULT_FALLBACK_BYTES), 800);
    }

    #[test]
    fn ceiling_falls_back_when_unknown() {
        assert_eq!(
            memory_ceiling(None, 0.8, DEFAULT_FALLBACK_BYTES),
            1024 * 1024 * 1024
        );
    }

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(memory_ceiling(Some(1000), 3.0, 0), 1000);
        assert_eq!(memory_ceiling(Some(1000), -1.0, 0), 0);
    }

    #[test]
    fn check_fits_boundary() {
        let gate = CapacityGate::with_limit(10);
        assert!(gate.check_fits(0).is_ok());
        assert!(gate.check_fits(10).is_ok());
        assert!(matches!(
            gate.check_fits(11),
            Err(SealError::SizeExceeded { total: 11, max: 10 })
        ));
    }

    #[test]
    fn config_override_wins() {
        let config = CapacityConfig {
            max_bytes: Some(4096),
            ..CapacityConfig::default()
        };
        assert_eq!(CapacityGate::from_config(&config).max_bytes(), 4096);
    }

    #[test]
    fn config_without_override_is_positive() {
        let gate = CapacityGate::from_config(&CapacityConfig::default());
        assert!(gate.max_bytes() > 0);
    }
}
