//! Slab configuration parameters.

use crate::error::AllocError;

/// Configuration for a [`Slab`](crate::slab::Slab).
///
/// Controls the allocation quantum, segment sizing, and how many segments
/// the slab may open. Validated when the slab is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlabConfig {
    /// Allocation granularity in bytes. Every request is rounded up to a
    /// whole number of quanta, and every block starts on a quantum boundary.
    ///
    /// Default: 16. Must be a non-zero power of two.
    pub quantum: usize,

    /// Size of each segment, in quanta.
    ///
    /// Default: 4096 (64KB at the default quantum). Must be at least 1.
    /// No single request may exceed one segment.
    pub segment_quanta: usize,

    /// Maximum number of segments the slab may open.
    ///
    /// Default: 16. Must be at least 1.
    pub max_segments: u16,
}

impl SlabConfig {
    /// Default allocation quantum in bytes.
    pub const DEFAULT_QUANTUM: usize = 16;

    /// Default segment size in quanta.
    pub const DEFAULT_SEGMENT_QUANTA: usize = 4096;

    /// Default maximum segment count.
    pub const DEFAULT_MAX_SEGMENTS: u16 = 16;

    /// Create a config with the given quantum and default sizing.
    pub fn new(quantum: usize) -> Self {
        Self {
            quantum,
            segment_quanta: Self::DEFAULT_SEGMENT_QUANTA,
            max_segments: Self::DEFAULT_MAX_SEGMENTS,
        }
    }

    /// Size of one segment in bytes.
    ///
    /// Saturates on overflow; [`validate`](Self::validate) rejects such
    /// configs.
    pub fn segment_bytes(&self) -> usize {
        self.segment_quanta.saturating_mul(self.quantum)
    }

    /// Upper bound on the bytes the slab can hand out.
    pub fn capacity_bytes(&self) -> usize {
        self.segment_bytes()
            .saturating_mul(usize::from(self.max_segments))
    }

    /// Check the invariants listed on each field.
    pub fn validate(&self) -> Result<(), AllocError> {
        if !self.quantum.is_power_of_two() {
            return Err(AllocError::InvalidConfig {
                reason: format!("quantum {} is not a non-zero power of two", self.quantum),
            });
        }
        if self.segment_quanta == 0 {
            return Err(AllocError::InvalidConfig {
                reason: "segment_quanta must be at least 1".into(),
            });
        }
        if self.max_segments == 0 {
            return Err(AllocError::InvalidConfig {
                reason: "max_segments must be at least 1".into(),
            });
        }
        match self.segment_quanta.checked_mul(self.quantum) {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
            _ => Err(AllocError::InvalidConfig {
                reason: format!(
                    "segment of {} quanta x {} bytes overflows isize",
                    self.segment_quanta, self.quantum
                ),
            }),
        }
    }
}

impl Default for SlabConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_QUANTUM)
    }
}
