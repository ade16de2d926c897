//! Backup configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest supported block size in bytes.
pub const BLOCK_SIZE_MIN: usize = 50;

/// Largest supported block size in bytes.
pub const BLOCK_SIZE_MAX: usize = 1500;

/// Paper-backup configuration.
///
/// Controls how a byte buffer is split into per-page blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Block (per-page payload) size in bytes.
    ///
    /// Must be between [`BLOCK_SIZE_MIN`] and [`BLOCK_SIZE_MAX`].
    ///
    /// Default: 1500
    pub block_size: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE_MAX,
        }
    }
}

impl BackupConfig {
    /// Create a configuration with the given block size.
    #[must_use]
    pub const fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Check the block size range.
    ///
    /// Happens before any data is touched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BlockSizeOutOfRange`] if the block size is not
    /// in `[BLOCK_SIZE_MIN, BLOCK_SIZE_MAX]`.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size < BLOCK_SIZE_MIN || self.block_size > BLOCK_SIZE_MAX {
            return Err(ConfigError::BlockSizeOutOfRange {
                given: self.block_size,
                min: BLOCK_SIZE_MIN,
                max: BLOCK_SIZE_MAX,
            });
        }
        Ok(())
    }

    /// Number of blocks for a payload.
    #[must_use]
    pub const fn block_count(&self, payload_len: usize) -> usize {
        if payload_len == 0 {
            return 0;
        }
        payload_len.div_ceil(self.block_size)
    }

    /// Expected length of the block at `index`.
    ///
    /// Only the final block may be shorter than the block size. Returns
    /// `None` when `index` is out of range for the payload.
    #[must_use]
    pub const fn block_len_at(&self, payload_len: usize, index: usize) -> Option<usize> {
        let count = self.block_count(payload_len);
        if index >= count {
            return None;
        }
        if index + 1 == count {
            Some(payload_len - (count - 1) * self.block_size)
        } else {
            Some(self.block_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = BackupConfig::default();
        assert_eq!(config.block_size, 1500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(matches!(
            BackupConfig::new(49).validate(),
            Err(ConfigError::BlockSizeOutOfRange {
                given: 49,
                min: 50,
                max: 1500
            })
        ));
        assert!(matches!(
            BackupConfig::new(1501).validate(),
            Err(ConfigError::BlockSizeOutOfRange { .. })
        ));
        assert!(matches!(
            BackupConfig::new(0).validate(),
            Err(ConfigError::BlockSizeOutOfRange { .. })
        ));
    }

    #[test]
    fn validate_accepts_range_bounds() {
        assert!(BackupConfig::new(50).validate().is_ok());
        assert!(BackupConfig::new(1500).validate().is_ok());
    }

    #[test]
    fn block_count_calculation() {
        let config = BackupConfig::new(1500);
        // 0 bytes = 0 blocks
        assert_eq!(config.block_count(0), 0);
        // 1500 bytes = 1 block
        assert_eq!(config.block_count(1500), 1);
        // 1501 bytes = 2 blocks (ceiling division)
        assert_eq!(config.block_count(1501), 2);
        // 3000 bytes = 2 blocks
        assert_eq!(config.block_count(3000), 2);
    }

    #[test]
    fn block_len_at_final_block() {
        let config = BackupConfig::new(1500);
        // 1600 bytes: block 0 is full, block 1 is the 100-byte remainder
        assert_eq!(config.block_len_at(1600, 0), Some(1500));
        assert_eq!(config.block_len_at(1600, 1), Some(100));
        assert_eq!(config.block_len_at(1600, 2), None);
        // 3000 bytes: both blocks full
        assert_eq!(config.block_len_at(3000, 1), Some(1500));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = BackupConfig::new(1000);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: BackupConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }
}
