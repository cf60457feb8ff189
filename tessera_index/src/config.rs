// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node fill bounds.

use crate::error::{IndexError, Result};

/// Minimum and maximum entries per node.
///
/// Every node except the root holds between `min_entries` and `max_entries`
/// children. `min_entries` may be at most half of `max_entries` so that an
/// overflowing node can always be split into two legal halves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RTreeConfig {
    /// Lower fill bound for non-root nodes.
    pub min_entries: usize,
    /// Upper fill bound; one more entry triggers a split.
    pub max_entries: usize,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self {
            min_entries: 4,
            max_entries: 9,
        }
    }
}

impl RTreeConfig {
    /// Create validated fill bounds.
    pub fn new(min_entries: usize, max_entries: usize) -> Result<Self> {
        let config = Self {
            min_entries,
            max_entries,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check `2 <= min_entries <= max_entries / 2`.
    pub fn validate(&self) -> Result<()> {
        if self.min_entries < 2 || self.min_entries > self.max_entries / 2 {
            return Err(IndexError::InvalidConfig {
                min_entries: self.min_entries,
                max_entries: self.max_entries,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_are_valid() {
        assert_eq!(RTreeConfig::default().validate(), Ok(()));
        assert!(RTreeConfig::new(2, 4).is_ok());
    }

    #[test]
    fn rejects_bounds_that_cannot_split() {
        assert!(RTreeConfig::new(1, 8).is_err());
        assert!(RTreeConfig::new(5, 9).is_err());
        assert_eq!(
            RTreeConfig::new(3, 4),
            Err(IndexError::InvalidConfig {
                min_entries: 3,
                max_entries: 4
            })
        );
    }
}
