//! Pool configuration: option display labels and participant capacity.

use serde::{Deserialize, Serialize};

use crate::constants::{self, OPTION_COUNT};
use crate::error::{ParipoolError, Result};
use crate::ids::OptionId;

/// Configuration of the voting pool.
///
/// Mutable only while no round can accept votes: before the current round's
/// start, after it is finalized, or when no round exists at all. The engine
/// enforces that guard; this type only validates field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Display labels for the four fixed options, in index order.
    pub option_labels: [String; OPTION_COUNT],
    /// Maximum number of participants per round.
    pub capacity: usize,
}

impl PoolConfig {
    pub fn new(option_labels: [String; OPTION_COUNT], capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ParipoolError::ZeroCapacity);
        }
        Ok(Self {
            option_labels,
            capacity,
        })
    }

    /// The display label of one option.
    #[must_use]
    pub fn label(&self, option: OptionId) -> &str {
        &self.option_labels[option.index()]
    }

    /// Convert a borrowed label array into the owned form this config stores.
    #[must_use]
    pub fn labels_from(labels: [&str; OPTION_COUNT]) -> [String; OPTION_COUNT] {
        labels.map(str::to_string)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            option_labels: constants::DEFAULT_OPTION_LABELS.map(str::to_string),
            capacity: constants::DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = PoolConfig::default();
        assert_eq!(cfg.capacity, constants::DEFAULT_CAPACITY);
        assert_eq!(cfg.label(OptionId::ALL[0]), "Option A");
        assert_eq!(cfg.label(OptionId::ALL[3]), "Option D");
    }

    #[test]
    fn zero_capacity_rejected() {
        let labels = PoolConfig::labels_from(["a", "b", "c", "d"]);
        assert!(matches!(
            PoolConfig::new(labels, 0),
            Err(ParipoolError::ZeroCapacity)
        ));
    }

    #[test]
    fn labels_in_index_order() {
        let labels = PoolConfig::labels_from(["north", "south", "east", "west"]);
        let cfg = PoolConfig::new(labels, 10).unwrap();
        assert_eq!(cfg.label(OptionId::ALL[1]), "south");
        assert_eq!(cfg.label(OptionId::ALL[2]), "east");
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = PoolConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PoolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
