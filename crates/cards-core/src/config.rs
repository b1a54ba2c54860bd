#![forbid(unsafe_code)]

//! Stack configuration.

use crate::error::{ConfigError, Result};
use crate::geometry::EdgeInsets;

/// Tunables for a [`CardStack`](crate::CardStack).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StackConfig {
    /// Cards mounted at once (default: 3). Takes effect on the next reset.
    pub visible_cards_count: usize,
    /// Spacing between the container bounds and the front card
    /// (default: 60/40/40/40).
    pub card_edge_insets: EdgeInsets,
    /// Whether drag and tap are accepted (default: true).
    pub gestures_enabled: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            visible_cards_count: 3,
            card_edge_insets: EdgeInsets::default(),
            gestures_enabled: true,
        }
    }
}

impl StackConfig {
    /// Set the number of simultaneously mounted cards.
    #[must_use]
    pub fn visible_cards_count(mut self, count: usize) -> Self {
        self.visible_cards_count = count;
        self
    }

    /// Set the card edge insets.
    #[must_use]
    pub fn card_edge_insets(mut self, insets: impl Into<EdgeInsets>) -> Self {
        self.card_edge_insets = insets.into();
        self
    }

    /// Enable or disable gestures.
    #[must_use]
    pub fn gestures_enabled(mut self, enabled: bool) -> Self {
        self.gestures_enabled = enabled;
        self
    }

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        if self.visible_cards_count == 0 {
            return Err(ConfigError::ZeroVisibleCards);
        }
        let insets = &self.card_edge_insets;
        for (side, value) in [
            ("top", insets.top),
            ("left", insets.left),
            ("bottom", insets.bottom),
            ("right", insets.right),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::inset(side, value));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StackConfig::default();
        assert_eq!(config.visible_cards_count, 3);
        assert_eq!(config.card_edge_insets, EdgeInsets::new(60.0, 40.0, 40.0, 40.0));
        assert!(config.gestures_enabled);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_visible_cards_rejected() {
        let config = StackConfig::default().visible_cards_count(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroVisibleCards));
    }

    #[test]
    fn bad_inset_rejected() {
        let config = StackConfig::default()
            .card_edge_insets(EdgeInsets::new(10.0, 10.0, f64::NAN, 10.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInset { side: "bottom", .. })
        ));
        let negative = StackConfig::default().card_edge_insets(-1.0);
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::InvalidInset { side: "top", .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let config: StackConfig =
            serde_json::from_str(r#"{"visible_cards_count": 5, "card_edge_insets": {"top": 20.0}}"#)
                .expect("valid json");
        assert_eq!(config.visible_cards_count, 5);
        assert_eq!(config.card_edge_insets, EdgeInsets::new(20.0, 40.0, 40.0, 40.0));
        assert!(config.gestures_enabled);

        let json = serde_json::to_string(&config).expect("serializable");
        let back: StackConfig = serde_json::from_str(&json).expect("round trip");
        assert_eq!(back, config);
    }
}
