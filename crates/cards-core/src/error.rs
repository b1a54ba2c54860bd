use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid stack configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("visible_cards_count must be at least 1")]
    ZeroVisibleCards,

    #[error("card edge inset `{side}` must be finite and non-negative (got {value})")]
    InvalidInset { side: &'static str, value: f64 },
}

impl ConfigError {
    #[must_use]
    pub fn inset(side: &'static str, value: f64) -> Self {
        Self::InvalidInset { side, value }
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigError;

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            ConfigError::ZeroVisibleCards.to_string(),
            "visible_cards_count must be at least 1"
        );
        let err = ConfigError::inset("left", -4.0);
        assert!(err.to_string().contains("`left`"));
        assert!(err.to_string().contains("-4"));
    }
}
