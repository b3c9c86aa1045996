//! Registry configuration

/// Shortest identity the registry will generate
pub const MIN_ID_LENGTH: usize = 4;

/// Longest identity the registry will generate
pub const MAX_ID_LENGTH: usize = 32;

/// Configuration for the client registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Length of generated client identities (base-36 characters)
    pub id_length: usize,

    /// Frames that may be queued for a client before new ones are dropped
    pub outbound_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            id_length: 8,
            outbound_capacity: 256,
        }
    }
}

impl RegistryConfig {
    /// Apply the same bounds as the builder methods
    ///
    /// Fields are public, so a struct literal can bypass the builders.
    pub fn normalized(self) -> Self {
        Self::default()
            .id_length(self.id_length)
            .outbound_capacity(self.outbound_capacity)
    }

    /// Set the identity length, clamped to `MIN_ID_LENGTH..=MAX_ID_LENGTH`
    pub fn id_length(mut self, len: usize) -> Self {
        self.id_length = len.clamp(MIN_ID_LENGTH, MAX_ID_LENGTH);
        self
    }

    /// Set the per-client outbound queue capacity (at least 1)
    pub fn outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.id_length, 8);
        assert_eq!(config.outbound_capacity, 256);
    }

    #[test]
    fn test_id_length_clamped() {
        assert_eq!(RegistryConfig::default().id_length(1).id_length, MIN_ID_LENGTH);
        assert_eq!(RegistryConfig::default().id_length(100).id_length, MAX_ID_LENGTH);
        assert_eq!(RegistryConfig::default().id_length(12).id_length, 12);
    }

    #[test]
    fn test_normalized_struct_literal() {
        let config = RegistryConfig {
            id_length: 0,
            outbound_capacity: 0,
        }
        .normalized();

        assert_eq!(config.id_length, MIN_ID_LENGTH);
        assert_eq!(config.outbound_capacity, 1);
    }

    #[test]
    fn test_outbound_capacity_nonzero() {
        let config = RegistryConfig::default().outbound_capacity(0);

        assert_eq!(config.outbound_capacity, 1);
    }
}
