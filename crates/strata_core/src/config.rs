//! # Storage Configuration
//!
//! Sizing and validation settings for buffer storages, loaded once at
//! startup from code or from a TOML table.

use serde::Deserialize;

use crate::error::{BufferError, BufferResult};

/// Whether precondition checks run on `add` and `get`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Liveness and duplicate checks run and report errors.
    Checked,
    /// Checks are skipped. Misuse is still memory safe but not reported.
    Unchecked,
}

impl Default for ValidationMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

impl ValidationMode {
    /// Returns `true` for [`ValidationMode::Checked`].
    #[inline]
    #[must_use]
    pub const fn is_checked(self) -> bool {
        matches!(self, Self::Checked)
    }
}

/// Configuration for a [`BufferStorage`](crate::BufferStorage).
///
/// Missing TOML keys fall back to [`BufferConfig::default`].
///
/// ```toml
/// initial_capacity = 1024
/// default_buffer_size = 16
/// validation = "unchecked"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    /// Initial dense store capacity in elements.
    pub initial_capacity: usize,
    /// Initial number of entity slots in the sparse index.
    pub sparse_capacity: usize,
    /// Initial number of free regions the free list can hold.
    pub recycled_capacity: usize,
    /// Buffer capacity used by `add_default`.
    pub default_buffer_size: usize,
    /// Precondition checking mode.
    pub validation: ValidationMode,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            sparse_capacity: 8,
            recycled_capacity: 4,
            default_buffer_size: 8,
            validation: ValidationMode::default(),
        }
    }
}

impl BufferConfig {
    /// Large preallocation for storages that hold many buffers.
    ///
    /// Avoids store doubling during the first frames of a large scene.
    #[must_use]
    pub fn large() -> Self {
        Self {
            initial_capacity: 1 << 16,
            sparse_capacity: 1 << 12,
            recycled_capacity: 256,
            default_buffer_size: 16,
            validation: ValidationMode::default(),
        }
    }

    /// Returns this configuration with the given validation mode.
    #[must_use]
    pub const fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Parses a configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidConfig`] if the document does not parse
    /// or the values fail [`BufferConfig::validate`].
    pub fn from_toml_str(source: &str) -> BufferResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| BufferError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values can back a storage.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidConfig`] if the initial capacity is zero,
    /// since the store grows by doubling.
    pub fn validate(&self) -> BufferResult<()> {
        if self.initial_capacity == 0 {
            return Err(BufferError::InvalidConfig(
                "initial_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
