//! CLI command implementations.

pub mod export;
pub mod normalize;
pub mod review;
pub mod status;
pub mod types;

use collatio::NormalizerConfig;

use crate::cli::NormalizeOptions;

impl NormalizeOptions {
    /// Normalizer settings for these flags.
    pub fn to_config(&self) -> NormalizerConfig {
        NormalizerConfig::new()
            .with_strict_sigla(self.strict_sigla)
            .with_skip_failed_verses(self.skip_failed_verses)
    }
}
