use skullstrip_core::api::{AppConfig, ExtractionBackend};

use crate::backend::BetBackend;

pub fn build_backend(cfg: &AppConfig) -> Box<dyn ExtractionBackend> {
    Box::new(BetBackend::from_config(&cfg.tool))
}
