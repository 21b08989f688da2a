use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::llm::{GoogleProvider, PromptRefiner};

use super::events::AppEvent;

/// Centralized handle to backend services.
///
/// Created once at startup, then passed by reference to views that need
/// backend access. The refiner is behind an Arc so generation calls can
/// be spawned onto the runtime.
pub struct Services {
    pub refiner: Arc<PromptRefiner>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Initialize services from config and the `GEMINI_API_KEY` credential.
    ///
    /// Failures here are fatal: the wizard cannot run without a provider.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> anyhow::Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable is not set"))?;

        if !GoogleProvider::is_valid_api_key_format(&api_key) {
            log::warn!("GEMINI_API_KEY does not look like a Google API key");
        }

        let provider = Arc::new(GoogleProvider::new(api_key, config.llm.model.clone()));
        let refiner = Arc::new(PromptRefiner::new(provider, &config.llm));
        log::info!("Prompt refiner initialized (model: {})", config.llm.model);

        Ok(Self { refiner, event_tx })
    }
}
