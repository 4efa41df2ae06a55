use crate::{Config, auth::PaymentUrlCipher, model::ModelManager};

#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
    config: &'static Config,
    cipher: PaymentUrlCipher,
}

impl AppState {
    pub fn new(mm: ModelManager, config: &'static Config) -> Self {
        let cipher = PaymentUrlCipher::new(config.app().encryption_key());
        Self { mm, config, cipher }
    }

    pub fn pool(&self) -> &ModelManager {
        &self.mm
    }

    pub fn config(&self) -> &'static Config {
        self.config
    }

    pub fn cipher(&self) -> &PaymentUrlCipher {
        &self.cipher
    }
}
