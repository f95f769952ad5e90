//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::constants::{NOTIFICATION_EXIT_MS, NOTIFICATION_VISIBLE_MS};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub business: BusinessSettings,
    pub messaging: MessagingSettings,
    pub storage: StorageSettings,
    pub notifications: NotificationSettings,
    pub catalog: CatalogSettings,
}

/// Fixed header/footer details printed on every order message.
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessSettings {
    pub name: String,
    pub address: String,
    pub hours: String,
    pub contact: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MessagingSettings {
    pub base_url: String,
    /// International number without `+`, as the deep link expects it.
    pub business_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub visible_ms: u64,
    pub exit_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSettings {
    pub path: String,
}

impl Settings {
    /// Load from `config/settings`, `config/<CART_ENV>` and `CART__*` variables.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("CART_ENV").unwrap_or_else(|_| "development".into());
        debug!("Loading settings for environment {}", env);
        Self::load_from("config/settings", Some(&format!("config/{}", env)))
    }

    pub fn load_from(base: &str, overlay: Option<&str>) -> Result<Self, AppError> {
        let mut builder = Config::builder()
            .set_default("business.name", "Kasi Grill House")?
            .set_default("business.address", "12 Vilakazi Street, Orlando West, Soweto")?
            .set_default("business.hours", "Mon-Sun 10:00 - 21:00")?
            .set_default("business.contact", "082 555 0199")?
            .set_default("messaging.base_url", "https://wa.me")?
            .set_default("messaging.business_id", "27825550199")?
            .set_default("storage.path", "data/storage.json")?
            .set_default("notifications.visible_ms", NOTIFICATION_VISIBLE_MS)?
            .set_default("notifications.exit_ms", NOTIFICATION_EXIT_MS)?
            .set_default("catalog.path", "config/catalog.toml")?
            .add_source(File::with_name(base).required(false));

        if let Some(overlay) = overlay {
            builder = builder.add_source(File::with_name(overlay).required(false));
        }

        let config = builder
            .add_source(Environment::with_prefix("CART").separator("__").try_parsing(true))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.messaging.business_id.is_empty()
            || !self.messaging.business_id.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AppError::InvalidConfig(format!(
                "messaging.business_id must be digits only, got '{}'",
                self.messaging.business_id
            )));
        }
        if self.notifications.visible_ms == 0 {
            return Err(AppError::InvalidConfig(
                "notifications.visible_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
