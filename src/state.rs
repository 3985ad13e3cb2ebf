use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::jwt::JwtKeys,
    config::AppConfig,
    db::{PgStore, Store},
    mailer::{Mailer, SmtpMailer},
    notify::Notifier,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub notifier: Notifier,
    pub jwt: JwtKeys,
}

impl AppState {
    /// Production wiring: Postgres store and SMTP mailer.
    pub fn init(config: &AppConfig, pool: PgPool) -> anyhow::Result<Self> {
        let mailer = Arc::new(SmtpMailer::new(&config.email)?) as Arc<dyn Mailer>;
        let store = Arc::new(PgStore::new(pool)) as Arc<dyn Store>;
        Ok(Self::from_parts(config, store, mailer))
    }

    pub fn from_parts(
        config: &AppConfig,
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            store,
            notifier: Notifier::new(mailer, &config.email),
            jwt: JwtKeys::new(&config.jwt),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::test_utils::{test_config, MemoryStore, RecordingMailer};

        Self::from_parts(
            &test_config(),
            Arc::new(MemoryStore::default()),
            Arc::new(RecordingMailer::default()),
        )
    }
}
