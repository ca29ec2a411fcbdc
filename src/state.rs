use std::sync::Arc;

use diesel::{
    pg::PgConnection,
    r2d2::{ConnectionManager, PooledConnection},
};

use crate::{
    auth::jwt::JwtService,
    config::AppConfig,
    db::PgPool,
    error::{AppError, AppResult},
    export::Exporter,
    notify::{notify_best_effort, Notification, Notifier},
};

type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtService,
    pub exporter: Arc<Exporter>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: AppConfig,
        jwt: JwtService,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let exporter = Exporter::new(config.template_dir.clone());
        Self {
            pool,
            config: Arc::new(config),
            jwt,
            exporter: Arc::new(exporter),
            notifier,
        }
    }

    pub fn db(&self) -> AppResult<PgPooledConnection> {
        self.pool
            .get()
            .map_err(|err| AppError::internal(format!("database pool error: {err}")))
    }

    pub async fn notify(&self, notification: Notification) {
        notify_best_effort(
            self.notifier.as_ref(),
            &self.config.notify_recipients,
            notification,
        )
        .await;
    }
}
