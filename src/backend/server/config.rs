/**
 * Service Loading
 *
 * Builds the collaborators named by `AppConfig`. Optional services fall
 * back instead of failing startup:
 *
 * - no `DATABASE_URL`: in-memory store
 * - no SMTP settings, or a bad relay: mail is logged instead of sent
 * - no Cloudinary settings: uploads fail with `MediaUploadFailed`
 *
 * A `DATABASE_URL` that is set but unusable (unreachable, or migrations
 * fail) is a startup error.
 */

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use crate::backend::mail::{LogMailer, Mailer, SmtpMailer};
use crate::backend::media::{CloudinaryHost, DisabledMediaHost, MediaHost};
use crate::backend::store::{InMemoryStore, PgStore, Store, StoreResult};
use crate::shared::AppConfig;

pub async fn load_store(config: &AppConfig) -> StoreResult<Arc<dyn Store>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store.");
        return Ok(Arc::new(InMemoryStore::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            e
        })?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        e
    })?;
    tracing::info!("Database migrations completed successfully");

    Ok(Arc::new(PgStore::new(pool)))
}

pub fn load_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    let Some(settings) = &config.smtp else {
        tracing::warn!("SMTP not configured. Mail will be logged instead of sent.");
        return Arc::new(LogMailer);
    };

    match SmtpMailer::new(settings) {
        Ok(mailer) => {
            tracing::info!("SMTP relay configured: {}", settings.host);
            Arc::new(mailer)
        }
        Err(e) => {
            tracing::error!("Failed to configure SMTP relay {}: {}", settings.host, e);
            Arc::new(LogMailer)
        }
    }
}

pub fn load_media(config: &AppConfig) -> Arc<dyn MediaHost> {
    match &config.cloudinary {
        Some(settings) => {
            tracing::info!("Media uploads go to Cloudinary cloud {}", settings.cloud_name);
            Arc::new(CloudinaryHost::new(settings.clone()))
        }
        None => {
            tracing::warn!("Cloudinary not configured. Media uploads are disabled.");
            Arc::new(DisabledMediaHost)
        }
    }
}
