//! # Settings Repository
//!
//! The single settings row (`id = 1`).
//!
//! ```text
//! get_or_create ──► row missing? ──► insert defaults
//!                └► currency symbol blank? ──► repair to default
//!
//! update(patch) ──► load ──► merge ──► validate_settings ──► UPDATE ──► reload
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use receipt_core::settings::DEFAULT_CURRENCY_SYMBOL;
use receipt_core::validation::validate_settings;
use receipt_core::{CoreError, Settings, SettingsPatch};

const SETTINGS_ID: i64 = 1;

/// Repository for the settings singleton.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Returns the stored settings, inserting defaults on first use.
    ///
    /// `default_output_folder` is only used when the row is created.
    pub async fn get_or_create(&self, default_output_folder: &str) -> DbResult<Settings> {
        if let Some(settings) = self.fetch().await? {
            if settings.currency_symbol.trim().is_empty() {
                return self.repair_currency_symbol().await;
            }
            return Ok(settings);
        }

        let defaults = Settings::defaults(default_output_folder);
        info!(output_folder = %default_output_folder, "Creating default settings");

        // OR IGNORE: a concurrent first request may have inserted already
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO settings (
                id, organization_name, organization_address, organization_contact,
                currency_symbol, footer_text, output_folder, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(SETTINGS_ID)
        .bind(&defaults.organization_name)
        .bind(&defaults.organization_address)
        .bind(&defaults.organization_contact)
        .bind(&defaults.currency_symbol)
        .bind(&defaults.footer_text)
        .bind(&defaults.output_folder)
        .bind(defaults.updated_at)
        .execute(&self.pool)
        .await?;

        self.fetch()
            .await?
            .ok_or_else(|| DbError::not_found("Settings", SETTINGS_ID.to_string()))
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// Fields absent from `patch` keep their value. Invalid results are
    /// rejected before anything is written.
    pub async fn update(
        &self,
        patch: SettingsPatch,
        default_output_folder: &str,
    ) -> DbResult<Settings> {
        let mut settings = self.get_or_create(default_output_folder).await?;
        settings.merge(patch);

        let mut settings = validate_settings(settings).map_err(CoreError::from)?;
        settings.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE settings SET
                organization_name = ?1,
                organization_address = ?2,
                organization_contact = ?3,
                currency_symbol = ?4,
                footer_text = ?5,
                output_folder = ?6,
                updated_at = ?7
            WHERE id = ?8
            "#,
        )
        .bind(&settings.organization_name)
        .bind(&settings.organization_address)
        .bind(&settings.organization_contact)
        .bind(&settings.currency_symbol)
        .bind(&settings.footer_text)
        .bind(&settings.output_folder)
        .bind(settings.updated_at)
        .bind(SETTINGS_ID)
        .execute(&self.pool)
        .await?;

        info!(organization = %settings.organization_name, "Settings updated");

        self.fetch()
            .await?
            .ok_or_else(|| DbError::not_found("Settings", SETTINGS_ID.to_string()))
    }

    async fn fetch(&self) -> DbResult<Option<Settings>> {
        let settings = sqlx::query_as::<_, Settings>(
            r#"
            SELECT organization_name, organization_address, organization_contact,
                   currency_symbol, footer_text, output_folder, updated_at
            FROM settings
            WHERE id = ?1
            "#,
        )
        .bind(SETTINGS_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn repair_currency_symbol(&self) -> DbResult<Settings> {
        debug!("Restoring blank currency symbol");

        sqlx::query("UPDATE settings SET currency_symbol = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(DEFAULT_CURRENCY_SYMBOL)
            .bind(Utc::now())
            .bind(SETTINGS_ID)
            .execute(&self.pool)
            .await?;

        self.fetch()
            .await?
            .ok_or_else(|| DbError::not_found("Settings", SETTINGS_ID.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use receipt_core::settings::{DEFAULT_FOOTER_TEXT, DEFAULT_ORGANIZATION_NAME};
    use receipt_core::ValidationError;

    #[tokio::test]
    async fn test_defaults_on_first_use() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let settings = db.settings().get_or_create("/data/pdfs").await.unwrap();
        assert_eq!(settings.organization_name, DEFAULT_ORGANIZATION_NAME);
        assert_eq!(settings.currency_symbol, DEFAULT_CURRENCY_SYMBOL);
        assert_eq!(settings.footer_text, DEFAULT_FOOTER_TEXT);
        assert_eq!(settings.output_folder, "/data/pdfs");

        // The default folder only applies when the row is created
        let again = db.settings().get_or_create("/elsewhere").await.unwrap();
        assert_eq!(again.output_folder, "/data/pdfs");
    }

    #[tokio::test]
    async fn test_update_changes_only_patched_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();
        let before = repo.get_or_create("/data/pdfs").await.unwrap();

        let after = repo
            .update(
                SettingsPatch {
                    organization_name: Some("  Greenfield College ".to_string()),
                    currency_symbol: Some("$".to_string()),
                    ..SettingsPatch::default()
                },
                "/data/pdfs",
            )
            .await
            .unwrap();

        assert_eq!(after.organization_name, "Greenfield College");
        assert_eq!(after.currency_symbol, "$");
        assert_eq!(after.footer_text, before.footer_text);
        assert_eq!(after.output_folder, before.output_folder);
        assert!(after.updated_at >= before.updated_at);

        let stored = repo.get_or_create("/data/pdfs").await.unwrap();
        assert_eq!(stored, after);
    }

    #[tokio::test]
    async fn test_invalid_update_is_not_persisted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();
        let before = repo.get_or_create("/data/pdfs").await.unwrap();

        let err = repo
            .update(
                SettingsPatch {
                    organization_name: Some("   ".to_string()),
                    footer_text: Some("changed".to_string()),
                    ..SettingsPatch::default()
                },
                "/data/pdfs",
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Rejected(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert_eq!(repo.get_or_create("/data/pdfs").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_blank_currency_symbol_is_repaired() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();
        repo.get_or_create("").await.unwrap();

        sqlx::query("UPDATE settings SET currency_symbol = '' WHERE id = 1")
            .execute(db.pool())
            .await
            .unwrap();

        let settings = repo.get_or_create("").await.unwrap();
        assert_eq!(settings.currency_symbol, DEFAULT_CURRENCY_SYMBOL);
    }
}
