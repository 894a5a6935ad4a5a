//! Settings repository: a simple audited key/value store.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::settings;

/// Well-known setting: balance below this value triggers a low-float warning.
pub const LOW_BALANCE_THRESHOLD_KEY: &str = "low_balance_threshold";

/// Error types for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    db: DatabaseConnection,
}

impl SettingRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a setting value by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, SettingError> {
        let setting = settings::Entity::find()
            .filter(settings::Column::Key.eq(key))
            .one(&self.db)
            .await?;

        Ok(setting.map(|s| s.value))
    }

    /// Sets a setting value, recording who changed it.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        updated_by: Uuid,
    ) -> Result<settings::Model, SettingError> {
        let model = settings::ActiveModel {
            id: Set(Uuid::new_v4()),
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_by: Set(updated_by),
            updated_at: Set(Utc::now().into()),
        };

        let setting = settings::Entity::insert(model)
            .on_conflict(
                OnConflict::column(settings::Column::Key)
                    .update_columns([
                        settings::Column::Value,
                        settings::Column::UpdatedBy,
                        settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        Ok(setting)
    }
}
