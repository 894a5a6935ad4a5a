//! User repository.
//!
//! Users arrive via the external identity provider (upsert-on-login) and
//! are never deleted; transactions keep referencing them.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Profile fields supplied by the identity provider on login.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    /// Stable user ID from the identity provider.
    pub id: Uuid,
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Profile image URL.
    pub profile_image_url: Option<String>,
}

/// User repository for identity and role management.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no such user exists.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }

    /// Inserts or refreshes a user's profile.
    ///
    /// New users start as custodians; an existing user's role is never
    /// touched here (only admins change roles, via [`Self::update_role`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub async fn upsert(&self, input: UpsertUser) -> Result<users::Model, UserError> {
        let now = Utc::now().into();
        let model = users::ActiveModel {
            id: Set(input.id),
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            profile_image_url: Set(input.profile_image_url),
            role: Set(UserRole::Custodian),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let user = users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_columns([
                        users::Column::Email,
                        users::Column::FirstName,
                        users::Column::LastName,
                        users::Column::ProfileImageUrl,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        Ok(user)
    }

    /// Lists all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<users::Model>, UserError> {
        Ok(users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Changes a user's role.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no such user exists.
    pub async fn update_role(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<users::Model, UserError> {
        let user = self.find_by_id(user_id).await?;

        let mut active: users::ActiveModel = user.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}
