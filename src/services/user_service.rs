use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::auth_service::non_blank;
use crate::utils::*;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set,
};

/// Loads the account behind an authenticated identity.
pub async fn load_user<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<users::Model> {
    users::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_user_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        load_user(&self.pool, user_id).await.map(UserResponse::from)
    }

    pub async fn update_user_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        if request.first_name.is_none()
            && request.last_name.is_none()
            && request.phone_number.is_none()
        {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let mut model = load_user(&self.pool, user_id).await?.into_active_model();
        if request.first_name.is_some() {
            model.first_name = Set(non_blank(request.first_name));
        }
        if request.last_name.is_some() {
            model.last_name = Set(non_blank(request.last_name));
        }
        if request.phone_number.is_some() {
            model.phone_number = Set(non_blank(request.phone_number));
        }
        let updated = model.update(&self.pool).await?;

        log::info!("User {user_id} updated profile");
        Ok(UserResponse::from(updated))
    }

    /// A wrong current password is reported as a validation error.
    pub async fn change_password(
        &self,
        user_id: i64,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        let user = load_user(&self.pool, user_id).await?;
        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AppError::ValidationError(
                "Current password is incorrect".to_string(),
            ));
        }
        validate_password(&request.new_password)?;

        let password_hash = hash_password(&request.new_password)?;
        let mut model = user.into_active_model();
        model.password_hash = Set(password_hash);
        model.update(&self.pool).await?;

        log::info!("User {user_id} changed password");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn test_get_user_profile() {
        let db = setup_db().await;
        let user = create_user(&db, "profile@example.com").await;
        let service = UserService::new(db);

        let profile = service.get_user_profile(user.id).await.unwrap();
        assert_eq!(profile.email, "profile@example.com");
        assert_eq!(profile.name, "Test Reader");

        assert!(matches!(
            service.get_user_profile(user.id + 100).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_user_profile() {
        let db = setup_db().await;
        let user = create_user(&db, "profile@example.com").await;
        let service = UserService::new(db);

        let updated = service
            .update_user_profile(
                user.id,
                UpdateProfileRequest {
                    first_name: Some("Ada".to_string()),
                    phone_number: Some("+15550001111".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ada Reader");
        assert_eq!(updated.phone_number.as_deref(), Some("+15550001111"));

        let cleared = service
            .update_user_profile(
                user.id,
                UpdateProfileRequest {
                    last_name: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.last_name, None);
        assert_eq!(cleared.name, "Ada");
        assert_eq!(cleared.phone_number.as_deref(), Some("+15550001111"));

        assert!(matches!(
            service
                .update_user_profile(user.id, UpdateProfileRequest::default())
                .await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_change_password() {
        let db = setup_db().await;
        let user = create_user(&db, "password@example.com").await;
        let mut model = user.clone().into_active_model();
        model.password_hash = Set(hash_password("old-secret").unwrap());
        model.update(&db).await.unwrap();
        let service = UserService::new(db.clone());

        let wrong = service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: "not-it".to_string(),
                    new_password: "new-secret".to_string(),
                },
            )
            .await;
        assert!(matches!(wrong, Err(AppError::ValidationError(_))));

        let too_short = service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: "old-secret".to_string(),
                    new_password: "abc".to_string(),
                },
            )
            .await;
        assert!(matches!(too_short, Err(AppError::ValidationError(_))));

        service
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: "old-secret".to_string(),
                    new_password: "new-secret".to_string(),
                },
            )
            .await
            .unwrap();
        let stored = load_user(&db, user.id).await.unwrap();
        assert!(verify_password("new-secret", &stored.password_hash).unwrap());
        assert!(!verify_password("old-secret", &stored.password_hash).unwrap());
    }
}
