use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

const DEFAULT_ROLE: &str = "USER";

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn signup(&self, request: SignupRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        validate_password(&request.password)?;

        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Email {email} is already in use"
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let user = users::ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            first_name: Set(non_blank(request.first_name)),
            last_name: Set(non_blank(request.last_name)),
            phone_number: Set(non_blank(request.phone_number)),
            role: Set(DEFAULT_ROLE.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("User {} registered", user.id);
        self.issue_token(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        let invalid = || AppError::AuthError("Invalid email or password".to_string());

        let user = self.find_by_email(&email).await?.ok_or_else(invalid)?;
        if !verify_password(&request.password, &user.password_hash)? {
            log::warn!("Failed login attempt for user {}", user.id);
            return Err(invalid());
        }

        self.issue_token(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?)
    }

    fn issue_token(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token = self
            .jwt_service
            .generate_access_token(user.id, &user.email)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
