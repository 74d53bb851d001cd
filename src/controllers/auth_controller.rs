//! Controller de autenticación
//!
//! Registro con bcrypt y login emitiendo JWT.

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::dto::common::ApiResponse;
use crate::dto::user_dto::UserResponse;
use crate::models::user::Role;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: UserRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt,
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        if self.repository.email_exists(&request.email).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let user = self
            .repository
            .create(
                request.name,
                request.email,
                password_hash,
                request.phone,
                request.role.unwrap_or(Role::Customer),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "User registered successfully".to_string(),
        ))
    }

    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> Result<ApiResponse<LoginResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        // Mismo error para email desconocido y password incorrecto
        let user = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        if !valid {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let access_token = generate_token(user.id, user.role, &self.jwt)?;

        let response = LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expiration,
            user: UserResponse::from(user),
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Login successful".to_string(),
        ))
    }
}
