//! Controller de Users
//!
//! CRUD del directorio de usuarios con las reglas de autorización:
//! un customer solo puede mutar su propio perfil y nunca su rol.

use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::user_dto::{UpdateUserRequest, UserResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::Role;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<ApiResponse<Vec<UserResponse>>, AppError> {
        if caller.role != Role::Admin {
            return Err(AppError::Forbidden(
                "Only admins can list users".to_string(),
            ));
        }

        let users = self.repository.find_all().await?;
        let response = users.into_iter().map(UserResponse::from).collect();

        Ok(ApiResponse::success_with_message(
            response,
            "Users retrieved successfully".to_string(),
        ))
    }

    pub async fn update(
        &self,
        target_id: i32,
        caller: &AuthenticatedUser,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        if caller.role != Role::Admin {
            if caller.user_id != target_id {
                return Err(AppError::Forbidden(
                    "You can only update your own profile".to_string(),
                ));
            }

            if request.role.is_some() {
                return Err(AppError::Forbidden(
                    "Only admins can change roles".to_string(),
                ));
            }
        }

        if let Some(ref email) = request.email {
            let current = self
                .repository
                .find_by_id(target_id)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

            let registered = self.repository.email_exists(email).await?;
            if email_is_conflict(email, &current.email, registered) {
                return Err(AppError::Conflict("Email is already in use".to_string()));
            }
        }

        let password_hash = match request.password {
            Some(password) => {
                Some(hash(&password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?)
            }
            None => None,
        };

        let user = self
            .repository
            .update(
                target_id,
                request.name,
                request.email,
                password_hash,
                request.phone,
                request.role,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "User updated successfully".to_string(),
        ))
    }

    pub async fn delete(
        &self,
        target_id: i32,
        caller: &AuthenticatedUser,
    ) -> Result<ApiResponse<()>, AppError> {
        if caller.role != Role::Admin {
            return Err(AppError::Forbidden(
                "Only admins can delete users".to_string(),
            ));
        }

        self.repository.delete(target_id).await?;

        Ok(ApiResponse {
            success: true,
            message: Some("User deleted successfully".to_string()),
            data: None,
        })
    }
}

/// Un email ya registrado por otro usuario es un conflicto de negocio.
/// Conservar el email propio no cuenta como duplicado aunque
/// `email_exists` encuentre la propia fila.
fn email_is_conflict(requested: &str, current: &str, already_registered: bool) -> bool {
    requested != current && already_registered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_change_to_taken_address_is_conflict() {
        assert!(email_is_conflict(
            "nuevo@example.com",
            "viejo@example.com",
            true
        ));
    }

    #[test]
    fn test_email_change_to_free_address_is_allowed() {
        assert!(!email_is_conflict(
            "nuevo@example.com",
            "viejo@example.com",
            false
        ));
    }

    #[test]
    fn test_keeping_own_email_is_not_a_conflict() {
        assert!(!email_is_conflict(
            "mismo@example.com",
            "mismo@example.com",
            true
        ));
    }
}
