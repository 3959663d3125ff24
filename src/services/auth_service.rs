use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, MeResponse};
use crate::utils::{JwtService, hash_password, verify_password};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthService {
    pool: std::sync::Arc<DatabaseConnection>,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: std::sync::Arc<DatabaseConnection>, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    /// Login username/password. Pesan gagal sengaja seragam supaya tidak
    /// membocorkan apakah username terdaftar.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let username = request.username.trim().to_lowercase();
        if username.is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError(
                "Username & password wajib".to_string(),
            ));
        }

        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::IsActive.eq(true))
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Login gagal".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError("Login gagal".to_string()));
        }

        let access_token = self.jwt_service.generate_access_token(
            user.id,
            user.role,
            user.student_id,
            user.branch_id,
        )?;
        let refresh_token = self.jwt_service.generate_refresh_token(
            user.id,
            user.role,
            user.student_id,
            user.branch_id,
        )?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
            role: user.role,
        })
    }

    pub async fn me(&self, user_id: Uuid) -> AppResult<MeResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User tidak ditemukan".to_string()))?;

        Ok(MeResponse {
            user_id: user.id,
            username: user.username,
            role: user.role,
            name: user.name,
            student_id: user.student_id,
            branch_id: user.branch_id,
        })
    }

    /// Bootstrap akun superadmin saat startup kalau belum ada.
    pub async fn ensure_superadmin(&self, username: &str, password: &str) -> AppResult<()> {
        let username = username.trim().to_lowercase();

        let existing = users::Entity::find()
            .filter(users::Column::Username.eq(username.clone()))
            .one(&*self.pool)
            .await?;

        if existing.is_some() {
            return Ok(());
        }

        users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.clone()),
            password_hash: Set(hash_password(password)?),
            role: Set(UserRole::SuperAdmin),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        log::info!("Akun superadmin '{username}' dibuat");
        Ok(())
    }
}
