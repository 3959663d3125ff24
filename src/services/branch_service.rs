use crate::entities::{UserRole, branch_entity as branches, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{
    BranchAdminResponse, BranchResponse, CreateBranchAdminRequest, CreateBranchRequest,
};
use crate::utils::{hash_password, validate_password};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Slug stabil dari kode cabang: lowercase, non-alfanumerik jadi "-".
fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = true; // buang dash di awal
    for c in input.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[derive(Clone)]
pub struct BranchService {
    pool: std::sync::Arc<DatabaseConnection>,
}

impl BranchService {
    pub fn new(pool: std::sync::Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    pub async fn create_branch(&self, req: CreateBranchRequest) -> AppResult<BranchResponse> {
        let code = req.code.trim().to_string();
        let name = req.name.trim().to_string();
        if code.is_empty() || name.is_empty() {
            return Err(AppError::ValidationError(
                "Kode & Nama cabang wajib".to_string(),
            ));
        }

        let created = branches::ActiveModel {
            id: Set(Uuid::new_v4()),
            slug: Set(slugify(&code)),
            code: Set(code),
            name: Set(name),
            address: Set(req.address.filter(|a| !a.trim().is_empty())),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        Ok(created.into())
    }

    pub async fn list_branches(&self) -> AppResult<Vec<BranchResponse>> {
        let list = branches::Entity::find()
            .order_by_asc(branches::Column::Name)
            .all(&*self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn get_branch(&self, branch_id: Uuid) -> AppResult<BranchResponse> {
        branches::Entity::find_by_id(branch_id)
            .one(&*self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Cabang tidak ditemukan".to_string()))
    }

    pub async fn create_branch_admin(
        &self,
        req: CreateBranchAdminRequest,
    ) -> AppResult<BranchAdminResponse> {
        let username = req.username.trim().to_lowercase();
        let name = req.name.trim().to_string();
        if username.is_empty() || name.is_empty() || req.password.is_empty() {
            return Err(AppError::ValidationError(
                "branch_id, username, name, password wajib".to_string(),
            ));
        }
        validate_password(&req.password)?;

        // cabangnya harus ada
        self.get_branch(req.branch_id).await?;

        let taken = users::Entity::find()
            .filter(users::Column::Username.eq(username.clone()))
            .one(&*self.pool)
            .await?;
        if taken.is_some() {
            return Err(AppError::ValidationError(
                "Username sudah terdaftar".to_string(),
            ));
        }

        let created = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            password_hash: Set(hash_password(&req.password)?),
            role: Set(UserRole::AdminCabang),
            name: Set(Some(name)),
            branch_id: Set(Some(req.branch_id)),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        Ok(created.into())
    }

    pub async fn list_branch_admins(&self) -> AppResult<Vec<BranchAdminResponse>> {
        let list = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::AdminCabang))
            .order_by_asc(users::Column::Username)
            .all(&*self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn delete_branch_admin(&self, user_id: Uuid) -> AppResult<()> {
        let res = users::Entity::delete_many()
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::Role.eq(UserRole::AdminCabang))
            .exec(&*self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(
                "Admin cabang tidak ditemukan".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("CBG-01"), "cbg-01");
        assert_eq!(slugify("  Cabang Utara  "), "cabang-utara");
        assert_eq!(slugify("a__b!!c"), "a-b-c");
        assert_eq!(slugify("--x--"), "x");
    }
}
