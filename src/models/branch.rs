use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{branch_entity as branches, user_entity as users};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBranchRequest {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BranchResponse {
    pub id: Uuid,
    pub code: String,
    pub slug: String,
    pub name: String,
    pub address: Option<String>,
}

impl From<branches::Model> for BranchResponse {
    fn from(m: branches::Model) -> Self {
        BranchResponse {
            id: m.id,
            code: m.code,
            slug: m.slug,
            name: m.name,
            address: m.address,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBranchAdminRequest {
    pub branch_id: Uuid,
    pub username: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BranchAdminResponse {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub branch_id: Option<Uuid>,
    pub is_active: bool,
}

impl From<users::Model> for BranchAdminResponse {
    fn from(m: users::Model) -> Self {
        BranchAdminResponse {
            id: m.id,
            username: m.username,
            name: m.name,
            branch_id: m.branch_id,
            is_active: m.is_active,
        }
    }
}
