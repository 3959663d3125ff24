use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Jenis hadiah, menentukan aritmetika diskonnya:
/// - Fixed: potongan nominal `value` rupiah (di-clamp ke base_amount)
/// - Percent: floor(base * value / 100), di-clamp ke base_amount
/// - None: zonk, diskon 0
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)", enum_name = "prize_kind")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrizeKind {
    #[sea_orm(string_value = "FIXED")]
    Fixed,
    #[sea_orm(string_value = "PERCENT")]
    Percent,
    #[sea_orm(string_value = "NONE")]
    None,
}

impl std::fmt::Display for PrizeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrizeKind::Fixed => write!(f, "FIXED"),
            PrizeKind::Percent => write!(f, "PERCENT"),
            PrizeKind::None => write!(f, "NONE"),
        }
    }
}

/// Konfigurasi hadiah Lucky Spin untuk satu periode.
/// Invariant: 0 <= used <= quota. Kolom `used` hanya boleh ditulis lewat
/// conditional update di SpinService (compare-and-swap), jalur lain dilarang.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "spin_prizes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub period: String,
    /// NULL = berlaku untuk semua cabang
    pub branch_id: Option<Uuid>,
    pub label: String,
    pub kind: PrizeKind,
    pub value: i64,
    pub quota: i32,
    pub used: i32,
    pub active: bool,
    /// Bobot relatif undian (default 1)
    pub weight: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Masih punya jatah yang belum diklaim
    pub fn has_quota(&self) -> bool {
        self.used < self.quota
    }

    /// Boleh ikut diundi
    pub fn is_eligible(&self) -> bool {
        self.active && self.has_quota() && self.weight > 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
