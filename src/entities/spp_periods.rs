use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Periode tagihan SPP.
/// - period: "YYYY-MM", unik
/// - amount: nominal SPP (rupiah) untuk periode ini
/// - spin_deadline_day: tanggal terakhir siswa boleh spin
/// - active: hanya satu periode aktif; diatur lewat set-period admin
///   (nonaktifkan semua lalu upsert), bukan oleh engine spin
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "spp_periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub period: String,
    pub amount: i64,
    pub spin_deadline_day: i32,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
