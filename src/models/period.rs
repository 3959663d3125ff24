use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::spp_period_entity as periods;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPeriodRequest {
    /// Format "YYYY-MM"
    pub period: String,
    /// Nominal SPP (rupiah)
    pub amount: i64,
    /// Default 11 kalau tidak dikirim
    pub spin_deadline_day: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PeriodResponse {
    pub id: Uuid,
    pub period: String,
    pub amount: i64,
    pub spin_deadline_day: i32,
    pub active: bool,
}

impl From<periods::Model> for PeriodResponse {
    fn from(m: periods::Model) -> Self {
        PeriodResponse {
            id: m.id,
            period: m.period,
            amount: m.amount,
            spin_deadline_day: m.spin_deadline_day,
            active: m.active,
        }
    }
}
