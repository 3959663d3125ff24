use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{PrizeKind, spin_prize_entity as prizes};

use super::InvoiceResponse;

/// Konfigurasi hadiah untuk tampilan admin / daftar hadiah siswa.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinPrizeResponse {
    pub id: Uuid,
    pub period: String,
    pub branch_id: Option<Uuid>,
    pub label: String,
    pub kind: PrizeKind,
    pub value: i64,
    pub quota: i32,
    pub used: i32,
    pub active: bool,
    pub weight: i32,
}

impl From<prizes::Model> for SpinPrizeResponse {
    fn from(m: prizes::Model) -> Self {
        SpinPrizeResponse {
            id: m.id,
            period: m.period,
            branch_id: m.branch_id,
            label: m.label,
            kind: m.kind,
            value: m.value,
            quota: m.quota,
            used: m.used,
            active: m.active,
            weight: m.weight,
        }
    }
}

/// Hadiah yang dimenangkan (field internal kuota tidak diekspos).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WonPrize {
    pub id: Uuid,
    pub label: String,
    pub kind: PrizeKind,
    pub value: i64,
}

impl From<prizes::Model> for WonPrize {
    fn from(m: prizes::Model) -> Self {
        WonPrize {
            id: m.id,
            label: m.label,
            kind: m.kind,
            value: m.value,
        }
    }
}

/// Hasil spin: hadiah + invoice yang sudah membawa diskon.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinResultResponse {
    pub prize: WonPrize,
    pub invoice: InvoiceResponse,
}

/// Daftar hadiah yang masih tersedia untuk siswa.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailablePrizesResponse {
    pub period: String,
    pub prizes: Vec<SpinPrizeResponse>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePrizeRequest {
    pub period: String,
    pub label: String,
    pub kind: PrizeKind,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub quota: i32,
    /// Default 1
    pub weight: Option<i32>,
    /// NULL = semua cabang
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PrizeListQuery {
    pub period: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClearPrizesQuery {
    pub period: String,
}
