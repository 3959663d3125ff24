use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{PaymentStatus, payment_entity as payments};

use super::{InvoiceResponse, PeriodResponse, StudentResponse};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub invoice_id: Uuid,
    /// Default "TRANSFER"
    pub method: Option<String>,
    /// Bukti bayar (URL yang sudah diupload client)
    pub proof_url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub method: String,
    pub status: PaymentStatus,
    pub proof_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<payments::Model> for PaymentResponse {
    fn from(m: payments::Model) -> Self {
        PaymentResponse {
            id: m.id,
            invoice_id: m.invoice_id,
            method: m.method,
            status: m.status,
            proof_url: m.proof_url,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReviewPaymentRequest {
    pub payment_id: Uuid,
    pub action: ReviewAction,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StudentPaymentsQuery {
    pub nis: Option<String>,
    pub student_id: Option<Uuid>,
}

/// Rekap pembayaran satu siswa untuk layar admin.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentPaymentsResponse {
    pub student: StudentResponse,
    pub active_period: Option<PeriodResponse>,
    pub current_invoice: Option<InvoiceResponse>,
    pub invoices: Vec<InvoiceResponse>,
    /// Payment terbaru per invoice, key = invoice id
    pub latest_payment_by_invoice: HashMap<String, PaymentResponse>,
}
