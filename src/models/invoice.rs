use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{InvoiceStatus, invoice_entity as invoices};

use super::PeriodResponse;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub period: String,
    pub base_amount: i64,
    pub discount_amount: i64,
    pub final_amount: i64,
    pub status: InvoiceStatus,
    pub spun_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<invoices::Model> for InvoiceResponse {
    fn from(m: invoices::Model) -> Self {
        InvoiceResponse {
            id: m.id,
            student_id: m.student_id,
            period: m.period,
            base_amount: m.base_amount,
            discount_amount: m.discount_amount,
            final_amount: m.final_amount,
            status: m.status,
            spun_at: m.spun_at,
            paid_at: m.paid_at,
        }
    }
}

/// Respons GET /siswa/invoice/current: periode aktif + invoice-nya.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentInvoiceResponse {
    pub period: PeriodResponse,
    pub invoice: InvoiceResponse,
}
