use crate::entities::{
    InvoiceStatus, PaymentStatus, invoice_entity as invoices, payment_entity as payments,
    spp_period_entity as periods, student_entity as students,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePaymentRequest, PaymentResponse, ReviewAction, ReviewPaymentRequest,
    StudentPaymentsQuery, StudentPaymentsResponse,
};
use crate::services::InvoiceService;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentService {
    pool: std::sync::Arc<DatabaseConnection>,
    invoice_service: InvoiceService,
}

impl PaymentService {
    pub fn new(pool: std::sync::Arc<DatabaseConnection>, invoice_service: InvoiceService) -> Self {
        Self {
            pool,
            invoice_service,
        }
    }

    /// Siswa mengajukan bukti bayar; payment dibuat PENDING dan invoice
    /// ikut PENDING sampai direview admin.
    pub async fn create_payment(
        &self,
        student_id: Uuid,
        req: CreatePaymentRequest,
    ) -> AppResult<PaymentResponse> {
        if req.proof_url.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Bukti bayar wajib diupload".to_string(),
            ));
        }

        let invoice = self
            .invoice_service
            .find_by_id(req.invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice tidak ditemukan".to_string()))?;

        if invoice.student_id != student_id {
            return Err(AppError::Forbidden);
        }
        if invoice.is_paid() {
            return Err(AppError::ValidationError("Invoice sudah PAID".to_string()));
        }

        let method = req
            .method
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "TRANSFER".to_string());

        let created = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice.id),
            method: Set(method),
            status: Set(PaymentStatus::Pending),
            proof_url: Set(Some(req.proof_url)),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        invoices::Entity::update_many()
            .col_expr(
                invoices::Column::Status,
                Expr::value(InvoiceStatus::Pending),
            )
            .filter(invoices::Column::Id.eq(invoice.id))
            .filter(invoices::Column::Status.eq(InvoiceStatus::Unpaid))
            .exec(&*self.pool)
            .await?;

        Ok(created.into())
    }

    /// Review admin: approve menandai invoice PAID (beku permanen),
    /// reject mengembalikan invoice ke UNPAID.
    pub async fn review(&self, req: ReviewPaymentRequest) -> AppResult<PaymentResponse> {
        let payment = payments::Entity::find_by_id(req.payment_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Pembayaran tidak ditemukan".to_string()))?;

        if payment.status != PaymentStatus::Pending {
            return Err(AppError::ValidationError(
                "Pembayaran sudah direview".to_string(),
            ));
        }

        let new_status = match req.action {
            ReviewAction::Approve => PaymentStatus::Approved,
            ReviewAction::Reject => PaymentStatus::Rejected,
        };

        let mut am: payments::ActiveModel = payment.clone().into();
        am.status = Set(new_status);
        let updated = am.update(&*self.pool).await?;

        match req.action {
            ReviewAction::Approve => {
                invoices::Entity::update_many()
                    .col_expr(invoices::Column::Status, Expr::value(InvoiceStatus::Paid))
                    .col_expr(invoices::Column::PaidAt, Expr::value(Utc::now()))
                    .filter(invoices::Column::Id.eq(payment.invoice_id))
                    .exec(&*self.pool)
                    .await?;
            }
            ReviewAction::Reject => {
                invoices::Entity::update_many()
                    .col_expr(
                        invoices::Column::Status,
                        Expr::value(InvoiceStatus::Unpaid),
                    )
                    .filter(invoices::Column::Id.eq(payment.invoice_id))
                    .filter(invoices::Column::Status.eq(InvoiceStatus::Pending))
                    .exec(&*self.pool)
                    .await?;
            }
        }

        Ok(updated.into())
    }

    /// Rekap satu siswa untuk layar admin: profil, periode aktif, invoice
    /// periode berjalan, riwayat invoice, dan payment terbaru per invoice.
    pub async fn student_payments(
        &self,
        query: StudentPaymentsQuery,
    ) -> AppResult<StudentPaymentsResponse> {
        let student = self.resolve_student(&query).await?;

        let active_period = periods::Entity::find()
            .filter(periods::Column::Active.eq(true))
            .order_by_desc(periods::Column::CreatedAt)
            .one(&*self.pool)
            .await?;

        let current_invoice = match &active_period {
            Some(p) => invoices::Entity::find()
                .filter(invoices::Column::StudentId.eq(student.id))
                .filter(invoices::Column::Period.eq(p.period.clone()))
                .one(&*self.pool)
                .await?,
            None => None,
        };

        let invoice_list = self.invoice_service.list_for_student(student.id).await?;
        let invoice_ids: Vec<Uuid> = invoice_list.iter().map(|i| i.id).collect();

        let mut latest: HashMap<String, PaymentResponse> = HashMap::new();
        if !invoice_ids.is_empty() {
            let rows = payments::Entity::find()
                .filter(payments::Column::InvoiceId.is_in(invoice_ids))
                .order_by(payments::Column::CreatedAt, Order::Desc)
                .all(&*self.pool)
                .await?;
            // sudah urut desc, entri pertama per invoice = yang terbaru
            for row in rows {
                latest
                    .entry(row.invoice_id.to_string())
                    .or_insert_with(|| row.into());
            }
        }

        Ok(StudentPaymentsResponse {
            student: student.into(),
            active_period: active_period.map(Into::into),
            current_invoice: current_invoice.map(Into::into),
            invoices: invoice_list.into_iter().map(Into::into).collect(),
            latest_payment_by_invoice: latest,
        })
    }

    async fn resolve_student(&self, query: &StudentPaymentsQuery) -> AppResult<students::Model> {
        if let Some(id) = query.student_id {
            return students::Entity::find_by_id(id)
                .one(&*self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Siswa tidak ditemukan.".to_string()));
        }

        let raw = query
            .nis
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::ValidationError("Wajib kirim nis atau student_id".to_string())
            })?;

        // NIS kadang tersimpan dengan leading zero ("0001" vs "1"),
        // cocokkan dua-duanya
        let mut cond = Condition::any().add(students::Column::Nis.eq(raw));
        if raw.chars().all(|c| c.is_ascii_digit()) {
            let stripped = raw.trim_start_matches('0');
            if !stripped.is_empty() && stripped != raw {
                cond = cond.add(students::Column::Nis.eq(stripped));
            }
        }

        students::Entity::find()
            .filter(cond)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Siswa tidak ditemukan.".to_string()))
    }
}
