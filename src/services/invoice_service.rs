use crate::entities::{InvoiceStatus, invoice_entity as invoices, spp_period_entity as periods};
use crate::error::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct InvoiceService {
    pool: std::sync::Arc<DatabaseConnection>,
}

impl InvoiceService {
    pub fn new(pool: std::sync::Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    /// Ambil invoice siswa untuk periode yang diberikan, buat lazy kalau
    /// belum ada. Idempoten: dipanggil berulang sebelum spin/bayar
    /// menghasilkan invoice yang ekuivalen.
    ///
    /// Kalau admin mengubah nominal SPP setelah invoice dibuat, invoice
    /// yang belum PAID di-resync: base_amount mengikuti periode,
    /// final_amount dihitung ulang, discount_amount tidak disentuh.
    /// Invoice PAID tidak pernah dimutasi.
    pub async fn get_or_create(
        &self,
        period: &periods::Model,
        student_id: Uuid,
    ) -> AppResult<invoices::Model> {
        let existing = invoices::Entity::find()
            .filter(invoices::Column::StudentId.eq(student_id))
            .filter(invoices::Column::Period.eq(period.period.clone()))
            .one(&*self.pool)
            .await?;

        if let Some(inv) = existing {
            if !inv.is_paid() && inv.base_amount != period.amount {
                return self.resync_amount(inv, period.amount).await;
            }
            return Ok(inv);
        }

        let base = period.amount;
        invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            period: Set(period.period.clone()),
            base_amount: Set(base),
            discount_amount: Set(0),
            final_amount: Set(base),
            status: Set(InvoiceStatus::Unpaid),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await
        .map_err(|e| {
            log::error!(
                "Gagal membuat invoice {} untuk siswa {student_id}: {e}",
                period.period
            );
            AppError::InvoiceUnavailable
        })
    }

    /// Riwayat invoice satu siswa, periode terbaru dulu.
    pub async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<invoices::Model>> {
        Ok(invoices::Entity::find()
            .filter(invoices::Column::StudentId.eq(student_id))
            .order_by_desc(invoices::Column::Period)
            .all(&*self.pool)
            .await?)
    }

    pub async fn find_by_id(&self, invoice_id: Uuid) -> AppResult<Option<invoices::Model>> {
        Ok(invoices::Entity::find_by_id(invoice_id)
            .one(&*self.pool)
            .await?)
    }

    async fn resync_amount(
        &self,
        inv: invoices::Model,
        new_base: i64,
    ) -> AppResult<invoices::Model> {
        let new_final = (new_base - inv.discount_amount).max(0);

        invoices::Entity::update_many()
            .col_expr(invoices::Column::BaseAmount, Expr::value(new_base))
            .col_expr(invoices::Column::FinalAmount, Expr::value(new_final))
            .filter(invoices::Column::Id.eq(inv.id))
            .exec(&*self.pool)
            .await?;

        invoices::Entity::find_by_id(inv.id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError("Invoice hilang setelah resync".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn period(amount: i64) -> periods::Model {
        periods::Model {
            id: Uuid::new_v4(),
            period: "2025-09".to_string(),
            amount,
            spin_deadline_day: 11,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn invoice(base: i64, discount: i64, status: InvoiceStatus) -> invoices::Model {
        invoices::Model {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            period: "2025-09".to_string(),
            base_amount: base,
            discount_amount: discount,
            final_amount: (base - discount).max(0),
            status,
            spun_at: None,
            paid_at: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_creates_invoice_when_absent() {
        let p = period(200_000);
        let created = invoice(200_000, 0, InvoiceStatus::Unpaid);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<invoices::Model>::new(), vec![created.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let service = InvoiceService::new(std::sync::Arc::new(db));
        let got = service.get_or_create(&p, created.student_id).await.unwrap();

        assert_eq!(got.base_amount, 200_000);
        assert_eq!(got.discount_amount, 0);
        assert_eq!(got.final_amount, 200_000);
        assert_eq!(got.status, InvoiceStatus::Unpaid);
    }

    #[tokio::test]
    async fn test_resyncs_unpaid_invoice_after_amount_change() {
        // admin menaikkan SPP 200rb -> 250rb setelah invoice dibuat
        let p = period(250_000);
        let stale = invoice(200_000, 10_000, InvoiceStatus::Unpaid);
        let mut synced = stale.clone();
        synced.base_amount = 250_000;
        synced.final_amount = 240_000;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stale.clone()], vec![synced.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let service = InvoiceService::new(std::sync::Arc::new(db));
        let got = service.get_or_create(&p, stale.student_id).await.unwrap();

        assert_eq!(got.base_amount, 250_000);
        // diskon hasil spin tidak ikut berubah
        assert_eq!(got.discount_amount, 10_000);
        assert_eq!(got.final_amount, 240_000);
    }

    #[tokio::test]
    async fn test_paid_invoice_never_mutated() {
        let p = period(250_000);
        let paid = invoice(200_000, 0, InvoiceStatus::Paid);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![paid.clone()]])
            .into_connection();

        let service = InvoiceService::new(std::sync::Arc::new(db));
        let got = service.get_or_create(&p, paid.student_id).await.unwrap();

        // nominal lama dipertahankan walau periode sudah berubah
        assert_eq!(got.base_amount, 200_000);
        assert_eq!(got.status, InvoiceStatus::Paid);
    }
}
