use crate::entities::spp_period_entity as periods;
use crate::error::{AppError, AppResult};
use crate::models::SetPeriodRequest;
use chrono::Utc;
use regex::Regex;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct PeriodService {
    pool: std::sync::Arc<DatabaseConnection>,
}

impl PeriodService {
    pub fn new(pool: std::sync::Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    /// Periode aktif saat ini. Paling banyak satu baris `active = true`
    /// (dijaga oleh set_period); kalau tidak ada, semua operasi
    /// invoice/spin harus gagal, bukan pakai default diam-diam.
    pub async fn active_period(&self) -> AppResult<periods::Model> {
        periods::Entity::find()
            .filter(periods::Column::Active.eq(true))
            .order_by_desc(periods::Column::CreatedAt)
            .one(&*self.pool)
            .await?
            .ok_or(AppError::NoActivePeriod)
    }

    pub async fn list_periods(&self) -> AppResult<Vec<periods::Model>> {
        Ok(periods::Entity::find()
            .order_by_desc(periods::Column::Period)
            .all(&*self.pool)
            .await?)
    }

    /// Set periode aktif: nonaktifkan semua periode lalu upsert yang diminta.
    /// Perubahan amount menjalar ke invoice UNPAID/PENDING secara lazy lewat
    /// InvoiceService saat invoice berikutnya diakses.
    pub async fn set_period(&self, req: SetPeriodRequest) -> AppResult<periods::Model> {
        let period = req.period.trim().to_string();
        let re = Regex::new(r"^\d{4}-\d{2}$").expect("period regex");
        if !re.is_match(&period) {
            return Err(AppError::ValidationError(
                "Period harus format YYYY-MM".to_string(),
            ));
        }
        if req.amount < 0 {
            return Err(AppError::ValidationError("Amount invalid".to_string()));
        }
        let deadline = req.spin_deadline_day.unwrap_or(11);
        if !(1..=31).contains(&deadline) {
            return Err(AppError::ValidationError(
                "spin_deadline_day harus 1-31".to_string(),
            ));
        }

        // nonaktifkan semua periode lain
        periods::Entity::update_many()
            .col_expr(periods::Column::Active, Expr::value(false))
            .col_expr(periods::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&*self.pool)
            .await?;

        // upsert periode yang diminta
        let existing = periods::Entity::find()
            .filter(periods::Column::Period.eq(period.clone()))
            .one(&*self.pool)
            .await?;

        match existing {
            Some(m) => {
                let mut am: periods::ActiveModel = m.into();
                am.amount = Set(req.amount);
                am.spin_deadline_day = Set(deadline);
                am.active = Set(true);
                am.updated_at = Set(Some(Utc::now()));
                Ok(am.update(&*self.pool).await?)
            }
            None => Ok(periods::ActiveModel {
                id: Set(Uuid::new_v4()),
                period: Set(period),
                amount: Set(req.amount),
                spin_deadline_day: Set(deadline),
                active: Set(true),
                ..Default::default()
            }
            .insert(&*self.pool)
            .await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_no_active_period_is_fatal() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<periods::Model>::new()])
            .into_connection();

        let service = PeriodService::new(std::sync::Arc::new(db));
        match service.active_period().await {
            Err(AppError::NoActivePeriod) => {}
            other => panic!("expected NoActivePeriod, got {:?}", other.map(|m| m.period)),
        }
    }

    #[tokio::test]
    async fn test_set_period_rejects_bad_format() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = PeriodService::new(std::sync::Arc::new(db));

        let res = service
            .set_period(SetPeriodRequest {
                period: "2025/09".to_string(),
                amount: 200_000,
                spin_deadline_day: None,
            })
            .await;

        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_set_period_rejects_negative_amount() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = PeriodService::new(std::sync::Arc::new(db));

        let res = service
            .set_period(SetPeriodRequest {
                period: "2025-09".to_string(),
                amount: -1,
                spin_deadline_day: None,
            })
            .await;

        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }
}
