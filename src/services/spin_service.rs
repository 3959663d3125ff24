use crate::entities::{
    PrizeKind, invoice_entity as invoices, spin_log_entity as spin_logs,
    spin_prize_entity as prizes, student_entity as students,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AvailablePrizesResponse, CreatePrizeRequest, SpinPrizeResponse, SpinResultResponse,
};
use crate::services::{InvoiceService, PeriodService};
use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, UpdateResult,
};
use uuid::Uuid;

/// Batas percobaan klaim kuota saat kalah race (cukup untuk kontensi wajar).
const MAX_CLAIM_ATTEMPTS: usize = 3;

/// Undian berbobot di atas kandidat yang eligible
/// (active, used < quota, weight > 0).
///
/// Tarik r uniform di [1, total_weight] lalu jalan sepanjang daftar sambil
/// mengurangi bobot; hadiah tempat r jatuh <= 0 yang menang. Tidak bias untuk
/// distribusi bobot apa pun karena tiap satuan bobot memetakan tepat satu
/// nilai r. Mengembalikan None kalau tidak ada kandidat atau total bobot <= 0
/// ("hadiah habis", bukan error yang perlu di-retry).
pub fn pick_weighted(candidates: &[prizes::Model]) -> Option<prizes::Model> {
    let eligible: Vec<&prizes::Model> = candidates.iter().filter(|p| p.is_eligible()).collect();

    let total: i64 = eligible.iter().map(|p| p.weight as i64).sum();
    if eligible.is_empty() || total <= 0 {
        return None;
    }

    let mut rng = rand::thread_rng();
    let mut r: i64 = rng.gen_range(1..=total);
    for p in &eligible {
        r -= p.weight as i64;
        if r <= 0 {
            return Some((*p).clone());
        }
    }
    eligible.last().map(|p| (*p).clone())
}

/// Aritmetika diskon, deterministik:
/// - FIXED: clamp(value, 0, base)
/// - PERCENT: clamp(floor(base * value / 100), 0, base)
/// - NONE: 0
pub fn compute_discount(kind: PrizeKind, value: i64, base_amount: i64) -> i64 {
    match kind {
        PrizeKind::Fixed => value.max(0).min(base_amount),
        PrizeKind::Percent => (base_amount * value.max(0) / 100).max(0).min(base_amount),
        PrizeKind::None => 0,
    }
}

#[derive(Clone)]
pub struct SpinService {
    pool: std::sync::Arc<DatabaseConnection>,
    period_service: PeriodService,
    invoice_service: InvoiceService,
}

impl SpinService {
    pub fn new(
        pool: std::sync::Arc<DatabaseConnection>,
        period_service: PeriodService,
        invoice_service: InvoiceService,
    ) -> Self {
        Self {
            pool,
            period_service,
            invoice_service,
        }
    }

    /// Daftar hadiah yang masih bisa keluar untuk siswa ini
    /// (periode aktif, scope cabang, kuota belum habis).
    pub async fn available_prizes(&self, student_id: Uuid) -> AppResult<AvailablePrizesResponse> {
        let period = self.period_service.active_period().await?;
        let student = self.find_student(student_id).await?;

        let mut list = self
            .scoped_prizes(&period.period, student.branch_id)
            .await?;
        list.retain(|p| p.has_quota());

        Ok(AvailablePrizesResponse {
            period: period.period,
            prizes: list.into_iter().map(Into::into).collect(),
        })
    }

    /// Spin untuk siswa yang sedang login.
    pub async fn spin(&self, student_id: Uuid) -> AppResult<SpinResultResponse> {
        self.spin_at(student_id, Utc::now()).await
    }

    /// Orkestrasi spin lengkap. `now` di-inject supaya batas deadline dan
    /// stempel spun_at bisa diuji; state machine per (siswa, periode):
    /// NOT_SPUN -> SPUN, terminal.
    ///
    /// Urutan prasyarat (masing-masing penolakan berbeda):
    /// 1. siswa harus ada
    /// 2. tanggal <= spin_deadline_day
    /// 3. invoice periode aktif bisa diambil/dibuat
    /// 4. belum pernah spin (spun_at null)
    /// 5. ada hadiah eligible
    pub async fn spin_at(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<SpinResultResponse> {
        let period = self.period_service.active_period().await?;
        let student = self.find_student(student_id).await?;

        if now.day() > period.spin_deadline_day as u32 {
            return Err(AppError::DeadlinePassed(period.spin_deadline_day));
        }

        let invoice = self
            .invoice_service
            .get_or_create(&period, student_id)
            .await?;

        if invoice.has_spun() {
            return Err(AppError::AlreadySpun);
        }

        let candidates = self
            .scoped_prizes(&period.period, student.branch_id)
            .await?;
        let chosen = pick_weighted(&candidates).ok_or(AppError::NoPrizesAvailable)?;

        let prize = self
            .claim_quota(chosen, &period.period, student.branch_id)
            .await?;

        let discount = compute_discount(prize.kind, prize.value, invoice.base_amount);
        let final_amount = (invoice.base_amount - discount).max(0);

        let updated_invoice = self
            .commit_discount(&invoice, discount, final_amount, now)
            .await?;

        // audit best-effort, bukan bagian batas transaksional
        self.append_spin_log(student_id, invoice.id, prize.id, discount, now)
            .await;

        Ok(SpinResultResponse {
            prize: prize.into(),
            invoice: updated_invoice.into(),
        })
    }

    // -----------------------------
    // Admin: konfigurasi hadiah
    // -----------------------------

    pub async fn create_prize(&self, req: CreatePrizeRequest) -> AppResult<SpinPrizeResponse> {
        let label = req.label.trim().to_string();
        if label.is_empty() {
            return Err(AppError::ValidationError("Label wajib".to_string()));
        }
        if req.quota < 0 {
            return Err(AppError::ValidationError("Quota invalid".to_string()));
        }
        let weight = req.weight.unwrap_or(1);
        if weight < 0 {
            return Err(AppError::ValidationError("Weight invalid".to_string()));
        }

        let created = prizes::ActiveModel {
            id: Set(Uuid::new_v4()),
            period: Set(req.period.trim().to_string()),
            branch_id: Set(req.branch_id),
            label: Set(label),
            kind: Set(req.kind),
            value: Set(req.value),
            quota: Set(req.quota),
            used: Set(0),
            active: Set(true),
            weight: Set(weight),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        Ok(created.into())
    }

    pub async fn list_prizes(&self, period: &str) -> AppResult<Vec<SpinPrizeResponse>> {
        let list = prizes::Entity::find()
            .filter(prizes::Column::Period.eq(period))
            .order_by_asc(prizes::Column::CreatedAt)
            .all(&*self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn delete_prize(&self, prize_id: Uuid) -> AppResult<()> {
        let res = prizes::Entity::delete_by_id(prize_id)
            .exec(&*self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Hadiah tidak ditemukan".to_string()));
        }
        Ok(())
    }

    /// Hapus semua hadiah satu periode berikut log spin-nya.
    /// Mengembalikan jumlah hadiah yang terhapus.
    pub async fn clear_prizes(&self, period: &str) -> AppResult<u64> {
        let ids: Vec<Uuid> = prizes::Entity::find()
            .filter(prizes::Column::Period.eq(period))
            .all(&*self.pool)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        if ids.is_empty() {
            return Ok(0);
        }

        // log menunjuk hadiah lewat FK, hapus dulu
        spin_logs::Entity::delete_many()
            .filter(spin_logs::Column::PrizeId.is_in(ids.clone()))
            .exec(&*self.pool)
            .await?;

        let res = prizes::Entity::delete_many()
            .filter(prizes::Column::Period.eq(period))
            .exec(&*self.pool)
            .await?;

        Ok(res.rows_affected)
    }

    // -----------------------------
    // Internal
    // -----------------------------

    async fn find_student(&self, student_id: Uuid) -> AppResult<students::Model> {
        students::Entity::find_by_id(student_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Siswa tidak ditemukan.".to_string()))
    }

    /// Hadiah aktif milik periode, terbatas scope cabang siswa
    /// (branch_id NULL = semua cabang). Kelayakan kuota/bobot difilter
    /// di sisi kode, bukan query.
    async fn scoped_prizes(
        &self,
        period: &str,
        branch_id: Option<Uuid>,
    ) -> AppResult<Vec<prizes::Model>> {
        let scope = match branch_id {
            Some(b) => Condition::any()
                .add(prizes::Column::BranchId.is_null())
                .add(prizes::Column::BranchId.eq(b)),
            None => Condition::any().add(prizes::Column::BranchId.is_null()),
        };

        Ok(prizes::Entity::find()
            .filter(prizes::Column::Period.eq(period))
            .filter(prizes::Column::Active.eq(true))
            .filter(scope)
            .order_by_asc(prizes::Column::CreatedAt)
            .all(&*self.pool)
            .await?)
    }

    /// Klaim satu unit kuota hadiah terpilih.
    ///
    /// Compare-and-swap pada kolom `used`: increment hanya kalau nilai
    /// tersimpan masih sama dengan yang barusan dibaca. Kalah race ->
    /// ambil ulang kandidat, undi ulang, coba lagi (kandidat baru boleh
    /// berbeda dari yang pertama). Ini satu-satunya jalur tulis ke `used`,
    /// sehingga used <= quota terjaga berapa pun jumlah pemanggil paralel.
    async fn claim_quota(
        &self,
        mut chosen: prizes::Model,
        period: &str,
        branch_id: Option<Uuid>,
    ) -> AppResult<prizes::Model> {
        for attempt in 1..=MAX_CLAIM_ATTEMPTS {
            let update: UpdateResult = prizes::Entity::update_many()
                .col_expr(
                    prizes::Column::Used,
                    Expr::col(prizes::Column::Used).add(1),
                )
                .filter(prizes::Column::Id.eq(chosen.id))
                .filter(prizes::Column::Used.eq(chosen.used))
                .exec(&*self.pool)
                .await?;

            if update.rows_affected == 1 {
                return prizes::Entity::find_by_id(chosen.id)
                    .one(&*self.pool)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError("Hadiah hilang setelah klaim".to_string())
                    });
            }

            log::warn!(
                "Kalah race klaim kuota hadiah {} (percobaan {attempt}/{MAX_CLAIM_ATTEMPTS})",
                chosen.id
            );

            if attempt == MAX_CLAIM_ATTEMPTS {
                break;
            }

            let candidates = self.scoped_prizes(period, branch_id).await?;
            match pick_weighted(&candidates) {
                Some(next) => chosen = next,
                None => break,
            }
        }

        Err(AppError::ClaimFailed)
    }

    /// Commit diskon ke invoice, dijaga `spun_at IS NULL` supaya spin kedua
    /// yang lolos pengecekan awal tetap tertolak di tingkat store.
    ///
    /// Klaim kuota dan commit ini adalah dua tulisan terpisah: kalau commit
    /// gagal setelah klaim sukses, satu unit kuota hangus (lebih baik hadiah
    /// kurang tersedia daripada terbagi dobel) dan dicatat untuk rekonsiliasi.
    async fn commit_discount(
        &self,
        invoice: &invoices::Model,
        discount: i64,
        final_amount: i64,
        now: DateTime<Utc>,
    ) -> AppResult<invoices::Model> {
        let update = invoices::Entity::update_many()
            .col_expr(invoices::Column::DiscountAmount, Expr::value(discount))
            .col_expr(invoices::Column::FinalAmount, Expr::value(final_amount))
            .col_expr(invoices::Column::SpunAt, Expr::value(now))
            .filter(invoices::Column::Id.eq(invoice.id))
            .filter(invoices::Column::SpunAt.is_null())
            .exec(&*self.pool)
            .await;

        let update = match update {
            Ok(u) => u,
            Err(e) => {
                log::error!(
                    "Commit diskon invoice {} gagal padahal kuota sudah terpotong, perlu rekonsiliasi: {e}",
                    invoice.id
                );
                return Err(e.into());
            }
        };

        if update.rows_affected == 0 {
            log::error!(
                "Invoice {} keburu spin saat commit, satu unit kuota hangus untuk rekonsiliasi",
                invoice.id
            );
            return Err(AppError::AlreadySpun);
        }

        invoices::Entity::find_by_id(invoice.id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError("Invoice hilang setelah commit".to_string()))
    }

    /// Tulis audit trail; gagal hanya dicatat, tidak pernah membatalkan spin.
    async fn append_spin_log(
        &self,
        student_id: Uuid,
        invoice_id: Uuid,
        prize_id: Uuid,
        discount: i64,
        now: DateTime<Utc>,
    ) {
        let row = spin_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            invoice_id: Set(invoice_id),
            prize_id: Set(prize_id),
            discount_amount: Set(discount),
            spun_at: Set(now),
            ..Default::default()
        };

        if let Err(e) = row.insert(&*self.pool).await {
            log::error!("Gagal menulis spin_logs untuk invoice {invoice_id}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{InvoiceStatus, spp_period_entity as periods};
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn prize(label: &str, kind: PrizeKind, value: i64, quota: i32, used: i32, weight: i32) -> prizes::Model {
        prizes::Model {
            id: Uuid::new_v4(),
            period: "2025-09".to_string(),
            branch_id: None,
            label: label.to_string(),
            kind,
            value,
            quota,
            used,
            active: true,
            weight,
            created_at: None,
        }
    }

    fn period(amount: i64, deadline: i32) -> periods::Model {
        periods::Model {
            id: Uuid::new_v4(),
            period: "2025-09".to_string(),
            amount,
            spin_deadline_day: deadline,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn student() -> students::Model {
        students::Model {
            id: Uuid::new_v4(),
            nis: "0001".to_string(),
            nama: "Budi".to_string(),
            kelas: "7A".to_string(),
            phone: None,
            branch_id: None,
            created_at: None,
        }
    }

    fn invoice(student_id: Uuid, base: i64, spun_at: Option<DateTime<Utc>>) -> invoices::Model {
        invoices::Model {
            id: Uuid::new_v4(),
            student_id,
            period: "2025-09".to_string(),
            base_amount: base,
            discount_amount: 0,
            final_amount: base,
            status: InvoiceStatus::Unpaid,
            spun_at,
            paid_at: None,
            created_at: None,
        }
    }

    fn service(db: DatabaseConnection) -> SpinService {
        let db = std::sync::Arc::new(db);
        SpinService::new(
            db.clone(),
            PeriodService::new(db.clone()),
            InvoiceService::new(db),
        )
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn exec_conflict() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }
    }

    // -----------------------------
    // pick_weighted
    // -----------------------------

    #[test]
    fn test_pick_returns_none_without_candidates() {
        assert!(pick_weighted(&[]).is_none());
    }

    #[test]
    fn test_pick_returns_none_when_total_weight_zero() {
        let list = vec![prize("Zonk", PrizeKind::None, 0, 10, 0, 0)];
        assert!(pick_weighted(&list).is_none());
    }

    #[test]
    fn test_pick_skips_inactive_and_exhausted() {
        let mut off = prize("Mati", PrizeKind::Fixed, 5_000, 10, 0, 100);
        off.active = false;
        let empty = prize("Habis", PrizeKind::Fixed, 5_000, 5, 5, 100);
        let alive = prize("Hidup", PrizeKind::Fixed, 5_000, 10, 3, 1);

        for _ in 0..50 {
            let won = pick_weighted(&[off.clone(), empty.clone(), alive.clone()]).unwrap();
            assert_eq!(won.label, "Hidup");
        }
    }

    #[test]
    fn test_pick_is_weight_proportional() {
        // bobot 90:10 -> rasio empiris harus mendekati 9:1
        let list = vec![
            prize("Diskon 10rb", PrizeKind::Fixed, 10_000, 1_000_000, 0, 90),
            prize("Zonk", PrizeKind::None, 0, 1_000_000, 0, 10),
        ];

        let draws = 100_000;
        let mut wins = 0u32;
        for _ in 0..draws {
            if pick_weighted(&list).unwrap().label == "Diskon 10rb" {
                wins += 1;
            }
        }

        // ekspektasi 90_000, sigma ~95; margin 2_000 sudah > 20 sigma
        assert!(
            (88_000..=92_000).contains(&wins),
            "selection ratio off: {wins}/{draws}"
        );
    }

    // -----------------------------
    // compute_discount
    // -----------------------------

    #[test]
    fn test_discount_fixed() {
        assert_eq!(compute_discount(PrizeKind::Fixed, 10_000, 200_000), 10_000);
        // dipotong sampai base kalau nominal lebih besar
        assert_eq!(compute_discount(PrizeKind::Fixed, 500_000, 200_000), 200_000);
        assert_eq!(compute_discount(PrizeKind::Fixed, -5_000, 200_000), 0);
    }

    #[test]
    fn test_discount_percent_floors() {
        assert_eq!(compute_discount(PrizeKind::Percent, 15, 200_000), 30_000);
        assert_eq!(compute_discount(PrizeKind::Percent, 15, 199_999), 29_999);
        assert_eq!(compute_discount(PrizeKind::Percent, 150, 200_000), 200_000);
        assert_eq!(compute_discount(PrizeKind::Percent, -10, 200_000), 0);
    }

    #[test]
    fn test_discount_none_is_zero() {
        assert_eq!(compute_discount(PrizeKind::None, 99_999, 200_000), 0);
    }

    #[test]
    fn test_discount_always_within_bounds() {
        for (kind, value) in [
            (PrizeKind::Fixed, 0),
            (PrizeKind::Fixed, 123_456),
            (PrizeKind::Percent, 1),
            (PrizeKind::Percent, 99),
            (PrizeKind::None, 42),
        ] {
            for base in [0i64, 1, 199_999, 200_000, 5_000_000] {
                let d = compute_discount(kind, value, base);
                assert!((0..=base).contains(&d), "kind={kind:?} value={value} base={base} d={d}");
            }
        }
    }

    // -----------------------------
    // spin orchestration
    // -----------------------------

    #[tokio::test]
    async fn test_spin_succeeds_on_deadline_day() {
        let p = period(200_000, 11);
        let s = student();
        let inv = invoice(s.id, 200_000, None);
        let won = prize("Diskon 10rb", PrizeKind::Fixed, 10_000, 100, 0, 90);
        let mut claimed = won.clone();
        claimed.used = 1;
        let mut committed = inv.clone();
        committed.discount_amount = 10_000;
        committed.final_amount = 190_000;

        let now = Utc.with_ymd_and_hms(2025, 9, 11, 9, 0, 0).unwrap();
        committed.spun_at = Some(now);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![p]])
            .append_query_results([vec![s.clone()]])
            .append_query_results([vec![inv.clone()]])
            .append_query_results([vec![won.clone()]])
            .append_query_results([vec![claimed.clone()]])
            .append_query_results([vec![committed.clone()]])
            .append_query_results([vec![spin_logs::Model {
                id: Uuid::new_v4(),
                student_id: s.id,
                invoice_id: inv.id,
                prize_id: won.id,
                discount_amount: 10_000,
                spun_at: now,
                created_at: None,
            }]])
            .append_exec_results([exec_ok(), exec_ok(), exec_ok()])
            .into_connection();

        let result = service(db).spin_at(s.id, now).await.unwrap();

        assert_eq!(result.prize.label, "Diskon 10rb");
        assert_eq!(result.invoice.discount_amount, 10_000);
        assert_eq!(result.invoice.final_amount, 190_000);
        assert_eq!(result.invoice.status, InvoiceStatus::Unpaid);
        assert!(result.invoice.spun_at.is_some());
    }

    #[tokio::test]
    async fn test_spin_rejected_day_after_deadline() {
        let p = period(200_000, 11);
        let s = student();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![p]])
            .append_query_results([vec![s.clone()]])
            .into_connection();

        let now = Utc.with_ymd_and_hms(2025, 9, 12, 0, 30, 0).unwrap();
        let res = service(db).spin_at(s.id, now).await;

        assert!(matches!(res, Err(AppError::DeadlinePassed(11))));
    }

    #[tokio::test]
    async fn test_second_spin_rejected() {
        let p = period(200_000, 11);
        let s = student();
        let now = Utc.with_ymd_and_hms(2025, 9, 10, 9, 0, 0).unwrap();
        let inv = invoice(s.id, 200_000, Some(now));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![p]])
            .append_query_results([vec![s.clone()]])
            .append_query_results([vec![inv]])
            .into_connection();

        let res = service(db).spin_at(s.id, now).await;

        assert!(matches!(res, Err(AppError::AlreadySpun)));
    }

    #[tokio::test]
    async fn test_spin_fails_when_only_prize_exhausted() {
        let p = period(200_000, 11);
        let s = student();
        let inv = invoice(s.id, 200_000, None);
        // quota 1, used 1: tidak eligible
        let exhausted = prize("Diskon 10rb", PrizeKind::Fixed, 10_000, 1, 1, 90);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![p]])
            .append_query_results([vec![s.clone()]])
            .append_query_results([vec![inv]])
            .append_query_results([vec![exhausted]])
            .into_connection();

        let now = Utc.with_ymd_and_hms(2025, 9, 10, 9, 0, 0).unwrap();
        let res = service(db).spin_at(s.id, now).await;

        assert!(matches!(res, Err(AppError::NoPrizesAvailable)));
    }

    #[tokio::test]
    async fn test_claim_retries_after_losing_race() {
        let p = period(200_000, 11);
        let s = student();
        let inv = invoice(s.id, 200_000, None);
        let won = prize("Diskon 10rb", PrizeKind::Fixed, 10_000, 100, 0, 90);
        // snapshot kedua: pesaing keburu memakai satu unit
        let mut refreshed = won.clone();
        refreshed.used = 1;
        let mut claimed = won.clone();
        claimed.used = 2;

        let now = Utc.with_ymd_and_hms(2025, 9, 5, 9, 0, 0).unwrap();
        let mut committed = inv.clone();
        committed.discount_amount = 10_000;
        committed.final_amount = 190_000;
        committed.spun_at = Some(now);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![p]])
            .append_query_results([vec![s.clone()]])
            .append_query_results([vec![inv.clone()]])
            .append_query_results([vec![won.clone()]])
            // re-fetch kandidat setelah CAS pertama kalah
            .append_query_results([vec![refreshed.clone()]])
            .append_query_results([vec![claimed.clone()]])
            .append_query_results([vec![committed.clone()]])
            .append_exec_results([exec_conflict(), exec_ok(), exec_ok()])
            .into_connection();

        let result = service(db).spin_at(s.id, now).await.unwrap();

        assert_eq!(result.prize.label, "Diskon 10rb");
        assert_eq!(result.invoice.discount_amount, 10_000);
    }

    #[tokio::test]
    async fn test_claim_failed_after_retries_exhausted() {
        let p = period(200_000, 11);
        let s = student();
        let inv = invoice(s.id, 200_000, None);
        let won = prize("Diskon 10rb", PrizeKind::Fixed, 10_000, 100, 0, 90);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![p]])
            .append_query_results([vec![s.clone()]])
            .append_query_results([vec![inv]])
            .append_query_results([vec![won.clone()]])
            .append_query_results([vec![won.clone()]])
            .append_query_results([vec![won.clone()]])
            .append_exec_results([exec_conflict(), exec_conflict(), exec_conflict()])
            .into_connection();

        let now = Utc.with_ymd_and_hms(2025, 9, 5, 9, 0, 0).unwrap();
        let res = service(db).spin_at(s.id, now).await;

        assert!(matches!(res, Err(AppError::ClaimFailed)));
    }

    #[tokio::test]
    async fn test_commit_conflict_rejected_as_already_spun() {
        // spin lain menang race di antara pengecekan dan commit:
        // guard spun_at IS NULL membuat commit kedua kosong
        let p = period(200_000, 11);
        let s = student();
        let inv = invoice(s.id, 200_000, None);
        let won = prize("Diskon 10rb", PrizeKind::Fixed, 10_000, 100, 0, 90);
        let mut claimed = won.clone();
        claimed.used = 1;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![p]])
            .append_query_results([vec![s.clone()]])
            .append_query_results([vec![inv]])
            .append_query_results([vec![won.clone()]])
            .append_query_results([vec![claimed]])
            .append_exec_results([exec_ok(), exec_conflict()])
            .into_connection();

        let now = Utc.with_ymd_and_hms(2025, 9, 5, 9, 0, 0).unwrap();
        let res = service(db).spin_at(s.id, now).await;

        assert!(matches!(res, Err(AppError::AlreadySpun)));
    }
}
