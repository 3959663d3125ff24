use crate::entities::UserRole;
use crate::error::AppError;
use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::{BranchService, PaymentService, PeriodService, SpinService, StudentService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

/// Scope /admin khusus SUPER_ADMIN.
fn require_superadmin(req: &HttpRequest) -> Result<(), AppError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;

    if user.role != UserRole::SuperAdmin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

// -----------------------------
// Periode SPP
// -----------------------------

#[utoipa::path(
    post,
    path = "/admin/spp/set",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    request_body = SetPeriodRequest,
    responses(
        (status = 200, description = "Periode di-upsert dan jadi satu-satunya yang aktif", body = PeriodResponse),
        (status = 400, description = "Format periode / amount invalid")
    )
)]
/// Nominal baru menjalar ke invoice UNPAID/PENDING secara lazy saat
/// invoice diakses berikutnya; invoice PAID tidak tersentuh.
pub async fn set_period(
    period_service: web::Data<PeriodService>,
    request: web::Json<SetPeriodRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match period_service.set_period(request.into_inner()).await {
        Ok(period) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": PeriodResponse::from(period)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/spp/list",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Semua periode, terbaru dulu", body = [PeriodResponse])
    )
)]
pub async fn list_periods(
    period_service: web::Data<PeriodService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match period_service.list_periods().await {
        Ok(list) => {
            let data: Vec<PeriodResponse> = list.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

// -----------------------------
// Siswa
// -----------------------------

#[utoipa::path(
    post,
    path = "/admin/students",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateStudentRequest,
    responses(
        (status = 200, description = "Siswa dibuat beserta akun login", body = CreatedStudentResponse)
    )
)]
pub async fn create_student(
    student_service: web::Data<StudentService>,
    request: web::Json<CreateStudentRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match student_service.create(request.into_inner()).await {
        Ok(created) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": created }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/students",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Semua siswa", body = [StudentResponse])
    )
)]
pub async fn list_students(
    student_service: web::Data<StudentService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match student_service.list(None).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/students/{id}",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "Id siswa")
    ),
    responses(
        (status = 200, description = "Siswa dan akun loginnya dihapus"),
        (status = 404, description = "Siswa tidak ditemukan")
    )
)]
pub async fn delete_student(
    student_service: web::Data<StudentService>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match student_service.delete(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/students/payments",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("nis" = Option<String>, Query, description = "Cari berdasarkan NIS"),
        ("student_id" = Option<Uuid>, Query, description = "Cari berdasarkan id siswa")
    ),
    responses(
        (status = 200, description = "Rekap invoice & pembayaran siswa", body = StudentPaymentsResponse)
    )
)]
pub async fn student_payments(
    payment_service: web::Data<PaymentService>,
    query: web::Query<StudentPaymentsQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match payment_service.student_payments(query.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

// -----------------------------
// Cabang & admin cabang
// -----------------------------

#[utoipa::path(
    post,
    path = "/admin/branches",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateBranchRequest,
    responses(
        (status = 200, description = "Cabang dibuat", body = BranchResponse)
    )
)]
pub async fn create_branch(
    branch_service: web::Data<BranchService>,
    request: web::Json<CreateBranchRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match branch_service.create_branch(request.into_inner()).await {
        Ok(branch) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": branch }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/branches",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Semua cabang", body = [BranchResponse])
    )
)]
pub async fn list_branches(
    branch_service: web::Data<BranchService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match branch_service.list_branches().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/branch-admins",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateBranchAdminRequest,
    responses(
        (status = 200, description = "Akun admin cabang dibuat", body = BranchAdminResponse)
    )
)]
pub async fn create_branch_admin(
    branch_service: web::Data<BranchService>,
    request: web::Json<CreateBranchAdminRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match branch_service
        .create_branch_admin(request.into_inner())
        .await
    {
        Ok(admin) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": admin }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/branch-admins",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Semua admin cabang", body = [BranchAdminResponse])
    )
)]
pub async fn list_branch_admins(
    branch_service: web::Data<BranchService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match branch_service.list_branch_admins().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/branch-admins/{id}",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "Id user admin cabang")
    ),
    responses(
        (status = 200, description = "Admin cabang dihapus"),
        (status = 404, description = "Admin cabang tidak ditemukan")
    )
)]
pub async fn delete_branch_admin(
    branch_service: web::Data<BranchService>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match branch_service.delete_branch_admin(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

// -----------------------------
// Hadiah Lucky Spin
// -----------------------------

#[utoipa::path(
    post,
    path = "/admin/spin-prizes",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePrizeRequest,
    responses(
        (status = 200, description = "Hadiah dibuat", body = SpinPrizeResponse),
        (status = 400, description = "Label kosong / quota invalid")
    )
)]
pub async fn create_prize(
    spin_service: web::Data<SpinService>,
    request: web::Json<CreatePrizeRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match spin_service.create_prize(request.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prize }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/spin-prizes",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("period" = String, Query, description = "Periode \"YYYY-MM\"")
    ),
    responses(
        (status = 200, description = "Hadiah satu periode, termasuk used/quota", body = [SpinPrizeResponse])
    )
)]
pub async fn list_prizes(
    spin_service: web::Data<SpinService>,
    query: web::Query<PrizeListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match spin_service.list_prizes(&query.period).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/spin-prizes/{id}",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "Id hadiah")
    ),
    responses(
        (status = 200, description = "Hadiah dihapus"),
        (status = 404, description = "Hadiah tidak ditemukan")
    )
)]
pub async fn delete_prize(
    spin_service: web::Data<SpinService>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match spin_service.delete_prize(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/spin-prizes/clear",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("period" = String, Query, description = "Periode yang mau dibersihkan")
    ),
    responses(
        (status = 200, description = "Semua hadiah periode itu dihapus")
    )
)]
pub async fn clear_prizes(
    spin_service: web::Data<SpinService>,
    query: web::Query<ClearPrizesQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match spin_service.clear_prizes(&query.period).await {
        Ok(deleted) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "deleted": deleted, "period": query.period }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

// -----------------------------
// Review pembayaran
// -----------------------------

#[utoipa::path(
    post,
    path = "/admin/payments/review",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    request_body = ReviewPaymentRequest,
    responses(
        (status = 200, description = "Pembayaran direview; approve menandai invoice PAID", body = PaymentResponse),
        (status = 400, description = "Pembayaran sudah pernah direview")
    )
)]
pub async fn review_payment(
    payment_service: web::Data<PaymentService>,
    request: web::Json<ReviewPaymentRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_superadmin(&req) {
        return Ok(e.error_response());
    }

    match payment_service.review(request.into_inner()).await {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": payment }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/spp/set", web::post().to(set_period))
            .route("/spp/list", web::get().to(list_periods))
            .route("/students/payments", web::get().to(student_payments))
            .route("/students", web::post().to(create_student))
            .route("/students", web::get().to(list_students))
            .route("/students/{id}", web::delete().to(delete_student))
            .route("/branches", web::post().to(create_branch))
            .route("/branches", web::get().to(list_branches))
            .route("/branch-admins", web::post().to(create_branch_admin))
            .route("/branch-admins", web::get().to(list_branch_admins))
            .route("/branch-admins/{id}", web::delete().to(delete_branch_admin))
            .route("/spin-prizes", web::post().to(create_prize))
            .route("/spin-prizes", web::get().to(list_prizes))
            .route("/spin-prizes/clear", web::delete().to(clear_prizes))
            .route("/spin-prizes/{id}", web::delete().to(delete_prize))
            .route("/payments/review", web::post().to(review_payment)),
    );
}
