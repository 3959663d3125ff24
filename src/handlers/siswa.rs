use crate::entities::UserRole;
use crate::error::AppError;
use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::{InvoiceService, PaymentService, PeriodService, SpinService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

/// Semua endpoint di scope ini khusus role SISWA dengan student_id valid.
fn require_siswa(req: &HttpRequest) -> Result<Uuid, AppError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;

    if user.role != UserRole::Siswa {
        return Err(AppError::Forbidden);
    }
    user.student_id
        .ok_or_else(|| AppError::ValidationError("StudentId kosong".to_string()))
}

#[utoipa::path(
    get,
    path = "/siswa/invoice/current",
    tag = "siswa",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Invoice periode aktif (dibuat lazy)", body = CurrentInvoiceResponse),
        (status = 500, description = "Belum ada periode aktif")
    )
)]
pub async fn current_invoice(
    period_service: web::Data<PeriodService>,
    invoice_service: web::Data<InvoiceService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let student_id = match require_siswa(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    let period = match period_service.active_period().await {
        Ok(p) => p,
        Err(e) => return Ok(e.error_response()),
    };

    match invoice_service.get_or_create(&period, student_id).await {
        Ok(invoice) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": CurrentInvoiceResponse {
                period: period.into(),
                invoice: invoice.into(),
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/siswa/spin/prizes",
    tag = "siswa",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Hadiah yang masih tersedia untuk periode aktif", body = AvailablePrizesResponse)
    )
)]
pub async fn spin_prizes(
    spin_service: web::Data<SpinService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let student_id = match require_siswa(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match spin_service.available_prizes(student_id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/siswa/spin",
    tag = "siswa",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Spin berhasil", body = SpinResultResponse),
        (status = 400, description = "Deadline lewat / sudah spin / hadiah habis"),
        (status = 409, description = "Kalah rebutan kuota, silakan coba lagi")
    )
)]
/// Lucky Spin, sekali per periode:
/// 1. cek deadline dan invoice periode aktif
/// 2. undi hadiah berbobot di antara yang eligible
/// 3. kunci kuota lewat conditional update (retry kalau kalah race)
/// 4. tulis diskon ke invoice dan catat audit log
pub async fn spin(spin_service: web::Data<SpinService>, req: HttpRequest) -> Result<HttpResponse> {
    let student_id = match require_siswa(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match spin_service.spin(student_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/siswa/payments",
    tag = "siswa",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Pengajuan pembayaran dibuat (PENDING)", body = PaymentResponse),
        (status = 400, description = "Bukti kosong / invoice sudah PAID")
    )
)]
pub async fn create_payment(
    payment_service: web::Data<PaymentService>,
    request: web::Json<CreatePaymentRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let student_id = match require_siswa(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match payment_service
        .create_payment(student_id, request.into_inner())
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": payment }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn siswa_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/siswa")
            .route("/invoice/current", web::get().to(current_invoice))
            .route("/spin/prizes", web::get().to(spin_prizes))
            .route("/spin", web::post().to(spin))
            .route("/payments", web::post().to(create_payment)),
    );
}
