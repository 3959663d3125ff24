use crate::entities::UserRole;
use crate::error::AppError;
use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::{BranchService, StudentService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

/// Scope admin cabang: wajib role ADMIN_CABANG dengan branch_id di token.
fn require_cabang(req: &HttpRequest) -> Result<Uuid, AppError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;

    if user.role != UserRole::AdminCabang {
        return Err(AppError::Forbidden);
    }
    user.branch_id
        .ok_or_else(|| AppError::ValidationError("Branch tidak ditemukan di session".to_string()))
}

#[utoipa::path(
    get,
    path = "/cabang/branch/me",
    tag = "cabang",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profil cabang milik admin", body = BranchResponse)
    )
)]
pub async fn branch_me(
    branch_service: web::Data<BranchService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let branch_id = match require_cabang(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match branch_service.get_branch(branch_id).await {
        Ok(branch) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": branch }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/cabang/students",
    tag = "cabang",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Siswa milik cabang admin", body = [StudentResponse])
    )
)]
pub async fn list_students(
    student_service: web::Data<StudentService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let branch_id = match require_cabang(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match student_service.list(Some(branch_id)).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/cabang/students",
    tag = "cabang",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateCabangStudentRequest,
    responses(
        (status = 200, description = "Siswa cabang dibuat beserta akun login", body = CreatedStudentResponse),
        (status = 400, description = "Username sudah terdaftar / data kurang")
    )
)]
pub async fn create_student(
    student_service: web::Data<StudentService>,
    request: web::Json<CreateCabangStudentRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let branch_id = match require_cabang(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match student_service
        .create_for_branch(branch_id, request.into_inner())
        .await
    {
        Ok(created) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": created }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cabang_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cabang")
            .route("/branch/me", web::get().to(branch_me))
            .route("/students", web::get().to(list_students))
            .route("/students", web::post().to(create_student)),
    );
}
