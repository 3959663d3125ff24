use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    /// Tidak ada periode SPP yang ditandai aktif. Prasyarat fatal untuk
    /// semua operasi invoice/spin, harus dibereskan oleh admin.
    #[error("SPP period aktif belum diset oleh admin")]
    NoActivePeriod,

    /// Spin ditolak karena tanggal hari ini sudah melewati deadline periode.
    #[error("Spin hanya boleh sampai tanggal {0}.")]
    DeadlinePassed(i32),

    /// Invoice periode ini sudah pernah di-spin (spun_at terisi).
    #[error("Kamu sudah spin untuk periode ini.")]
    AlreadySpun,

    #[error("Hadiah tidak tersedia / kuota habis / weight 0.")]
    NoPrizesAvailable,

    /// Kalah rebutan kuota berkali-kali; aman untuk dicoba ulang oleh client.
    #[error("Gagal mengunci kuota hadiah. Coba lagi.")]
    ClaimFailed,

    #[error("Invoice periode aktif belum dibuat. Minta admin set period / reload invoice.")]
    InvoiceUnavailable,

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::Forbidden => (
                actix_web::http::StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Forbidden".to_string(),
            ),
            AppError::NoActivePeriod => {
                log::error!("No active SPP period configured");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "NO_ACTIVE_PERIOD",
                    self.to_string(),
                )
            }
            AppError::DeadlinePassed(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "DEADLINE_PASSED",
                self.to_string(),
            ),
            AppError::AlreadySpun => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "ALREADY_SPUN",
                self.to_string(),
            ),
            AppError::NoPrizesAvailable => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "NO_PRIZES_AVAILABLE",
                self.to_string(),
            ),
            AppError::ClaimFailed => {
                log::warn!("Prize quota claim lost after retries");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "CLAIM_FAILED",
                    self.to_string(),
                )
            }
            AppError::InvoiceUnavailable => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVOICE_UNAVAILABLE",
                self.to_string(),
            ),
            AppError::JwtError(err) => {
                log::warn!("JWT error: {err}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    "Sesi tidak valid".to_string(),
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
