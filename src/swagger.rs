use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{InvoiceStatus, PaymentStatus, PrizeKind, UserRole};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::logout,
        handlers::siswa::current_invoice,
        handlers::siswa::spin_prizes,
        handlers::siswa::spin,
        handlers::siswa::create_payment,
        handlers::cabang::branch_me,
        handlers::cabang::list_students,
        handlers::cabang::create_student,
        handlers::admin::set_period,
        handlers::admin::list_periods,
        handlers::admin::create_student,
        handlers::admin::list_students,
        handlers::admin::delete_student,
        handlers::admin::student_payments,
        handlers::admin::create_branch,
        handlers::admin::list_branches,
        handlers::admin::create_branch_admin,
        handlers::admin::list_branch_admins,
        handlers::admin::delete_branch_admin,
        handlers::admin::create_prize,
        handlers::admin::list_prizes,
        handlers::admin::delete_prize,
        handlers::admin::clear_prizes,
        handlers::admin::review_payment,
    ),
    components(
        schemas(
            ApiError,
            LoginRequest,
            AuthResponse,
            MeResponse,
            UserRole,
            SetPeriodRequest,
            PeriodResponse,
            InvoiceResponse,
            InvoiceStatus,
            CurrentInvoiceResponse,
            SpinPrizeResponse,
            PrizeKind,
            WonPrize,
            SpinResultResponse,
            AvailablePrizesResponse,
            CreatePrizeRequest,
            StudentResponse,
            CreateStudentRequest,
            CreateCabangStudentRequest,
            CreatedStudentResponse,
            CreateBranchRequest,
            BranchResponse,
            CreateBranchAdminRequest,
            BranchAdminResponse,
            CreatePaymentRequest,
            PaymentResponse,
            PaymentStatus,
            ReviewAction,
            ReviewPaymentRequest,
            StudentPaymentsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login & sesi"),
        (name = "siswa", description = "Invoice SPP & Lucky Spin siswa"),
        (name = "cabang", description = "Operasional admin cabang"),
        (name = "admin", description = "Konfigurasi superadmin")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
