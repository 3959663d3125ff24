use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp baris log
use env_logger::{Env, Target};
use std::io::Write; // formatter custom env_logger

use spp_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // Konfigurasi
    let config = Config::from_toml().expect("Failed to load configuration file");

    // Pool database + migrasi
    let pool = std::sync::Arc::new(
        create_pool(&config.database)
            .await
            .expect("Failed to create database connection pool"),
    );

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Servis JWT
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // Servis domain
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let period_service = PeriodService::new(pool.clone());
    let invoice_service = InvoiceService::new(pool.clone());
    let spin_service = SpinService::new(
        pool.clone(),
        period_service.clone(),
        invoice_service.clone(),
    );
    let student_service = StudentService::new(pool.clone());
    let branch_service = BranchService::new(pool.clone());
    let payment_service = PaymentService::new(pool.clone(), invoice_service.clone());

    // Bootstrap akun superadmin
    if let Err(e) = auth_service
        .ensure_superadmin(&config.superadmin.username, &config.superadmin.password)
        .await
    {
        log::error!("Gagal bootstrap superadmin: {:?}", e);
    }

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(period_service.clone()))
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(web::Data::new(spin_service.clone()))
            .app_data(web::Data::new(student_service.clone()))
            .app_data(web::Data::new(branch_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::siswa_config)
                    .configure(handlers::cabang_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
