pub mod admin;
pub mod auth;
pub mod cabang;
pub mod siswa;

pub use admin::admin_config;
pub use auth::auth_config;
pub use cabang::cabang_config;
pub use siswa::siswa_config;
