pub mod auth_service;
pub mod branch_service;
pub mod invoice_service;
pub mod payment_service;
pub mod period_service;
pub mod spin_service;
pub mod student_service;

pub use auth_service::*;
pub use branch_service::*;
pub use invoice_service::*;
pub use payment_service::*;
pub use period_service::*;
pub use spin_service::*;
pub use student_service::*;
