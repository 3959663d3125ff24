pub mod branches;
pub mod invoices;
pub mod payments;
pub mod spin_logs;
pub mod spin_prizes;
pub mod spp_periods;
pub mod students;
pub mod users;

pub use branches as branch_entity;
pub use invoices as invoice_entity;
pub use payments as payment_entity;
pub use spin_logs as spin_log_entity;
pub use spin_prizes as spin_prize_entity;
pub use spp_periods as spp_period_entity;
pub use students as student_entity;
pub use users as user_entity;

pub use invoices::InvoiceStatus;
pub use payments::PaymentStatus;
pub use spin_prizes::PrizeKind;
pub use users::UserRole;
