pub mod auth;
pub mod branch;
pub mod common;
pub mod invoice;
pub mod payment;
pub mod period;
pub mod spin;
pub mod student;

pub use auth::*;
pub use branch::*;
pub use common::*;
pub use invoice::*;
pub use payment::*;
pub use period::*;
pub use spin::*;
pub use student::*;
