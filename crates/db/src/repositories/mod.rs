//! Repository abstractions for data access.

pub mod replenishment;
pub mod setting;
pub mod transaction;
pub mod user;
pub mod workflow;

pub use replenishment::ReplenishmentRepository;
pub use setting::SettingRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
pub use workflow::WorkflowRepository;
