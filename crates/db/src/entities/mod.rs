//! `SeaORM` entity definitions.

pub mod replenishment_requests;
pub mod sea_orm_active_enums;
pub mod settings;
pub mod transactions;
pub mod users;
