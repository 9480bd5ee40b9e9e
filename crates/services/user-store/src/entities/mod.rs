//! SeaORM entities.
//!
//! Each entity here is registered with the auto-migration in
//! [`crate::infra::Database::auto_migrate`].

pub mod user;
