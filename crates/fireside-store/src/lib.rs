//! Fireside Store — `PostgreSQL` implementations of the persistence traits.

pub mod pg_binding_repository;
pub mod pg_template_repository;
pub mod pg_user_repository;
pub mod schema;

pub use pg_binding_repository::PgBindingRepository;
pub use pg_template_repository::PgTemplateRepository;
pub use pg_user_repository::PgUserRepository;
