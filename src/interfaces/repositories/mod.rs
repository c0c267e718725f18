pub mod project;
pub mod contact;
pub mod sqlx_repo;
pub mod memory;
pub mod store;
