pub mod projects;
pub mod contact;
