pub mod home;
pub mod projects;
pub mod contact;
pub mod system;
