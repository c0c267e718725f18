pub mod db;
pub mod mail;
pub mod server;
pub mod utils;
