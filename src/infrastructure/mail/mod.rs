pub mod notifier;
pub mod templates;
