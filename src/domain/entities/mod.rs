pub mod labels;
pub mod option_fields;
pub mod pagination;
pub mod project;
pub mod contact;
