pub mod category;
pub mod source_code;
