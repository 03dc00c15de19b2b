pub mod categories;
pub mod source_codes;
