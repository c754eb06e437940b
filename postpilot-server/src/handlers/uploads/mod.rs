pub mod create;
pub mod store_file;
