pub mod dto;
pub mod login;
pub mod register;
pub mod utils;
