pub mod followers;
pub mod trigger;
