pub mod database;
pub mod monitor;
pub mod options;

pub use database::init_database;
