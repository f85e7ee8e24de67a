pub mod cfp;
pub mod config;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod templates_structs;
