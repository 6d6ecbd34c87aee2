//! Terminal monitoring console for the SENTINEL AEGIS security-assessment
//! platform. Fetches summarized risk data, renders module-specific panels,
//! triggers assessment runs, and tracks their completion by polling the
//! platform API.

pub mod cli;
pub mod config;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod tracker;
pub mod utils;
