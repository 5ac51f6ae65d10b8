// Healthdesk - patient record question assistant
// Library exports

pub mod assistant;
pub mod cli;
pub mod config;
pub mod metrics;
pub mod providers;
pub mod records;
