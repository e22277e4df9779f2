pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod table;

// Canonical record shapes shared across stages
pub mod domain;

// The cleaning / aggregation / join pipeline
pub mod pipeline;
