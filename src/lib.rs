pub mod cli;
pub mod config;
pub mod erosion;
pub mod error;
pub mod image;
pub mod prediction;
pub mod report;
pub mod services;
pub mod util;
pub mod wizard;
