pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{CliConfig, Settings};
pub use crate::core::{
    checker::ExpiryChecker, extractor::ExtractorChain, notifier::Notifier,
    policy::NotificationPolicy,
};
pub use crate::utils::error::{CheckError, Result};
