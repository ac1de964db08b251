pub mod checker;
pub mod extractor;
pub mod notifier;
pub mod policy;

pub use crate::domain::model::{
    AlertMessage, CheckOutcome, DeliveryStatus, DomainQuery, ExpiryRecord, NotificationDecision,
    RunReport, ThresholdSet,
};
pub use crate::domain::ports::{AlertChannel, Clock, ExpiryExtractor, RegistryClient};
pub use crate::utils::error::Result;
