// Adapters layer: concrete implementations of the domain ports (WHOIS, webhook, clock).

pub mod clock;
pub mod webhook;
pub mod whois;

pub use clock::{FixedClock, SystemClock};
pub use webhook::WebhookChannel;
pub use whois::WhoisClient;
