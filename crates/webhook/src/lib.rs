mod client;
pub use client::{WebhookClient, WebhookRequest};

mod error;
pub use error::DispatchError;
