pub mod clients;
pub mod notifications;
pub mod push;
pub mod time;

pub use clients::WindowClients;
pub use notifications::NotificationRegistry;
pub use push::PushSender;
pub use time::TimeProvider;

use std::pin::Pin;

use crate::types::worker::PlatformError;

/// Future returned by the service-worker platform ports.
pub type PlatformFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, PlatformError>> + Send + 'a>>;
