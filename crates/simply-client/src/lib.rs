pub mod client;
pub mod protocol;
pub mod transport;

pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use transport::{HttpTransport, ResponseBody, Transport, TransportError};
