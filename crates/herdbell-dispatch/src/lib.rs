//! # herdbell-dispatch
//!
//! Decides whether and to which channels a notification is handed off.
//! The dispatcher applies the user's category settings and quiet hours,
//! parks suppressed external hand-offs until the quiet window ends, and
//! feeds a bounded queue drained by the delivery worker. Nothing here
//! waits on the transport.

pub mod dispatcher;
pub mod request;
pub mod transport;
pub mod worker;

pub use dispatcher::{DeliveryDispatcher, DispatchSummary, FlushSummary};
pub use request::DeliveryRequest;
pub use transport::{LogTransport, Transport};
pub use worker::DeliveryWorker;
