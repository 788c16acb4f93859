//! Notification delivery.
//!
//! Posts one [`NotificationPayload`](beastpush_common::types::NotificationPayload)
//! per batch to the notification endpoint. There is no retry: the caller
//! decides what a failed batch means for the rest of the cycle.

pub mod error;
pub mod sink;

pub use error::{Result, SinkError};
pub use sink::{HttpNotificationSink, NotificationSink, SinkResponse};
