//! Multi-step exchanges built on [`crate::Device::send`]: the data
//! connection, HTTP(S) requests and short messages.

pub mod data;
pub mod http;
pub mod sms;

pub use http::HttpResponse;
