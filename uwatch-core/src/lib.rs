#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod events;
pub mod notify;
pub mod poller;
pub mod provider;
pub mod tickets;
