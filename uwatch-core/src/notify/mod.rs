//! Multi-channel notification pipeline.

pub mod dispatcher;
pub mod http_sender;
pub mod message;

pub use dispatcher::{
    Channel, ChannelProfile, ChannelSender, DeliveryError, Notification, NotificationDispatcher,
};
pub use http_sender::HttpChannelSender;
pub use message::{lamports_to_sol, render_redeemable_message};
