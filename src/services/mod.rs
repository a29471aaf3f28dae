pub mod channel_service;

pub use channel_service::{ChannelError, ChannelService, NewItem};
