pub mod channel;
pub mod user;

pub use channel::{ChannelRecord, ChannelView, ItemRecord, ItemView};
pub use user::UserRecord;
