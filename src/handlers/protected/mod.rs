// handlers/protected/mod.rs - Handlers that require an authenticated identity
//
// Every handler here starts with `RequestContext::force_auth`, then validates
// its inputs and delegates to `ChannelService`. Failures are returned as
// `ApiError` and rendered by the reporter; handlers never write error bodies.
mod channel;
mod item;

pub use channel::create as channel_create;
pub use channel::get as channel_get;
pub use channel::list as channel_list;
pub use item::create as item_create;
pub use item::data as item_data;
pub use item::get as item_get;
pub use item::list as item_list;
