pub mod auth;
pub mod report;

pub use auth::authenticate;
pub use report::{apply_trace_policy, handle_panic, method_not_allowed, route_not_found};
