// handlers/public/mod.rs - Handlers that accept anonymous requests
mod health;

pub use health::health;
