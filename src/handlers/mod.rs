// handlers/mod.rs - Two-tier handler layout
//
// Public (no identity required) and Protected (authenticated identity
// required). The authentication middleware runs in front of both tiers, so
// a malformed or unknown credential is rejected even on public routes.
pub mod protected;
pub mod public;
