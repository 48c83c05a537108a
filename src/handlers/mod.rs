// handlers/mod.rs - security tiers
//
// Public (no auth) -> Protected (JWT auth, per-operation role requirement)
pub mod public;
pub mod protected;
