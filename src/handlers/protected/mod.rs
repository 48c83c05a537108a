// handlers/protected/mod.rs - handlers behind JWT authentication
//
// Route prefix: /api/*
// Every handler receives the authenticated Caller as a request extension and
// checks the role requirement of its operation before reading any data.

pub mod auth;
pub mod members;
