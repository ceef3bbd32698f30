#![deny(unsafe_code)]

/// Root shell switching between the login and chat screens.
pub mod app;
pub mod chat;
pub mod login;
