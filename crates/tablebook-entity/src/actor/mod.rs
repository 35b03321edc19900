//! Authenticated actor roles.

pub mod role;

pub use role::ActorRole;
