//! # tablebook-auth
//!
//! Identity collaborator for Tablebook: JWT claims carrying the actor id
//! and role, an encoder for issuing access tokens, and a decoder that
//! validates them. Authorization (ownership) lives in the service layer.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
