//! Outbound (driven) adapters: storage and delivery implementations of the
//! domain ports.

pub mod document;
pub mod email;
pub mod persistence;
