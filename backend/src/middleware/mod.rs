//! Request middleware for the relay service.

pub mod trace;

pub use trace::Trace;
