//! Inbound adapters that translate external input into domain calls.
//!
//! [`http`] hosts the verification relay; [`console`] renders the wizard in
//! a terminal and collects the borrower's input.

pub mod console;
pub mod http;
