//! # teliq-core
//!
//! Foundation types shared by every TeliQ crate:
//!
//! - **Call errors**: [`CallError`] taxonomy returned by every remote call
//! - **Correlation IDs**: [`EchoId`] newtype carried in the `echo` field
//! - **Actions**: [`Action`] trait binding a wire action name to typed params/results
//! - **Logging**: `tracing` subscriber setup

#![deny(unsafe_code)]

pub mod action;
pub mod errors;
pub mod ids;
pub mod logging;

pub use action::{Action, Empty};
pub use errors::{CallError, CallResult};
pub use ids::EchoId;
