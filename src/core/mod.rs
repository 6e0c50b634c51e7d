//! Core business logic module
//!
//! This module contains the shared account:
//! - `account` - Lock, condition variable, transaction counter, and the
//!   deposit / withdraw / snapshot operations

pub mod account;

pub use account::Account;
