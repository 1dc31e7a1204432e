//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on protocol translation and auth plumbing.

pub mod account;
pub mod checkout;
pub mod password;
pub mod pricing;
pub mod session;
pub mod usage;
