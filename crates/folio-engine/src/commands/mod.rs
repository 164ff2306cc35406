//! Command orchestration layer.
//!
//! Functions here coordinate the pure domain in `folio-core` with the
//! repositories and render cache a [`crate::site::Site`] provides.

pub mod engine_command;
pub mod engine_query;
pub mod menus;
pub mod pages;
pub mod publish;
pub mod render;
pub mod repair;
