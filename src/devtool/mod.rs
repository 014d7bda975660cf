//! # Development Environment Helper
//!
//! Library side of the `everest` binary:
//!
//! - [`clone`] builds repository URLs from an organization and a forge and
//!   clones them.
//! - [`services`] starts and stops the auxiliary services of the development
//!   container through `docker compose`.

pub mod clone;
pub mod services;
