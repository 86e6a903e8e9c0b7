//! Request validation helpers.

pub mod common;
pub mod domain;
pub mod user;

pub use common::*;
pub use domain::*;
pub use user::*;
