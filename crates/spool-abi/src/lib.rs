//! Spool ABI crate: contracts shared by the engine and model backends.
//!
//! The engine never touches weights, compute graphs or devices. It only
//! requires the traits in [`model`]: a vocabulary, a loaded model with
//! capability flags, and an opaque session exposing `encode`/`decode`
//! over a [`Batch`].

pub mod batch;
pub mod error;
pub mod model;
pub mod token;

pub use batch::*;
pub use error::*;
pub use model::*;
pub use token::*;
