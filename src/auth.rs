//! Auth-domain identifiers, scope collections, and secret material.

pub mod id;
pub mod scope;
pub mod secret;

pub use id::*;
pub use scope::*;
pub use secret::*;
