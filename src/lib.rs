//! Semantic comparison of two sets of Kubernetes manifests.
//!
//! Objects from both sides are normalized by an ordered list of
//! [`rules::ObjectRule`]s, correlated by [`object::ResourceKey`] and diffed
//! structurally. Every rule must have an effect, otherwise the comparison
//! is aborted (see [`debug`]).

pub mod debug;
pub mod diff;
pub mod differ;
pub mod error;
pub mod load;
pub mod object;
pub mod patch;
pub mod path;
pub mod resolve;
pub mod rules;

pub use error::Error;
