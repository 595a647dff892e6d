//! Inherent and trait implementations of types declared at the crate's top.

mod exclusive;
mod shared;
