// src/resolve/mod.rs
// =============================================================================
// This module turns a raw href into a typed link descriptor.
//
// Submodules:
// - link: the descriptor types (Link, MalformedHref) and the ResolveContext
// - parse: the resolver itself plus lexical path normalization
//
// Everything in here is pure: no file system access, no shared state.
// That means it can be called from any number of worker threads at once.
// =============================================================================

mod link;
mod parse;

pub use link::{Link, MalformedHref, ResolveContext};
pub use parse::{normalize_path, resolve_link};
