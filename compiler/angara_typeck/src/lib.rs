//! Multi-pass semantic analyzer for the Angara compiler (§4.5).
//!
//! Entered once per module via `check_module`, which runs the pre-pass
//! (attachments), then three checker passes over the top-level statement
//! list in order — name declarations, headers, bodies — bailing out after
//! any pass that leaves the diagnostic queue in an error state. The
//! `ModuleResolver` trait is the only thing this crate knows about the
//! driver; it never depends on `angarac` so the dependency only runs one
//! way (see `resolver.rs`).

mod checker;
mod expr;
mod narrowing;
mod pass2;
mod resolve_type;
mod resolver;
mod side_tables;
mod stmt;

pub use checker::{check_module, CheckOutcome, Checker};
pub use resolve_type::resolve_type_node;
pub use resolver::{ModuleResolver, NullResolver, ResolveError};
pub use side_tables::CheckResult;
