//! Module driver and CLI library for the Angara compiler.
//!
//! `angarac` owns whole-program orchestration: resolving `attach`
//! references to modules, driving the type checker and C backend over
//! each one, and invoking the system C compiler to produce a native
//! executable. Lexing and parsing are supplied externally through
//! [`SourceParser`].

pub mod config;
pub mod driver;
pub mod error;
pub mod parser;
pub mod resolve;
pub mod tracing_setup;

pub use config::{Config, ConfigLayer};
pub use driver::Driver;
pub use error::DriverError;
pub use parser::{NullParser, SourceParser};
