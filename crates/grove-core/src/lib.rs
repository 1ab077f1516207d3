//! Grove Core - source records and Java extraction
//!
//! This crate defines the records that flow into the Grove code graph and
//! the Java front end that produces them.
//!
//! # Overview
//!
//! - [`TypeRecord`], [`MemberRecord`] and [`RelationshipFact`] are the tagged
//!   inputs the graph store accepts. Each one validates its own shape before
//!   anything is written.
//! - [`JavaParser`] turns `.java` sources into a [`ParsedFile`].
//! - [`derive_dependencies`] turns a parsed type into relationship facts.
//!
//! # Example
//!
//! ```no_run
//! use grove_core::{derive_dependencies, JavaParser};
//! use std::path::Path;
//!
//! let mut parser = JavaParser::new().unwrap();
//! let parsed = parser.parse_file(Path::new("src/UserService.java")).unwrap();
//!
//! for ty in &parsed.types {
//!     let facts = derive_dependencies(ty);
//!     println!("{} has {} dependency facts", ty.record.name, facts.len());
//! }
//! ```

mod dependencies;
mod error;
mod java;
mod record;

pub use dependencies::{derive_dependencies, is_builtin_type, BUILTIN_TYPES};
pub use error::{ParseError, Result, ValidationError};
pub use java::{JavaParser, ParsedFile, ParsedType};
pub use record::{MemberRecord, Parameter, RelationKind, RelationshipFact, TypeKind, TypeRecord};
