// src/filter/mod.rs

//! Tag filter language.
//!
//! A filter is a disjunction of conjunctions of tag equality checks:
//!
//! ```text
//! tag:Environment=prod AND tag:Owner=devops OR tag:Critical=yes
//! ```
//!
//! reads as `(Environment=prod AND Owner=devops) OR (Critical=yes)`.
//!
//! - [`ast`] holds the parsed form ([`TagFilter`], [`AndGroup`],
//!   [`TagCondition`]) and its evaluation against a resource's tags.
//! - [`parser`] turns filter strings into that form. Parsing never fails;
//!   tokens it cannot use are dropped and reported as diagnostics.

pub mod ast;
pub mod parser;

pub use ast::{AndGroup, TagCondition, TagFilter};
pub use parser::{ParseOutput, AND_SEPARATOR, OR_SEPARATOR, TAG_PREFIX};
