#![warn(missing_docs)]
//! Structural pattern matching over parse trees. A search template is
//! compiled (elsewhere) into a [pattern::Pattern]: a parse tree whose nodes
//! may carry named wildcard placeholders, attached by node identity. Matching
//! the pattern against a candidate tree either fails or yields a
//! [rule::state::State] binding every placeholder to the candidate subtrees
//! it stood in for.
pub mod pattern;
pub mod rule;
pub mod tree;
