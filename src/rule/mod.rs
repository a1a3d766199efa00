//! Structural matching of a compiled pattern against a candidate tree.
//!
//! Matching is synchronous recursive descent; recursion depth equals pattern
//! depth. All rules are pure functions returning an optional [state::State],
//! conjoined with [state::State::merge], so a failed branch can neither
//! leave bindings behind nor be overwritten by a later success.
pub mod matcher;
pub mod node_match;
pub mod seq_match;
pub mod state;
