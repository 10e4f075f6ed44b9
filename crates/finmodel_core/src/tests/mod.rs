//! End-to-end tests for the finmodel simulation engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Reference scenarios run through the full orchestrator
//! - `household` - Multi-category runs, cash merging and net worth
//! - `invariants` - Properties that hold for any well-formed run

mod invariants;
