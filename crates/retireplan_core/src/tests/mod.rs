//! Integration tests for the retireplan simulation engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Hand-checkable deterministic decumulation runs
//! - `path_invariants` - Properties every simulated batch must satisfy
//! - `withdrawal_policies` - Fixed and Guyton-Klinger rules driven through the simulator
//! - `aggregation` - Summary reduction over simulated batches
//! - `capital_search` - Solver convergence and monotonicity
//! - `determinism` - Seeded reproducibility across thread counts
