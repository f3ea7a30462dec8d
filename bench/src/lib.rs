//! Benchmark utilities for the rusty ECS.
//!
//! - **Microbenchmarks**: Individual operations measured in isolation (spawn, query build,
//!   iteration, add/remove churn, despawn)
//! - **Scenario benchmarks**: Whole ticks of a system driven workload
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_ecs_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_ecs_bench -- spawn
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod scenarios;
