//! Generic parallel execution framework
//!
//! This module only manages system resources and the execution strategy. It
//! knows nothing about documents: callers decide how many items justify
//! threads, this module decides how many threads the machine and the
//! configuration allow.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Client        │    │   Parallel       │    │   System        │
//! │   (Expander)    │───▶│   Module         │───▶│   Resources     │
//! │                 │    │                  │    │                 │
//! │ • Document count│    │ • CPU cores      │    │ • Hardware      │
//! │ • Threshold     │    │ • Thread mgmt    │    │ • OS limits     │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use link_globs::parallel::ExecutionStrategy;
//!
//! let workers = ExecutionStrategy::calculate_optimal_workers(0, 75);
//! let strategy = ExecutionStrategy::auto(100, 32, workers);
//!
//! let doubled = strategy.execute(vec![1, 2, 3], |x| x * 2).unwrap();
//! assert_eq!(doubled, vec![2, 4, 6]);
//! ```

pub mod core;

pub use self::core::{ExecutionStrategy, ParallelExecutor, SequentialExecutor, WorkerPanic};
