use crossbeam::channel::{Receiver, Sender, bounded};
use std::sync::Arc;

/// A worker thread panicked before finishing its items
#[derive(Debug, thiserror::Error)]
#[error("a worker thread panicked during parallel execution")]
pub struct WorkerPanic;

/// Producer-consumer executor over a fixed pool of scoped worker threads
pub struct ParallelExecutor<T, R> {
    max_workers: usize,
    buffer_size: usize,
    _phantom: std::marker::PhantomData<(T, R)>,
}

impl<T, R> ParallelExecutor<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            max_workers,
            buffer_size: max_workers * 2,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Run `processor` over every item; results come back in input order
    pub fn execute<F>(&self, work_items: Vec<T>, processor: F) -> Result<Vec<R>, WorkerPanic>
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        if work_items.is_empty() {
            return Ok(Vec::new());
        }

        let total_items = work_items.len();
        let actual_workers = std::cmp::min(self.max_workers, total_items);
        let (work_tx, work_rx): (Sender<(usize, T)>, Receiver<(usize, T)>) = bounded(self.buffer_size);
        let (result_tx, result_rx): (Sender<(usize, R)>, Receiver<(usize, R)>) = bounded(self.buffer_size);

        let processor = Arc::new(processor);

        let mut indexed = crossbeam::thread::scope(|s| {
            for worker_id in 0..actual_workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let processor = processor.clone();

                s.spawn(move |_| {
                    while let Ok((index, item)) = work_rx.recv() {
                        if result_tx.send((index, processor(item))).is_err() {
                            break; // Collector dropped
                        }
                    }
                    tracing::trace!("Worker {} finished", worker_id);
                });
            }

            // Producer thread: send work to workers
            let work_tx_producer = work_tx.clone();
            s.spawn(move |_| {
                for item in work_items.into_iter().enumerate() {
                    if work_tx_producer.send(item).is_err() {
                        break; // Workers dropped
                    }
                }
            });

            // Drop our handles so the channels close once the threads are done
            drop(work_rx);
            drop(work_tx);
            drop(result_tx);

            result_rx.iter().take(total_items).collect::<Vec<_>>()
        })
        .map_err(|_| WorkerPanic)?;

        if indexed.len() != total_items {
            return Err(WorkerPanic);
        }

        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, result)| result).collect())
    }
}

/// Sequential execution on the calling thread
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn execute<T, R, F>(work_items: Vec<T>, processor: F) -> Vec<R>
    where
        F: Fn(T) -> R,
    {
        work_items.into_iter().map(processor).collect()
    }
}

/// Execution strategy enum for choosing between parallel and sequential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    pub fn execute<T, R, F>(&self, work_items: Vec<T>, processor: F) -> Result<Vec<R>, WorkerPanic>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        match self {
            ExecutionStrategy::Sequential => Ok(SequentialExecutor::execute(work_items, processor)),
            ExecutionStrategy::Parallel { workers } => {
                ParallelExecutor::new(*workers).execute(work_items, processor)
            }
        }
    }

    /// Threshold decision between sequential and parallel execution.
    ///
    /// The caller supplies the worker count; a single worker is never worth
    /// the thread overhead.
    ///
    /// ```rust
    /// use link_globs::parallel::ExecutionStrategy;
    ///
    /// let strategy = ExecutionStrategy::auto(10, 32, 8);
    /// assert!(matches!(strategy, ExecutionStrategy::Sequential));
    ///
    /// let strategy = ExecutionStrategy::auto(100, 32, 8);
    /// assert!(matches!(strategy, ExecutionStrategy::Parallel { workers: 8 }));
    /// ```
    pub fn auto(work_items_count: usize, min_items_for_parallel: usize, optimal_workers: usize) -> Self {
        if work_items_count >= min_items_for_parallel && optimal_workers > 1 {
            ExecutionStrategy::Parallel {
                workers: optimal_workers,
            }
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Maximum workers allowed by the available cores and configuration.
    ///
    /// ```text
    /// 1. cores = num_cpus::get()
    /// 2. by_percentage = max(1, cores * thread_percentage / 100)
    /// 3. min(max_threads_config, by_percentage) when max_threads_config > 0
    /// ```
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        let available_cores = num_cpus::get();

        let workers_by_percentage =
            std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

        if max_threads_config > 0 {
            std::cmp::min(max_threads_config, workers_by_percentage)
        } else {
            workers_by_percentage
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_executor() {
        let results = SequentialExecutor::execute(vec![1, 2, 3, 4, 5], |x| x * 2);
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_parallel_executor_keeps_input_order() {
        let executor = ParallelExecutor::new(3);
        let work_items: Vec<u64> = (0..50).collect();
        let results = executor.execute(work_items, |x| x * 3).unwrap();
        assert_eq!(results, (0..50).map(|x| x * 3).collect::<Vec<u64>>());
    }

    #[test]
    fn test_parallel_executor_empty() {
        let executor: ParallelExecutor<u8, u8> = ParallelExecutor::new(4);
        assert!(executor.execute(Vec::new(), |x| x).unwrap().is_empty());
    }

    #[test]
    fn test_execution_strategy() {
        let sequential = ExecutionStrategy::Sequential;
        assert_eq!(sequential.execute(vec![1, 2, 3], |x| x + 1).unwrap(), vec![2, 3, 4]);

        let parallel = ExecutionStrategy::Parallel { workers: 2 };
        assert_eq!(parallel.execute(vec![1, 2, 3], |x| x + 1).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_auto_strategy() {
        assert_eq!(ExecutionStrategy::auto(5, 10, 8), ExecutionStrategy::Sequential);
        assert_eq!(ExecutionStrategy::auto(10, 10, 8), ExecutionStrategy::Parallel { workers: 8 });
        assert_eq!(ExecutionStrategy::auto(100, 10, 1), ExecutionStrategy::Sequential);
    }

    #[test]
    fn test_calculate_optimal_workers() {
        assert!(ExecutionStrategy::calculate_optimal_workers(0, 75) >= 1);
        assert!(ExecutionStrategy::calculate_optimal_workers(2, 100) <= 2);
        assert!(ExecutionStrategy::calculate_optimal_workers(0, 1) >= 1);
    }
}
