// worker pool helpers shared by the parallel and batch aligners

use rayon::ThreadPoolBuilder;

/// Upper bound on pool threads per available core.
pub const MAX_THREADS_PER_CORE: usize = 4;

/// Resolve a requested worker count, where 0 means every available execution unit.
///
/// Larger requests are capped at `MAX_THREADS_PER_CORE` threads per core.
pub fn resolve_workers(requested: usize) -> usize {
    let cores = num_cpus::get().max(1);
    match requested {
        0 => cores,
        n => n.min(cores * MAX_THREADS_PER_CORE),
    }
}

/// Run `op` on a dedicated rayon pool that is `threads` wide.
///
/// Parallel iterators inside `op` never use more than `threads` workers. If
/// the pool cannot be created the work runs on the global pool instead.
pub fn with_workers<R, F>(threads: usize, label: &str, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    let name = label.to_string();
    match ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("{}-{}", name, i))
        .build()
    {
        Ok(pool) => {
            log::trace!("Running {} on a pool of {} threads", label, threads);
            pool.install(op)
        }
        Err(e) => {
            log::warn!(
                "Failed to build {} thread pool ({}), using the global pool with {} threads",
                label,
                e,
                rayon::current_num_threads()
            );
            op()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_means_all_cpus() {
        assert_eq!(resolve_workers(0), num_cpus::get().max(1));
        assert_eq!(resolve_workers(1), 1);
    }

    #[test]
    fn oversized_requests_are_capped() {
        let cap = num_cpus::get().max(1) * MAX_THREADS_PER_CORE;
        assert_eq!(resolve_workers(usize::MAX), cap);
        assert_eq!(resolve_workers(cap), cap);
    }

    #[test]
    fn pool_is_bounded() {
        let width = with_workers(2, "test", rayon::current_num_threads);
        assert_eq!(width, 2);
    }
}
