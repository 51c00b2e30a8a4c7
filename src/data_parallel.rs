//! Data-parallel reduction on a dedicated rayon pool.
//!
//! Rayon decides how the index range is split. Each split folds its own
//! partial maximum and the partials are combined with `max`, which is
//! commutative and associative, so the combine order does not matter.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{HarnessError, Result};
use crate::kernel::fold_odd;
use crate::pool::MAX_WORKERS;

pub fn build_pool(threads: usize) -> Result<ThreadPool> {
    if threads == 0 {
        return Err(HarnessError::invalid_config(
            "parallel_threads",
            "the data-parallel pool needs at least one thread",
        ));
    }
    if threads > MAX_WORKERS {
        return Err(HarnessError::invalid_config(
            "parallel_threads",
            format!("{threads} threads exceeds the limit of {MAX_WORKERS}"),
        ));
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("rayon-worker-{i}"))
        .build()?;
    Ok(pool)
}

/// Reduces `data` on the given pool.
pub fn par_max_odd(pool: &ThreadPool, data: &[i32]) -> Option<i32> {
    pool.install(|| {
        data.par_iter()
            .fold(|| None, |acc, &value| fold_odd(acc, value))
            .reduce(|| None, |a, b| a.max(b))
    })
}

pub fn max_with_rayon(data: &[i32], threads: usize) -> Result<Option<i32>> {
    let pool = build_pool(threads)?;
    let result = par_max_odd(&pool, data);
    debug!(threads = pool.current_num_threads(), ?result, "parallel reduction finished");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::find_max_odd;
    use proptest::prelude::*;

    #[test]
    fn test_examples() {
        let run = |data: &[i32]| max_with_rayon(data, 4).unwrap();
        assert_eq!(run(&[4, 7, 2, 9, 9, 6]), Some(9));
        assert_eq!(run(&[2, 4, 6, 8]), None);
        assert_eq!(run(&[]), None);
        assert_eq!(run(&[-3, -5, -1]), Some(-1));
    }

    #[test]
    fn test_none_is_the_identity_of_the_combiner() {
        // Partitions with no odd value must not hide another partition's result.
        assert_eq!(None.max(Some(-7)), Some(-7));
        assert_eq!(Some(i32::MIN + 1).max(None), Some(i32::MIN + 1));
    }

    #[test]
    fn test_out_of_range_thread_counts_are_rejected() {
        assert!(matches!(
            max_with_rayon(&[1], 0),
            Err(HarnessError::InvalidConfig { field: "parallel_threads", .. })
        ));
        assert!(matches!(
            max_with_rayon(&[1], usize::MAX),
            Err(HarnessError::InvalidConfig { field: "parallel_threads", .. })
        ));
    }

    #[test]
    fn test_large_input_single_odd_at_the_end() {
        let mut data = vec![2; 100_000];
        data.push(-1);
        let pool = build_pool(8).unwrap();
        assert_eq!(par_max_odd(&pool, &data), Some(-1));
    }

    proptest! {
        #[test]
        fn test_agrees_with_kernel(data: Vec<i32>, threads in 1usize..5) {
            let pool = build_pool(threads).unwrap();
            prop_assert_eq!(par_max_odd(&pool, &data), find_max_odd(&data));
        }
    }
}
