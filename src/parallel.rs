//! Row-range parallel execution on the rayon pool.

use rayon::prelude::*;

/// Run `work(i0, i1)` over disjoint contiguous sub-ranges covering every
/// index in `[begin, end)` exactly once.
///
/// `grain_hint == 0` leaves chunking to the splitter (one range per worker
/// thread); a nonzero hint caps the range length. Small or degenerate ranges
/// short-circuit to a direct call on the current thread.
pub fn parallel_for<F>(begin: usize, end: usize, grain_hint: usize, work: F)
where
    F: Fn(usize, usize) + Sync,
{
    if end <= begin {
        return;
    }
    let len = end - begin;
    let nthreads = rayon::current_num_threads().max(1);
    let grain = if grain_hint > 0 {
        grain_hint
    } else {
        (len + nthreads - 1) / nthreads
    }
    .max(1);

    if nthreads == 1 || len <= grain {
        work(begin, end);
        return;
    }

    let num_blocks = (len + grain - 1) / grain;
    (0..num_blocks).into_par_iter().for_each(|blk| {
        let i0 = begin + blk * grain;
        let i1 = (i0 + grain).min(end);
        work(i0, i1);
    });
}
