/*!
# Partitioning

Cuts a table into `n` contiguous, non-overlapping blocks whose sizes differ by
at most one row. With `len = base * n + remainder`, the first `remainder`
blocks get `base + 1` rows and the rest get `base`, so block `i` always holds
earlier rows than block `i + 1`.

When `n > len` the trailing blocks are empty; the dispatcher skips them.
*/

use crate::error::{EngineError, EngineResult};
use crate::validator::RowView;
use rowcheck_csvs::{Row, Table};
use std::num::NonZeroUsize;
use std::ops::Range;

/// `n` contiguous index ranges covering `[0, len)` exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    ranges: Vec<Range<usize>>,
    len: usize,
}

/// Split `len` rows into `n` balanced ranges
pub fn partition(len: usize, n: NonZeroUsize) -> PartitionPlan {
    let n = n.get();
    let base = len / n;
    let remainder = len % n;

    let mut ranges = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..n {
        let size = if i < remainder { base + 1 } else { base };
        ranges.push(start..start + size);
        start += size;
    }

    PartitionPlan { ranges, len }
}

impl PartitionPlan {
    pub fn for_table(table: &Table, n: NonZeroUsize) -> Self {
        partition(table.len(), n)
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Number of partitions, empty ones included
    pub fn partitions(&self) -> usize {
        self.ranges.len()
    }

    /// Number of rows the plan covers
    pub fn covered(&self) -> usize {
        self.len
    }

    pub fn non_empty(&self) -> impl Iterator<Item = &Range<usize>> {
        self.ranges.iter().filter(|r| !r.is_empty())
    }

    /// Hand out one read-only view per range.
    ///
    /// Views are carved off the front of `rows` with `split_at`, so they are
    /// disjoint by construction. Fails if the plan was built for a different
    /// row count.
    pub fn views<'a>(&self, rows: &'a [Row]) -> EngineResult<Vec<RowView<'a>>> {
        if rows.len() != self.len {
            return Err(EngineError::PlanMismatch {
                covered: self.len,
                table_len: rows.len(),
            });
        }

        let mut views = Vec::with_capacity(self.ranges.len());
        let mut rest = rows;
        for range in &self.ranges {
            let (head, tail) = rest.split_at(range.len());
            views.push(RowView::new(range.start, head));
            rest = tail;
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).unwrap()
    }

    fn sizes(plan: &PartitionPlan) -> Vec<usize> {
        plan.ranges().iter().map(|r| r.len()).collect()
    }

    #[test]
    fn test_larger_blocks_come_first() {
        // 10 rows over 4 workers: 10 = 2 * 4 + 2
        let plan = partition(10, n(4));
        assert_eq!(sizes(&plan), vec![3, 3, 2, 2]);
        assert_eq!(plan.ranges(), &[0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn test_even_split() {
        let plan = partition(9, n(3));
        assert_eq!(plan.ranges(), &[0..3, 3..6, 6..9]);
    }

    #[test]
    fn test_more_workers_than_rows() {
        let plan = partition(3, n(8));
        assert_eq!(sizes(&plan), vec![1, 1, 1, 0, 0, 0, 0, 0]);
        assert_eq!(plan.non_empty().count(), 3);
        assert!(plan.ranges()[3..].iter().all(|r| r.start == 3 && r.end == 3));
    }

    #[test]
    fn test_empty_table() {
        let plan = partition(0, n(4));
        assert_eq!(plan.partitions(), 4);
        assert_eq!(plan.non_empty().count(), 0);
    }

    #[test]
    fn test_views_carry_offsets() {
        let rows: Vec<Row> = (0..5).map(|i| Row::from_iter([i.to_string()])).collect();
        let plan = partition(rows.len(), n(2));
        let views = plan.views(&rows).unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].offset(), 0);
        assert_eq!(views[0].len(), 3);
        assert_eq!(views[1].offset(), 3);
        assert_eq!(views[1].rows()[0].get(0), Some("3"));
    }

    #[test]
    fn test_views_reject_mismatched_table() {
        let rows: Vec<Row> = vec![Row::from_iter(["1"]); 4];
        let plan = partition(6, n(2));

        assert_eq!(
            plan.views(&rows).unwrap_err(),
            EngineError::PlanMismatch {
                covered: 6,
                table_len: 4
            }
        );
    }
}
