// Timeline: aligning every version of a file onto one row grid
//
// Each commit's diff is computed against its own parent, so its line
// positions only make sense locally. The timeline turns those local
// positions into one shared coordinate space:
//
// 1. `segment` cuts a commit's tagged lines into ADD/DELETE spans.
// 2. `cascade` pushes later commits' spans past rows that earlier commits
//    removed, which later diffs cannot see.
// 3. `total_length` sizes the grid: the first version plus every line
//    added afterwards.
// 4. `materialize` lays one commit's lines onto that grid, padding rows the
//    commit does not have with placeholders.

mod materialize;

pub use materialize::{materialize, AlignedRow, CoordinateMismatch, PLACEHOLDER};

use crate::{DiffLine, DiffLineKind};

/// Whether a span covers added or removed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    Add,
    Delete,
}

/// Half-open interval `[start, end)` of rows touched by one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSpan {
    pub kind: PatchKind,
    pub start: usize,
    pub end: usize,
}

impl PatchSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    fn shifted(self, by: usize) -> Self {
        PatchSpan {
            start: self.start + by,
            end: self.end + by,
            ..self
        }
    }
}

/// Cut a commit's tagged diff lines into maximal ADD and DELETE runs.
///
/// Positions are indices into `lines`. An added line ends any open DELETE
/// run and a removed line ends any open ADD run, so interleaved `+`/`-`
/// blocks come out as separate spans. The result is ordered by `start`.
pub fn segment(lines: &[DiffLine]) -> Vec<PatchSpan> {
    let mut spans = Vec::new();
    let mut open_add: Option<usize> = None;
    let mut open_delete: Option<usize> = None;

    for (line_no, line) in lines.iter().enumerate() {
        match line.kind {
            DiffLineKind::Addition => {
                close_run(&mut spans, PatchKind::Delete, &mut open_delete, line_no);
                open_add.get_or_insert(line_no);
            }
            DiffLineKind::Deletion => {
                close_run(&mut spans, PatchKind::Add, &mut open_add, line_no);
                open_delete.get_or_insert(line_no);
            }
            DiffLineKind::Context => {
                close_run(&mut spans, PatchKind::Add, &mut open_add, line_no);
                close_run(&mut spans, PatchKind::Delete, &mut open_delete, line_no);
            }
        }
    }

    close_run(&mut spans, PatchKind::Add, &mut open_add, lines.len());
    close_run(&mut spans, PatchKind::Delete, &mut open_delete, lines.len());

    spans
}

fn close_run(spans: &mut Vec<PatchSpan>, kind: PatchKind, open: &mut Option<usize>, end: usize) {
    if let Some(start) = open.take() {
        spans.push(PatchSpan { kind, start, end });
    }
}

/// Move every commit's spans into the shared coordinate space.
///
/// `local[i]` holds the spans of the i-th commit (oldest first) in that
/// commit's own diff coordinates. For each DELETE span of an earlier commit,
/// every span of a later commit starting after it is shifted down by the
/// deleted length. Earlier commits are final before later ones are computed,
/// so the input is never mutated and the result does not depend on
/// evaluation order.
pub fn cascade(local: &[Vec<PatchSpan>]) -> Vec<Vec<PatchSpan>> {
    let mut cascaded: Vec<Vec<PatchSpan>> = Vec::with_capacity(local.len());

    for spans in local {
        let shifted: Vec<PatchSpan> = spans
            .iter()
            .map(|&span| {
                cascaded
                    .iter()
                    .flatten()
                    .filter(|earlier| earlier.kind == PatchKind::Delete)
                    .fold(span, |span, deletion| {
                        if span.start > deletion.start {
                            span.shifted(deletion.len())
                        } else {
                            span
                        }
                    })
            })
            .collect();
        cascaded.push(shifted);
    }

    cascaded
}

/// Number of rows needed to show every line that ever existed.
///
/// That is the first commit's diff length plus the ADD spans of every later
/// commit. The first commit's own additions are already part of its diff.
pub fn total_length(first_len: usize, cascaded: &[Vec<PatchSpan>]) -> usize {
    let added: usize = cascaded
        .iter()
        .skip(1)
        .flatten()
        .filter(|span| span.kind == PatchKind::Add)
        .map(PatchSpan::len)
        .sum();

    first_len + added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(start: usize, end: usize) -> PatchSpan {
        PatchSpan {
            kind: PatchKind::Add,
            start,
            end,
        }
    }

    fn delete(start: usize, end: usize) -> PatchSpan {
        PatchSpan {
            kind: PatchKind::Delete,
            start,
            end,
        }
    }

    #[test]
    fn test_segment_single_addition_at_end() {
        let lines = vec![DiffLine::context("FILE1 line 1"), DiffLine::addition("new line")];

        assert_eq!(segment(&lines), vec![add(1, 2)]);
    }

    #[test]
    fn test_segment_only_context() {
        let lines = vec![DiffLine::context("a"), DiffLine::context("b")];

        assert!(segment(&lines).is_empty());
    }

    #[test]
    fn test_segment_empty_input() {
        assert!(segment(&[]).is_empty());
    }

    #[test]
    fn test_segment_replacement_splits_into_delete_then_add() {
        let lines = vec![
            DiffLine::context("keep"),
            DiffLine::deletion("old 1"),
            DiffLine::deletion("old 2"),
            DiffLine::addition("new 1"),
            DiffLine::context("keep"),
        ];

        assert_eq!(segment(&lines), vec![delete(1, 3), add(3, 4)]);
    }

    #[test]
    fn test_segment_interleaved_runs() {
        let lines = vec![
            DiffLine::addition("a"),
            DiffLine::deletion("b"),
            DiffLine::addition("c"),
            DiffLine::addition("d"),
        ];

        assert_eq!(segment(&lines), vec![add(0, 1), delete(1, 2), add(2, 4)]);
    }

    #[test]
    fn test_segment_closes_runs_at_end_of_input() {
        let lines = vec![
            DiffLine::context("a"),
            DiffLine::deletion("b"),
            DiffLine::deletion("c"),
        ];

        assert_eq!(segment(&lines), vec![delete(1, 3)]);
    }

    #[test]
    fn test_segment_spans_are_ordered_and_disjoint() {
        let lines = vec![
            DiffLine::deletion("a"),
            DiffLine::context("b"),
            DiffLine::addition("c"),
            DiffLine::deletion("d"),
            DiffLine::context("e"),
            DiffLine::addition("f"),
        ];

        let spans = segment(&lines);
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert_eq!(spans.len(), 4);
    }

    #[test]
    fn test_cascade_shifts_later_spans_past_deletion() {
        // commit 1 deletes row 1; commit 2 appends after row 1 of its own diff
        let local = vec![vec![], vec![delete(1, 2)], vec![add(2, 3)]];

        let cascaded = cascade(&local);

        assert_eq!(cascaded[0], vec![]);
        assert_eq!(cascaded[1], vec![delete(1, 2)]);
        assert_eq!(cascaded[2], vec![add(3, 4)]);
    }

    #[test]
    fn test_cascade_leaves_spans_at_or_before_deletion() {
        let local = vec![vec![delete(2, 4)], vec![add(0, 1), add(2, 3)]];

        let cascaded = cascade(&local);

        assert_eq!(cascaded[1], vec![add(0, 1), add(2, 3)]);
    }

    #[test]
    fn test_cascade_does_not_shift_own_commit() {
        let local = vec![vec![delete(0, 2), add(3, 4)]];

        assert_eq!(cascade(&local), local);
    }

    #[test]
    fn test_cascade_accumulates_across_commits() {
        let local = vec![
            vec![delete(0, 1)],
            vec![delete(1, 3)],
            vec![add(2, 3)],
        ];

        let cascaded = cascade(&local);

        // shifted by commit 1's deletion, then past commit 2's shifted one
        assert_eq!(cascaded[1], vec![delete(2, 4)]);
        assert_eq!(cascaded[2], vec![add(5, 6)]);
    }

    #[test]
    fn test_total_length_counts_later_additions_only() {
        let cascaded = vec![vec![add(0, 3)], vec![add(1, 2), delete(4, 6)], vec![add(7, 9)]];

        assert_eq!(total_length(5, &cascaded), 5 + 1 + 2);
    }

    #[test]
    fn test_total_length_single_commit() {
        let cascaded = vec![vec![add(1, 2)]];

        assert_eq!(total_length(2, &cascaded), 2);
    }
}
