//! Typewriter reveal math over parsed segments.

use crate::markup::{Fragment, Segment};

/// Characters of `segments[segment_index]` visible once `global_count`
/// characters of the whole paragraph have been typed.
pub fn revealed_length(segments: &[Segment], global_count: usize, segment_index: usize) -> usize {
    let Some(segment) = segments.get(segment_index) else {
        return 0;
    };
    let prefix: usize = segments[..segment_index].iter().map(Segment::len).sum();
    global_count.saturating_sub(prefix).min(segment.len())
}

/// Revealed length for every segment, in order.
pub fn reveal_all(segments: &[Segment], global_count: usize) -> Vec<usize> {
    let mut remaining = global_count;
    segments
        .iter()
        .map(|segment| {
            let shown = remaining.min(segment.len());
            remaining -= shown;
            shown
        })
        .collect()
}

/// Fragments of `segment` truncated to the first `revealed` characters.
/// Earlier fragments are always fully shown before later ones start.
pub fn visible_fragments(segment: &Segment, revealed: usize) -> Vec<Fragment> {
    let mut budget = revealed;
    let mut out = Vec::new();
    for fragment in &segment.fragments {
        if budget == 0 {
            break;
        }
        let len = fragment.len();
        if len <= budget {
            out.push(fragment.clone());
            budget -= len;
        } else {
            let text: String = fragment.text.chars().take(budget).collect();
            out.push(Fragment {
                text,
                is_bold: fragment.is_bold,
            });
            budget = 0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments_of_lengths(lengths: &[usize]) -> Vec<Segment> {
        lengths
            .iter()
            .map(|len| Segment {
                fragments: vec![Fragment::plain("x".repeat(*len))],
                is_centered: false,
            })
            .collect()
    }

    #[test]
    fn splits_global_count_across_segments() {
        let segments = segments_of_lengths(&[5, 3, 4]);
        assert_eq!(revealed_length(&segments, 7, 0), 5);
        assert_eq!(revealed_length(&segments, 7, 1), 2);
        assert_eq!(revealed_length(&segments, 7, 2), 0);
        assert_eq!(reveal_all(&segments, 7), vec![5, 2, 0]);
    }

    #[test]
    fn out_of_range_index_reveals_nothing() {
        let segments = segments_of_lengths(&[2]);
        assert_eq!(revealed_length(&segments, 10, 3), 0);
    }

    #[test]
    fn monotonic_and_bounded_by_segment_length() {
        let segments = segments_of_lengths(&[5, 3, 4]);
        for idx in 0..segments.len() {
            let mut previous = 0;
            for count in 0..20 {
                let shown = revealed_length(&segments, count, idx);
                assert!(shown >= previous);
                assert!(shown <= segments[idx].len());
                assert_eq!(shown, reveal_all(&segments, count)[idx]);
                previous = shown;
            }
        }
    }

    #[test]
    fn truncates_fragments_in_order() {
        let segment = Segment {
            fragments: vec![Fragment::plain("ab"), Fragment::bold("cdé"), Fragment::plain("f")],
            is_centered: true,
        };
        assert_eq!(visible_fragments(&segment, 0), Vec::<Fragment>::new());
        assert_eq!(
            visible_fragments(&segment, 4),
            vec![Fragment::plain("ab"), Fragment::bold("cd")]
        );
        assert_eq!(visible_fragments(&segment, 99), segment.fragments);
    }
}
