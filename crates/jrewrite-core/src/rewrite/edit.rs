//! Text edits produced by a rewrite
//!
//! # Example
//!
//! ```rust,ignore
//! use jrewrite_core::rewrite::edit::{EditUtils, TextEdit};
//!
//! let edits = vec![TextEdit::replace_range(4..5, "b"), TextEdit::insert(0.into(), "// x\n")];
//! let text = EditUtils::apply_edits("int a;", &edits)?;
//! assert_eq!(text, "// x\nint b;");
//! ```

use rowan::{TextRange, TextSize};
use serde::Serialize;

use crate::{Result, RewriteError};

/// Replacement of a range of the original text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    #[serde(serialize_with = "serialize_range")]
    pub range: TextRange,
    pub new_text: String,
}

fn serialize_range<S: serde::Serializer>(range: &TextRange, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;
    let mut state = serializer.serialize_struct("TextRange", 2)?;
    state.serialize_field("start", &u32::from(range.start()))?;
    state.serialize_field("end", &u32::from(range.end()))?;
    state.end()
}

impl TextEdit {
    pub fn new(range: TextRange, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    pub fn replace_range(range: std::ops::Range<usize>, new_text: impl Into<String>) -> Self {
        Self::new(
            TextRange::new(TextSize::from(range.start as u32), TextSize::from(range.end as u32)),
            new_text,
        )
    }

    pub fn insert(position: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(position), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty() && !self.new_text.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        !self.range.is_empty() && self.new_text.is_empty()
    }

    /// Edit that changes nothing
    pub fn is_noop(&self) -> bool {
        self.range.is_empty() && self.new_text.is_empty()
    }

    /// Length change caused by this edit
    pub fn length_delta(&self) -> i64 {
        self.new_text.len() as i64 - i64::from(u32::from(self.range.len()))
    }
}

pub struct EditUtils;

impl EditUtils {
    /// Whether `second` starts inside the range replaced by `first`
    ///
    /// Both edits must be ordered by start offset. Insertions at the same
    /// offset or at the boundary of a replacement do not conflict.
    pub fn edits_conflict(first: &TextEdit, second: &TextEdit) -> bool {
        second.range.start() < first.range.end()
    }

    /// Sort edits by range (stable for insertions at one offset) and reject overlaps
    pub fn sort_and_validate(edits: &mut Vec<TextEdit>) -> Result<()> {
        edits.retain(|e| !e.is_noop());
        edits.sort_by_key(|e| (e.range.start(), e.range.end()));
        for pair in edits.windows(2) {
            if Self::edits_conflict(&pair[0], &pair[1]) {
                return Err(RewriteError::OverlappingEdits {
                    first: format!("{:?}", pair[0].range),
                    second: format!("{:?}", pair[1].range),
                });
            }
        }
        Ok(())
    }

    /// Apply sorted, non-overlapping edits to `source`
    pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String> {
        let mut sorted = edits.to_vec();
        Self::sort_and_validate(&mut sorted)?;

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0usize;
        for edit in &sorted {
            let start = usize::from(edit.range.start());
            let end = usize::from(edit.range.end());
            if end > source.len() || !source.is_char_boundary(start) || !source.is_char_boundary(end) {
                return Err(RewriteError::internal_error(format!(
                    "edit range {:?} is outside the text of length {}",
                    edit.range,
                    source.len()
                )));
            }
            out.push_str(&source[cursor..start]);
            out.push_str(&edit.new_text);
            cursor = end;
        }
        out.push_str(&source[cursor..]);
        Ok(out)
    }

    /// Range of `range` in the edited text, or `None` if an edit touches its inside
    /// across its boundaries
    pub fn map_range(range: TextRange, edits: &[TextEdit]) -> Option<TextRange> {
        let mut shift_start: i64 = 0;
        let mut shift_end: i64 = 0;
        for edit in edits {
            let e = edit.range;
            if e.end() <= range.start() && !(e.is_empty() && e.start() == range.start() && range.is_empty()) {
                // Before the range; insertions at the start go in front of it
                shift_start += edit.length_delta();
                shift_end += edit.length_delta();
            } else if e.start() >= range.end() && !(e.is_empty() && e.start() == range.start()) {
                // After the range
            } else if range.contains_range(e) && e != range {
                shift_end += edit.length_delta();
            } else {
                return None;
            }
        }
        let start = i64::from(u32::from(range.start())) + shift_start;
        let end = i64::from(u32::from(range.end())) + shift_end;
        if start < 0 || end < start {
            return None;
        }
        Some(TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_kinds() {
        let edit = TextEdit::replace_range(5..10, "new");
        assert_eq!(edit.length_delta(), -2);
        assert!(TextEdit::insert(3.into(), "x").is_insertion());
        assert!(TextEdit::delete(TextRange::new(1.into(), 2.into())).is_deletion());
        assert!(TextEdit::insert(3.into(), "").is_noop());
    }

    #[test]
    fn test_apply_edits_in_any_order() {
        let edits = vec![
            TextEdit::replace_range(4..5, "b"),
            TextEdit::insert(0.into(), "// x\n"),
        ];
        assert_eq!(EditUtils::apply_edits("int a;", &edits).unwrap(), "// x\nint b;");
    }

    #[test]
    fn test_insertions_at_one_offset_keep_order() {
        let edits = vec![TextEdit::insert(1.into(), "1"), TextEdit::insert(1.into(), "2")];
        assert_eq!(EditUtils::apply_edits("ab", &edits).unwrap(), "a12b");
    }

    #[test]
    fn test_overlapping_edits_are_rejected() {
        let edits = vec![TextEdit::replace_range(0..4, "x"), TextEdit::replace_range(2..6, "y")];
        let error = EditUtils::apply_edits("abcdefg", &edits).unwrap_err();
        assert!(matches!(error, RewriteError::OverlappingEdits { .. }));
    }

    #[test]
    fn test_map_range() {
        let range = TextRange::new(10.into(), 20.into());
        let before = TextEdit::insert(2.into(), "abc");
        let inside = TextEdit::replace_range(12..14, "");
        assert_eq!(
            EditUtils::map_range(range, &[before, inside]),
            Some(TextRange::new(13.into(), 21.into()))
        );
        let covering = TextEdit::replace_range(10..20, "z");
        assert_eq!(EditUtils::map_range(range, &[covering]), None);
        let after = TextEdit::insert(20.into(), ";");
        assert_eq!(EditUtils::map_range(range, &[after]), Some(range));
    }
}
