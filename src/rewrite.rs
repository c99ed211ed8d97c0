//! Token Edit Buffer - Text-Preserving Rewrites
//!
//! Records replace/delete/insert operations addressed by original token
//! indices and renders the final text. The contract: every token outside an
//! edit is copied verbatim (hidden-channel trivia included), a Replace range
//! collapses to its replacement text emitted once, a Delete range is
//! omitted, and Insert text is spliced at a token boundary without consuming
//! anything. All edits address the original, unmodified stream - rendering
//! never re-addresses edits against partially rewritten text.

use crate::ast::TokenRange;
use crate::errors::{contextless, ErrorKind};
use crate::syntax::TokenStream;
use crate::DeclassifyError;

/// A single buffered operation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    Replace { range: TokenRange, text: String },
    Delete { range: TokenRange },
    Insert { at: usize, text: String },
}

/// An operation plus its monotonically increasing sequence number, the
/// deterministic tie-breaker among edits addressed to the same position.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub seq: usize,
    pub op: EditOp,
}

/// Buffers edits against one file's token stream and renders the result.
#[derive(Debug)]
pub struct TokenEditBuffer<'a> {
    stream: &'a TokenStream,
    edits: Vec<Edit>,
    next_seq: usize,
}

impl<'a> TokenEditBuffer<'a> {
    pub fn new(stream: &'a TokenStream) -> Self {
        Self {
            stream,
            edits: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn stream(&self) -> &TokenStream {
        self.stream
    }

    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Replace the whole token range with `text`, emitted once.
    pub fn replace(&mut self, range: TokenRange, text: impl Into<String>) {
        self.push(EditOp::Replace {
            range,
            text: text.into(),
        });
    }

    /// Omit every token in the range.
    pub fn delete(&mut self, range: TokenRange) {
        self.push(EditOp::Delete { range });
    }

    /// Splice `text` immediately before the token at index `at` (or at the
    /// end of the stream when `at` equals the token count).
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.push(EditOp::Insert {
            at,
            text: text.into(),
        });
    }

    fn push(&mut self, op: EditOp) {
        self.edits.push(Edit {
            seq: self.next_seq,
            op,
        });
        self.next_seq += 1;
    }

    /// Render the final text by replaying all edits against the original
    /// token sequence. With zero edits the output equals the original text
    /// exactly.
    pub fn render(&self) -> Result<String, DeclassifyError> {
        let len = self.stream.len();
        self.check_bounds(len)?;

        // Replace/Delete ranges, sorted by start with seq as tie-breaker.
        let mut ranged: Vec<(&TokenRange, Option<&str>, usize)> = self
            .edits
            .iter()
            .filter_map(|e| match &e.op {
                EditOp::Replace { range, text } => Some((range, Some(text.as_str()), e.seq)),
                EditOp::Delete { range } => Some((range, None, e.seq)),
                EditOp::Insert { .. } => None,
            })
            .collect();
        ranged.sort_by_key(|(range, _, seq)| (range.start, *seq));

        for pair in ranged.windows(2) {
            let (prev, _, prev_seq) = pair[0];
            let (next, _, next_seq) = pair[1];
            if prev.overlaps(next) {
                return Err(contextless(ErrorKind::EditConflict {
                    detail: format!(
                        "edit #{} covering tokens {}..{} overlaps edit #{} covering tokens {}..{}",
                        prev_seq, prev.start, prev.end, next_seq, next.start, next.end
                    ),
                }));
            }
        }

        // Inserts, sorted by position with seq as tie-breaker.
        let mut inserts: Vec<(usize, usize, &str)> = self
            .edits
            .iter()
            .filter_map(|e| match &e.op {
                EditOp::Insert { at, text } => Some((*at, e.seq, text.as_str())),
                _ => None,
            })
            .collect();
        inserts.sort_by_key(|(at, seq, _)| (*at, *seq));

        for (at, seq, _) in &inserts {
            if let Some((range, _, range_seq)) = ranged
                .iter()
                .find(|(range, _, _)| range.start < *at && *at <= range.end)
            {
                return Err(contextless(ErrorKind::EditConflict {
                    detail: format!(
                        "insert #{} at token boundary {} falls inside edit #{} covering tokens {}..{}",
                        seq, at, range_seq, range.start, range.end
                    ),
                }));
            }
        }

        let mut out = String::new();
        let mut ranged_idx = 0;
        let mut insert_idx = 0;
        let mut i = 0;
        loop {
            while insert_idx < inserts.len() && inserts[insert_idx].0 == i {
                out.push_str(inserts[insert_idx].2);
                insert_idx += 1;
            }
            if i == len {
                break;
            }
            if ranged_idx < ranged.len() && ranged[ranged_idx].0.start == i {
                let (range, replacement, _) = ranged[ranged_idx];
                if let Some(text) = replacement {
                    out.push_str(text);
                }
                i = range.end + 1;
                ranged_idx += 1;
                continue;
            }
            out.push_str(&self.stream.get(i).expect("index checked against len").text);
            i += 1;
        }

        Ok(out)
    }

    fn check_bounds(&self, len: usize) -> Result<(), DeclassifyError> {
        for edit in &self.edits {
            let (start, end) = match &edit.op {
                EditOp::Replace { range, .. } | EditOp::Delete { range } => (range.start, range.end),
                EditOp::Insert { at, .. } => {
                    if *at > len {
                        return Err(contextless(ErrorKind::EditOutOfBounds {
                            start: *at,
                            end: *at,
                            len,
                        }));
                    }
                    continue;
                }
            };
            if start > end || end >= len {
                return Err(contextless(ErrorKind::EditOutOfBounds { start, end, len }));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceContext;
    use crate::syntax::lexer;

    fn lex(source: &str) -> TokenStream {
        lexer::tokenize(source, &SourceContext::from_file("test.java", source)).unwrap()
    }

    #[test]
    fn zero_edits_reproduce_original_text() {
        let stream = lex("public abstract class Shape { /* body */ }\n");
        let buffer = TokenEditBuffer::new(&stream);
        assert_eq!(buffer.render().unwrap(), stream.text());
    }

    #[test]
    fn replace_collapses_range_to_single_text() {
        // Tokens: [public][ ][abstract][ ][class][ ][Shape]...
        let stream = lex("public abstract class Shape { }");
        let mut buffer = TokenEditBuffer::new(&stream);
        buffer.replace(TokenRange::new(0, 4), "interface");
        assert_eq!(buffer.render().unwrap(), "interface Shape { }");
    }

    #[test]
    fn delete_omits_tokens_but_keeps_surrounding_trivia() {
        // Tokens: [public][ ][int][ ][x][ ][=][ ][1][;]
        let stream = lex("public int x = 1;");
        let mut buffer = TokenEditBuffer::new(&stream);
        buffer.delete(TokenRange::single(0));
        assert_eq!(buffer.render().unwrap(), " int x = 1;");
    }

    #[test]
    fn insert_splices_without_consuming() {
        let stream = lex("class A { }");
        let mut buffer = TokenEditBuffer::new(&stream);
        buffer.insert(0, "// generated\n");
        assert_eq!(buffer.render().unwrap(), "// generated\nclass A { }");
    }

    #[test]
    fn insert_at_end_of_stream() {
        let stream = lex("class A { }");
        let mut buffer = TokenEditBuffer::new(&stream);
        buffer.insert(stream.len(), "\n");
        assert_eq!(buffer.render().unwrap(), "class A { }\n");
    }

    #[test]
    fn inserts_at_same_boundary_keep_submission_order() {
        let stream = lex("class A { }");
        let mut buffer = TokenEditBuffer::new(&stream);
        buffer.insert(0, "first ");
        buffer.insert(0, "second ");
        assert_eq!(buffer.render().unwrap(), "first second class A { }");
    }

    #[test]
    fn insert_at_edges_of_deleted_range_is_allowed() {
        // Tokens: [a][ ][b][ ][c]
        let stream = lex("a b c");
        let mut buffer = TokenEditBuffer::new(&stream);
        buffer.delete(TokenRange::new(2, 2));
        buffer.insert(2, "<");
        buffer.insert(3, ">");
        assert_eq!(buffer.render().unwrap(), "a <> c");
    }

    #[test]
    fn overlapping_ranges_are_rejected() {
        let stream = lex("public abstract class Shape { }");
        let mut buffer = TokenEditBuffer::new(&stream);
        buffer.replace(TokenRange::new(0, 4), "interface");
        buffer.delete(TokenRange::new(2, 2));
        let err = buffer.render().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::EditConflict { .. }));
    }

    #[test]
    fn insert_inside_replaced_range_is_rejected() {
        let stream = lex("public abstract class Shape { }");
        let mut buffer = TokenEditBuffer::new(&stream);
        buffer.replace(TokenRange::new(0, 4), "interface");
        buffer.insert(2, "x");
        let err = buffer.render().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::EditConflict { .. }));
    }

    #[test]
    fn out_of_bounds_edit_is_rejected() {
        let stream = lex("class A { }");
        let mut buffer = TokenEditBuffer::new(&stream);
        buffer.delete(TokenRange::new(0, stream.len()));
        let err = buffer.render().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::EditOutOfBounds { .. }));
    }

    #[test]
    fn disjoint_deletes_apply_independently_of_submission_order() {
        // Tokens: [public][ ][abstract][ ][void][ ][draw][(][)][;]
        let stream = lex("public abstract void draw();");
        let mut forward = TokenEditBuffer::new(&stream);
        forward.delete(TokenRange::single(0));
        forward.delete(TokenRange::single(2));
        let mut backward = TokenEditBuffer::new(&stream);
        backward.delete(TokenRange::single(2));
        backward.delete(TokenRange::single(0));
        assert_eq!(forward.render().unwrap(), "  void draw();");
        assert_eq!(backward.render().unwrap(), "  void draw();");
    }
}
