//! Locating list-literal assignments in a settings module

use crate::error::{Error, Result};

use super::lexer::{tokenize, Token, TokenKind};

/// A `NAME = [ ... ]` assignment found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLiteral {
    pub name: String,
    /// 1-based line of the assignment
    pub line: usize,
    /// Byte offset of the opening `[`
    pub open: usize,
    /// Byte offset of the matching `]`
    pub close: usize,
    /// End offset of the last element when it is not followed by a comma
    pub unterminated_tail: Option<usize>,
    /// Start offsets of the first and last top-level elements
    pub first_item: Option<usize>,
    pub last_item: Option<usize>,
    /// Number of top-level elements
    pub len: usize,
}

/// Tokenized view over a settings module
pub struct SettingsDocument<'a> {
    source: &'a str,
    tokens: Vec<Token>,
}

impl<'a> SettingsDocument<'a> {
    pub fn parse(source: &'a str) -> Self {
        let tokens = tokenize(source)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        Self { source, tokens }
    }

    /// 1-based line number containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        line_of(self.source, offset)
    }

    /// Find the first top-level `name = [ ... ]` assignment.
    ///
    /// Returns `Ok(None)` when no such assignment exists and an error when
    /// the list is opened but never closed.
    pub fn find_list(&self, name: &str) -> Result<Option<ListLiteral>> {
        let openings = self.assignment_openings(name);

        let Some(&first) = openings.first() else {
            return Ok(None);
        };

        if openings.len() > 1 {
            let lines: Vec<usize> = openings
                .iter()
                .map(|&i| self.line_of(self.tokens[i].start))
                .collect();
            tracing::warn!(
                "{} is assigned {} times (lines {:?}), editing the first",
                name,
                openings.len(),
                lines
            );
        }

        self.list_at(name, first).map(Some)
    }

    /// Token indices of the `[` of every matching assignment
    fn assignment_openings(&self, name: &str) -> Vec<usize> {
        let mut found = Vec::new();
        let mut depth = 0usize;
        let mut line_start = true;

        for (i, token) in self.tokens.iter().enumerate() {
            if depth == 0
                && line_start
                && token.kind == TokenKind::Name
                && token.text(self.source) == name
            {
                let eq = self.tokens.get(i + 1);
                let open = self.tokens.get(i + 2);
                if let (Some(eq), Some(open)) = (eq, open) {
                    if eq.is_op(self.source, "=") && open.kind == TokenKind::Open('[') {
                        found.push(i + 2);
                    }
                }
            }

            match token.kind {
                TokenKind::Open(_) => depth += 1,
                TokenKind::Close(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
            line_start = token.kind == TokenKind::Newline;
        }

        found
    }

    fn list_at(&self, name: &str, open_idx: usize) -> Result<ListLiteral> {
        let open = self.tokens[open_idx];
        let line = self.line_of(open.start);

        let mut depth = 1usize;
        let mut last = open;
        let mut commas = 0usize;
        let mut first_item = None;
        let mut last_item = None;
        let mut expecting_item = true;

        for token in &self.tokens[open_idx + 1..] {
            if depth == 1
                && expecting_item
                && !matches!(token.kind, TokenKind::Comma | TokenKind::Close(_))
            {
                if first_item.is_none() {
                    first_item = Some(token.start);
                }
                last_item = Some(token.start);
                expecting_item = false;
            }

            match token.kind {
                TokenKind::Open(_) => depth += 1,
                TokenKind::Close(_) => {
                    depth -= 1;
                    if depth == 0 {
                        let unterminated_tail =
                            if last == open || last.kind == TokenKind::Comma {
                                None
                            } else {
                                Some(last.end)
                            };
                        let len = commas + usize::from(unterminated_tail.is_some());
                        return Ok(ListLiteral {
                            name: name.to_string(),
                            line,
                            open: open.start,
                            close: token.start,
                            unterminated_tail,
                            first_item,
                            last_item,
                            len,
                        });
                    }
                }
                TokenKind::Comma if depth == 1 => {
                    commas += 1;
                    expecting_item = true;
                }
                _ => {}
            }
            last = *token;
        }

        Err(Error::UnclosedList {
            name: name.to_string(),
            line,
        })
    }
}

pub(crate) fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_multiline_list() {
        let source = "DEBUG = True\n\nINSTALLED_APPS = [\n    \"a\",\n    \"b\",\n]\n";
        let doc = SettingsDocument::parse(source);
        let list = doc.find_list("INSTALLED_APPS").unwrap().unwrap();
        assert_eq!(list.line, 3);
        assert_eq!(list.len, 2);
        assert_eq!(list.unterminated_tail, None);
        assert_eq!(&source[list.close..list.close + 1], "]");
        assert_eq!(list.first_item, source.find("\"a\""));
        assert_eq!(list.last_item, source.find("\"b\""));
    }

    #[test]
    fn test_unterminated_tail_points_after_last_element() {
        let source = "MIDDLEWARE = [\"a\", \"b\"]";
        let list = SettingsDocument::parse(source)
            .find_list("MIDDLEWARE")
            .unwrap()
            .unwrap();
        assert_eq!(list.unterminated_tail, Some(source.len() - 1));
        assert_eq!(list.len, 2);
    }

    #[test]
    fn test_empty_list() {
        let source = "MIDDLEWARE = []\n";
        let list = SettingsDocument::parse(source)
            .find_list("MIDDLEWARE")
            .unwrap()
            .unwrap();
        assert_eq!(list.len, 0);
        assert_eq!(list.first_item, None);
        assert_eq!(list.unterminated_tail, None);
    }

    #[test]
    fn test_nested_brackets_and_comments() {
        let source = "X = [\n    (\"a\", [1, 2]),  # ] trailing\n    \"]\",\n]\nY = 1\n";
        let list = SettingsDocument::parse(source).find_list("X").unwrap().unwrap();
        assert_eq!(list.len, 2);
        assert_eq!(list.last_item, source.find("\"]\""));
        assert_eq!(list.close, source.find("]\nY").unwrap());
    }

    #[test]
    fn test_requires_whole_identifier_and_assignment() {
        let source = "MY_MIDDLEWARE = [1]\nif MIDDLEWARE == [2]: pass\nMIDDLEWARE += [3]\n";
        let doc = SettingsDocument::parse(source);
        assert_eq!(doc.find_list("MIDDLEWARE").unwrap(), None);
    }

    #[test]
    fn test_ignores_names_inside_other_brackets() {
        let source = "d = dict(\n    MIDDLEWARE = [1],\n)\n";
        let doc = SettingsDocument::parse(source);
        assert_eq!(doc.find_list("MIDDLEWARE").unwrap(), None);
    }

    #[test]
    fn test_first_assignment_wins() {
        let source = "A = [1]\nA = [2, 3]\n";
        let list = SettingsDocument::parse(source).find_list("A").unwrap().unwrap();
        assert_eq!(list.line, 1);
        assert_eq!(list.len, 1);
    }

    #[test]
    fn test_indented_assignment_is_found() {
        let source = "if DEBUG:\n    A = [1]\n";
        let list = SettingsDocument::parse(source).find_list("A").unwrap().unwrap();
        assert_eq!(list.line, 2);
    }

    #[test]
    fn test_unclosed_list_is_an_error() {
        let source = "A = [\n    1,\n";
        let err = SettingsDocument::parse(source).find_list("A").unwrap_err();
        assert!(matches!(err, Error::UnclosedList { line: 1, .. }));
    }
}
