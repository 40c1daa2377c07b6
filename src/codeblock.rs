//! Fenced code block extraction.
//!
//! Replies frequently contain a fenced block of code.  [`extract_code_block`]
//! pulls out the first one so it can be written to disk with `/write -code`.

/// The delimiter that opens and closes a fenced block.
pub const FENCE: &str = "```";

/// The first fenced code block found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag from the opening fence.  Empty when unspecified.
    pub language: String,
    /// Block contents with surrounding whitespace trimmed.
    pub body: String,
}

impl CodeBlock {
    /// Number of lines in the body.
    pub fn line_count(&self) -> usize {
        self.body.lines().count()
    }

    /// Language tag for display, or `unspecified`.
    pub fn language_label(&self) -> &str {
        if self.language.is_empty() {
            "unspecified"
        } else {
            &self.language
        }
    }
}

/// Extracts the first fenced code block from `text`.
///
/// Returns `None` unless the text contains at least an opening and a closing
/// fence.  Blocks after the first are ignored.
///
/// # Examples
///
/// ```
/// # use chainchat::extract_code_block;
/// let block = extract_code_block("Try:\n```rust\nfn main() {}\n```\n").unwrap();
/// assert_eq!(block.language, "rust");
/// assert_eq!(block.body, "fn main() {}");
/// assert!(extract_code_block("no code here").is_none());
/// ```
pub fn extract_code_block(text: &str) -> Option<CodeBlock> {
    let mut segments = text.split(FENCE);
    let _before = segments.next()?;
    let fenced = segments.next()?;
    // A closing fence must follow.
    segments.next()?;

    let (language, rest) = fenced.split_once('\n').unwrap_or((fenced, ""));
    Some(CodeBlock {
        language: language.trim().to_string(),
        body: rest.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_with_language() {
        let text = "Here you go:\n\n```python\n    def f():\n        return 1\n```\nEnjoy.";
        let block = extract_code_block(text).unwrap();
        assert_eq!(block.language, "python");
        assert_eq!(block.body, "def f():\n        return 1");
        assert_eq!(block.line_count(), 2);
    }

    #[test]
    fn block_without_language() {
        let block = extract_code_block("```\nls -la\n```").unwrap();
        assert_eq!(block.language, "");
        assert_eq!(block.language_label(), "unspecified");
        assert_eq!(block.body, "ls -la");
    }

    #[test]
    fn zero_or_one_fence_is_none() {
        assert!(extract_code_block("").is_none());
        assert!(extract_code_block("plain prose").is_none());
        assert!(extract_code_block("dangling ```rust\nfn main() {}").is_none());
    }

    #[test]
    fn only_first_block_is_returned() {
        let text = "```rust\nlet a = 1;\n```\nand\n```go\nb := 2\n```";
        let block = extract_code_block(text).unwrap();
        assert_eq!(block.language, "rust");
        assert_eq!(block.body, "let a = 1;");
    }

    #[test]
    fn carriage_returns_do_not_leak_into_language() {
        let block = extract_code_block("```sh\r\necho hi\r\n```").unwrap();
        assert_eq!(block.language, "sh");
        assert_eq!(block.body, "echo hi");
    }

    #[test]
    fn fence_without_newline_has_empty_body() {
        let block = extract_code_block("```json```").unwrap();
        assert_eq!(block.language, "json");
        assert_eq!(block.body, "");
        assert_eq!(block.line_count(), 0);
    }
}
