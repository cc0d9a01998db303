//! Line-oriented text buffers used by every SQL and source emitter.

use std::fmt;

/// An ordered list of single lines.
///
/// Lines never contain line breaks; multi-line text is split on the way in.
/// A snippet counts as a block when it has several lines or when a block
/// was forced by adding multi-line text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snippet {
    lines: Vec<String>,
    block_forced: bool,
}

/// A number of indentation levels, four spaces each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent(pub usize);

impl Indent {
    pub const WIDTH: usize = 4;

    pub fn spaces(self) -> String {
        " ".repeat(self.0 * Indent::WIDTH)
    }

    /// Delimiter placing each following line at this indentation.
    pub fn delimiter(self) -> String {
        format!("\n{}", self.spaces())
    }

    pub fn deeper(self) -> Indent {
        Indent(self.0 + 1)
    }
}

impl Snippet {
    pub fn new() -> Snippet {
        Snippet::default()
    }

    /// Appends one line.
    ///
    /// # Panics
    ///
    /// Panics if `line` contains a line break.
    pub fn line(mut self, line: impl Into<String>) -> Snippet {
        self.push(line);
        self
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        assert!(
            !line.contains(['\n', '\r']),
            "line is not a single line: {line:?}"
        );
        self.lines.push(line);
    }

    pub fn lines<I>(mut self, lines: I) -> Snippet
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for line in lines {
            self.push(line);
        }
        self
    }

    /// Appends every line of `text`, forcing a block if it spans several
    /// lines.
    pub fn multiline(mut self, text: &str) -> Snippet {
        self.push_multiline(text);
        self
    }

    pub fn push_multiline(&mut self, text: &str) {
        for line in text.lines() {
            self.push(line);
        }
        self.block_forced |= text.contains('\n');
    }

    pub fn multilines<I>(mut self, texts: I) -> Snippet
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for text in texts {
            self.push_multiline(text.as_ref());
        }
        self
    }

    /// Appends the lines of another snippet.
    pub fn append(mut self, other: &Snippet) -> Snippet {
        self.lines.extend(other.lines.iter().cloned());
        self.block_forced |= other.block_forced;
        self
    }

    /// Appends the lines of another snippet, indented.
    pub fn append_indented(mut self, other: &Snippet, indent: Indent) -> Snippet {
        let spaces = indent.spaces();
        self.lines.extend(other.lines.iter().map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{spaces}{line}")
            }
        }));
        self
    }

    pub fn force_block(mut self, block: bool) -> Snippet {
        self.block_forced |= block;
        self
    }

    pub fn is_block(&self) -> bool {
        self.block_forced || self.lines.len() > 1
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn map(&self, convert: impl FnMut(&String) -> String) -> Snippet {
        Snippet {
            lines: self.lines.iter().map(convert).collect(),
            block_forced: false,
        }
    }

    pub fn join(&self, delimiter: &str) -> String {
        self.lines.join(delimiter)
    }

    pub fn join_lines(&self) -> String {
        self.join("\n")
    }

    /// Joins lines so that every line after the first sits at `indent`.
    pub fn join_lines_indented(&self, indent: Indent) -> String {
        self.join(&indent.delimiter())
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join_lines())
    }
}
