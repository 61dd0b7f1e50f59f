//! Output writer with indentation tracking
//!
//! Used to regenerate source text from a tree and to render indented tree dumps.

/// Width of one indentation level in regenerated source.
pub const INDENT_WIDTH: usize = 4;

/// Writer that tracks indentation and builds output line by line
pub struct SourceWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Spaces per indentation level
    indent_width: usize,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new(INDENT_WIDTH)
    }
}

impl SourceWriter {
    /// Create a new writer with the given indentation width
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_width,
            at_line_start: true,
        }
    }

    /// Get the output with trailing whitespace (including newlines) removed
    pub fn finish(mut self) -> String {
        let trimmed = self.output.trim_end().len();
        self.output.truncate(trimmed);
        self.output
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write indentation if at line start
    fn write_indent(&mut self) {
        if self.at_line_start {
            let indent = " ".repeat(self.indent_level * self.indent_width);
            self.output.push_str(&indent);
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a token, separated by one space from the previous token on the same line
    pub fn token(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if !self.at_line_start {
            self.output.push(' ');
        }
        self.write(s);
    }

    /// Write a string and newline
    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write just a newline
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Get current indentation level
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_space_separated() {
        let mut writer = SourceWriter::default();
        writer.token("x");
        writer.token("=");
        writer.token("1");
        assert_eq!(writer.finish(), "x = 1");
    }

    #[test]
    fn test_empty_tokens_are_skipped() {
        let mut writer = SourceWriter::default();
        writer.token("a");
        writer.token("");
        writer.token("b");
        assert_eq!(writer.finish(), "a b");
    }

    #[test]
    fn test_indent_affects_next_line() {
        let mut writer = SourceWriter::default();
        writer.token("if");
        writer.token("x");
        writer.token(":");
        writer.newline();
        writer.indent();
        writer.token("y");
        writer.newline();
        writer.dedent();
        writer.token("z");
        assert_eq!(writer.finish(), "if x :\n    y\nz");
    }

    #[test]
    fn test_dedent_at_zero_stays_zero() {
        let mut writer = SourceWriter::default();
        writer.dedent();
        assert_eq!(writer.current_indent(), 0);
    }

    #[test]
    fn test_finish_trims_trailing_newlines() {
        let mut writer = SourceWriter::new(2);
        writer.indent();
        writer.writeln("a");
        writer.newline();
        assert_eq!(writer.finish(), "  a");
    }
}
