//! Indentation-aware text printer for generated Java sources.

/// Default indentation unit (4 spaces)
const INDENT_UNIT: &str = "    ";

/// Text buffer that indents every line it starts by the current nesting depth.
#[derive(Debug)]
pub struct Printer {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    /// Get the printed output
    pub fn finish(self) -> String {
        self.output
    }

    pub fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(INDENT_UNIT);
            }
            self.at_line_start = false;
        }
    }

    /// Print text verbatim, indenting only if at the start of a line.
    ///
    /// Embedded newlines are copied as-is; a trailing newline puts the printer back at a line
    /// start.
    pub fn print(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
        if s.ends_with('\n') {
            self.at_line_start = true;
        }
    }

    /// Print a line. An empty string prints a blank line without indentation.
    pub fn println(&mut self, s: &str) {
        self.print(s);
        self.newline();
    }

    /// Print the concatenation of `parts` as one line.
    pub fn println_parts(&mut self, parts: &[&str]) {
        self.println(&parts.concat());
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }
}
