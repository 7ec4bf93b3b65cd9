//! Indented text emitter shared by every artifact's `render`.

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub(crate) struct CodeWriter {
    out: String,
    depth: usize,
}

impl CodeWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    /// Write `header {` and indent.
    pub(crate) fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
    }

    /// Dedent and write `}`.
    pub(crate) fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_blocks_indent() {
        let mut w = CodeWriter::new();
        w.open("impl A");
        w.open("fn f()");
        w.line("x");
        w.close();
        w.line("");
        w.close();
        assert_eq!(w.finish(), "impl A {\n    fn f() {\n        x\n    }\n\n}\n");
    }

    #[test]
    fn close_at_top_level_does_not_underflow() {
        let mut w = CodeWriter::new();
        w.close();
        assert_eq!(w.finish(), "}\n");
    }
}
