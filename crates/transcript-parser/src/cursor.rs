//! Positioned cursor over the working lines of a transcript.

/// A working line together with its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub index: usize,
    pub text: &'a str,
}

#[derive(Debug)]
pub(crate) struct LineCursor<'a> {
    lines: &'a [&'a str],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(lines: &'a [&'a str], start: usize) -> Self {
        Self {
            lines,
            pos: start.min(lines.len()),
        }
    }

    /// Index of the line `peek` would return.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).map(|&text| Line {
            index: self.pos,
            text,
        })
    }

    pub fn advance(&mut self) -> Option<Line<'a>> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Advance only if the current line satisfies `pred`.
    pub fn next_if(&mut self, pred: impl FnOnce(&str) -> bool) -> Option<Line<'a>> {
        match self.peek() {
            Some(line) if pred(line.text) => self.advance(),
            _ => None,
        }
    }

    /// Take the next `n` lines; fewer when the input ends first.
    pub fn take(&mut self, n: usize) -> &'a [&'a str] {
        let end = (self.pos + n).min(self.lines.len());
        let taken = &self.lines[self.pos..end];
        self.pos = end;
        taken
    }
}
