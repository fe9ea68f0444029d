//! Line splitting over decoded text.

/// Text received but not yet resolved into complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: String,
    /// Bytes of `buf` already known to contain no `\n`.
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Hand every complete line to `on_line` and drop it from the buffer.
    ///
    /// Lines are passed without their `\n`; one trailing `\r` is stripped too.
    pub fn drain_lines(&mut self, mut on_line: impl FnMut(&str)) {
        let mut start = 0;
        let mut from = self.scanned;

        while let Some(pos) = self.buf[from..].find('\n') {
            let end = from + pos;
            let line = &self.buf[start..end];
            on_line(line.strip_suffix('\r').unwrap_or(line));
            start = end + 1;
            from = start;
        }

        self.buf.drain(..start);
        self.scanned = self.buf.len();
    }

    /// Take whatever followed the last terminator.
    pub fn take_remainder(&mut self) -> String {
        self.scanned = 0;
        std::mem::take(&mut self.buf)
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
