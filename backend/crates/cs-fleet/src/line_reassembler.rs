//! Rebuilds text lines from arbitrarily chunked process output.

/// Splits byte chunks on `\n`, carrying any unterminated tail into the next
/// chunk. A trailing `\r` is stripped from each completed line.
///
/// Bytes are only decoded once a line is complete, so a multi-byte UTF-8
/// character split across two chunks survives intact.
#[derive(Debug, Default)]
pub struct LineReassembler {
    partial: Vec<u8>,
}

impl LineReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(newline) = rest.iter().position(|b| *b == b'\n') {
            self.partial.extend_from_slice(&rest[..newline]);
            lines.push(Self::decode(std::mem::take(&mut self.partial)));
            rest = &rest[newline + 1..];
        }

        self.partial.extend_from_slice(rest);
        lines
    }

    /// Emit the unterminated tail, if any. Called once the stream hits EOF.
    pub fn flush(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            return None;
        }

        Some(Self::decode(std::mem::take(&mut self.partial)))
    }

    pub fn has_partial(&self) -> bool {
        !self.partial.is_empty()
    }

    fn decode(mut bytes: Vec<u8>) -> String {
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}
