//! Request framing for the stdio transport
//!
//! Messages are newline-delimited. Blank lines are skipped and a trailing
//! `\r` is dropped. Two policies decide what happens to a line that is
//! split across two reads.

use std::fmt;
use std::str::FromStr;

/// How chunk boundaries are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingPolicy {
    /// Every chunk is split on newlines on its own; a request split across
    /// two reads becomes two (invalid) frames. Only an incomplete UTF-8
    /// sequence at the end of a chunk is carried into the next one.
    #[default]
    PerChunk,
    /// A trailing partial line is held back until its newline, or the end
    /// of input, arrives
    Reassemble,
}

impl FromStr for FramingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per-chunk" | "chunk" => Ok(FramingPolicy::PerChunk),
            "reassemble" | "line" => Ok(FramingPolicy::Reassemble),
            other => Err(format!(
                "Invalid framing policy '{}'. Valid options: per-chunk, reassemble",
                other
            )),
        }
    }
}

impl fmt::Display for FramingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingPolicy::PerChunk => write!(f, "per-chunk"),
            FramingPolicy::Reassemble => write!(f, "reassemble"),
        }
    }
}

/// Split one chunk of text into request frames
pub fn split_frames(chunk: &str) -> impl Iterator<Item = &str> {
    chunk
        .split('\n')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Turns raw input chunks into request texts
#[derive(Debug, Default)]
pub struct Framer {
    policy: FramingPolicy,
    pending: Vec<u8>,
}

impl Framer {
    pub fn new(policy: FramingPolicy) -> Self {
        Self {
            policy,
            pending: Vec::new(),
        }
    }

    pub fn policy(&self) -> FramingPolicy {
        self.policy
    }

    /// Feed one chunk and collect the complete frames it yields
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        match self.policy {
            FramingPolicy::PerChunk => {
                self.pending.extend_from_slice(chunk);
                let rest = self.pending.split_off(complete_utf8_len(&self.pending));
                let complete = std::mem::replace(&mut self.pending, rest);
                collect_frames(&complete)
            }
            FramingPolicy::Reassemble => {
                self.pending.extend_from_slice(chunk);
                let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
                    return Vec::new();
                };
                let rest = self.pending.split_off(last_newline + 1);
                let complete = std::mem::replace(&mut self.pending, rest);
                collect_frames(&complete)
            }
        }
    }

    /// Flush whatever is still buffered once the input is closed
    pub fn finish(&mut self) -> Option<String> {
        let pending = std::mem::take(&mut self.pending);
        collect_frames(&pending).into_iter().next()
    }
}

/// Length of `bytes` without a trailing, still incomplete UTF-8 sequence
fn complete_utf8_len(bytes: &[u8]) -> usize {
    let start = bytes.len().saturating_sub(3);
    for i in (start..bytes.len()).rev() {
        let byte = bytes[i];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let width = match byte {
            0xF0..=0xFF => 4,
            0xE0..=0xEF => 3,
            0xC0..=0xDF => 2,
            _ => 1,
        };
        return if bytes.len() - i < width { i } else { bytes.len() };
    }
    bytes.len()
}

fn collect_frames(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    split_frames(&text).map(str::to_string).collect()
}
