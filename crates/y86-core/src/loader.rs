//! Textual image loader.
//!
//! Consumes the line-oriented hex object format: each line of interest looks
//! like `0x<hex-addr>: <hex bytes>`, where the byte run may contain interior
//! whitespace and must have even length once that whitespace is stripped.
//! Everything else (comments, pipeline diagrams, blank lines) is silently
//! ignored. The smallest matched address becomes the entry program counter.

use std::io::{self, BufRead};
use std::sync::LazyLock;

use regex::Regex;

use crate::api::Machine;
use crate::memory::BoundsPolicy;

/// Default slack added above the highest loaded byte for bounded images.
pub const DEFAULT_BOUND_SLACK: u64 = 65536;

static IMAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"0x([0-9a-fA-F]+):\s*([0-9a-fA-F\s]*)").expect("image line pattern is valid")
});

/// Image-loading policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LoadOptions {
    /// When set, memory is bounded to `max_loaded_addr + slack` inclusive.
    pub bounded: bool,
    /// Slack in bytes above the highest loaded address.
    pub slack: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            bounded: false,
            slack: DEFAULT_BOUND_SLACK,
        }
    }
}

/// Loads an image from a reader.
///
/// # Errors
///
/// Returns any I/O error raised while reading lines. Malformed lines are not
/// errors; they simply contribute no bytes.
pub fn load_image<R: BufRead>(input: R, options: &LoadOptions) -> io::Result<Machine> {
    let mut loader = ImageLoader::new();
    for line in input.lines() {
        loader.feed_line(&line?);
    }
    Ok(loader.finish(options))
}

/// Loads an image from an in-memory string.
#[must_use]
pub fn load_image_str(image: &str, options: &LoadOptions) -> Machine {
    let mut loader = ImageLoader::new();
    for line in image.lines() {
        loader.feed_line(line);
    }
    loader.finish(options)
}

/// Accumulates image lines into a machine.
struct ImageLoader {
    machine: Machine,
    entry: Option<u64>,
    max_addr: u64,
}

impl ImageLoader {
    fn new() -> Self {
        Self {
            machine: Machine::default(),
            entry: None,
            max_addr: 0,
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn feed_line(&mut self, line: &str) {
        let Some(captures) = IMAGE_LINE.captures(line) else {
            return;
        };
        let Ok(addr) = u64::from_str_radix(&captures[1], 16) else {
            return;
        };

        // A matched line participates in entry tracking even when it carries
        // no bytes.
        self.entry = Some(self.entry.map_or(addr, |entry| entry.min(addr)));

        for (i, byte) in hex_bytes(&captures[2]).into_iter().enumerate() {
            let offset = addr.wrapping_add(i as u64);
            // Addresses that are negative as i64 drop the byte silently.
            let _ = self.machine.mem.write1(offset as i64, byte);
            if offset > self.max_addr {
                self.max_addr = offset;
            }
        }
    }

    fn finish(mut self, options: &LoadOptions) -> Machine {
        self.machine.pc = self.entry.unwrap_or(0);
        if options.bounded {
            self.machine.mem.set_bounds(BoundsPolicy::Bounded {
                upper: self.max_addr.wrapping_add(options.slack),
            });
        }
        self.machine
    }
}

/// Decodes a whitespace-tolerant hex byte run; odd-length runs yield nothing.
fn hex_bytes(run: &str) -> Vec<u8> {
    let digits: Vec<u8> = run
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Vec::new();
    }
    digits
        .chunks_exact(2)
        .filter_map(|pair| match (hex_digit(pair[0]), hex_digit(pair[1])) {
            (Some(hi), Some(lo)) => Some(hi << 4 | lo),
            _ => None,
        })
        .collect()
}

const fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
