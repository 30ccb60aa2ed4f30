//! Response classification
//!
//! Every line the device sends carries a fixed-position uppercase tag that
//! decides whether the harness keeps waiting or moves on. The first two
//! characters of a line are reserved framing; the tag starts at offset 2.

/// Offset of the tag window within a response line
const TAG_OFFSET: usize = 2;

/// Category of one response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// `DEBUG:` diagnostic chatter; the exchange keeps waiting
    Debug,
    /// `ERROR:` the device rejected the message; terminal, no `DONE!` follows
    Error,
    /// `DONE!` the device finished the message; terminal
    Done,
    /// Anything else, including the empty line a timed-out read produces
    Unrecognized,
}

impl ResponseClass {
    /// Whether this class ends the wait for the current message
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResponseClass::Error | ResponseClass::Done)
    }
}

/// Classify one response line by its tag window
///
/// Tag comparison is ASCII case-insensitive. A line too short to contain the
/// reserved prefix plus the tag is `Unrecognized`, never a fault.
pub fn classify(line: &str) -> ResponseClass {
    if tag_matches(line, "DEBUG:") {
        ResponseClass::Debug
    } else if tag_matches(line, "ERROR:") {
        ResponseClass::Error
    } else if tag_matches(line, "DONE!") {
        ResponseClass::Done
    } else {
        ResponseClass::Unrecognized
    }
}

fn tag_matches(line: &str, tag: &str) -> bool {
    line.get(TAG_OFFSET..TAG_OFFSET + tag.len())
        .map(|window| window.eq_ignore_ascii_case(tag))
        .unwrap_or(false)
}
