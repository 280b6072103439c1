//! Reading time estimation

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::post::ContentBlock;

/// Average reading speed
pub const WORDS_PER_MINUTE: usize = 200;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
}

/// Estimated reading time of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadTime {
    Minutes(u64),
    /// No words to count; rendered as a placeholder, never as zero
    Unknown,
}

impl ReadTime {
    pub fn minutes(self) -> Option<u64> {
        match self {
            ReadTime::Minutes(m) => Some(m),
            ReadTime::Unknown => None,
        }
    }
}

/// Estimate reading time from headings and bodies of all blocks
pub fn estimate(content: Option<&[ContentBlock]>) -> ReadTime {
    let words = content.map(count_words).unwrap_or(0);
    if words == 0 {
        return ReadTime::Unknown;
    }
    ReadTime::Minutes(words.div_ceil(WORDS_PER_MINUTE) as u64)
}

/// Count whitespace-separated tokens of headings and punctuation-free bodies
pub fn count_words(content: &[ContentBlock]) -> usize {
    content
        .iter()
        .map(|block| {
            let heading = block.heading.split_whitespace().count();
            let text = block.body.as_text();
            let body = NON_WORD.replace_all(&text, "").split_whitespace().count();
            heading + body
        })
        .sum()
}
