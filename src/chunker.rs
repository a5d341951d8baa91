//! Text chunking for translation requests.
//!
//! Text is split paragraph first, then by sentence, then by word, so that
//! every chunk stays under the backend's comfortable request size. Sizes are
//! counted in characters, not bytes.

use regex::Regex;
use std::sync::OnceLock;

/// Chunk size used for interactive (typed-in) translation
pub const INTERACTIVE_CHUNK_SIZE: usize = 200;

/// Chunk size used for whole-document translation
pub const BATCH_CHUNK_SIZE: usize = 5000;

/// One piece of the input, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in the original text
    pub index: usize,
    pub text: String,
}

impl Chunk {
    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// First `max_chars` characters of the chunk.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }
}

fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("paragraph regex is valid"))
}

fn sentence_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+\s+").expect("sentence regex is valid"))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split text into ordered, non-empty chunks of at most `max_chunk_size`
/// characters.
///
/// A single word longer than the limit is emitted whole. A limit of 0 is
/// treated as 1.
pub fn split(text: &str, max_chunk_size: usize) -> Vec<String> {
    let max = max_chunk_size.max(1);
    let mut chunks = Vec::new();

    for paragraph in split_paragraphs(text) {
        if char_len(paragraph) <= max {
            chunks.push(paragraph.to_string());
            continue;
        }

        let mut packer = Packer::new(max);
        for sentence in split_sentences(paragraph) {
            if char_len(sentence) > max {
                for word in sentence.split_whitespace() {
                    packer.push(word, &mut chunks);
                }
            } else {
                packer.push(sentence, &mut chunks);
            }
        }
        packer.flush(&mut chunks);
    }

    chunks
}

/// Same as [`split`], with each chunk tagged by its position.
pub fn chunk(text: &str, max_chunk_size: usize) -> Vec<Chunk> {
    split(text, max_chunk_size)
        .into_iter()
        .enumerate()
        .map(|(index, text)| Chunk { index, text })
        .collect()
}

/// Paragraphs separated by blank lines, trimmed, empties dropped.
fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    paragraph_break()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Sentences ending in `.`, `!` or `?` followed by whitespace. The trailing
/// remainder counts as a sentence even without punctuation.
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in sentence_end().find_iter(paragraph) {
        let sentence = paragraph[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }

    let rest = paragraph[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }

    sentences
}

/// Greedy buffer joining pieces with a single space.
struct Packer {
    max: usize,
    buffer: String,
    buffer_len: usize,
}

impl Packer {
    fn new(max: usize) -> Self {
        Self {
            max,
            buffer: String::new(),
            buffer_len: 0,
        }
    }

    fn push(&mut self, piece: &str, chunks: &mut Vec<String>) {
        let piece_len = char_len(piece);

        if !self.buffer.is_empty() && self.buffer_len + 1 + piece_len > self.max {
            self.flush(chunks);
        }

        if self.buffer.is_empty() {
            self.buffer.push_str(piece);
            self.buffer_len = piece_len;
        } else {
            self.buffer.push(' ');
            self.buffer.push_str(piece);
            self.buffer_len += 1 + piece_len;
        }
    }

    fn flush(&mut self, chunks: &mut Vec<String>) {
        if !self.buffer.is_empty() {
            chunks.push(std::mem::take(&mut self.buffer));
            self.buffer_len = 0;
        }
    }
}
