//! Input generators shared by the arrview benchmarks.
//!
//! All generators are deterministic in their seed so runs are comparable:
//!
//! - [`words`]: space-separated lowercase words as one byte buffer
//! - [`u64_data`]: pseudo-random integers
//! - [`split_words`]: borrowed views over each word of a buffer

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use arrview_core::{Array, Str};

/// SplitMix64 step.
fn next(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e3779b97f4a7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// `count` pseudo-random integers.
pub fn u64_data(count: usize, seed: u64) -> Vec<u64> {
    let mut state = seed;
    (0..count).map(|_| next(&mut state)).collect()
}

/// `count` words of 1..=`max_len` letters drawn from a `vocab`-word
/// vocabulary, separated by single spaces.
pub fn words(count: usize, vocab: usize, max_len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    let dictionary: Vec<Vec<u8>> = (0..vocab.max(1))
        .map(|_| {
            let len = 1 + (next(&mut state) as usize) % max_len.max(1);
            (0..len)
                .map(|_| b'a' + (next(&mut state) % 26) as u8)
                .collect()
        })
        .collect();
    let mut out = Vec::new();
    for i in 0..count {
        if i > 0 {
            out.push(b' ');
        }
        let w = &dictionary[(next(&mut state) as usize) % dictionary.len()];
        out.extend_from_slice(w);
    }
    out
}

/// Views over each space-separated word of `text`, without copying.
pub fn split_words(text: &[u8]) -> Vec<Str<'_>> {
    let mut rest = Array::from_slice(text);
    let mut out = Vec::new();
    while !rest.is_empty() {
        let end = rest.iter().position(|&b| b == b' ').unwrap_or(rest.len());
        out.push(rest.slice(0, end));
        rest = rest.slice_from((end + 1).min(rest.len()));
    }
    out
}
