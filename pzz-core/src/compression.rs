//! Word oriented LZ codec used for compressed archive entries.
//!
//! The stream is a sequence of 16-bit little-endian words. A control word
//! carries one flag per following token, most significant bit first: a clear
//! bit is a literal word, a set bit is a back-reference. A back-reference word
//! holds the distance in words in its low 11 bits and the length in words in
//! its high 5 bits; a zero length means the length follows as a full word. A
//! back-reference with distance 0 ends the stream.
use alloc::vec::Vec;

use crate::Error;

/// Shortest match worth encoding, in bytes
const MIN_MATCH: usize = 4;
/// Largest distance a back-reference can encode, in words
const MAX_DISTANCE: usize = 0x7FF;
/// Largest length that fits in the high bits of a back-reference, in words
const MAX_SHORT_LENGTH: usize = 0x1F;
/// Largest length of the extended form, in words
const MAX_LENGTH: usize = 0xFFFF;

/// Decompress a stream, stopping at the terminating back-reference.
///
/// Anything after the terminator (sector padding, usually) is never read. A
/// stream that ends without a terminator yields whatever was decoded.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, Error> {
    let end = input.len() & !1;
    let mut output = Vec::with_capacity(input.len() * 2);

    let mut control: u16 = 0;
    let mut control_bit: i32 = -1;
    let mut i = 0;
    while i < end {
        if control_bit < 0 {
            control = u16::from_le_bytes([input[i], input[i + 1]]);
            control_bit = 15;
            i += 2;
            continue;
        }

        let is_reference = control & (1 << control_bit) != 0;
        control_bit -= 1;

        if is_reference {
            let token = u16::from_le_bytes([input[i], input[i + 1]]);
            let offset = (token as usize & MAX_DISTANCE) * 2;
            if offset == 0 {
                break;
            }

            let mut length = (token as usize >> 11) * 2;
            if length == 0 {
                i += 2;
                if i + 2 > end {
                    return Err(Error::truncated(i, 2, input.len()));
                }
                length = u16::from_le_bytes([input[i], input[i + 1]]) as usize * 2;
            }

            let available = output.len();
            if offset > available {
                return Err(Error::InvalidBackReference { offset, available });
            }

            // Byte at a time: the source may overlap what is being written
            let start = available - offset;
            for j in 0..length {
                let byte = output[start + j];
                output.push(byte);
            }
        } else {
            output.extend_from_slice(&input[i..i + 2]);
        }
        i += 2;
    }

    Ok(output)
}

/// Compress a buffer with a greedy longest-match search.
///
/// Only whole words are encoded: the last byte of an odd-length input is
/// dropped. The game's own packer behaves the same way, and the output is
/// kept bit for bit identical to it.
pub fn compress(input: &[u8]) -> Vec<u8> {
    let end = input.len() & !1;
    let mut output = Vec::with_capacity(end + end / 16 + 4);

    let mut control: u16 = 0;
    let mut control_bit: i32 = 15;
    let mut control_pos = 0;
    output.extend_from_slice(&[0, 0]);

    let mut i = 0;
    while i < end {
        let (start, length) = longest_match(input, end, i);

        if length >= MIN_MATCH {
            let distance = ((i - start) / 2) as u16;
            let words = length / 2;
            if words <= MAX_SHORT_LENGTH {
                push_word(&mut output, distance | (words as u16) << 11);
            } else {
                push_word(&mut output, distance);
                push_word(&mut output, words as u16);
            }
            control |= 1 << control_bit;
            i += length;
        } else {
            output.extend_from_slice(&input[i..i + 2]);
            i += 2;
        }

        control_bit -= 1;
        if control_bit < 0 {
            output[control_pos..control_pos + 2].copy_from_slice(&control.to_le_bytes());
            control = 0;
            control_bit = 15;
            control_pos = output.len();
            output.extend_from_slice(&[0, 0]);
        }
    }

    // Terminator: a flagged token with distance 0
    control |= 1 << control_bit;
    output[control_pos..control_pos + 2].copy_from_slice(&control.to_le_bytes());
    output.extend_from_slice(&[0, 0]);

    output
}

fn push_word(output: &mut Vec<u8>, word: u16) {
    output.extend_from_slice(&word.to_le_bytes());
}

/// Longest word-aligned match for the data at `i`, as `(start, length)` in
/// bytes. The earliest start wins ties. `end` is the even-aligned input length.
fn longest_match(input: &[u8], end: usize, i: usize) -> (usize, usize) {
    let mut best = (0, 0);
    let mut start = i.saturating_sub(MAX_DISTANCE * 2);
    while start < i {
        if input[start..start + 2] == input[i..i + 2] {
            let mut length = 2;
            while i + length < end
                && length < MAX_LENGTH * 2
                && input[start + length..start + length + 2] == input[i + length..i + length + 2]
            {
                length += 2;
            }
            if length > best.1 {
                best = (start, length);
            }
        }
        start += 2;
    }
    best
}
