//! Byte-mode bitstream, capacity tables and block interleaving for error
//! correction level M.

use super::reed_solomon;

/// Largest version a QR-bill may use.
pub const MAX_VERSION: u8 = 25;

/// Error correction codewords per block at level M, indexed by version.
const ECC_CODEWORDS_PER_BLOCK: [u8; 26] = [
    0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
    28, 28,
];

/// Number of error correction blocks at level M, indexed by version.
const NUM_BLOCKS: [u8; 26] = [
    0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
];

const MODE_BYTE: u32 = 0b0100;

/// Side length in modules.
pub(crate) fn size_of(version: u8) -> usize {
    usize::from(version) * 4 + 17
}

/// Modules available for data and error correction after all function
/// patterns (and format/version areas) are removed.
pub(crate) fn raw_data_modules(version: u8) -> usize {
    let v = usize::from(version);
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let align = v / 7 + 2;
        result -= (25 * align - 10) * align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Data codewords (excluding error correction) at level M.
pub(crate) fn data_codewords(version: u8) -> usize {
    let v = usize::from(version);
    raw_data_modules(version) / 8
        - usize::from(ECC_CODEWORDS_PER_BLOCK[v]) * usize::from(NUM_BLOCKS[v])
}

fn char_count_bits(version: u8) -> usize {
    if version < 10 { 8 } else { 16 }
}

/// Bytes a byte-mode segment can carry at level M.
pub fn byte_capacity(version: u8) -> usize {
    (data_codewords(version) * 8 - 4 - char_count_bits(version)) / 8
}

/// Smallest version in `1..=MAX_VERSION` holding `length` bytes.
pub(crate) fn choose_version(length: usize) -> Option<u8> {
    (1..=MAX_VERSION).find(|&v| byte_capacity(v) >= length)
}

/// Append-only bit sequence, most significant bit first.
#[derive(Default)]
struct BitBuffer(Vec<bool>);

impl BitBuffer {
    fn push(&mut self, value: u32, bits: usize) {
        for i in (0..bits).rev() {
            self.0.push((value >> i) & 1 != 0);
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn into_bytes(self) -> Vec<u8> {
        self.0
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | (u8::from(bit) << (7 - i)))
            })
            .collect()
    }
}

/// Data codewords for `data` at `version`: mode indicator, character count,
/// the bytes, terminator and pad codewords.
///
/// `data` must fit [`byte_capacity`] of `version`.
pub(crate) fn encode_data(data: &[u8], version: u8) -> Vec<u8> {
    let capacity_bits = data_codewords(version) * 8;

    let mut bits = BitBuffer::default();
    bits.push(MODE_BYTE, 4);
    bits.push(data.len() as u32, char_count_bits(version));
    for &b in data {
        bits.push(u32::from(b), 8);
    }

    let terminator = (capacity_bits - bits.len()).min(4);
    bits.push(0, terminator);
    let to_byte = (8 - bits.len() % 8) % 8;
    bits.push(0, to_byte);

    let mut codewords = bits.into_bytes();
    for pad in [0xEC, 0x11].into_iter().cycle() {
        if codewords.len() >= capacity_bits / 8 {
            break;
        }
        codewords.push(pad);
    }
    codewords
}

/// Split data codewords into blocks, append error correction to each and
/// interleave the result into the final codeword sequence.
pub(crate) fn add_ecc_and_interleave(data: &[u8], version: u8) -> Vec<u8> {
    let v = usize::from(version);
    let num_blocks = usize::from(NUM_BLOCKS[v]);
    let ecc_len = usize::from(ECC_CODEWORDS_PER_BLOCK[v]);
    let raw_codewords = raw_data_modules(version) / 8;
    let num_short_blocks = num_blocks - raw_codewords % num_blocks;
    let short_block_len = raw_codewords / num_blocks;

    let generator = reed_solomon::divisor(ecc_len);
    let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(num_blocks);
    let mut k = 0;
    for i in 0..num_blocks {
        let data_len = short_block_len - ecc_len + usize::from(i >= num_short_blocks);
        let mut block = data[k..k + data_len].to_vec();
        k += data_len;
        let ecc = reed_solomon::remainder(&block, &generator);
        if i < num_short_blocks {
            // Placeholder, skipped when interleaving.
            block.push(0);
        }
        block.extend_from_slice(&ecc);
        blocks.push(block);
    }

    let mut result = Vec::with_capacity(raw_codewords);
    for i in 0..short_block_len + 1 {
        for (j, block) in blocks.iter().enumerate() {
            if i != short_block_len - ecc_len || j >= num_short_blocks {
                result.push(block[i]);
            }
        }
    }
    result
}
