//! Windows-1252 conversion for face names.
//!
//! FNT face names are single-byte strings in the Western code page. Bytes
//! 0x00..=0x7F and 0xA0..=0xFF coincide with Unicode; the 0x80..=0x9F block
//! holds the smart quotes, dashes and friends. The five positions Windows
//! leaves undefined (0x81, 0x8D, 0x8F, 0x90, 0x9D) pass through as the C1
//! control of the same value, so decoding never fails.

/// Unicode codepoints for bytes 0x80..=0x9F.
const HIGH_BLOCK: [u32; 32] = [
    0x20AC, 0x0081, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, // 0x80
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x008D, 0x017D, 0x008F, // 0x88
    0x0090, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, // 0x90
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x009D, 0x017E, 0x0178, // 0x98
];

/// Map a single Windows-1252 byte to its character.
pub fn byte_to_char(b: u8) -> char {
    let cp = match b {
        0x80..=0x9F => HIGH_BLOCK[(b - 0x80) as usize],
        _ => b as u32,
    };
    // Every entry in HIGH_BLOCK is a valid scalar value.
    char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Map a character to its Windows-1252 byte, if it has one.
pub fn char_to_byte(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if cp < 0x80 || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    HIGH_BLOCK
        .iter()
        .position(|&c| c == cp)
        .map(|i| 0x80 + i as u8)
}

/// Decode a Windows-1252 byte string.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| byte_to_char(b)).collect()
}

/// Encode a string as Windows-1252.
///
/// Returns the first character that has no byte in the code page on failure.
pub fn encode(s: &str) -> Result<Vec<u8>, char> {
    s.chars().map(|ch| char_to_byte(ch).ok_or(ch)).collect()
}
