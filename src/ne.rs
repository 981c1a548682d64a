//! # NE Header
//!
//! The 64-byte "new executable" header sits right after the MZ stub. Table
//! offsets are relative to the start of this header, except the nonresident
//! name table, which is an absolute file offset.
//!
//! ```text
//! 0x00 "NE"               0x20 cbNonResName       0x34 wNumRscSeg
//! 0x02 linker ver, rev    0x22 segment table       0x36 bTargetOS, bOtherFlags
//! 0x04 entry table off    0x24 resource table      0x38 gangload off, len
//! 0x06 entry table len    0x26 resident names      0x3C min code swap
//! 0x08 CRC (dword)        0x28 module ref table    0x3E expected Windows ver
//! 0x0C flags              0x2A imported names
//! 0x0E auto data seg      0x2C nonres names (dword, absolute)
//! 0x10 heap, 0x12 stack   0x30 movable entries
//! 0x14 CS:IP, 0x18 SS:SP  0x32 alignment shift
//! 0x1C nseg, 0x1E nmod
//! ```

use crate::codec::{push_u16, push_u32, push_u8, read_u16, read_u32, ALIGN_SHIFT};

/// Size of the NE header.
pub const NE_HEADER_LEN: usize = 0x40;

/// Module flags Windows expects on a resource-only font library.
pub const NE_FLAGS: u16 = 0x8308;
/// Windows.
pub const TARGET_WINDOWS: u8 = 2;
/// Other flags byte written by the classic font tools.
pub const OTHER_FLAGS: u8 = 0x08;
/// Windows 3.0.
pub const EXPECTED_WINDOWS_VERSION: u16 = 0x0300;

/// Section offsets and sizes recorded in the header. Everything else is a
/// fixed value for a font library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeHeader {
    pub entry_table: u16,
    pub entry_table_len: u16,
    pub segment_table: u16,
    pub resource_table: u16,
    pub resident_names: u16,
    pub module_refs: u16,
    pub imported_names: u16,
    /// Absolute file offset.
    pub nonresident_names: u32,
    pub nonresident_names_len: u16,
}

impl NeHeader {
    pub const SIGNATURE: &'static [u8; 2] = b"NE";

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NE_HEADER_LEN);
        out.extend_from_slice(Self::SIGNATURE);
        push_u8(&mut out, 5); // linker version
        push_u8(&mut out, 10); // linker revision
        push_u16(&mut out, self.entry_table);
        push_u16(&mut out, self.entry_table_len);
        push_u32(&mut out, 0); // CRC
        push_u16(&mut out, NE_FLAGS);
        push_u16(&mut out, 0); // auto data segment
        push_u16(&mut out, 0); // heap
        push_u16(&mut out, 0); // stack
        push_u32(&mut out, 0); // CS:IP
        push_u32(&mut out, 0); // SS:SP
        push_u16(&mut out, 0); // segment count
        push_u16(&mut out, 0); // module reference count
        push_u16(&mut out, self.nonresident_names_len);
        push_u16(&mut out, self.segment_table);
        push_u16(&mut out, self.resource_table);
        push_u16(&mut out, self.resident_names);
        push_u16(&mut out, self.module_refs);
        push_u16(&mut out, self.imported_names);
        push_u32(&mut out, self.nonresident_names);
        push_u16(&mut out, 0); // movable entries
        push_u16(&mut out, ALIGN_SHIFT);
        push_u16(&mut out, 0); // resource segments
        push_u8(&mut out, TARGET_WINDOWS);
        push_u8(&mut out, OTHER_FLAGS);
        push_u16(&mut out, 0); // gangload offset
        push_u16(&mut out, 0); // gangload length
        push_u16(&mut out, 0); // min code swap
        push_u16(&mut out, EXPECTED_WINDOWS_VERSION);
        debug_assert_eq!(out.len(), NE_HEADER_LEN);
        out
    }

    /// Parse the offset fields of a header; `None` on a short buffer or a
    /// bad signature.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < NE_HEADER_LEN || &data[0..2] != Self::SIGNATURE {
            return None;
        }
        Some(NeHeader {
            entry_table: read_u16(data, 0x04),
            entry_table_len: read_u16(data, 0x06),
            segment_table: read_u16(data, 0x22),
            resource_table: read_u16(data, 0x24),
            resident_names: read_u16(data, 0x26),
            module_refs: read_u16(data, 0x28),
            imported_names: read_u16(data, 0x2A),
            nonresident_names: read_u32(data, 0x2C),
            nonresident_names_len: read_u16(data, 0x20),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NeHeader {
        NeHeader {
            entry_table: 0x94,
            entry_table_len: 2,
            segment_table: 0x40,
            resource_table: 0x40,
            resident_names: 0x80,
            module_refs: 0x94,
            imported_names: 0x94,
            nonresident_names: 0x90 + 0x96,
            nonresident_names_len: 29,
        }
    }

    #[test]
    fn test_header_is_64_bytes() {
        assert_eq!(sample().to_bytes().len(), NE_HEADER_LEN);
    }

    #[test]
    fn test_fixed_fields() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[0..2], b"NE");
        assert_eq!((bytes[2], bytes[3]), (5, 10));
        assert_eq!(read_u16(&bytes, 0x0C), 0x8308);
        assert_eq!(read_u16(&bytes, 0x32), 4);
        assert_eq!(bytes[0x36], TARGET_WINDOWS);
        assert_eq!(bytes[0x37], 0x08);
        assert_eq!(read_u16(&bytes, 0x3E), 0x0300);
    }

    #[test]
    fn test_parse_reads_back_offsets() {
        let header = sample();
        assert_eq!(NeHeader::parse(&header.to_bytes()), Some(header));
    }

    #[test]
    fn test_parse_rejects_bad_signature() {
        let mut bytes = sample().to_bytes();
        bytes[1] = b'X';
        assert!(NeHeader::parse(&bytes).is_none());
    }
}
