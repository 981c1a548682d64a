//! # MZ Stub
//!
//! Every NE image starts with a small real-mode program. When the library is
//! run from DOS it prints a message and exits; Windows skips it and follows
//! `e_lfanew` to the NE header.
//!
//! ```text
//! 0x00  DOS header (64 bytes)
//! 0x40  code (14 bytes)
//! 0x4E  message, '$'-terminated
//!  ...  zero pad to a paragraph boundary
//! ```

use crate::codec::{pad_to_paragraph, push_u16, push_u32, read_u16, read_u32, write_u32};

/// Size of the DOS header.
pub const DOS_HEADER_LEN: usize = 0x40;
/// Offset of the dword `e_lfanew`.
const LFANEW_FIELD: usize = 0x3C;

/// `mov dx,0xe; push cs; pop ds; mov ah,9; int 21h; mov ax,4c01h; int 21h`
const STUB_CODE: [u8; 14] = [
    0xBA, 0x0E, 0x00, // mov dx,0xe
    0x0E, // push cs
    0x1F, // pop ds
    0xB4, 0x09, // mov ah,0x9
    0xCD, 0x21, // int 0x21
    0xB8, 0x01, 0x4C, // mov ax,0x4c01
    0xCD, 0x21, // int 0x21
];

/// Printed by the stub. DOS print-string stops at `$`.
pub const STUB_MESSAGE: &[u8] = b"This is not a program!\r\nFont library created by mkwinfont.\r\n$";

/// The 64-byte MZ header.
///
/// Field offsets, all little-endian words unless noted:
///
/// ```text
/// 0x00 e_magic    0x0C e_maxalloc  0x18 e_lfarlc
/// 0x02 e_cblp     0x0E e_ss        0x1A e_ovno
/// 0x04 e_cp       0x10 e_sp        0x1C e_res[4]
/// 0x06 e_crlc     0x12 e_csum      0x24 e_oemid, e_oeminfo
/// 0x08 e_cparhdr  0x14 e_ip        0x28 e_res2[10]
/// 0x0A e_minalloc 0x16 e_cs        0x3C e_lfanew (dword)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosHeader {
    /// Bytes used in the last 512-byte page.
    pub last_page_bytes: u16,
    /// Image size in 512-byte pages, including the partial last page.
    pub pages: u16,
    pub relocations: u16,
    pub header_paragraphs: u16,
    pub min_alloc: u16,
    pub max_alloc: u16,
    pub ss: u16,
    pub sp: u16,
    pub checksum: u16,
    pub ip: u16,
    pub cs: u16,
    pub reloc_table_offset: u16,
    pub overlay: u16,
    pub oem_id: u16,
    pub oem_info: u16,
    /// File offset of the NE header.
    pub lfanew: u32,
}

impl DosHeader {
    pub const SIGNATURE: &'static [u8; 2] = b"MZ";

    /// Header for a stub with no relocations, 16 paragraphs of stack
    /// and as much memory as DOS will give it. Size fields are zero until
    /// [`DosHeader::set_image_len`] runs.
    pub fn for_stub() -> Self {
        DosHeader {
            last_page_bytes: 0,
            pages: 0,
            relocations: 0,
            header_paragraphs: (DOS_HEADER_LEN / 16) as u16,
            min_alloc: 0x10,
            max_alloc: 0xFFFF,
            ss: 0,
            sp: 0x100,
            checksum: 0,
            ip: 0,
            cs: 0,
            reloc_table_offset: DOS_HEADER_LEN as u16,
            overlay: 0,
            oem_id: 0,
            oem_info: 0,
            lfanew: 0,
        }
    }

    /// Fill in the page-count fields for an unpadded image of `len` bytes.
    pub fn set_image_len(&mut self, len: usize) {
        let pages = (len + 511) / 512;
        self.pages = pages as u16;
        self.last_page_bytes = (len - pages.saturating_sub(1) * 512) as u16;
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(DOS_HEADER_LEN);
        out.extend_from_slice(Self::SIGNATURE);
        push_u16(&mut out, self.last_page_bytes);
        push_u16(&mut out, self.pages);
        push_u16(&mut out, self.relocations);
        push_u16(&mut out, self.header_paragraphs);
        push_u16(&mut out, self.min_alloc);
        push_u16(&mut out, self.max_alloc);
        push_u16(&mut out, self.ss);
        push_u16(&mut out, self.sp);
        push_u16(&mut out, self.checksum);
        push_u16(&mut out, self.ip);
        push_u16(&mut out, self.cs);
        push_u16(&mut out, self.reloc_table_offset);
        push_u16(&mut out, self.overlay);
        out.extend_from_slice(&[0u8; 8]); // e_res
        push_u16(&mut out, self.oem_id);
        push_u16(&mut out, self.oem_info);
        out.extend_from_slice(&[0u8; 20]); // e_res2
        push_u32(&mut out, self.lfanew);
        debug_assert_eq!(out.len(), DOS_HEADER_LEN);
        out
    }

    /// Parse a header; `None` if `data` is short or lacks the signature.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < DOS_HEADER_LEN || &data[0..2] != Self::SIGNATURE {
            return None;
        }
        Some(DosHeader {
            last_page_bytes: read_u16(data, 0x02),
            pages: read_u16(data, 0x04),
            relocations: read_u16(data, 0x06),
            header_paragraphs: read_u16(data, 0x08),
            min_alloc: read_u16(data, 0x0A),
            max_alloc: read_u16(data, 0x0C),
            ss: read_u16(data, 0x0E),
            sp: read_u16(data, 0x10),
            checksum: read_u16(data, 0x12),
            ip: read_u16(data, 0x14),
            cs: read_u16(data, 0x16),
            reloc_table_offset: read_u16(data, 0x18),
            overlay: read_u16(data, 0x1A),
            oem_id: read_u16(data, 0x24),
            oem_info: read_u16(data, 0x26),
            lfanew: read_u32(data, LFANEW_FIELD),
        })
    }
}

/// Build the stub program, padded to a paragraph boundary, with `e_lfanew`
/// pointing just past it.
pub fn build_stub() -> Vec<u8> {
    let mut header = DosHeader::for_stub();
    header.set_image_len(DOS_HEADER_LEN + STUB_CODE.len() + STUB_MESSAGE.len());

    let mut stub = header.to_bytes();
    stub.extend_from_slice(&STUB_CODE);
    stub.extend_from_slice(STUB_MESSAGE);
    pad_to_paragraph(&mut stub);

    // The NE header starts right after the padded stub.
    let lfanew = stub.len() as u32;
    write_u32(&mut stub, LFANEW_FIELD, lfanew);
    stub
}
