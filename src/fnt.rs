//! # FNT Directory Entries
//!
//! A FON library carries one FONTDIR resource: a count followed by one
//! FONTDIRENTRY per bundled font. Each entry is the first 0x71 bytes of the
//! font's FNT header, then the device name and face name as NUL-terminated
//! strings. The strings are located through two dword offsets in that same
//! header, relative to the start of the FNT data:
//!
//! ```text
//! 0x65  dfDevice   offset of device name (0 = none)
//! 0x69  dfFace     offset of face name (required)
//! 0x71  end of the fixed header copied into the entry
//! ```
//!
//! Nothing else in the FNT body is inspected.

use crate::codec::{asciz, is_terminated, push_u16, read_u32};
use crate::encoding;
use crate::error::FonError;

/// Length of the FNT header prefix copied verbatim into a FONTDIRENTRY.
pub const DIRENTRY_HEADER_LEN: usize = 0x71;
/// Offset of the dword device-name offset.
pub const DEVICE_OFFSET_FIELD: usize = 0x65;
/// Offset of the dword face-name offset.
pub const FACE_OFFSET_FIELD: usize = 0x69;

/// One input font's raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct FontResource<'a> {
    data: &'a [u8],
}

impl<'a> FontResource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        FontResource { data }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Raw face-name bytes, without the NUL.
    ///
    /// `index` is only used to label errors.
    pub fn face_name_bytes(&self, index: usize) -> Result<&'a [u8], FonError> {
        self.check_header(index)?;
        let offset = read_u32(self.data, FACE_OFFSET_FIELD) as usize;
        self.name_at(index, offset, "face")
    }

    /// Face name decoded from Windows-1252.
    pub fn face_name(&self, index: usize) -> Result<String, FonError> {
        Ok(encoding::decode(self.face_name_bytes(index)?))
    }

    /// Raw device-name bytes; empty when the device offset is zero.
    pub fn device_name_bytes(&self, index: usize) -> Result<&'a [u8], FonError> {
        self.check_header(index)?;
        match read_u32(self.data, DEVICE_OFFSET_FIELD) as usize {
            0 => Ok(&[]),
            offset => self.name_at(index, offset, "device"),
        }
    }

    fn check_header(&self, index: usize) -> Result<(), FonError> {
        if self.data.len() < DIRENTRY_HEADER_LEN {
            return Err(FonError::invalid_header(
                index,
                format!(
                    "{} bytes is shorter than the {:#x}-byte FNT header",
                    self.data.len(),
                    DIRENTRY_HEADER_LEN
                ),
            ));
        }
        Ok(())
    }

    fn name_at(&self, index: usize, offset: usize, what: &str) -> Result<&'a [u8], FonError> {
        if offset >= self.data.len() {
            return Err(FonError::invalid_header(
                index,
                format!(
                    "{} name offset {:#x} is outside the {}-byte font",
                    what,
                    offset,
                    self.data.len()
                ),
            ));
        }
        if !is_terminated(self.data, offset) {
            log::warn!(
                "input #{}: {} name at {:#x} has no terminating NUL; using the rest of the font",
                index + 1,
                what,
                offset
            );
        }
        Ok(asciz(self.data, offset))
    }
}

/// A FONTDIRENTRY derived from one font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// `header[0..0x71] ++ device ++ NUL ++ face ++ NUL`.
    pub bytes: Vec<u8>,
    pub device_name: Vec<u8>,
    pub face_name: Vec<u8>,
}

impl DirectoryEntry {
    /// Build the entry for `font`, the `index`-th input.
    pub fn from_font(font: &FontResource<'_>, index: usize) -> Result<Self, FonError> {
        let device_name = font.device_name_bytes(index)?.to_vec();
        let face_name = font.face_name_bytes(index)?.to_vec();

        let mut bytes =
            Vec::with_capacity(DIRENTRY_HEADER_LEN + device_name.len() + face_name.len() + 2);
        bytes.extend_from_slice(&font.data()[..DIRENTRY_HEADER_LEN]);
        bytes.extend_from_slice(&device_name);
        bytes.push(0);
        bytes.extend_from_slice(&face_name);
        bytes.push(0);

        log::debug!(
            "input #{}: directory entry {} bytes, face {:?}",
            index + 1,
            bytes.len(),
            encoding::decode(&face_name)
        );

        Ok(DirectoryEntry {
            bytes,
            device_name,
            face_name,
        })
    }

    /// Face name decoded from Windows-1252.
    pub fn face_name_text(&self) -> String {
        encoding::decode(&self.face_name)
    }
}

/// Assemble the FONTDIR resource: a count word, then for each font its
/// 1-based ordinal word followed by its directory entry.
pub fn build_fontdir(entries: &[DirectoryEntry]) -> Vec<u8> {
    let mut fontdir = Vec::new();
    push_u16(&mut fontdir, entries.len() as u16);
    for (i, entry) in entries.iter().enumerate() {
        push_u16(&mut fontdir, (i + 1) as u16);
        fontdir.extend_from_slice(&entry.bytes);
    }
    fontdir
}
