//! # Resource Table
//!
//! The NE resource table lists every resource by type, with offsets and
//! lengths counted in paragraphs (`1 << ALIGN_SHIFT` bytes):
//!
//! ```text
//! u16  rscAlignShift
//! TYPEINFO  FONTDIR (0x8007), 1 resource
//!   NAMEINFO  offset, length, flags, id, reserved dword
//! TYPEINFO  FONT (0x8008), N resources
//!   NAMEINFO  × N
//! u16  0                    end of types
//! "\x07FONTDIR"             resource type-name string
//! zero pad to a paragraph boundary
//! ```
//!
//! Offsets can only be filled in once the table's position in the file is
//! known, so the size is computed up front from the font count alone
//! ([`resource_table_len`]) and the table itself is built later with the
//! absolute start of the resource data ([`build_resources`]).

use crate::codec::{align_up, pad_to_paragraph, push_u16, push_u32, ALIGN_SHIFT, PARAGRAPH};
use crate::error::FonError;
use crate::fnt::FontResource;

/// Resource type id of the font directory (`RT_FONTDIR | 0x8000`).
pub const RT_FONTDIR: u16 = 0x8007;
/// Resource type id of a font (`RT_FONT | 0x8000`).
pub const RT_FONT: u16 = 0x8008;
/// Flags for FONTDIR: preloaded, pure, fixed.
pub const FONTDIR_FLAGS: u16 = 0x0C50;
/// Flags for each font: discardable, pure, movable.
pub const FONT_FLAGS: u16 = 0x1C30;
/// Id of the first font; the rest count up from here.
pub const FIRST_FONT_ID: u16 = 0x8001;

/// Length-prefixed type-name string trailing the table.
const TYPE_NAME: &[u8] = b"\x07FONTDIR";

const TYPEINFO_LEN: usize = 8;
const NAMEINFO_LEN: usize = 12;

/// One resource's entry in a TYPEINFO group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameInfo {
    /// File offset in paragraphs.
    pub offset: u16,
    /// Length in paragraphs.
    pub length: u16,
    pub flags: u16,
    pub id: u16,
}

impl NameInfo {
    pub fn write(&self, out: &mut Vec<u8>) {
        push_u16(out, self.offset);
        push_u16(out, self.length);
        push_u16(out, self.flags);
        push_u16(out, self.id);
        push_u32(out, 0); // handle + usage, filled by the loader
    }

    pub fn byte_offset(&self) -> usize {
        (self.offset as usize) << ALIGN_SHIFT
    }

    pub fn byte_len(&self) -> usize {
        (self.length as usize) << ALIGN_SHIFT
    }
}

/// A group of resources sharing a type id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_id: u16,
    pub resources: Vec<NameInfo>,
}

impl TypeInfo {
    pub fn write(&self, out: &mut Vec<u8>) {
        push_u16(out, self.type_id);
        push_u16(out, self.resources.len() as u16);
        push_u32(out, 0); // reserved
        for info in &self.resources {
            info.write(out);
        }
    }
}

/// Unpadded table size for `font_count` fonts: shift count, end marker,
/// type name, the FONTDIR group and the FONT group.
fn unpadded_table_len(font_count: usize) -> usize {
    let fontdir_group = TYPEINFO_LEN + NAMEINFO_LEN;
    let font_group = TYPEINFO_LEN + NAMEINFO_LEN * font_count;
    2 + 2 + TYPE_NAME.len() + fontdir_group + font_group
}

/// Size of the resource table including its trailing pad.
pub fn resource_table_len(font_count: usize) -> usize {
    align_up(unpadded_table_len(font_count))
}

/// The built resource table and the data it describes.
#[derive(Debug, Clone)]
pub struct ResourceSection {
    /// Resource table, padded to a paragraph boundary.
    pub table: Vec<u8>,
    /// FONTDIR then each font, each padded to a paragraph boundary.
    pub data: Vec<u8>,
    /// The FONTDIR and FONT groups, in table order.
    pub groups: Vec<TypeInfo>,
}

/// Append `blob` to `data` at paragraph alignment and describe it.
fn place(
    data: &mut Vec<u8>,
    data_start: usize,
    blob: &[u8],
    flags: u16,
    id: u16,
    what: &str,
) -> Result<NameInfo, FonError> {
    let start = data.len();
    data.extend_from_slice(blob);
    pad_to_paragraph(data);
    let offset = (data_start + start) / PARAGRAPH;
    let length = (data.len() - start) / PARAGRAPH;
    Ok(NameInfo {
        offset: paragraphs(offset, what)?,
        length: paragraphs(length, what)?,
        flags,
        id,
    })
}

fn paragraphs(count: usize, what: &str) -> Result<u16, FonError> {
    u16::try_from(count).map_err(|_| {
        FonError::too_large(format!("{} in paragraphs", what), count, u16::MAX as usize)
    })
}

/// Lay out the FONTDIR and every font as resource data starting at the
/// absolute file offset `data_start`, and build the table describing them.
///
/// `data_start` must be paragraph aligned.
pub fn build_resources(
    fontdir: &[u8],
    fonts: &[FontResource<'_>],
    data_start: usize,
) -> Result<ResourceSection, FonError> {
    debug_assert_eq!(data_start % PARAGRAPH, 0);
    let max_fonts = (u16::MAX - FIRST_FONT_ID) as usize + 1;
    if fonts.len() > max_fonts {
        return Err(FonError::too_large("font count", fonts.len(), max_fonts));
    }

    let mut data = Vec::new();

    // The id of a named type's single resource points at the name string.
    let name_offset = unpadded_table_len(fonts.len()) - TYPE_NAME.len();
    let name_offset = u16::try_from(name_offset).map_err(|_| {
        FonError::too_large("FONTDIR type-name offset", name_offset, u16::MAX as usize)
    })?;
    let fontdir_info =
        place(&mut data, data_start, fontdir, FONTDIR_FLAGS, name_offset, "FONTDIR")?;
    let fontdir_group = TypeInfo {
        type_id: RT_FONTDIR,
        resources: vec![fontdir_info],
    };

    let mut font_infos = Vec::with_capacity(fonts.len());
    for (i, font) in fonts.iter().enumerate() {
        let id = FIRST_FONT_ID + i as u16;
        let info = place(
            &mut data,
            data_start,
            font.data(),
            FONT_FLAGS,
            id,
            &format!("font #{}", i + 1),
        )?;
        font_infos.push(info);
    }
    let font_group = TypeInfo {
        type_id: RT_FONT,
        resources: font_infos,
    };

    let mut table = Vec::with_capacity(resource_table_len(fonts.len()));
    push_u16(&mut table, ALIGN_SHIFT);
    fontdir_group.write(&mut table);
    font_group.write(&mut table);
    push_u16(&mut table, 0);
    debug_assert_eq!(table.len(), name_offset as usize);
    table.extend_from_slice(TYPE_NAME);
    pad_to_paragraph(&mut table);
    debug_assert_eq!(table.len(), resource_table_len(fonts.len()));

    log::debug!(
        "resource table {} bytes, {} bytes of resource data at {:#x}",
        table.len(),
        data.len(),
        data_start
    );

    Ok(ResourceSection {
        table,
        data,
        groups: vec![fontdir_group, font_group],
    })
}
