//! # Reading FON Images Back
//!
//! Walks an existing image the way the Windows loader does: MZ header,
//! `e_lfanew` to the NE header, then the resource table and the two name
//! tables. Used to list a library's fonts and to check what we wrote.

use serde::Serialize;

use crate::codec::{read_u16, read_u8};
use crate::encoding;
use crate::error::FonError;
use crate::fnt::FontResource;
use crate::ne::NeHeader;
use crate::resource::RT_FONT;
use crate::stub::DosHeader;

/// One resource located through the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    pub type_id: u16,
    pub id: u16,
    pub flags: u16,
    /// Absolute file offset in bytes.
    pub offset: usize,
    /// Padded length in bytes.
    pub len: usize,
}

/// What a FON image contains.
#[derive(Debug, Clone, Serialize)]
pub struct FonInfo {
    pub ne_offset: usize,
    pub align_shift: u16,
    pub resources: Vec<ResourceEntry>,
    pub module_name: String,
    pub description: String,
}

fn malformed(msg: impl Into<String>) -> FonError {
    FonError::Malformed(msg.into())
}

fn need(data: &[u8], end: usize, what: &str) -> Result<(), FonError> {
    if end > data.len() {
        return Err(malformed(format!(
            "{} ends at {:#x}, past the {}-byte image",
            what,
            end,
            data.len()
        )));
    }
    Ok(())
}

/// Read the first length-prefixed string of a name table.
fn first_name(data: &[u8], offset: usize, what: &str) -> Result<String, FonError> {
    need(data, offset + 1, what)?;
    let len = read_u8(data, offset) as usize;
    need(data, offset + 1 + len, what)?;
    Ok(encoding::decode(&data[offset + 1..offset + 1 + len]))
}

impl FonInfo {
    pub fn parse(data: &[u8]) -> Result<Self, FonError> {
        let dos = DosHeader::parse(data).ok_or_else(|| malformed("missing MZ header"))?;
        let ne_offset = dos.lfanew as usize;
        let ne = data
            .get(ne_offset..)
            .and_then(NeHeader::parse)
            .ok_or_else(|| malformed(format!("no NE header at {:#x}", ne_offset)))?;

        let mut p = ne_offset + ne.resource_table as usize;
        need(data, p + 2, "resource table")?;
        let align_shift = read_u16(data, p);
        if align_shift > 15 {
            return Err(malformed(format!("alignment shift {} out of range", align_shift)));
        }
        p += 2;

        let mut resources = Vec::new();
        loop {
            need(data, p + 2, "resource table")?;
            let type_id = read_u16(data, p);
            if type_id == 0 {
                break;
            }
            need(data, p + 8, "TYPEINFO")?;
            let count = read_u16(data, p + 2) as usize;
            p += 8;
            for _ in 0..count {
                need(data, p + 12, "NAMEINFO")?;
                let offset = (read_u16(data, p) as usize) << align_shift;
                let len = (read_u16(data, p + 2) as usize) << align_shift;
                need(data, offset + len, "resource data")?;
                resources.push(ResourceEntry {
                    type_id,
                    id: read_u16(data, p + 6),
                    flags: read_u16(data, p + 4),
                    offset,
                    len,
                });
                p += 12;
            }
        }

        let module_name = first_name(
            data,
            ne_offset + ne.resident_names as usize,
            "resident name table",
        )?;
        let description = first_name(
            data,
            ne.nonresident_names as usize,
            "nonresident name table",
        )?;

        Ok(FonInfo {
            ne_offset,
            align_shift,
            resources,
            module_name,
            description,
        })
    }

    /// The FONT resources, in table order.
    pub fn fonts(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.resources.iter().filter(|r| r.type_id == RT_FONT)
    }

    /// Bytes of `entry` within `data`, including its padding.
    pub fn resource_data<'a>(&self, data: &'a [u8], entry: &ResourceEntry) -> &'a [u8] {
        &data[entry.offset..entry.offset + entry.len]
    }

    /// Face name stored inside a bundled font, if its header is readable.
    pub fn font_face_name(&self, data: &[u8], entry: &ResourceEntry) -> Option<String> {
        FontResource::new(self.resource_data(data, entry)).face_name(0).ok()
    }
}
