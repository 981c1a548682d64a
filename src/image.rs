//! # Image Composer
//!
//! Lays out and assembles the complete FON image:
//!
//! ```text
//! MZ stub                     paragraph aligned, e_lfanew -> NE header
//! NE header        (64)       offsets below are relative to here
//! resource table              paragraph aligned
//! resident name table
//! entry table      (2)        also the module-ref and imported-names tables
//! nonresident name table
//! zero pad                    to a paragraph boundary
//! resource data               FONTDIR, then each font
//! ```
//!
//! Layout happens in two passes. The first sizes every section from the font
//! count and the name tables alone and accumulates offsets. The second builds
//! the resource table against the now-known start of the resource data, fills
//! the NE header from the layout, and concatenates.

use serde::Serialize;

use crate::codec::pad_len;
use crate::error::FonError;
use crate::fnt::{build_fontdir, DirectoryEntry, FontResource};
use crate::names::{entry_table, nonresident_names, resident_names};
use crate::ne::{NeHeader, NE_HEADER_LEN};
use crate::resource::{build_resources, resource_table_len, TypeInfo};
use crate::stub::build_stub;

/// A section's absolute file offset and length in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Where every section of the image goes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SectionLayout {
    pub stub: Span,
    pub ne_header: Span,
    /// Including its trailing pad.
    pub resource_table: Span,
    pub resident_names: Span,
    pub entry_table: Span,
    pub nonresident_names: Span,
    pub padding: Span,
    pub resource_data: Span,
    pub total_len: usize,
}

impl SectionLayout {
    /// First pass: place every section from its size. The resource data
    /// length is unknown here and left at zero.
    pub fn compute(
        stub_len: usize,
        font_count: usize,
        resident_len: usize,
        entry_len: usize,
        nonresident_len: usize,
    ) -> Self {
        let mut p = 0;
        let mut next = |len: usize| {
            let span = Span { offset: p, len };
            p += len;
            span
        };

        let stub = next(stub_len);
        let ne_header = next(NE_HEADER_LEN);
        let resource_table = next(resource_table_len(font_count));
        let resident_names = next(resident_len);
        let entry_table = next(entry_len);
        let nonresident_names = next(nonresident_len);
        let padding = next(pad_len(nonresident_names.end() - ne_header.offset));
        let resource_data = next(0);

        SectionLayout {
            stub,
            ne_header,
            resource_table,
            resident_names,
            entry_table,
            nonresident_names,
            padding,
            resource_data,
            total_len: resource_data.end(),
        }
    }

    /// Offset of `span` relative to the NE header, as stored in the header.
    fn ne_relative(&self, span: Span, what: &str) -> Result<u16, FonError> {
        let rel = span.offset - self.ne_header.offset;
        u16::try_from(rel)
            .map_err(|_| FonError::too_large(format!("{} offset", what), rel, u16::MAX as usize))
    }

    /// Header fields for this layout.
    pub fn ne_header(&self) -> Result<NeHeader, FonError> {
        let entry = self.ne_relative(self.entry_table, "entry table")?;
        let resource_table = self.ne_relative(self.resource_table, "resource table")?;
        Ok(NeHeader {
            entry_table: entry,
            entry_table_len: self.entry_table.len as u16,
            // No segments, so the empty segment table shares the resource
            // table's offset.
            segment_table: resource_table,
            resource_table,
            resident_names: self.ne_relative(self.resident_names, "resident name table")?,
            module_refs: entry,
            imported_names: entry,
            nonresident_names: self.nonresident_names.offset as u32,
            nonresident_names_len: self.nonresident_names.len as u16,
        })
    }
}

/// A composed image with its layout.
#[derive(Debug, Clone)]
pub struct FonImage {
    pub bytes: Vec<u8>,
    pub layout: SectionLayout,
    /// Resource groups as written to the table.
    pub resources: Vec<TypeInfo>,
}

/// Compose the image for already validated `fonts` whose directory entries
/// are `entries`, under the Windows-1252 encoded `face_name`.
pub fn compose(
    fonts: &[FontResource<'_>],
    entries: &[DirectoryEntry],
    face_name: &[u8],
) -> Result<FonImage, FonError> {
    let fontdir = build_fontdir(entries);
    let stub = build_stub();
    let nonres = nonresident_names(face_name)?;
    let res = resident_names(face_name)?;
    let entry = entry_table();

    let mut layout =
        SectionLayout::compute(stub.len(), fonts.len(), res.len(), entry.len(), nonres.len());
    log::debug!("section layout: {:?}", layout);

    let section = build_resources(&fontdir, fonts, layout.resource_data.offset)?;
    debug_assert_eq!(section.table.len(), layout.resource_table.len);
    layout.resource_data.len = section.data.len();
    layout.total_len = layout.resource_data.end();

    let header = layout.ne_header()?;

    let mut bytes = Vec::with_capacity(layout.total_len);
    bytes.extend_from_slice(&stub);
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&section.table);
    bytes.extend_from_slice(&res);
    bytes.extend_from_slice(&entry);
    bytes.extend_from_slice(&nonres);
    bytes.resize(bytes.len() + layout.padding.len, 0);
    debug_assert_eq!(bytes.len(), layout.resource_data.offset);
    bytes.extend_from_slice(&section.data);
    debug_assert_eq!(bytes.len(), layout.total_len);

    log::debug!(
        "composed {} bytes: {} fonts, resource data at {:#x}",
        bytes.len(),
        fonts.len(),
        layout.resource_data.offset
    );

    Ok(FonImage {
        bytes,
        layout,
        resources: section.groups,
    })
}
