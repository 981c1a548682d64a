//! Integration tests for the FON build pipeline.
//!
//! These tests go from synthetic FNT buffers to a finished image and read
//! it back. They verify:
//! - Font resources get sequential ids in input order
//! - Resource-table offsets and lengths land exactly on the data blocks
//! - Paragraph alignment of the table and the data
//! - Directory entries keep working name offsets
//! - Face-name disagreements and bad headers fail without output

use mkfon::codec::{asciz, read_u16, read_u32};
use mkfon::fnt::{DEVICE_OFFSET_FIELD, DIRENTRY_HEADER_LEN, FACE_OFFSET_FIELD};
use mkfon::resource::{FONTDIR_FLAGS, FONT_FLAGS, RT_FONT, RT_FONTDIR};
use mkfon::stub::DosHeader;
use mkfon::{build_fon, build_fon_with_layout, infer_face_name, FonError, FonInfo, FonOptions};

// ─── Helpers ────────────────────────────────────────────────────

/// An FNT with a 0x71-byte header, optional device name, face name, and
/// `body` bytes of fake glyph data after the names.
fn make_fnt(device: Option<&str>, face: &str, body: usize) -> Vec<u8> {
    let mut data = vec![0u8; DIRENTRY_HEADER_LEN];
    // dfVersion 3.0, then something recognisable
    data[0] = 0x00;
    data[1] = 0x03;
    for (i, b) in data.iter_mut().enumerate().take(DEVICE_OFFSET_FIELD).skip(2) {
        *b = (i * 7) as u8;
    }
    if let Some(device) = device {
        let off = data.len() as u32;
        data[DEVICE_OFFSET_FIELD..DEVICE_OFFSET_FIELD + 4].copy_from_slice(&off.to_le_bytes());
        data.extend_from_slice(device.as_bytes());
        data.push(0);
    }
    let off = data.len() as u32;
    data[FACE_OFFSET_FIELD..FACE_OFFSET_FIELD + 4].copy_from_slice(&off.to_le_bytes());
    data.extend_from_slice(face.as_bytes());
    data.push(0);
    data.extend((0..body).map(|i| (i % 251) as u8 | 1));
    data
}

fn font_set(face: &str, sizes: &[usize]) -> Vec<Vec<u8>> {
    sizes.iter().map(|&n| make_fnt(None, face, n)).collect()
}

// ─── Resource Table ─────────────────────────────────────────────

#[test]
fn test_font_group_has_sequential_ids_in_input_order() {
    let fonts = font_set("Terminal", &[10, 200, 3, 77]);
    let image = build_fon(&fonts, &FonOptions::default()).unwrap();
    let info = FonInfo::parse(&image).unwrap();

    let ids: Vec<u16> = info.fonts().map(|f| f.id).collect();
    assert_eq!(ids, vec![0x8001, 0x8002, 0x8003, 0x8004]);

    for (font, entry) in fonts.iter().zip(info.fonts()) {
        let block = info.resource_data(&image, entry);
        assert_eq!(&block[..font.len()], &font[..]);
        assert!(block[font.len()..].iter().all(|&b| b == 0));
        assert_eq!(entry.flags, FONT_FLAGS);
    }
}

#[test]
fn test_exactly_one_fontdir_before_fonts() {
    let fonts = font_set("Terminal", &[1, 2]);
    let image = build_fon(&fonts, &FonOptions::default()).unwrap();
    let info = FonInfo::parse(&image).unwrap();

    let types: Vec<u16> = info.resources.iter().map(|r| r.type_id).collect();
    assert_eq!(types, vec![RT_FONTDIR, RT_FONT, RT_FONT]);
    assert_eq!(info.resources[0].flags, FONTDIR_FLAGS);
}

#[test]
fn test_name_infos_reconstruct_resource_data() {
    let fonts = font_set("Courier", &[0, 15, 16, 17, 1000]);
    let image = build_fon_with_layout(&fonts, &FonOptions::default()).unwrap();
    let info = FonInfo::parse(&image.bytes).unwrap();

    let data = image.layout.resource_data;
    let mut cursor = data.offset;
    let mut rebuilt = Vec::new();
    for entry in &info.resources {
        assert_eq!(entry.offset, cursor);
        assert_eq!(entry.offset % 16, 0);
        assert_eq!(entry.len % 16, 0);
        rebuilt.extend_from_slice(info.resource_data(&image.bytes, entry));
        cursor += entry.len;
    }
    assert_eq!(cursor, data.end());
    assert_eq!(cursor, image.bytes.len());
    assert_eq!(rebuilt, &image.bytes[data.offset..]);
}

#[test]
fn test_resource_table_region_is_paragraph_multiple() {
    for n in 1..=12 {
        let fonts = font_set("Small", &vec![5; n]);
        let image = build_fon_with_layout(&fonts, &FonOptions::default()).unwrap();
        let table = image.layout.resource_table;
        assert_eq!(table.len % 16, 0, "{} fonts", n);
        // the table region runs up to the resident names, which follow it
        assert_eq!(table.end(), image.layout.resident_names.offset);
    }
}

// ─── Headers ────────────────────────────────────────────────────

#[test]
fn test_stub_points_at_ne_header() {
    let fonts = font_set("Terminal", &[8]);
    let image = build_fon_with_layout(&fonts, &FonOptions::default()).unwrap();
    let dos = DosHeader::parse(&image.bytes).unwrap();
    assert_eq!(dos.lfanew as usize, image.layout.ne_header.offset);
    assert_eq!(dos.lfanew % 16, 0);
    assert_eq!(&image.bytes[dos.lfanew as usize..dos.lfanew as usize + 2], b"NE");
}

#[test]
fn test_name_tables() {
    let fonts = font_set("MS Sans Serif", &[8]);
    let image = build_fon(&fonts, &FonOptions::default()).unwrap();
    let info = FonInfo::parse(&image).unwrap();
    assert_eq!(info.module_name, "MSSansSerif");
    assert_eq!(info.description, "FONTRES 100,96,96 : MS Sans Serif");
}

// ─── Directory Entries ──────────────────────────────────────────

#[test]
fn test_fontdir_entries_locate_their_names() {
    let fonts = vec![
        make_fnt(Some("DISPLAY"), "System", 40),
        make_fnt(None, "System", 40),
    ];
    let image = build_fon(&fonts, &FonOptions::default()).unwrap();
    let info = FonInfo::parse(&image).unwrap();
    let fontdir = info.resource_data(&image, &info.resources[0]);

    assert_eq!(read_u16(fontdir, 0), 2);

    // First entry: ordinal, then header + "DISPLAY\0System\0"
    assert_eq!(read_u16(fontdir, 2), 1);
    let entry = &fontdir[4..];
    assert_eq!(&entry[..DIRENTRY_HEADER_LEN], &fonts[0][..DIRENTRY_HEADER_LEN]);
    let dev = read_u32(entry, DEVICE_OFFSET_FIELD) as usize;
    let face = read_u32(entry, FACE_OFFSET_FIELD) as usize;
    assert_eq!(asciz(entry, dev), b"DISPLAY");
    assert_eq!(asciz(entry, face), b"System");

    // Second entry follows the first: no device, so an empty string first
    let first_len = DIRENTRY_HEADER_LEN + "DISPLAY".len() + 1 + "System".len() + 1;
    assert_eq!(read_u16(fontdir, 4 + first_len), 2);
    let entry = &fontdir[6 + first_len..];
    assert_eq!(&entry[DIRENTRY_HEADER_LEN..DIRENTRY_HEADER_LEN + 8], b"\0System\0");
}

#[test]
fn test_concrete_single_font_scenario() {
    let fnt = make_fnt(Some("DEV"), "Arial", 0);
    assert_eq!(read_u32(&fnt, DEVICE_OFFSET_FIELD), 0x71);
    assert_eq!(read_u32(&fnt, FACE_OFFSET_FIELD), 0x75);

    let image = build_fon_with_layout(&[fnt.clone()], &FonOptions::default()).unwrap();
    let info = FonInfo::parse(&image.bytes).unwrap();
    let fontdir = info.resource_data(&image.bytes, &info.resources[0]);

    let mut expected = fnt[..0x71].to_vec();
    expected.extend_from_slice(b"DEV\0Arial\0");
    assert_eq!(&fontdir[4..4 + expected.len()], &expected[..]);

    let res = image.layout.resident_names;
    assert_eq!(&image.bytes[res.offset..res.end()], b"\x05Arial\0\0\0");
}

// ─── Failures ───────────────────────────────────────────────────

#[test]
fn test_zero_fonts_rejected() {
    let fonts: Vec<Vec<u8>> = vec![];
    let err = build_fon(&fonts, &FonOptions::with_face_name("Anything")).unwrap_err();
    assert!(matches!(err, FonError::InvalidHeader { .. }));
}

#[test]
fn test_face_names_differing_by_one_byte() {
    let fonts = vec![make_fnt(None, "Terminal", 4), make_fnt(None, "TerminaL", 4)];
    let err = build_fon(&fonts, &FonOptions::default()).unwrap_err();
    assert!(matches!(err, FonError::FaceNameMismatch { .. }));
    assert!(infer_face_name(&fonts).is_err());
}

#[test]
fn test_mismatch_detected_across_all_inputs() {
    // The odd one out is last; it must still be caught.
    let fonts = vec![
        make_fnt(None, "Fixed", 4),
        make_fnt(None, "Fixed", 4),
        make_fnt(None, "Fixed", 4),
        make_fnt(None, "Fixes", 4),
    ];
    assert!(matches!(
        build_fon(&fonts, &FonOptions::default()),
        Err(FonError::FaceNameMismatch { .. })
    ));
}

#[test]
fn test_short_font_rejected() {
    let fonts = vec![make_fnt(None, "Fixed", 4), vec![0u8; 0x70]];
    let err = build_fon(&fonts, &FonOptions::default()).unwrap_err();
    assert!(matches!(err, FonError::InvalidHeader { index: Some(1), .. }));
}

#[test]
fn test_face_offset_outside_buffer_rejected() {
    let mut fnt = make_fnt(None, "Fixed", 4);
    let bad = (fnt.len() as u32 + 10).to_le_bytes();
    fnt[FACE_OFFSET_FIELD..FACE_OFFSET_FIELD + 4].copy_from_slice(&bad);
    let err = build_fon(&[fnt], &FonOptions::with_face_name("Fixed")).unwrap_err();
    assert!(matches!(err, FonError::InvalidHeader { .. }));
}

#[test]
fn test_face_name_too_long_for_description_fails() {
    let fonts = vec![make_fnt(None, "Fixed", 4)];
    let err = build_fon(&fonts, &FonOptions::with_face_name("X".repeat(250))).unwrap_err();
    match err {
        FonError::TooLarge { value, limit, .. } => assert_eq!((value, limit), (270, 255)),
        other => panic!("expected TooLarge, got {:?}", other),
    }
}

#[test]
fn test_longest_face_name_is_kept_whole() {
    let face = "X".repeat(235);
    let fonts = vec![make_fnt(None, "Fixed", 4)];
    let image = build_fon(&fonts, &FonOptions::with_face_name(face.clone())).unwrap();
    let info = FonInfo::parse(&image).unwrap();
    assert_eq!(info.description, format!("FONTRES 100,96,96 : {}", face));
    assert_eq!(info.module_name, face);
}

#[test]
fn test_build_is_deterministic() {
    let fonts = font_set("Terminal", &[30, 60]);
    let a = build_fon(&fonts, &FonOptions::default()).unwrap();
    let b = build_fon(&fonts, &FonOptions::default()).unwrap();
    assert_eq!(a, b);
}
