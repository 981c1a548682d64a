//! Resident and nonresident name tables, and the entry table.
//!
//! Each name table holds length-prefixed strings followed by an ordinal
//! word; a zero length byte ends the table. We store a single string with
//! ordinal 0, so every table ends in three zero bytes.

use crate::codec::push_u16;
use crate::error::FonError;

/// Description line Windows reads to classify the module as a font.
pub const FONTRES_PREFIX: &[u8] = b"FONTRES 100,96,96 : ";

fn name_table(name: &[u8], what: &str) -> Result<Vec<u8>, FonError> {
    let len = u8::try_from(name.len())
        .map_err(|_| FonError::too_large(format!("{} length", what), name.len(), 255))?;
    let mut table = Vec::with_capacity(name.len() + 4);
    table.push(len);
    table.extend_from_slice(name);
    table.extend_from_slice(&[0, 0, 0]);
    Ok(table)
}

/// Nonresident name table: `"FONTRES 100,96,96 : " ++ face`.
///
/// Fails when the description does not fit the length byte.
pub fn nonresident_names(face_name: &[u8]) -> Result<Vec<u8>, FonError> {
    let mut description = FONTRES_PREFIX.to_vec();
    description.extend_from_slice(face_name);
    name_table(&description, "nonresident name")
}

/// Module name: the ASCII alphanumerics of the face name.
pub fn module_name(face_name: &[u8]) -> Vec<u8> {
    face_name
        .iter()
        .copied()
        .filter(u8::is_ascii_alphanumeric)
        .collect()
}

/// Resident name table holding the module name.
pub fn resident_names(face_name: &[u8]) -> Result<Vec<u8>, FonError> {
    let name = module_name(face_name);
    if name.is_empty() {
        log::warn!("face name has no ASCII alphanumerics; module name is empty");
    }
    name_table(&name, "module name")
}

/// An empty entry table: the library exports nothing.
pub fn entry_table() -> Vec<u8> {
    let mut table = Vec::with_capacity(2);
    push_u16(&mut table, 0);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonresident_table() {
        let table = nonresident_names(b"Arial").unwrap();
        assert_eq!(table[0] as usize, FONTRES_PREFIX.len() + 5);
        assert_eq!(&table[1..table.len() - 3], b"FONTRES 100,96,96 : Arial");
        assert_eq!(&table[table.len() - 3..], &[0, 0, 0]);
    }

    #[test]
    fn test_resident_table_filters_non_alphanumerics() {
        assert_eq!(resident_names(b"Arial").unwrap(), b"\x05Arial\0\0\0".to_vec());
        assert_eq!(
            resident_names(b"MS Sans-Serif 8").unwrap(),
            b"\x0cMSSansSerif8\0\0\0".to_vec()
        );
        assert_eq!(module_name(&[b'A', 0xE9, b'1']), b"A1".to_vec());
    }

    #[test]
    fn test_resident_table_empty_module_name() {
        assert_eq!(resident_names(b"--- !").unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_description_fills_length_byte_exactly() {
        let face = vec![b'x'; 255 - FONTRES_PREFIX.len()];
        let table = nonresident_names(&face).unwrap();
        assert_eq!(table[0], 255);
        assert_eq!(table.len(), 1 + 255 + 3);
    }

    #[test]
    fn test_description_over_255_bytes_is_rejected() {
        let face = vec![b'x'; 256 - FONTRES_PREFIX.len()];
        let err = nonresident_names(&face).unwrap_err();
        assert!(matches!(err, FonError::TooLarge { value: 256, limit: 255, .. }));
    }

    #[test]
    fn test_module_name_over_255_bytes_is_rejected() {
        let face = vec![b'x'; 300];
        assert!(matches!(resident_names(&face), Err(FonError::TooLarge { value: 300, .. })));
    }

    #[test]
    fn test_entry_table_is_zero_word() {
        assert_eq!(entry_table(), vec![0, 0]);
    }
}
