//! # mkfon
//!
//! Packs Windows bitmap fonts (`.FNT` resources) into a `.FON` font library:
//! a 16-bit NE executable whose only contents are a FONTDIR resource and one
//! FONT resource per input.
//!
//! Every header field in an NE image is a fixed-width offset to some other
//! section, and most sections must start on a 16-byte paragraph. The builder
//! therefore works in two passes: size everything, then place and emit.
//!
//! ## Architecture
//!
//! ```text
//! FNT buffers
//!       ↓
//!   [fnt]       FONTDIRENTRY per font, face-name checks
//!       ↓
//!   [stub]      MZ stub program
//!   [resource]  resource table + resource data
//!   [names]     resident / nonresident name tables, entry table
//!       ↓
//!   [image]     section layout, NE header, concatenation
//!       ↓
//! FON bytes     ← [inspect] reads them back
//! ```
//!
//! The image layout and stub follow Simon Tatham's mkwinfont, copyright
//! 2001, used under the MIT license reproduced in `LICENSE`.

pub mod codec;
pub mod encoding;
pub mod error;
pub mod fnt;
pub mod image;
pub mod inspect;
pub mod names;
pub mod ne;
pub mod resource;
pub mod stub;

use serde::Deserialize;

pub use error::FonError;
use fnt::{DirectoryEntry, FontResource};
pub use image::{FonImage, SectionLayout};
pub use inspect::FonInfo;

/// Build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FonOptions {
    /// Face name for the name tables. Inferred from the fonts when absent.
    pub face_name: Option<String>,
}

impl FonOptions {
    pub fn with_face_name(face_name: impl Into<String>) -> Self {
        FonOptions {
            face_name: Some(face_name.into()),
        }
    }
}

fn no_fonts() -> FonError {
    FonError::InvalidHeader {
        index: None,
        reason: "no font resources supplied".to_string(),
    }
}

/// Raw face-name bytes shared by every font.
fn common_face_name<'a>(fonts: &[FontResource<'a>]) -> Result<&'a [u8], FonError> {
    let mut names: Vec<&'a [u8]> = Vec::new();
    for (i, font) in fonts.iter().enumerate() {
        let name = font.face_name_bytes(i)?;
        if !names.contains(&name) {
            names.push(name);
        }
    }
    match names.as_slice() {
        [] => Err(no_fonts()),
        [name] => Ok(*name),
        _ => Err(FonError::FaceNameMismatch {
            names: names.iter().map(|n| encoding::decode(n)).collect(),
        }),
    }
}

/// The face name every font agrees on.
///
/// All inputs are checked before anything is returned; any disagreement is a
/// [`FonError::FaceNameMismatch`].
pub fn infer_face_name<T: AsRef<[u8]>>(fonts: &[T]) -> Result<String, FonError> {
    let fonts: Vec<FontResource<'_>> =
        fonts.iter().map(|f| FontResource::new(f.as_ref())).collect();
    common_face_name(&fonts).map(encoding::decode)
}

/// Build a FON image from FNT buffers and report where each section went.
pub fn build_fon_with_layout<T: AsRef<[u8]>>(
    fonts: &[T],
    options: &FonOptions,
) -> Result<FonImage, FonError> {
    let fonts: Vec<FontResource<'_>> =
        fonts.iter().map(|f| FontResource::new(f.as_ref())).collect();
    if fonts.is_empty() {
        return Err(no_fonts());
    }

    let entries = fonts
        .iter()
        .enumerate()
        .map(|(i, font)| DirectoryEntry::from_font(font, i))
        .collect::<Result<Vec<_>, _>>()?;

    let face_name = match &options.face_name {
        Some(name) => encoding::encode(name)
            .map_err(|_| FonError::UnencodableFaceName(name.clone()))?,
        None => common_face_name(&fonts)?.to_vec(),
    };
    log::info!(
        "building library {:?} from {} font(s)",
        encoding::decode(&face_name),
        fonts.len()
    );

    image::compose(&fonts, &entries, &face_name)
}

/// Build a FON image from FNT buffers.
///
/// This is the primary entry point. Every input is validated before any
/// section is built, so an error never leaves a partial image behind.
pub fn build_fon<T: AsRef<[u8]>>(fonts: &[T], options: &FonOptions) -> Result<Vec<u8>, FonError> {
    build_fon_with_layout(fonts, options).map(|image| image.bytes)
}

/// Build options supplied as JSON, e.g. `{"faceName": "Terminal"}`.
pub fn options_from_json(json: &str) -> Result<FonOptions, serde_json::Error> {
    serde_json::from_str(json)
}
