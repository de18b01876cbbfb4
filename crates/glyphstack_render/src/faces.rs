//! Face enumeration: names and character coverage for every face in a file.

use std::path::Path;

use serde::Serialize;

use crate::error::{RenderError, Result};
use crate::font::FontFile;

/// Metadata for one face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceMetadata {
    /// Family name from the naming table.
    pub family_name: String,
    /// Style name, when the face declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
    /// Every code point the face maps, ascending and unique.
    pub points: Vec<u32>,
}

/// Enumerate every face in `font_file`, in file order.
///
/// All-or-nothing: a face without a family name fails the whole call, so a
/// collection never yields a partial listing.
pub fn load_faces(font_file: &Path) -> Result<Vec<FaceMetadata>> {
    let font = FontFile::open(font_file)?;
    let count = font.face_count();
    let mut faces = Vec::with_capacity(count as usize);
    for index in 0..count {
        let face = font.face(index)?;
        let family_name = face
            .family_name()
            .ok_or(RenderError::MissingFamilyName { index })?;
        let style_name = face.style_name();
        let points: Vec<u32> = face.code_points().into_iter().collect();
        tracing::debug!(
            "face {index} ({family_name}) maps {} code points",
            points.len()
        );
        faces.push(FaceMetadata {
            family_name,
            style_name,
            points,
        });
    }
    Ok(faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serializes_to_expected_shape() {
        let meta = FaceMetadata {
            family_name: "Open Sans".to_owned(),
            style_name: Some("Italic".to_owned()),
            points: vec![32, 33, 65],
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "family_name": "Open Sans",
                "style_name": "Italic",
                "points": [32, 33, 65],
            })
        );
    }

    #[test]
    fn test_missing_style_is_omitted() {
        let meta = FaceMetadata {
            family_name: "Unifont".to_owned(),
            style_name: None,
            points: vec![],
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("style_name"));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = load_faces(Path::new("/nonexistent/fixture.ttf")).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
