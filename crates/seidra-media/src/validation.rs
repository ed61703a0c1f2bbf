//! Output formats, MIME mapping and size ceilings.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use seidra_core::error::DomainError;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::MediaKind;

/// Default ceiling for generated images (50 MiB).
pub const DEFAULT_IMAGE_MAX_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Default ceiling for generated videos (500 MiB).
pub const DEFAULT_VIDEO_MAX_SIZE_BYTES: u64 = 500 * 1024 * 1024;

/// Supported image output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageFormat {
    /// `png`
    Png,
    /// `jpg`
    Jpg,
    /// `jpeg`
    Jpeg,
}

impl ImageFormat {
    /// Accepted spellings.
    pub const ALL: [Self; 3] = [Self::Png, Self::Jpg, Self::Jpeg];

    /// File extension, as requested.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
        }
    }

    /// Fixed MIME type for the format.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg | Self::Jpeg => "image/jpeg",
        }
    }
}

/// Supported video output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VideoFormat {
    /// `mp4`
    Mp4,
    /// `webm`
    Webm,
}

impl VideoFormat {
    /// Accepted spellings.
    pub const ALL: [Self; 2] = [Self::Mp4, Self::Webm];

    /// File extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
        }
    }

    /// Fixed MIME type for the format.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
        }
    }
}

fn parse_format<F: Copy>(
    value: &str,
    all: &[F],
    extension: fn(F) -> &'static str,
    kind: MediaKind,
) -> Result<F, DomainError> {
    all.iter()
        .copied()
        .find(|f| extension(*f) == value)
        .ok_or_else(|| {
            let allowed: Vec<&str> = all.iter().map(|f| extension(*f)).collect();
            DomainError::Validation(format!(
                "unsupported {kind} format '{value}'; expected one of: {}",
                allowed.join(", ")
            ))
        })
}

impl FromStr for ImageFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_format(s, &Self::ALL, Self::extension, MediaKind::Image)
    }
}

impl FromStr for VideoFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_format(s, &Self::ALL, Self::extension, MediaKind::Video)
    }
}

impl TryFrom<String> for ImageFormat {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for VideoFormat {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ImageFormat> for String {
    fn from(format: ImageFormat) -> Self {
        format.extension().to_owned()
    }
}

impl From<VideoFormat> for String {
    fn from(format: VideoFormat) -> Self {
        format.extension().to_owned()
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Checks that a size ceiling is usable.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `max_size_bytes` is zero.
pub fn validate_ceiling(max_size_bytes: u64, kind: MediaKind) -> Result<(), DomainError> {
    if max_size_bytes == 0 {
        return Err(DomainError::Validation(format!(
            "{kind} max_size_bytes must be positive"
        )));
    }
    Ok(())
}

/// Checks a produced artifact against its ceiling. The artifact is left in
/// place either way.
///
/// # Errors
///
/// Returns `DomainError::SizeExceeded` if `size_bytes` is above
/// `max_size_bytes`.
pub fn validate_max_size(
    size_bytes: u64,
    max_size_bytes: u64,
    kind: MediaKind,
    path: &Path,
) -> Result<(), DomainError> {
    if size_bytes > max_size_bytes {
        warn!(
            media_kind = %kind,
            path = %path.display(),
            size_bytes,
            max_size_bytes,
            "generated artifact exceeds size limit"
        );
        return Err(DomainError::SizeExceeded {
            media_kind: kind.as_str(),
            path: path.to_path_buf(),
            size_bytes,
            max_size_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_formats_map_to_fixed_mime_types() {
        let cases = [("png", "image/png"), ("jpg", "image/jpeg"), ("jpeg", "image/jpeg")];
        for (raw, mime) in cases {
            let format: ImageFormat = raw.parse().unwrap();
            assert_eq!(format.mime_type(), mime);
            assert_eq!(format.extension(), raw);
        }
    }

    #[test]
    fn test_video_formats_map_to_fixed_mime_types() {
        assert_eq!("mp4".parse::<VideoFormat>().unwrap().mime_type(), "video/mp4");
        assert_eq!("webm".parse::<VideoFormat>().unwrap().mime_type(), "video/webm");
    }

    #[test]
    fn test_format_match_is_exact() {
        for raw in [" png ", "PNG", "Jpeg"] {
            match raw.parse::<ImageFormat>() {
                Err(DomainError::Validation(_)) => {}
                other => panic!("expected Validation for {raw:?}, got {other:?}"),
            }
        }
        assert!("WEBM".parse::<VideoFormat>().is_err());
    }

    #[test]
    fn test_unsupported_format_lists_allowed_values() {
        match "gif".parse::<ImageFormat>() {
            Err(DomainError::Validation(msg)) => {
                assert_eq!(msg, "unsupported image format 'gif'; expected one of: png, jpg, jpeg");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!("png".parse::<VideoFormat>().is_err());
    }

    #[test]
    fn test_validate_max_size_allows_exact_ceiling() {
        let path = Path::new("/tmp/image_s1.png");

        assert!(validate_max_size(1024, 1024, MediaKind::Image, path).is_ok());
        match validate_max_size(1025, 1024, MediaKind::Image, path) {
            Err(DomainError::SizeExceeded { size_bytes, max_size_bytes, .. }) => {
                assert_eq!(size_bytes, 1025);
                assert_eq!(max_size_bytes, 1024);
            }
            other => panic!("expected SizeExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_ceiling_is_rejected() {
        assert!(validate_ceiling(0, MediaKind::Video).is_err());
        assert!(validate_ceiling(1, MediaKind::Video).is_ok());
    }
}
