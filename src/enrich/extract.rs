//! Cover-art extraction from embedded tags.

use lofty::file::TaggedFileExt;
use lofty::picture::PictureType;

use crate::error::{Error, Result};
use crate::library::{CoverArt, SourceFile};

/// Pulls embedded art out of a file.
///
/// `Ok(None)` means the file simply has no picture; that is a normal outcome.
pub trait ArtExtractor: Send + Sync {
    fn extract(&self, file: &SourceFile) -> Result<Option<CoverArt>>;
}

/// Extractor backed by `lofty`.
#[derive(Debug, Clone)]
pub struct LoftyExtractor {
    max_bytes: usize,
}

impl LoftyExtractor {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl ArtExtractor for LoftyExtractor {
    fn extract(&self, file: &SourceFile) -> Result<Option<CoverArt>> {
        let tagged = lofty::read_from_path(&file.path)?;

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(None);
        };

        // Prefer front cover, otherwise use first picture
        let pictures = tag.pictures();
        let Some(picture) = pictures
            .iter()
            .find(|p| p.pic_type() == PictureType::CoverFront)
            .or_else(|| pictures.first())
        else {
            return Ok(None);
        };

        let data = picture.data();
        if data.len() > self.max_bytes {
            return Err(Error::ArtTooLarge(data.len(), self.max_bytes));
        }

        let mime_type = picture
            .mime_type()
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());

        Ok(Some(CoverArt {
            data: data.to_vec(),
            mime_type,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn garbage_file_yields_no_art() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        fs::write(&path, b"definitely not audio").unwrap();

        let extractor = LoftyExtractor::new(1024);
        let result = extractor.extract(&SourceFile::from_path(path));
        assert!(!matches!(result, Ok(Some(_))));
    }

    #[test]
    fn missing_file_is_an_error() {
        let extractor = LoftyExtractor::new(1024);
        let file = SourceFile::from_path("/nonexistent/sonicflow/a.flac");
        assert!(extractor.extract(&file).is_err());
    }
}
