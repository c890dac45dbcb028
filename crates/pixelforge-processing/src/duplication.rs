use pixelforge_core::constants::{ARCHIVE_MIME, MAX_DUPLICATE_COUNT};
use pixelforge_core::ProcessedImage;
use pixelforge_infra::{create_zip_archive, ArchiveEntry};

use crate::error::ProcessingError;
use crate::naming;

/// Fan a processed image out into named copies and optionally bundle them
pub struct DuplicationPackager;

impl DuplicationPackager {
    /// `min(count, 20)` renamed copies, empty when `count <= 0`
    pub fn duplicate(image: &ProcessedImage, count: i64) -> Vec<ProcessedImage> {
        let count = count.clamp(0, MAX_DUPLICATE_COUNT as i64) as usize;

        tracing::debug!(source = %image.name(), count = count, "Duplicating image");

        (1..=count)
            .map(|i| image.renamed(naming::copy_name(image.name(), i)))
            .collect()
    }

    /// Bundle entries into one ZIP. A single entry is returned as-is.
    pub fn package_as_archive(
        mut images: Vec<ProcessedImage>,
    ) -> Result<ProcessedImage, ProcessingError> {
        if images.len() <= 1 {
            return images.pop().ok_or(ProcessingError::EmptyInput);
        }

        let entries: Vec<ArchiveEntry<'_>> = images
            .iter()
            .map(|image| ArchiveEntry {
                name: image.name(),
                data: image.bytes(),
            })
            .collect();

        let archive = create_zip_archive(&entries)
            .map_err(|e| ProcessingError::Archive(format!("{:#}", e)))?;

        Ok(ProcessedImage::new(
            Self::archive_name(images[0].name()),
            ARCHIVE_MIME,
            archive,
        ))
    }

    /// `<base>-copies.zip` where `<base>` drops the extension and any copy marker
    pub fn archive_name(first_entry: &str) -> String {
        let base = naming::strip_copy_suffix(naming::base_name(first_entry));
        format!("{}-copies.zip", base)
    }
}
