use std::path::{Path, PathBuf};

use chrono::Local;

/// Sortable timestamp pattern for photo filenames.
pub const FILENAME_PATTERN: &str = "%Y-%m-%d-%H-%M-%S-%3f";

/// File extension for still captures.
pub const PHOTO_EXTENSION: &str = "jpg";

/// Build a timestamped file path inside `directory`.
///
/// Only the path is constructed; the device runtime creates the file during
/// capture.
pub fn create_timestamped_file(directory: &Path, pattern: &str, extension: &str) -> PathBuf {
    let stamp = Local::now().format(pattern).to_string();
    directory.join(format!("{}.{}", stamp, extension))
}

/// Destination path for one still capture, with the fixed pattern and
/// extension.
pub fn timestamped_photo_path(directory: &Path) -> PathBuf {
    create_timestamped_file(directory, FILENAME_PATTERN, PHOTO_EXTENSION)
}

/// Mime type for an index announcement, derived from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_path_lands_in_directory_with_extension() {
        let path = timestamped_photo_path(Path::new("/photos"));

        assert_eq!(path.parent(), Some(Path::new("/photos")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
    }

    #[test]
    fn filename_stamp_has_expected_shape() {
        let path = timestamped_photo_path(Path::new("/photos"));
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap();

        // %Y-%m-%d-%H-%M-%S-%3f: six dashes, milliseconds last
        assert_eq!(stem.matches('-').count(), 6);
        assert_eq!(stem.rsplit('-').next().unwrap().len(), 3);
    }

    #[test]
    fn mime_derivation() {
        assert_eq!(mime_for_path(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.raw")), "application/octet-stream");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }
}
