//! The ordered list of images being annotated.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use subdrawer_common::error::{SubdrawerError, SubdrawerResult};

/// Extensions (compared case-insensitively) that count as source images.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_supported_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn offset(&self) -> isize {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }

    /// `a` steps back, `s` steps forward.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'a' => Some(Direction::Previous),
            's' => Some(Direction::Next),
            _ => None,
        }
    }
}

/// Image names in display order, with a cursor on the active one.
///
/// Never empty: a folder without images gets synthesized placeholder names
/// that have no backing file.
#[derive(Debug, Clone)]
pub struct ImageSequence {
    names: Vec<String>,
    placeholder: bool,
    current: usize,
}

impl ImageSequence {
    /// List supported images in `folder`, sorted by name.
    pub fn scan(folder: &Path, placeholder_count: usize) -> SubdrawerResult<Self> {
        let entries = std::fs::read_dir(folder).map_err(|e| SubdrawerError::io(folder, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SubdrawerError::io(folder, e))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_supported_image(&name) && entry.path().is_file() {
                names.push(name);
            }
        }
        names.sort();

        tracing::debug!(folder = %folder.display(), images = names.len(), "Scanned working folder");
        Ok(Self::from_names(names, placeholder_count))
    }

    /// Use `names` as-is, or placeholders when it is empty.
    pub fn from_names(names: Vec<String>, placeholder_count: usize) -> Self {
        if names.is_empty() {
            return Self::placeholder(placeholder_count);
        }
        Self {
            names,
            placeholder: false,
            current: 0,
        }
    }

    /// `image_1.jpg` ... `image_N.jpg`, with at least one name.
    pub fn placeholder(count: usize) -> Self {
        Self {
            names: (1..=count.max(1)).map(|i| format!("image_{i}.jpg")).collect(),
            placeholder: true,
            current: 0,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Never true: the sequence always holds at least one name.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the names are synthesized rather than real files.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn first(&self) -> &str {
        &self.names[0]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_name(&self) -> &str {
        &self.names[self.current]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Map any index onto `[0, len)`, wrapping in both directions.
    pub fn wrap_index(&self, index: isize) -> usize {
        index.rem_euclid(self.names.len() as isize) as usize
    }

    /// Make the (wrapped) index active and return its name.
    pub fn select(&mut self, index: isize) -> &str {
        self.current = self.wrap_index(index);
        tracing::debug!(index = self.current, image = %self.names[self.current], "Selected image");
        &self.names[self.current]
    }

    /// Step cyclically from the active image.
    pub fn shift(&mut self, direction: Direction) -> &str {
        self.select(self.current as isize + direction.offset())
    }

    /// The backing file of `name`, if there is one.
    pub fn source_path(&self, folder: &Path, name: &str) -> Option<PathBuf> {
        if self.placeholder {
            return None;
        }
        let path = folder.join(name);
        path.is_file().then_some(path)
    }
}

/// Decode `path` and resize it to `canvas_height`, keeping its aspect ratio.
///
/// Returns `None` when the scaled width would round down to zero.
pub fn load_background(path: &Path, canvas_height: u32) -> SubdrawerResult<Option<DynamicImage>> {
    let loaded = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) => SubdrawerError::io(path, io),
        other => SubdrawerError::render(format!("Failed to decode {}: {other}", path.display())),
    })?;

    let (width, height) = loaded.dimensions();
    if height == 0 {
        return Ok(None);
    }
    let new_width = (width as u64 * canvas_height as u64 / height as u64) as u32;
    if new_width < 1 || canvas_height < 1 {
        return Ok(None);
    }
    Ok(Some(loaded.resize_exact(
        new_width,
        canvas_height,
        FilterType::CatmullRom,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_supported_extensions_are_case_insensitive() {
        assert!(is_supported_image("a.jpg"));
        assert!(is_supported_image("a.JPEG"));
        assert!(is_supported_image("a.Png"));
        assert!(!is_supported_image("a.gif"));
        assert!(!is_supported_image("pose_data.json"));
        assert!(!is_supported_image("jpg"));
    }

    #[test]
    fn test_empty_list_becomes_placeholders() {
        let seq = ImageSequence::from_names(vec![], 24);
        assert!(seq.is_placeholder());
        assert_eq!(seq.len(), 24);
        assert_eq!(seq.first(), "image_1.jpg");
        assert_eq!(seq.names()[23], "image_24.jpg");
        assert_eq!(ImageSequence::placeholder(0).len(), 1);
    }

    #[test]
    fn test_select_wraps_both_ways() {
        let mut seq = ImageSequence::from_names(names(&["a.png", "b.png", "c.png"]), 24);
        assert_eq!(seq.select(4), "b.png");
        assert_eq!(seq.select(-1), "c.png");
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn test_shift_is_cyclic() {
        let mut seq = ImageSequence::from_names(names(&["a.png", "b.png", "c.png"]), 24);
        assert_eq!(seq.shift(Direction::Previous), "c.png");
        assert_eq!(seq.shift(Direction::Next), "a.png");
        assert_eq!(seq.shift(Direction::Next), "b.png");
    }

    #[test]
    fn test_direction_keys() {
        assert_eq!(Direction::from_key('a'), Some(Direction::Previous));
        assert_eq!(Direction::from_key('s'), Some(Direction::Next));
        assert_eq!(Direction::from_key('d'), None);
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.jpg", "notes.txt", "pose_data.json"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("folder.png")).unwrap();

        let seq = ImageSequence::scan(dir.path(), 24).unwrap();
        assert!(!seq.is_placeholder());
        assert_eq!(seq.names(), &names(&["a.jpg", "b.PNG"])[..]);
        assert_eq!(
            seq.source_path(dir.path(), "a.jpg"),
            Some(dir.path().join("a.jpg"))
        );
    }

    #[test]
    fn test_scan_missing_folder_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageSequence::scan(&dir.path().join("gone"), 24).unwrap_err();
        assert!(matches!(err, SubdrawerError::Io { .. }));
    }

    #[test]
    fn test_placeholders_have_no_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("image_1.jpg"), b"x").unwrap();
        let seq = ImageSequence::placeholder(3);
        assert_eq!(seq.source_path(dir.path(), "image_1.jpg"), None);
    }

    #[test]
    fn test_load_background_keeps_aspect_ratio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(400, 200).save(&path).unwrap();

        let background = load_background(&path, 100).unwrap().unwrap();
        assert_eq!(background.dimensions(), (200, 100));
    }
}
