// Domain rules - Category and format registries

use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;

/// File names never treated as clips
pub const IGNORED_FILE_NAMES: &[&str] = &["desktop.ini", "Thumbs.db", ".DS_Store"];

pub fn is_ignored_file(file_name: &str) -> bool {
    IGNORED_FILE_NAMES.contains(&file_name)
}

/// Ordered set of categories; the first prefix match wins
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<CategoryDescriptor>,
}

impl CategoryRegistry {
    /// Build a registry, keeping registration order
    pub fn new(categories: Vec<CategoryDescriptor>) -> Result<Self, DomainError> {
        for (i, category) in categories.iter().enumerate() {
            category.validate()?;
            if categories[..i].iter().any(|c| c.id == category.id) {
                return Err(DomainError::InvalidDescriptor {
                    id: category.id.clone(),
                    message: "duplicate category id".to_string(),
                });
            }
        }
        Ok(Self { categories })
    }

    /// Built-in League of Legends shorts profile
    pub fn builtin() -> Self {
        Self {
            categories: vec![league_of_legends()],
        }
    }

    pub fn categories(&self) -> &[CategoryDescriptor] {
        &self.categories
    }

    /// First registered category with a prefix of `file_name`
    pub fn match_category(&self, file_name: &str) -> Result<&CategoryDescriptor, DomainError> {
        self.categories
            .iter()
            .find(|c| c.matches(file_name))
            .ok_or_else(|| DomainError::UnknownCategory {
                file_name: file_name.to_string(),
            })
    }

    pub fn by_id(&self, id: &str) -> Result<&CategoryDescriptor, DomainError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::UnknownCategoryId {
                category_id: id.to_string(),
            })
    }
}

/// Output formats keyed by file extension
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<FormatDescriptor>,
}

impl FormatRegistry {
    pub fn new(formats: Vec<FormatDescriptor>) -> Result<Self, DomainError> {
        for format in &formats {
            if format.extensions.is_empty() {
                return Err(DomainError::InvalidDescriptor {
                    id: format.id.clone(),
                    message: "format lists no extensions".to_string(),
                });
            }
        }
        Ok(Self { formats })
    }

    /// H.264 re-encode with the audio stream copied
    pub fn builtin() -> Self {
        Self {
            formats: vec![FormatDescriptor {
                id: "mp4".to_string(),
                extensions: vec!["mp4".to_string()],
                video_codec: "libx264".to_string(),
                audio_codec: "copy".to_string(),
            }],
        }
    }

    pub fn formats(&self) -> &[FormatDescriptor] {
        &self.formats
    }

    /// Format for the extension of `file_name`
    pub fn match_format(&self, file_name: &str) -> Result<&FormatDescriptor, DomainError> {
        let unknown = || DomainError::UnknownFormat {
            file_name: file_name.to_string(),
        };
        let extension = file_extension(file_name).ok_or_else(unknown)?;
        self.by_extension(extension).ok_or_else(unknown)
    }

    pub fn by_extension(&self, extension: &str) -> Option<&FormatDescriptor> {
        self.formats.iter().find(|f| f.accepts_extension(extension))
    }
}

/// Extension without the leading dot
pub fn file_extension(file_name: &str) -> Option<&str> {
    Path::new(file_name).extension().and_then(|e| e.to_str())
}

fn league_of_legends() -> CategoryDescriptor {
    CategoryDescriptor {
        id: "lol".to_string(),
        filename_prefixes: vec!["League of Legends".to_string()],
        default_range: TrimRange { start: 14, end: 29 },
        recipe: TransformRecipe::PadTextCrop,
        edit_options: EditOptions {
            original_width: 1920,
            original_height: 1080,
            output_height: 1920,
            output_ratio: 16.0 / 9.0,
            font_file: "C\\:/Windows/Fonts/arial.ttf".to_string(),
            font_color: "white".to_string(),
            font_size: 48,
            padding_x: 0,
            padding_y: 200,
            padding_color: "black".to_string(),
        },
        upload: UploadMetadata {
            tags: vec!["league of legends".to_string()],
            category_code: "20".to_string(),
            title_template: "{{.Id}} #leagueoflegends".to_string(),
            description_template: String::new(),
            public: true,
        },
        text_template: "{{.Id}}".to_string(),
    }
}
