// Domain models - Core types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::domain::errors::DomainError;
use crate::utils::path::canonical_file_name;

/// Placeholder written into a freshly bootstrapped repository file
pub const PLACEHOLDER: &str = "FILLHERE";

/// First id handed out by a freshly bootstrapped repository
pub const INITIAL_NEXT_ID: u64 = 1000;

/// Largest pixel value accepted in edit options
pub const MAX_DIMENSION: u32 = 16_384;

/// Trim range in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTrimRange")]
pub struct TrimRange {
    pub start: u32,
    pub end: u32,
}

/// Unchecked shape of a stored range
#[derive(Deserialize)]
struct RawTrimRange {
    start: u32,
    end: u32,
}

impl TryFrom<RawTrimRange> for TrimRange {
    type Error = DomainError;

    fn try_from(raw: RawTrimRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TrimRange {
    /// Create a new range, start must come before end
    pub fn new(start: u32, end: u32) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::Prompt {
                message: format!("range start ({}) must be less than end ({})", start, end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse `"<start> <end>"` as typed by the operator
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(DomainError::Prompt {
                message: format!("expected \"<start> <end>\", got {:?}", input.trim()),
            });
        }
        let parse = |s: &str| {
            s.parse::<u32>().map_err(|_| DomainError::Prompt {
                message: format!("not a number of seconds: {:?}", s),
            })
        };
        Self::new(parse(parts[0])?, parse(parts[1])?)
    }
}

impl fmt::Display for TrimRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Lifecycle state derived from a record's timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    New,
    Edited,
    Uploaded,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::New => write!(f, "new"),
            LifecycleState::Edited => write!(f, "edited"),
            LifecycleState::Uploaded => write!(f, "uploaded"),
        }
    }
}

/// One tracked clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: u64,
    pub source_file_name: String,
    pub source_created_at: DateTime<Utc>,
    pub extension: String,
    pub category_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub range: Option<TrimRange>,
}

impl VideoRecord {
    pub fn state(&self) -> LifecycleState {
        match (self.edited_at, self.uploaded_at) {
            (_, Some(_)) => LifecycleState::Uploaded,
            (Some(_), None) => LifecycleState::Edited,
            (None, None) => LifecycleState::New,
        }
    }

    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    pub fn is_uploaded(&self) -> bool {
        self.uploaded_at.is_some()
    }

    /// Name used in the staged-original and edited-output directories
    pub fn working_file_name(&self) -> String {
        canonical_file_name(self.id, &self.extension)
    }
}

/// Visual parameters of the pad/text/crop transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditOptions {
    pub original_width: u32,
    pub original_height: u32,
    pub output_height: u32,
    pub output_ratio: f64,
    pub font_file: String,
    pub font_color: String,
    pub font_size: u32,
    pub padding_x: u32,
    pub padding_y: u32,
    pub padding_color: String,
}

/// Transform applied to clips of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformRecipe {
    /// Pad to a tall canvas, draw the overlay text, crop to the output ratio
    #[default]
    PadTextCrop,
    /// Trim and re-encode only
    Passthrough,
}

/// Publishing metadata of a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub tags: Vec<String>,
    pub category_code: String,
    pub title_template: String,
    #[serde(default)]
    pub description_template: String,
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_public() -> bool {
    true
}

/// A named processing and publishing profile matched by filename prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub id: String,
    pub filename_prefixes: Vec<String>,
    pub default_range: TrimRange,
    #[serde(default)]
    pub recipe: TransformRecipe,
    pub edit_options: EditOptions,
    pub upload: UploadMetadata,
    /// Overlay text drawn onto the clip
    pub text_template: String,
}

impl CategoryDescriptor {
    pub fn matches(&self, file_name: &str) -> bool {
        self.filename_prefixes
            .iter()
            .any(|prefix| file_name.starts_with(prefix.as_str()))
    }

    /// Check the descriptor can drive a transform
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |message: &str| DomainError::InvalidDescriptor {
            id: self.id.clone(),
            message: message.to_string(),
        };
        if self.id.is_empty() {
            return Err(invalid("category id is empty"));
        }
        if self.filename_prefixes.is_empty() || self.filename_prefixes.iter().any(String::is_empty) {
            return Err(invalid("filename prefixes must be non-empty"));
        }
        if self.default_range.start >= self.default_range.end {
            return Err(invalid("default range start must be less than end"));
        }
        let ratio = self.edit_options.output_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(invalid("output ratio must be a positive number"));
        }
        let o = &self.edit_options;
        if o.output_height == 0 {
            return Err(invalid("output height must be positive"));
        }
        let output_width = (o.output_height as f64 / ratio).round();
        let dimensions = [
            o.original_width,
            o.original_height,
            o.output_height,
            o.padding_x,
            o.padding_y,
            o.font_size,
        ];
        if dimensions.iter().any(|d| *d > MAX_DIMENSION) || output_width > MAX_DIMENSION as f64 {
            return Err(invalid(&format!("edit dimensions must not exceed {}", MAX_DIMENSION)));
        }
        Ok(())
    }
}

/// Output codec recipe selected by file extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub id: String,
    pub extensions: Vec<String>,
    pub video_codec: String,
    pub audio_codec: String,
}

impl FormatDescriptor {
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Codec flags appended to the transcoder arguments
    pub fn codec_args(&self) -> Vec<String> {
        vec![
            "-vcodec".to_string(),
            self.video_codec.clone(),
            "-acodec".to_string(),
            self.audio_codec.clone(),
        ]
    }
}

/// Everything persisted in the repository file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryState {
    pub next_id: u64,
    pub source_dir: PathBuf,
    pub staged_dir: PathBuf,
    pub edited_dir: PathBuf,
    pub credential_file: PathBuf,
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
}

impl RepositoryState {
    /// State written on first run, the operator fills in the placeholders
    pub fn template() -> Self {
        Self {
            next_id: INITIAL_NEXT_ID,
            source_dir: PathBuf::from(PLACEHOLDER),
            staged_dir: PathBuf::from(PLACEHOLDER),
            edited_dir: PathBuf::from(PLACEHOLDER),
            credential_file: PathBuf::from(PLACEHOLDER),
            videos: Vec::new(),
        }
    }

    /// Whether any path still holds the bootstrap placeholder
    pub fn has_placeholders(&self) -> bool {
        [
            &self.source_dir,
            &self.staged_dir,
            &self.edited_dir,
            &self.credential_file,
        ]
        .iter()
        .any(|p| p.as_os_str() == PLACEHOLDER)
    }

    pub fn find(&self, id: u64) -> Option<&VideoRecord> {
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut VideoRecord> {
        self.videos.iter_mut().find(|v| v.id == id)
    }

    pub fn knows_source(&self, file_name: &str) -> bool {
        self.videos.iter().any(|v| v.source_file_name == file_name)
    }

    pub fn source_path(&self, record: &VideoRecord) -> PathBuf {
        self.source_dir.join(&record.source_file_name)
    }

    pub fn staged_path(&self, record: &VideoRecord) -> PathBuf {
        self.staged_dir.join(record.working_file_name())
    }

    pub fn edited_path(&self, record: &VideoRecord) -> PathBuf {
        self.edited_dir.join(record.working_file_name())
    }
}
