//! Transcoder argument synthesis
//!
//! Turns a category descriptor and a record into the ffmpeg argument vector
//! for one edit. Everything here is pure: the same inputs always give the same
//! arguments.

use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::domain::template;
use crate::utils::time::format_trim_offset;

/// Horizontal inset of the overlay text from the crop edge
const TEXT_INSET_X: u32 = 16;
/// Gap between the bottom of the source frame and the overlay text
const TEXT_GAP_Y: u32 = 8;
/// Line spacing for multi-line overlay text
const TEXT_LINE_SPACING: i32 = -10;

/// Canvas geometry of the pad/text/crop chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub output_width: u32,
    pub pad_width: u32,
    pub pad_height: u32,
    pub crop_width: u32,
    pub crop_height: u32,
    pub crop_x: u32,
    pub crop_y: u32,
    pub text_x: u32,
    pub text_y: u32,
}

impl Geometry {
    pub fn compute(options: &EditOptions) -> Self {
        let output_width = (options.output_height as f64 / options.output_ratio).round() as u32;
        let pad_width = options.original_width.max(output_width);
        // Height is derived from the original *width*; this keeps the output
        // shape of the clips published so far.
        let pad_height = options.original_width.max(options.output_height);
        let crop_x = (pad_width - output_width) / 2;
        Self {
            output_width,
            pad_width,
            pad_height,
            crop_width: output_width,
            crop_height: options.output_height,
            crop_x,
            crop_y: 0,
            text_x: crop_x + TEXT_INSET_X,
            text_y: options.padding_y + options.original_height + TEXT_GAP_Y,
        }
    }
}

/// Inputs of one synthesis
#[derive(Debug, Clone)]
pub struct TransformInput<'a> {
    pub category: &'a CategoryDescriptor,
    pub format: &'a FormatDescriptor,
    pub record: &'a VideoRecord,
    pub range_override: Option<TrimRange>,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl TransformInput<'_> {
    /// Per-record override, else the category default
    pub fn effective_range(&self) -> TrimRange {
        self.range_override.unwrap_or(self.category.default_range)
    }
}

/// Build the full argument vector; errors never yield a partial list
pub fn synthesize(input: &TransformInput<'_>) -> Result<Vec<String>, DomainError> {
    let filters = filter_chain(input.category, input.record)?;
    let range = input.effective_range();

    let mut args = vec![
        "-i".to_string(),
        path_arg(&input.input),
        "-y".to_string(),
        "-ss".to_string(),
        format_trim_offset(range.start),
        "-to".to_string(),
        format_trim_offset(range.end),
    ];
    if !filters.is_empty() {
        args.push("-vf".to_string());
        args.push(filters.join(","));
    }
    args.extend(input.format.codec_args());
    args.push(path_arg(&input.output));
    Ok(args)
}

/// Video filters of the category recipe, in application order
pub fn filter_chain(
    category: &CategoryDescriptor,
    record: &VideoRecord,
) -> Result<Vec<String>, DomainError> {
    match category.recipe {
        TransformRecipe::Passthrough => Ok(Vec::new()),
        TransformRecipe::PadTextCrop => {
            let o = &category.edit_options;
            let g = Geometry::compute(o);
            let text = template::render(&category.text_template, record)?;
            Ok(vec![
                format!(
                    "pad={}:{}:{}:{}:{}",
                    g.pad_width, g.pad_height, o.padding_x, o.padding_y, o.padding_color
                ),
                format!(
                    "drawtext=fontfile='{}':text='{}':fontcolor='{}':fontsize={}:x={}:y={}:line_spacing={}",
                    o.font_file, text, o.font_color, o.font_size, g.text_x, g.text_y, TEXT_LINE_SPACING
                ),
                format!(
                    "crop={}:{}:{}:{}",
                    g.crop_width, g.crop_height, g.crop_x, g.crop_y
                ),
            ])
        }
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::{CategoryRegistry, FormatRegistry};
    use chrono::{TimeZone, Utc};

    fn record() -> VideoRecord {
        VideoRecord {
            id: 1000,
            source_file_name: "League of Legends Game1.mp4".to_string(),
            source_created_at: Utc.with_ymd_and_hms(2024, 4, 18, 9, 30, 0).unwrap(),
            extension: "mp4".to_string(),
            category_id: "lol".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 4, 18, 10, 0, 0).unwrap(),
            edited_at: None,
            uploaded_at: None,
            url: None,
            range: None,
        }
    }

    fn lol() -> CategoryDescriptor {
        CategoryRegistry::builtin().by_id("lol").unwrap().clone()
    }

    fn mp4() -> FormatDescriptor {
        FormatRegistry::builtin().formats()[0].clone()
    }

    #[test]
    fn geometry_for_vertical_shorts() {
        let mut options = lol().edit_options;
        options.output_ratio = 1.7778;
        let g = Geometry::compute(&options);
        assert_eq!(g.output_width, 1080);
        assert_eq!(g.pad_width, 1920);
        assert_eq!(g.pad_height, 1920);
        assert_eq!(g.crop_x, 420);
        assert_eq!(g.crop_y, 0);
        assert_eq!((g.crop_width, g.crop_height), (1080, 1920));
        assert_eq!(g.text_x, 436);
        assert_eq!(g.text_y, 200 + 1080 + 8);
    }

    #[test]
    fn pad_height_uses_original_width() {
        let mut options = lol().edit_options;
        options.original_width = 2560;
        options.original_height = 1440;
        let g = Geometry::compute(&options);
        assert_eq!(g.pad_height, 2560);
        assert_eq!(g.pad_width, 2560);
        assert_eq!(g.crop_x, (2560 - 1080) / 2);
    }

    #[test]
    fn crop_offset_truncates() {
        let mut options = lol().edit_options;
        options.original_width = 1921;
        assert_eq!(Geometry::compute(&options).crop_x, 420);
    }

    #[test]
    fn full_argument_vector() {
        let category = lol();
        let format = mp4();
        let video = record();
        let input = TransformInput {
            category: &category,
            format: &format,
            record: &video,
            range_override: None,
            input: PathBuf::from("staged/1000.mp4"),
            output: PathBuf::from("edited/1000.mp4"),
        };
        let args = synthesize(&input).unwrap();
        assert_eq!(
            args,
            vec![
                "-i",
                "staged/1000.mp4",
                "-y",
                "-ss",
                "00:00:14",
                "-to",
                "00:00:29",
                "-vf",
                "pad=1920:1920:0:200:black,\
                 drawtext=fontfile='C\\:/Windows/Fonts/arial.ttf':text='1000':fontcolor='white':fontsize=48:x=436:y=1288:line_spacing=-10,\
                 crop=1080:1920:420:0",
                "-vcodec",
                "libx264",
                "-acodec",
                "copy",
                "edited/1000.mp4",
            ]
        );
    }

    #[test]
    fn synthesis_is_deterministic() {
        let category = lol();
        let format = mp4();
        let video = record();
        let input = TransformInput {
            category: &category,
            format: &format,
            record: &video,
            range_override: Some(TrimRange { start: 3, end: 75 }),
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.mp4"),
        };
        assert_eq!(synthesize(&input).unwrap(), synthesize(&input).unwrap());
    }

    #[test]
    fn range_override_replaces_default() {
        let category = lol();
        let format = mp4();
        let video = record();
        let input = TransformInput {
            category: &category,
            format: &format,
            record: &video,
            range_override: Some(TrimRange { start: 5, end: 75 }),
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.mp4"),
        };
        let args = synthesize(&input).unwrap();
        assert_eq!(&args[3..7], &["-ss", "00:00:05", "-to", "00:01:15"]);
    }

    #[test]
    fn passthrough_has_no_filters() {
        let mut category = lol();
        category.recipe = TransformRecipe::Passthrough;
        let format = mp4();
        let video = record();
        let input = TransformInput {
            category: &category,
            format: &format,
            record: &video,
            range_override: None,
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.mp4"),
        };
        let args = synthesize(&input).unwrap();
        assert!(!args.contains(&"-vf".to_string()));
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn template_failure_returns_no_arguments() {
        let mut category = lol();
        category.text_template = "{{.Nope}}".to_string();
        let format = mp4();
        let video = record();
        let input = TransformInput {
            category: &category,
            format: &format,
            record: &video,
            range_override: None,
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.mp4"),
        };
        assert!(matches!(synthesize(&input), Err(DomainError::Template { .. })));
    }
}
