//! Field substitution for titles and overlay text.
//!
//! Templates insert record fields at `{{.Field}}` placeholders, e.g.
//! `"{{.Id}} #leagueoflegends"` renders to `"1000 #leagueoflegends"`.
//! Field names are the record's fields in PascalCase; anything else is an
//! error rather than an empty string.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::errors::DomainError;
use crate::domain::model::VideoRecord;

/// Render `template` against `record`
pub fn render(template: &str, record: &VideoRecord) -> Result<String, DomainError> {
    let fail = |message: String| DomainError::Template {
        template: template.to_string(),
        message,
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after
            .find("}}")
            .ok_or_else(|| fail(format!("unclosed placeholder at byte {}", template.len() - rest.len() + open)))?;
        let name = after[..close].trim();
        let field = name
            .strip_prefix('.')
            .ok_or_else(|| fail(format!("placeholder {:?} must start with '.'", name)))?;
        out.push_str(&field_value(field, record).ok_or_else(|| fail(format!("unknown field {:?}", field)))?);
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn field_value(field: &str, record: &VideoRecord) -> Option<String> {
    let value = match field {
        "Id" => record.id.to_string(),
        "SourceFileName" => record.source_file_name.clone(),
        "SourceCreatedAt" => timestamp(Some(record.source_created_at)),
        "Extension" => record.extension.clone(),
        "CategoryId" => record.category_id.clone(),
        "CreatedAt" => timestamp(Some(record.created_at)),
        "EditedAt" => timestamp(record.edited_at),
        "UploadedAt" => timestamp(record.uploaded_at),
        "Url" => record.url.clone().unwrap_or_default(),
        _ => return None,
    };
    Some(value)
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}
