//! Multipart form intake for source code submissions.
//!
//! The submit and edit forms post `multipart/form-data`; this module drains
//! the stream into a `SubmissionForm` of raw field values plus the optional
//! upload, then validates and normalizes those values. Text fields are
//! trimmed and HTML-escaped here so stored values are safe to render;
//! `code_content` is the one deliberate exception, kept verbatim because it
//! is displayed inside a code block and escaped by the renderer instead.

use actix_multipart::Multipart;
use futures_util::StreamExt;

use common::model::source_code::Visibility;

use crate::error::ServiceError;
use crate::repository::SourceCodeInput;
use crate::storage::{StorageError, Upload, MAX_UPLOAD_BYTES};

/// Raw form fields as received from the client, before validation.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub language: String,
    pub category_id: String,
    pub code_content: String,
    pub visibility: String,
    pub tags: String,
    pub remove_file: bool,
    pub upload: Option<Upload>,
}

/// Drains a multipart payload into a `SubmissionForm`.
///
/// A stream failure while the file part is being received surfaces as
/// `UploadIncomplete`; a file input left empty by the client (no filename,
/// no bytes) is treated as "no upload" rather than an error.
pub async fn parse(mut payload: Multipart) -> Result<SubmissionForm, ServiceError> {
    let mut form = SubmissionForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            ServiceError::Validation(format!("Malformed form submission: {}", e))
        })?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some("file_upload") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();

                let mut bytes: Vec<u8> = Vec::new();
                let mut size: u64 = 0;
                while let Some(chunk) = field.next().await {
                    let chunk =
                        chunk.map_err(|e| StorageError::UploadIncomplete(e.to_string()))?;
                    size += chunk.len() as u64;
                    // Keep at most one byte past the limit; oversized uploads
                    // are rejected on size, so the rest need not be buffered.
                    let room = (MAX_UPLOAD_BYTES as usize + 1).saturating_sub(bytes.len());
                    bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
                }

                if !filename.is_empty() || size > 0 {
                    form.upload = Some(Upload {
                        original_name: filename,
                        bytes,
                        size,
                    });
                }
            }

            Some(other) => {
                let mut buf = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| {
                        ServiceError::Validation(format!("Malformed form submission: {}", e))
                    })?;
                    buf.extend_from_slice(&chunk);
                }
                let value = String::from_utf8(buf).map_err(|_| {
                    ServiceError::Validation("Form fields must be valid UTF-8.".to_string())
                })?;

                match other {
                    "id" => form.id = value,
                    "title" => form.title = value,
                    "description" => form.description = value,
                    "language" => form.language = value,
                    "category_id" => form.category_id = value,
                    "code_content" => form.code_content = value,
                    "visibility" => form.visibility = value,
                    "tags" => form.tags = value,
                    "remove_file" => form.remove_file = value.trim() == "1",
                    _ => {}
                }
            }

            None => {}
        }
    }

    Ok(form)
}

/// Field values after validation and normalization, ready for persistence
/// once a file disposition is attached.
#[derive(Debug, Clone)]
pub struct ValidatedFields {
    pub title: String,
    pub description: String,
    pub language: String,
    pub category_id: i64,
    pub code_content: String,
    pub visibility: Visibility,
    pub tags: String,
}

impl ValidatedFields {
    pub fn into_input(self, file_path: Option<String>) -> SourceCodeInput {
        SourceCodeInput {
            title: self.title,
            description: self.description,
            language: self.language,
            category_id: self.category_id,
            code_content: self.code_content,
            file_path,
            visibility: self.visibility,
            tags: self.tags,
        }
    }
}

/// Checks the required fields and normalizes the rest. Visibility defaults
/// to public and tags to empty when unspecified.
pub fn validate_fields(form: &SubmissionForm) -> Result<ValidatedFields, ServiceError> {
    if form.title.trim().is_empty()
        || form.language.trim().is_empty()
        || form.category_id.trim().is_empty()
        || form.code_content.trim().is_empty()
    {
        return Err(ServiceError::Validation(
            "Please fill in all required fields.".to_string(),
        ));
    }

    let category_id = form
        .category_id
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|c| *c > 0)
        .ok_or_else(|| ServiceError::Validation("Invalid category.".to_string()))?;

    Ok(ValidatedFields {
        title: escape_html(form.title.trim()),
        description: escape_html(form.description.trim()),
        language: escape_html(form.language.trim()),
        category_id,
        code_content: form.code_content.clone(),
        visibility: Visibility::parse_or_default(&form.visibility),
        tags: escape_html(form.tags.trim()),
    })
}

/// Parses a record id from its raw form value; anything non-numeric or
/// non-positive is rejected.
pub fn parse_id(raw: &str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ServiceError::InvalidId)
}

/// HTML-escapes `&`, `<`, `>`, `"` and `'`, matching what the rendering
/// layer expects of stored text fields.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
