use serde::{Deserialize, Serialize};

/// Access scope of a source code record.
///
/// Stored as plain text in the database. Not enforced as an access-control
/// mechanism here; the listing views decide what to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    /// Parses a form value. Anything other than "private" (including an
    /// empty or absent value) falls back to public.
    pub fn parse_or_default(value: &str) -> Visibility {
        match value.trim() {
            "private" => Visibility::Private,
            _ => Visibility::Public,
        }
    }
}

/// A single source code submission as stored in the `source_codes` table.
///
/// `code_content` is kept verbatim, never escaped; it is displayed inside a
/// code block and the rendering layer escapes it on output. All other text
/// fields are escaped on intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCode {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub language: String,
    pub category_id: i64,
    pub code_content: String,
    /// Root-relative storage reference (`/uploads/<name>`), if a file is
    /// attached. Never an absolute filesystem path.
    pub file_path: Option<String>,
    pub visibility: Visibility,
    pub tags: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A source code record joined with its submitter's username, as returned
/// by the public detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCodeDetail {
    #[serde(flatten)]
    pub code: SourceCode,
    pub username: String,
}
