use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(BoardMemberId);
id_newtype!(EventId);
id_newtype!(QuickItemId);
id_newtype!(ProjectId);

/// Thumbnail stored for gallery items created without one.
pub const DEFAULT_THUMBNAIL_URL: &str = "https://placehold.co/600x400?text=Rotaract";

/// Maximum number of letters kept in a board member's display initial.
pub const MAX_INITIAL_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Classifies a MIME type by its top-level family.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if mime_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// Gallery section a quick item is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickSection {
    Dances,
    Fun,
    Talent,
    Articles,
}

impl QuickSection {
    /// Display order used by the public gallery.
    pub const ALL: [QuickSection; 4] = [
        QuickSection::Dances,
        QuickSection::Fun,
        QuickSection::Talent,
        QuickSection::Articles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuickSection::Dances => "dances",
            QuickSection::Fun => "fun",
            QuickSection::Talent => "talent",
            QuickSection::Articles => "articles",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "dances" => Some(QuickSection::Dances),
            "fun" => Some(QuickSection::Fun),
            "talent" => Some(QuickSection::Talent),
            "articles" => Some(QuickSection::Articles),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuickSection::Dances => "Dances",
            QuickSection::Fun => "Fun Moments",
            QuickSection::Talent => "Talent",
            QuickSection::Articles => "Articles",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BoardMemberId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub initial: String,
    #[serde(default)]
    pub sequence: i64,
    #[serde(default, rename = "linkedIn", skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Uppercases, drops anything that is not an ASCII letter and keeps at most
/// [`MAX_INITIAL_LEN`] letters.
pub fn normalize_initial(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .take(MAX_INITIAL_LEN)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

/// Blank or missing thumbnails fall back to [`DEFAULT_THUMBNAIL_URL`].
pub fn resolve_thumbnail(thumbnail_url: Option<&str>) -> String {
    match thumbnail_url.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_THUMBNAIL_URL.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickItem {
    pub id: QuickItemId,
    pub section: QuickSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub media_type: MediaKind,
    pub media_url: String,
    pub thumbnail_url: String,
    pub sequence: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    #[serde(rename = "project_title")]
    pub title: String,
    #[serde(rename = "project_description")]
    pub description: String,
    #[serde(rename = "project_detail_description")]
    pub detail_description: String,
    #[serde(rename = "project_images", default)]
    pub images: Vec<ProjectImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroContent {
    #[serde(default)]
    pub background_image: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cta_text: String,
}
