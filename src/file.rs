use std::fmt;

/// How `fetch_file` extracts and decodes a downloaded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    /// Decoded to a string using the requested text encoding
    Text,
    Image,
    Video,
    Audio,
    /// Any other tag, or none; handed back as an object URL
    #[default]
    Other,
}

impl FileType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "text" => FileType::Text,
            "image" => FileType::Image,
            "video" => FileType::Video,
            "audio" => FileType::Audio,
            _ => FileType::Other,
        }
    }

    /// Media resources are read as raw byte buffers rather than blobs
    pub fn is_media(self) -> bool {
        matches!(self, FileType::Video | FileType::Audio)
    }

    /// Wildcard MIME type given to media blobs (`video/*`, `audio/*`)
    pub fn media_mime(self) -> Option<String> {
        self.is_media().then(|| format!("{}/*", self))
    }
}

impl From<&str> for FileType {
    fn from(tag: &str) -> Self {
        FileType::from_tag(tag)
    }
}

impl From<Option<&str>> for FileType {
    fn from(tag: Option<&str>) -> Self {
        tag.map(FileType::from_tag).unwrap_or_default()
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileType::Text => "text",
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Other => "other",
        })
    }
}
