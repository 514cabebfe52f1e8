//! Session note types

/// Image attached to a session note
#[derive(Clone, PartialEq, Eq)]
pub struct NoteImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl NoteImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self { file_name: file_name.into(), content_type: content_type.into(), bytes }
    }
}

// Image payloads can be megabytes; keep them out of logs.
impl std::fmt::Debug for NoteImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Free-form annotation attached when a session is stopped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub content: String,
    pub image: Option<NoteImage>,
}

impl NoteForm {
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_omits_image_bytes() {
        let image = NoteImage::new("wip.png", "image/png", vec![0u8; 4096]);
        let rendered = format!("{image:?}");
        assert!(rendered.contains("len: 4096"));
        assert!(!rendered.contains("0, 0, 0"));
    }

    #[test]
    fn whitespace_note_is_empty() {
        assert!(NoteForm { content: "  \n".into(), image: None }.is_empty());
        let with_image =
            NoteForm { content: String::new(), image: Some(NoteImage::new("a", "b", vec![])) };
        assert!(!with_image.is_empty());
    }
}
