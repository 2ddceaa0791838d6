//! File type detection

use std::path::Path;

/// Document formats recognised at the input boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    PlainText,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "txt" | "text" => FileType::PlainText,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// Resolve a declared MIME type; parameters such as `; charset=utf-8` are ignored
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or_default().trim().to_lowercase();
        match essence.as_str() {
            "application/pdf" => FileType::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => FileType::Docx,
            "text/plain" => FileType::PlainText,
            "text/markdown" | "text/x-markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileType::Pdf => "PDF",
            FileType::Docx => "DOCX",
            FileType::PlainText => "plain text",
            FileType::Markdown => "Markdown",
            FileType::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("docx"), FileType::Docx);
        assert_eq!(FileType::from_extension("md"), FileType::Markdown);
        assert_eq!(FileType::from_extension("xyz"), FileType::Unknown);
    }

    #[test]
    fn test_from_mime() {
        assert_eq!(FileType::from_mime("application/pdf"), FileType::Pdf);
        assert_eq!(FileType::from_mime("text/plain; charset=utf-8"), FileType::PlainText);
        assert_eq!(
            FileType::from_mime("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            FileType::Docx
        );
        assert_eq!(FileType::from_mime("image/png"), FileType::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(FileType::from_path(Path::new("cv.Md")), FileType::Markdown);
        assert_eq!(FileType::from_path(Path::new("README")), FileType::Unknown);
    }
}
