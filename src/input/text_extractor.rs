//! Text extraction from document bytes, one extractor per format

use crate::error::{CareerMatcherError, Result};
use crate::input::file_detector::FileType;
use pulldown_cmark::{html, Parser};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            CareerMatcherError::CorruptDocument(format!("Failed to extract text from PDF: {}", e))
        })
    }
}

/// Paragraph text of a Word document, one line per `w:p`
pub struct DocxExtractor;

const DOCX_DOCUMENT_PART: &str = "word/document.xml";

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            CareerMatcherError::CorruptDocument(format!("Failed to open DOCX archive: {}", e))
        })?;

        let mut xml = String::new();
        archive
            .by_name(DOCX_DOCUMENT_PART)
            .map_err(|e| {
                CareerMatcherError::CorruptDocument(format!("DOCX has no {}: {}", DOCX_DOCUMENT_PART, e))
            })?
            .read_to_string(&mut xml)?;

        self.paragraph_text(&xml)
    }
}

impl DocxExtractor {
    fn paragraph_text(&self, xml: &str) -> Result<String> {
        let corrupt = |e: quick_xml::Error| {
            CareerMatcherError::CorruptDocument(format!("Malformed DOCX document XML: {}", e))
        };

        let mut reader = Reader::from_str(xml);
        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut in_text_run = false;

        loop {
            match reader.read_event().map_err(corrupt)? {
                Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
                Event::End(e) => match e.name().as_ref() {
                    b"w:t" => in_text_run = false,
                    b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                    _ => {}
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"w:tab" => current.push('\t'),
                    b"w:br" => current.push('\n'),
                    b"w:p" => paragraphs.push(String::new()),
                    _ => {}
                },
                Event::Text(t) if in_text_run => current.push_str(&t.unescape().map_err(corrupt)?),
                Event::Eof => break,
                _ => {}
            }
        }
        if !current.is_empty() {
            paragraphs.push(current);
        }

        Ok(paragraphs.join("\n"))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = String::from_utf8_lossy(bytes);

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        self.html_to_text(&html_output)
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> Result<String> {
        let text = html
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n");

        let tags = Regex::new(r"<[^>]*>")
            .map_err(|e| CareerMatcherError::Processing(format!("Invalid tag pattern: {}", e)))?;
        let clean_text = tags
            .replace_all(&text, "")
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        let lines: Vec<&str> = clean_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

/// Dispatch to the extractor for `file_type`
pub fn extract_text(file_type: FileType, bytes: &[u8]) -> Result<String> {
    match file_type {
        FileType::Pdf => PdfExtractor.extract(bytes),
        FileType::Docx => DocxExtractor.extract(bytes),
        FileType::PlainText => PlainTextExtractor.extract(bytes),
        FileType::Markdown => MarkdownExtractor.extract(bytes),
        FileType::Unknown => Err(CareerMatcherError::UnsupportedFormat(
            "unrecognised document type".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_lossy_utf8() {
        let text = PlainTextExtractor.extract(b"Python \xffSQL").unwrap();
        assert!(text.starts_with("Python "));
        assert!(text.ends_with("SQL"));
    }

    #[test]
    fn test_markdown_is_stripped() {
        let md = b"# Jane Roe\n\n**Skills:** Python & SQL\n\n- Machine Learning\n- Leadership\n";
        let text = MarkdownExtractor.extract(md).unwrap();

        assert!(text.contains("Jane Roe"));
        assert!(text.contains("Skills: Python & SQL"));
        assert!(text.contains("Machine Learning"));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_corrupt_pdf_is_reported() {
        let result = extract_text(FileType::Pdf, b"definitely not a pdf");
        assert!(matches!(result, Err(CareerMatcherError::CorruptDocument(_))));
    }

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(DOCX_DOCUMENT_PART, SimpleFileOptions::default()).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs_are_extracted() {
        let bytes = docx_bytes(&["Jane Roe", "Python SQL Machine Learning", "R &amp; D"]);
        let text = extract_text(FileType::Docx, &bytes).unwrap();

        assert_eq!(text, "Jane Roe\nPython SQL Machine Learning\nR & D");
    }

    #[test]
    fn test_docx_runs_join_within_a_paragraph() {
        let xml = r#"<w:document xmlns:w="x"><w:body>
            <w:p><w:r><w:t>Data </w:t></w:r><w:r><w:t>Visualization</w:t></w:r></w:p>
            <w:p/>
            <w:p><w:r><w:t>Figma</w:t><w:tab/><w:t>Agile</w:t></w:r></w:p>
            </w:body></w:document>"#;

        let text = DocxExtractor.paragraph_text(xml).unwrap();
        assert_eq!(text, "Data Visualization\n\nFigma\tAgile");
    }

    #[test]
    fn test_bad_docx_is_corrupt() {
        assert!(matches!(
            extract_text(FileType::Docx, b"PK\x03\x04 not really a zip"),
            Err(CareerMatcherError::CorruptDocument(_))
        ));
    }

    #[test]
    fn test_unknown_format_is_unsupported() {
        assert!(matches!(
            extract_text(FileType::Unknown, b""),
            Err(CareerMatcherError::UnsupportedFormat(_))
        ));
    }
}
