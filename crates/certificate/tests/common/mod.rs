//! Shared fixtures for the certificate integration tests

#![allow(dead_code)]

use certificate::logging::RunLog;
use certificate::Config;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A one-page A4 landscape template with its own font under `/F1`
pub fn template_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Italic",
    });
    let contents_id = doc.add_object(Stream::new(
        dictionary! {},
        b"BT /F1 28 Tf 250 480 Td (Certificate of Achievement) Tj ET\n".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 842.into(), 595.into()],
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
        "Contents" => contents_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![page_id.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Working directory holding a template, a recipient list and an output dir
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new(recipients: &[u8]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("template.pdf"), template_pdf()).unwrap();
        std::fs::write(dir.path().join("recipients.csv"), recipients).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    pub fn config(&self) -> Config {
        Config {
            template_path: self.path().join("template.pdf"),
            output_dir: self.output_dir(),
            input_path: self.path().join("recipients.csv"),
            log_file: None,
            issuer: "Training Board".to_string(),
            ..Config::default()
        }
    }

    /// Sorted file names in the output directory
    pub fn outputs(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.output_dir()) {
            Ok(entries) => entries
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

/// [`RunLog`] that keeps every line in memory
#[derive(Default)]
pub struct MemoryLog {
    pub lines: RefCell<Vec<(&'static str, String)>>,
}

impl MemoryLog {
    pub fn count(&self, level: &str) -> usize {
        self.lines.borrow().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn contains(&self, level: &str, needle: &str) -> bool {
        self.lines
            .borrow()
            .iter()
            .any(|(l, message)| *l == level && message.contains(needle))
    }
}

impl RunLog for MemoryLog {
    fn info(&self, message: &str) {
        self.lines.borrow_mut().push(("INFO", message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.lines.borrow_mut().push(("WARN", message.to_string()));
    }

    fn error(&self, message: &str) {
        self.lines.borrow_mut().push(("ERROR", message.to_string()));
    }
}

pub fn first_page_id(doc: &Document) -> ObjectId {
    *doc.get_pages().get(&1).unwrap()
}

/// Decoded content of the first page of a written certificate
pub fn page_content(path: &Path) -> String {
    let doc = Document::load(path).unwrap();
    String::from_utf8_lossy(&doc.get_page_content(first_page_id(&doc)).unwrap()).into_owned()
}

/// Hex string operand for ASCII text, as drawn with `Tj`
pub fn hex(text: &str) -> String {
    let digits: String = text.bytes().map(|b| format!("{b:02X}")).collect();
    format!("<{digits}>")
}
