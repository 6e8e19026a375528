//! PDF Document wrapper

use crate::text::{encode_win_ansi_hex, generate_text_operators, TextRenderContext};
use crate::{Align, PdfError, Result, StandardFont};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Write;
use std::path::Path;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// PDF Document wrapper providing high-level operations
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Current font
    current_font: Option<StandardFont>,
    /// Current font size
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Font dictionaries added to the document (font -> PDF object ID)
    embedded_fonts: HashMap<StandardFont, ObjectId>,
    /// Page font resources (page number -> font -> resource name)
    page_font_resources: HashMap<usize, HashMap<StandardFont, String>>,
    /// Next font resource number
    next_font_resource: u32,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: BTreeMap<usize, Vec<u8>>,
}

impl PdfDocument {
    /// Open a PDF document from a file path
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::open("template.pdf")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_document(inner))
    }

    /// Open a PDF document from bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_document(inner))
    }

    fn from_document(inner: Document) -> Self {
        Self {
            inner,
            current_font: None,
            current_font_size: 12.0,
            current_text_color: Color::default(),
            embedded_fonts: HashMap::new(),
            page_font_resources: HashMap::new(),
            next_font_resource: 1,
            page_content_buffer: BTreeMap::new(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Set the current font and size
    pub fn set_font(&mut self, font: StandardFont, size: f32) {
        self.current_font = Some(font);
        self.current_font_size = size;
    }

    /// Set only the font size (keeps current font)
    pub fn set_font_size(&mut self, size: f32) -> Result<()> {
        if self.current_font.is_none() {
            return Err(PdfError::FontNotSet);
        }

        self.current_font_size = size;
        Ok(())
    }

    /// Set the text color
    ///
    /// # Example
    /// ```ignore
    /// doc.set_text_color(Color::rgb(0.5, 0.5, 0.5)); // Gray
    /// ```
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Get the current font's text width for a string, in points
    ///
    /// # Example
    /// ```ignore
    /// doc.set_font(StandardFont::Helvetica, 12.0);
    /// let width = doc.get_text_width("Hello")?;
    /// ```
    pub fn get_text_width(&self, text: &str) -> Result<f64> {
        let font = self.current_font.ok_or(PdfError::FontNotSet)?;
        Ok(font.text_width_points(text, self.current_font_size) as f64)
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points (from left)
    /// * `y` - Y coordinate of the baseline in points (from bottom)
    /// * `align` - How `x` relates to the rendered text
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        // Skip empty text - nothing to render
        if text.is_empty() {
            return Ok(());
        }

        let font = self.current_font.ok_or(PdfError::FontNotSet)?;
        let font_resource_name = self.get_or_create_font_ref(font, page)?;

        let ctx = TextRenderContext {
            font_name: font_resource_name,
            font_size: self.current_font_size,
            text_width: font.text_width_points(text, self.current_font_size) as f64,
            color: self.current_text_color,
        };

        let operators = generate_text_operators(&encode_win_ansi_hex(text), x, y, align, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;

        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Write font resources and buffered content into the page tree
    fn finalize(&mut self) -> Result<()> {
        self.finalize_page_font_resources()?;
        self.flush_content_buffers()
    }

    /// Get or create a font reference for a specific page
    ///
    /// Returns the resource name (e.g., "F1", "F2") for use in content streams.
    /// Names already used by the page's own resources are skipped.
    fn get_or_create_font_ref(&mut self, font: StandardFont, page: usize) -> Result<String> {
        if let Some(resource_name) = self
            .page_font_resources
            .get(&page)
            .and_then(|fonts| fonts.get(&font))
        {
            return Ok(resource_name.clone());
        }

        if !self.embedded_fonts.contains_key(&font) {
            let font_id = self.inner.add_object(font.to_pdf_dict());
            self.embedded_fonts.insert(font, font_id);
        }

        let taken = self.existing_font_resource_names(page)?;
        let resource_name = loop {
            let candidate = format!("F{}", self.next_font_resource);
            self.next_font_resource += 1;
            if !taken.contains(candidate.as_bytes()) {
                break candidate;
            }
        };

        self.page_font_resources
            .entry(page)
            .or_default()
            .insert(font, resource_name.clone());

        Ok(resource_name)
    }

    /// Font resource names already present in the template page
    fn existing_font_resource_names(&self, page: usize) -> Result<HashSet<Vec<u8>>> {
        let page_id = self.page_id(page)?;
        let resources = self.resolve_page_resources(page_id)?;

        let names = match resources.get(b"Font") {
            Ok(font) => self
                .resolve_dict(font)
                .map(|dict| dict.iter().map(|(name, _)| name.clone()).collect())
                .unwrap_or_default(),
            Err(_) => HashSet::new(),
        };

        Ok(names)
    }

    /// Add font references to page resources
    fn finalize_page_font_resources(&mut self) -> Result<()> {
        let page_resources: Vec<(usize, Vec<(StandardFont, String)>)> = self
            .page_font_resources
            .iter()
            .map(|(&page, fonts)| {
                let font_list: Vec<_> = fonts
                    .iter()
                    .map(|(font, resource_name)| (*font, resource_name.clone()))
                    .collect();
                (page, font_list)
            })
            .collect();

        for (page, fonts) in page_resources {
            if !fonts.is_empty() {
                self.add_fonts_to_page_resources(page, &fonts)?;
            }
        }

        Ok(())
    }

    /// Add multiple fonts to a page's Resources dictionary in a single operation
    ///
    /// Inherited or indirect Resources are copied onto the page first so the
    /// template's own resources stay reachable.
    fn add_fonts_to_page_resources(
        &mut self,
        page: usize,
        fonts: &[(StandardFont, String)],
    ) -> Result<()> {
        let page_id = self.page_id(page)?;
        let mut resources_dict = self.resolve_page_resources(page_id)?;

        let mut font_dict = match resources_dict.get(b"Font") {
            Ok(font) => self.resolve_dict(font).unwrap_or_default(),
            Err(_) => Dictionary::new(),
        };

        for (font, resource_name) in fonts {
            let font_ref = self
                .embedded_fonts
                .get(font)
                .ok_or_else(|| PdfError::SaveError(format!("{font:?} was never added")))?;
            font_dict.set(resource_name.as_bytes(), Object::Reference(*font_ref));
        }

        resources_dict.set(b"Font", Object::Dictionary(font_dict));

        let mut new_page_dict = self.page_dict(page_id)?.clone();
        new_page_dict.set(b"Resources", Object::Dictionary(resources_dict));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Get page size (width, height) in points
    ///
    /// Extracts the size from the MediaBox or CropBox, following the parent
    /// Pages chain when the box is inherited.
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let page_id = self.page_id(page)?;
        let media_box = self.get_inherited_media_box(page_id)?;

        if media_box.len() < 4 {
            return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
        }

        let coord = |index: usize| -> Result<f64> {
            let value = self.resolve(&media_box[index])?;
            value
                .as_f32()
                .map(|v| v as f64)
                .ok()
                .or_else(|| value.as_i64().ok().map(|v| v as f64))
                .ok_or_else(|| PdfError::ParseError(format!("Invalid MediaBox entry {index}")))
        };

        Ok((coord(2)? - coord(0)?, coord(3)? - coord(1)?))
    }

    /// Get MediaBox, following parent inheritance chain if needed
    fn get_inherited_media_box(&self, page_id: ObjectId) -> Result<Vec<Object>> {
        let mut current_id = page_id;

        // Follow parent chain up to 10 levels
        for _ in 0..10 {
            let dict = self.object_dict(current_id)?;

            if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
                let array = self.resolve(media_box)?.as_array().map_err(|_| {
                    PdfError::ParseError("MediaBox is not an array".to_string())
                })?;
                return Ok(array.clone());
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        // Fallback: assume A4 page size
        Ok(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(595.28), // A4 width
            Object::Real(841.89), // A4 height
        ])
    }

    /// Get the page's Resources dictionary, following parent inheritance and
    /// indirect references. Returns an empty dictionary if none is found.
    fn resolve_page_resources(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut current_id = page_id;

        for _ in 0..10 {
            let dict = self.object_dict(current_id)?;

            if let Ok(resources) = dict.get(b"Resources") {
                return Ok(self.resolve_dict(resources).unwrap_or_default());
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        Ok(Dictionary::new())
    }

    /// Resolve a possibly indirect object
    fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object> {
        match object {
            Object::Reference(id) => Ok(self.inner.get_object(*id)?),
            other => Ok(other),
        }
    }

    /// Resolve a possibly indirect dictionary into an owned copy
    fn resolve_dict(&self, object: &Object) -> Option<Dictionary> {
        self.resolve(object).ok()?.as_dict().ok().cloned()
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    fn object_dict(&self, id: ObjectId) -> Result<&Dictionary> {
        self.inner
            .get_object(id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))
    }

    fn page_dict(&self, page_id: ObjectId) -> Result<&Dictionary> {
        self.object_dict(page_id)
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush all buffered content to page streams
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers = std::mem::take(&mut self.page_content_buffer);

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }

        Ok(())
    }

    /// Append content to a page's content stream
    ///
    /// The existing streams are left untouched. They are bracketed by a `q`/`Q`
    /// pair so graphics state changes made by the template do not leak into the
    /// overlay, which is added as a new compressed stream at the end of
    /// `Contents`.
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self.page_id(page)?;
        let page_dict = self.page_dict(page_id)?.clone();

        let mut existing = match page_dict.get(b"Contents") {
            Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
            Ok(Object::Array(arr)) => arr.clone(),
            Ok(Object::Stream(stream)) => {
                let id = self.inner.add_object(stream.clone());
                vec![Object::Reference(id)]
            }
            _ => Vec::new(),
        };

        let mut overlay = Vec::with_capacity(content.len() + 3);
        let mut contents = Vec::with_capacity(existing.len() + 2);
        if !existing.is_empty() {
            let save_state = Stream::new(Dictionary::new(), b"q\n".to_vec());
            contents.push(Object::Reference(self.inner.add_object(save_state)));
            contents.append(&mut existing);
            overlay.extend_from_slice(b"\nQ\n");
        }
        overlay.extend_from_slice(content);

        let overlay_id = self.inner.add_object(compressed_stream(&overlay)?);
        contents.push(Object::Reference(overlay_id));

        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Contents", Object::Array(contents));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }
}

/// Build a FlateDecode stream from raw content
fn compressed_stream(content: &[u8]) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content)?;
    let compressed = encoder.finish()?;

    Ok(Stream::new(
        dictionary! { "Filter" => "FlateDecode" },
        compressed,
    ))
}
