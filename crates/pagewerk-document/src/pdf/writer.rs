// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — assemble a sequence of images into a multi-page PDF using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. `ImageDocument` keeps the op lists open so pages can
// be appended one image at a time and only builds the `PdfPage`s on save.

use std::path::Path;

use pagewerk_core::PdfOptions;
use pagewerk_core::error::{PagewerkError, Result};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::data_url::DataUrl;
use crate::source::ImageSource;

/// Resolution at which image pixels are mapped to points before scaling.
const EMBED_DPI: f32 = 150.0;

/// Format every page image is declared as when handed to the PDF layer.
/// Pixel data is still decoded by content, so other formats embed correctly.
const EMBED_FORMAT_HINT: &str = "image/jpeg";

/// Where one image landed on a page. Coordinates are millimetres measured
/// from the top-left corner of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    /// Name of the source the image was read from.
    pub source: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    /// Intrinsic pixel size of the embedded image.
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Layout record of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub images: Vec<PlacedImage>,
}

/// A decoded image ready to be embedded.
pub struct EmbeddedImage {
    raw: RawImage,
    width: u32,
    height: u32,
}

impl EmbeddedImage {
    /// Decode a data URL's payload into RGB8 pixels for printpdf.
    pub fn decode(data_url: &DataUrl) -> Result<Self> {
        if data_url.mime_type() != EMBED_FORMAT_HINT {
            debug!(
                mime_type = data_url.mime_type(),
                "Embedding non-JPEG source; decoding by content"
            );
        }

        let dynamic_image = ::image::load_from_memory(data_url.bytes()).map_err(|err| {
            PagewerkError::ImageError(format!("failed to decode image for PDF: {}", err))
        })?;

        let width = dynamic_image.width();
        let height = dynamic_image.height();
        let rgb_image = dynamic_image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        Ok(Self { raw, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// An append-only, in-memory PDF made of image pages.
///
/// A fresh document starts with one blank page, which the first placed image
/// uses. Call [`ImageDocument::add_page`] before placing each later image.
pub struct ImageDocument {
    doc: PdfDocument,
    page_w: Mm,
    page_h: Mm,
    /// Pending content stream of each page.
    page_ops: Vec<Vec<Op>>,
    layouts: Vec<PageLayout>,
}

impl ImageDocument {
    /// Create a document with a single blank page sized from `options`.
    pub fn new(options: &PdfOptions) -> Self {
        let (w_mm, h_mm) = options.page_dimensions_mm();
        let title = options.title.as_deref().unwrap_or("Pagewerk Images");
        info!(
            paper = ?options.page_size,
            orientation = ?options.orientation,
            title,
            "Creating image PDF"
        );
        Self {
            doc: PdfDocument::new(title),
            page_w: Mm(w_mm),
            page_h: Mm(h_mm),
            page_ops: vec![Vec::new()],
            layouts: vec![PageLayout::default()],
        }
    }

    /// Page width and height in millimetres.
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        (self.page_w.0, self.page_h.0)
    }

    pub fn page_count(&self) -> usize {
        self.layouts.len()
    }

    /// Layout of every page, in page order.
    pub fn pages(&self) -> &[PageLayout] {
        &self.layouts
    }

    /// Append a blank page; subsequent placements go onto it.
    pub fn add_page(&mut self) {
        self.page_ops.push(Vec::new());
        self.layouts.push(PageLayout::default());
    }

    /// Decode `data_url` and place it on the current (last) page.
    ///
    /// `(x_mm, y_mm)` is the image's top-left corner. With `height_mm` of
    /// `None` the height follows from the image's aspect ratio.
    pub fn place_image(
        &mut self,
        data_url: &DataUrl,
        source: &str,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: Option<f32>,
    ) -> Result<&PlacedImage> {
        let image = EmbeddedImage::decode(data_url)?;
        Ok(self.place_embedded(image, source, x_mm, y_mm, width_mm, height_mm))
    }

    /// Place an already decoded image on the current (last) page.
    pub fn place_embedded(
        &mut self,
        image: EmbeddedImage,
        source: &str,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: Option<f32>,
    ) -> &PlacedImage {
        let height_mm = height_mm
            .filter(|h| *h > 0.0)
            .unwrap_or_else(|| width_mm * image.height as f32 / image.width.max(1) as f32);

        // Image native size in points at the embed resolution.
        let native_w_pt = image.width as f32 / EMBED_DPI * 72.0;
        let native_h_pt = image.height as f32 / EMBED_DPI * 72.0;
        let target_w_pt = Mm(width_mm).into_pt().0;
        let target_h_pt = Mm(height_mm).into_pt().0;

        // PDF user space grows upwards from the bottom-left corner.
        let x_pt = Mm(x_mm).into_pt().0;
        let y_pt = Mm(self.page_h.0 - y_mm - height_mm).into_pt().0;

        let xobject_id = self.doc.add_image(&image.raw);
        let op = Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_pt)),
                translate_y: Some(Pt(y_pt)),
                scale_x: Some(target_w_pt / native_w_pt.max(f32::EPSILON)),
                scale_y: Some(target_h_pt / native_h_pt.max(f32::EPSILON)),
                dpi: Some(EMBED_DPI),
                rotate: None,
            },
        };

        let placed = PlacedImage {
            source: source.to_string(),
            x_mm,
            y_mm,
            width_mm,
            height_mm,
            pixel_width: image.width,
            pixel_height: image.height,
        };
        debug!(
            page = self.layouts.len(),
            x_mm, y_mm, width_mm, height_mm, "Image placed on page"
        );

        // Both vectors always hold at least the initial page.
        let last = self.layouts.len() - 1;
        self.page_ops[last].push(op);
        let layout = &mut self.layouts[last];
        layout.images.push(placed);
        &layout.images[layout.images.len() - 1]
    }

    // -- Output ---------------------------------------------------------------

    /// Serialize the document.
    pub fn into_bytes(mut self) -> Vec<u8> {
        let (page_w, page_h) = (self.page_w, self.page_h);
        let pages: Vec<PdfPage> = self
            .page_ops
            .drain(..)
            .map(|ops| PdfPage::new(page_w, page_h, ops))
            .collect();
        self.doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "PDF serialisation produced warnings");
        }
        debug!(bytes = output.len(), "PDF serialised");
        output
    }

    /// Serialize the document and write it to a file.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.into_bytes();
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote image PDF to {}", path.as_ref().display());
        Ok(())
    }
}

/// Assemble `sources` into a PDF, one page per image, in input order.
///
/// Each image is read as a data URL, placed at `(margin, margin)` with the
/// full usable page width (`page width - 2 * margin`) and a height that keeps
/// its aspect ratio. Images are processed strictly one after another; the
/// first failure aborts the assembly and the partial document is dropped.
#[instrument(skip_all, fields(margin = options.margin))]
pub async fn images_to_pdf<'a, S, I>(sources: I, options: &PdfOptions) -> Result<ImageDocument>
where
    S: ImageSource + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut document = ImageDocument::new(options);
    let (page_w, _) = document.page_dimensions_mm();
    let usable_w = (page_w - 2.0 * options.margin).max(0.0);

    for (index, source) in sources.into_iter().enumerate() {
        let data_url = DataUrl::read_from(source).await?;

        if index != 0 {
            document.add_page();
        }

        let image = tokio::task::spawn_blocking(move || EmbeddedImage::decode(&data_url))
            .await
            .map_err(|err| {
                PagewerkError::Task(format!("decode of {} did not complete: {}", source.name(), err))
            })??;

        document.place_embedded(
            image,
            source.name(),
            options.margin,
            options.margin,
            usable_w,
            None,
        );
    }

    info!(pages = document.page_count(), "Image PDF assembled");
    Ok(document)
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use crate::source::ImageFile;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use pagewerk_core::{Orientation, PaperSize};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 30, 30])));
        let mut buffer = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buffer), format)
            .expect("encode fixture");
        buffer
    }

    fn jpeg(width: u32, height: u32) -> ImageFile {
        ImageFile::new(format!("{width}x{height}.jpg"), encoded(width, height, ImageFormat::Jpeg))
    }

    /// Source that counts how many times it has been read.
    struct CountingSource {
        file: ImageFile,
        reads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ImageSource for CountingSource {
        fn name(&self) -> &str {
            self.file.name()
        }

        async fn read(&self) -> Result<Vec<u8>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.file.read().await
        }
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[tokio::test]
    async fn two_images_on_a4_with_10mm_margin() {
        let sources = vec![jpeg(800, 600), jpeg(600, 800)];
        let options = PdfOptions::default();

        let document = images_to_pdf(&sources, &options).await.expect("assemble");
        assert_eq!(document.page_count(), 2);

        for (page, source) in document.pages().iter().zip(&sources) {
            assert_eq!(page.images.len(), 1);
            let placed = &page.images[0];
            assert_eq!(placed.source, source.name());
            assert_close(placed.x_mm, 10.0);
            assert_close(placed.y_mm, 10.0);
            assert_close(placed.width_mm, 190.0);
        }

        // Height follows the intrinsic aspect ratio.
        assert_close(document.pages()[0].images[0].height_mm, 142.5);
        assert_close(document.pages()[1].images[0].height_mm, 190.0 * 800.0 / 600.0);
    }

    #[tokio::test]
    async fn serialized_pdf_has_one_page_per_image() {
        let sources = vec![jpeg(40, 30), jpeg(30, 40), jpeg(50, 50)];
        let options = PdfOptions {
            page_size: PaperSize::Letter,
            orientation: Orientation::Landscape,
            margin: 5.0,
            title: Some("Holiday".into()),
        };

        let document = images_to_pdf(&sources, &options).await.expect("assemble");
        for page in document.pages() {
            assert_close(page.images[0].width_mm, 279.4 - 10.0);
        }

        let bytes = document.into_bytes();
        let reader = PdfReader::from_bytes(&bytes).expect("parse output");
        assert_eq!(reader.page_count(), 3);

        let (w, h) = reader.page_size_mm(1).expect("media box");
        assert!((w - 279.4).abs() < 0.5, "page width {w}");
        assert!((h - 215.9).abs() < 0.5, "page height {h}");
    }

    #[tokio::test]
    async fn non_jpeg_sources_are_embedded() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 8, Rgba([0, 0, 255, 128])));
        let mut png = Vec::new();
        rgba.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .expect("encode png");
        let sources = vec![ImageFile::new("overlay.png", png)];

        let document = images_to_pdf(&sources, &PdfOptions::default())
            .await
            .expect("assemble");
        let placed = &document.pages()[0].images[0];
        assert_eq!((placed.pixel_width, placed.pixel_height), (16, 8));
        assert_close(placed.height_mm, 95.0);
    }

    #[tokio::test]
    async fn empty_input_yields_one_blank_page() {
        let sources: Vec<ImageFile> = Vec::new();
        let document = images_to_pdf(&sources, &PdfOptions::default())
            .await
            .expect("assemble");
        assert_eq!(document.page_count(), 1);
        assert!(document.pages()[0].images.is_empty());

        let reader = PdfReader::from_bytes(&document.into_bytes()).expect("parse output");
        assert_eq!(reader.page_count(), 1);
    }

    #[tokio::test]
    async fn failing_image_aborts_before_later_pages() {
        let reads = Arc::new(AtomicUsize::new(0));
        let files = vec![
            jpeg(10, 10),
            ImageFile::new("corrupt.jpg", b"\xFF\xD8 truncated".to_vec()),
            jpeg(10, 10),
        ];
        let sources: Vec<CountingSource> = files
            .into_iter()
            .map(|file| CountingSource {
                file,
                reads: Arc::clone(&reads),
            })
            .collect();

        let result = images_to_pdf(&sources, &PdfOptions::default()).await;
        assert!(matches!(result, Err(PagewerkError::ImageError(_))));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unreadable_source_propagates_io_error() {
        let sources = vec![crate::source::PathSource::new("/nonexistent/page.jpg")];
        let result = images_to_pdf(&sources, &PdfOptions::default()).await;
        assert!(matches!(result, Err(PagewerkError::Io(_))));
    }

    #[test]
    fn explicit_height_is_respected() {
        let mut document = ImageDocument::new(&PdfOptions::default());
        let url = DataUrl::from_bytes("image/jpeg", encoded(20, 10, ImageFormat::Jpeg));
        let placed = document
            .place_image(&url, "manual", 20.0, 30.0, 100.0, Some(25.0))
            .expect("place");
        assert_close(placed.height_mm, 25.0);

        document.add_page();
        document
            .place_image(&url, "auto", 0.0, 0.0, 100.0, None)
            .expect("place");
        assert_eq!(document.page_count(), 2);
        assert_close(document.pages()[1].images[0].height_mm, 50.0);
    }

    #[test]
    fn save_writes_a_readable_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.pdf");

        let mut document = ImageDocument::new(&PdfOptions::default());
        let url = DataUrl::from_bytes("image/jpeg", encoded(20, 10, ImageFormat::Jpeg));
        document
            .place_image(&url, "page", 10.0, 10.0, 190.0, None)
            .expect("place");
        document.save(&path).expect("save");

        let reader = PdfReader::open(&path).expect("open");
        assert_eq!(reader.page_count(), 1);
        assert!(reader.source_path().is_some());
    }
}
