//! Writing the diagram SVG to disk as SVG, PNG or PDF.

use std::path::{Path, PathBuf};

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

use crate::error::{Error, Result};

const SUPPORTED: &str = ".svg, .png or .pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::MissingExtension(path.to_path_buf()))?
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(Error::UnsupportedOutput(ext, SUPPORTED)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Svg => "SVG",
            OutputFormat::Png => "PNG",
            OutputFormat::Pdf => "PDF",
        }
    }
}

/// Converts `svg` to the format named by `output`'s extension and writes it.
pub fn write_svg_as(svg: &str, output: &Path, png_scale: f32) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(output)?;
    let data = match format {
        OutputFormat::Svg => svg.as_bytes().to_vec(),
        OutputFormat::Png => svg_to_png(svg, png_scale)?,
        OutputFormat::Pdf => svg_to_pdf(svg)?,
    };
    write_file(output, data)?;
    Ok(format)
}

pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| Error::Write {
        path: PathBuf::from(path),
        source,
    })
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::InvalidScale(scale));
    }

    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        fontdb.load_system_fonts();

        let local_fonts = Path::new("fonts");
        if local_fonts.is_dir() {
            fontdb.load_fonts_dir(local_fonts);
        }

        configure_font_fallbacks(fontdb);
    }

    let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| Error::Svg(e.to_string()))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or(Error::Pixmap)?;
    let transform = Transform::from_scale(scale, scale);

    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| Error::PngEncode(e.to_string()))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    use svg2pdf::usvg::fontdb;

    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();

    let local_fonts = Path::new("fonts");
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }

    configure_font_fallbacks_svg2pdf(&mut fontdb);

    let mut opts = svg2pdf::usvg::Options::default();
    opts.fontdb = std::sync::Arc::new(fontdb);

    let tree =
        svg2pdf::usvg::Tree::from_str(svg, &opts).map_err(|e| Error::Svg(e.to_string()))?;

    // Port and point labels are drawn as paths so the PDF prints without
    // the fonts installed.
    let mut options = svg2pdf::ConversionOptions::default();
    options.embed_text = false;
    let page_options = svg2pdf::PageOptions::default();

    svg2pdf::to_pdf(&tree, options, page_options).map_err(|e| Error::Pdf(e.to_string()))
}

/// First family whose name contains "sans", else the first family at all.
fn pick_sans_family<'a>(families: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut first_family: Option<&str> = None;
    for family in families {
        if first_family.is_none() {
            first_family = Some(family);
        }
        if family.to_ascii_lowercase().contains("sans") {
            return Some(family.to_string());
        }
    }
    first_family.map(str::to_string)
}

fn configure_font_fallbacks(fontdb: &mut usvg::fontdb::Database) {
    let family = pick_sans_family(
        fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
    );
    if let Some(family) = family {
        fontdb.set_sans_serif_family(family.as_str());
        fontdb.set_serif_family(family);
    }
}

fn configure_font_fallbacks_svg2pdf(fontdb: &mut svg2pdf::usvg::fontdb::Database) {
    let family = pick_sans_family(
        fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
    );
    if let Some(family) = family {
        fontdb.set_sans_serif_family(family.as_str());
        fontdb.set_serif_family(family);
    }
}
