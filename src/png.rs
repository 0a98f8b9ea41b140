use anyhow::{Context, Result};
use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};

/// Rasterize a rendered card into a PNG at its declared size.
///
/// Static rasterization never runs the fade-in animations, so the initial
/// `opacity: 0` of animated elements is dropped before parsing; otherwise
/// every animated slot would rasterize invisible.
pub fn rasterize(svg: &str) -> Result<Vec<u8>> {
    let svg = svg.replace("opacity: 0; ", "");

    let mut fonts = fontdb::Database::new();
    fonts.load_system_fonts();
    let options = usvg::Options {
        fontdb: std::sync::Arc::new(fonts),
        ..Default::default()
    };

    let tree = usvg::Tree::from_str(&svg, &options).context("Failed to parse SVG")?;
    let size = tree.size().to_int_size();
    let mut pixmap =
        tiny_skia::Pixmap::new(size.width(), size.height()).context("Failed to allocate pixmap")?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap.encode_png().context("Failed to encode PNG")
}
