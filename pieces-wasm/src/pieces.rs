use pieces_core::css::{background_position_css, background_size_css, css_url, parse_css_url, px};
use pieces_core::{GridLayout, PieceGrid};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::constants::{COLUMN_ATTR, DELAY_ATTR, IMG_CODE_ATTR, PIECE_CLASS};
use crate::utils::{set_style, warn};

/// Source image of the container, read from its inline background.
pub fn source_image(container: &HtmlElement) -> Option<String> {
    let inline = container
        .style()
        .get_property_value("background-image")
        .ok()?;
    parse_css_url(&inline)
}

/// Create one element per piece, in grid order, and size everything.
pub fn build_pieces(
    document: &Document,
    container: &HtmlElement,
    grid: &PieceGrid,
) -> Result<Vec<HtmlElement>, JsValue> {
    let src = source_image(container).unwrap_or_else(|| {
        warn("pieces container has no background image");
        String::new()
    });
    if let Some(code) = container.get_attribute(IMG_CODE_ATTR) {
        set_style(container, "background-image", &code)?;
    }

    let mut elements = Vec::with_capacity(grid.len());
    for piece in grid.pieces() {
        let el: HtmlElement = document.create_element("div")?.dyn_into()?;
        el.set_class_name(PIECE_CLASS);
        set_style(&el, "background-image", &css_url(&src))?;
        let (x, y) = piece.background_position();
        set_style(&el, "background-position", &background_position_css(x, y))?;
        el.set_attribute(COLUMN_ATTR, &piece.column.to_string())?;
        el.set_attribute(DELAY_ATTR, &piece.delay_seed.to_string())?;
        container.append_child(&el)?;
        elements.push(el);
    }
    apply_layout(container, &elements, grid.layout())?;
    Ok(elements)
}

/// Size every piece and snap the container to whole pieces.
pub fn apply_layout(
    container: &HtmlElement,
    pieces: &[HtmlElement],
    layout: GridLayout,
) -> Result<(), JsValue> {
    let w = px(layout.piece_width);
    let h = px(layout.piece_height);
    let bg = background_size_css(layout.background_width);
    for el in pieces {
        set_style(el, "width", &w)?;
        set_style(el, "height", &h)?;
        set_style(el, "background-size", &bg)?;
    }
    set_style(container, "width", &px(layout.container.width))?;
    set_style(container, "height", &px(layout.container.height))
}

/// Drop the fixed container size so the stylesheet decides it again.
pub fn release_container(container: &HtmlElement) -> Result<(), JsValue> {
    set_style(container, "width", "")?;
    set_style(container, "height", "")
}
