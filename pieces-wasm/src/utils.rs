use pieces_core::{PiecesError, Size};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

/// Log a message to the browser console.
pub fn log(s: &str) {
    gloo::console::log!(s);
}

pub fn warn(s: &str) {
    gloo::console::warn!(s);
}

pub fn js_err(e: PiecesError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

pub fn set_style(el: &HtmlElement, prop: &str, value: &str) -> Result<(), JsValue> {
    el.style().set_property(prop, value)
}

pub fn query_html(document: &Document, selector: &str) -> Result<Option<HtmlElement>, JsValue> {
    Ok(document
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok()))
}

pub fn query_all_html(root: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let list = root.query_selector_all(selector)?;
    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

/// Layout box of an element, ignoring CSS transforms.
pub fn offset_size(el: &HtmlElement) -> Size {
    Size::new(el.offset_width() as f64, el.offset_height() as f64)
}

/// Rendered box of an element.
pub fn element_size(el: &Element) -> Size {
    let rect = el.get_bounding_client_rect();
    Size::new(rect.width(), rect.height())
}

/// Computed value of a CSS property, empty when unavailable.
pub fn computed_style(window: &Window, el: &Element, prop: &str) -> String {
    window
        .get_computed_style(el)
        .ok()
        .flatten()
        .and_then(|s| s.get_property_value(prop).ok())
        .unwrap_or_default()
}

/// Seed for the page's random source.
pub fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}
