use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::join_all;
use gloo::events::EventListener;
use pieces_core::css::parse_css_url;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, HtmlImageElement, Window};

use crate::constants::IMG_CODE_ATTR;
use crate::utils::{computed_style, log, warn};

/// Image URLs the page needs before the grid can be built: `root`'s
/// background, every `<img>` below it, and each `extra` element's inline and
/// swapped-in backgrounds.
pub fn collect_sources(
    window: &Window,
    root: &Element,
    extra: &[&HtmlElement],
) -> Result<Vec<String>, JsValue> {
    let mut sources = Vec::new();
    let mut push = |src: Option<String>| {
        if let Some(src) = src
            && !sources.contains(&src)
        {
            sources.push(src);
        }
    };
    push(parse_css_url(&computed_style(window, root, "background-image")));

    let images = root.query_selector_all("img")?;
    for i in 0..images.length() {
        if let Some(img) = images
            .item(i)
            .and_then(|n| n.dyn_into::<HtmlImageElement>().ok())
            && !img.complete()
        {
            push(Some(img.src()).filter(|s| !s.is_empty()));
        }
    }

    for el in extra {
        push(parse_css_url(
            &el.style().get_property_value("background-image")?,
        ));
        push(el.get_attribute(IMG_CODE_ATTR).and_then(|v| parse_css_url(&v)));
    }
    Ok(sources)
}

/// Resolves with whether `src` loaded; errors count as settled.
pub async fn load_image(src: &str) -> Result<bool, JsValue> {
    let img = HtmlImageElement::new()?;
    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let settle = |ok: bool| {
        let tx = tx.clone();
        move |_: &web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(ok);
            }
        }
    };
    let _onload = EventListener::once(&img, "load", settle(true));
    let _onerror = EventListener::once(&img, "error", settle(false));
    img.set_src(src);
    Ok(rx.await.unwrap_or(false))
}

/// Wait until every image the page depends on has settled.
pub async fn wait_for_images(
    window: &Window,
    root: &Element,
    extra: &[&HtmlElement],
) -> Result<(), JsValue> {
    let sources = collect_sources(window, root, extra)?;
    let results = join_all(sources.iter().map(|s| load_image(s))).await;
    for (src, res) in sources.iter().zip(results) {
        match res {
            Ok(true) => {}
            Ok(false) => warn(&format!("image failed to load: {src}")),
            Err(e) => warn(&format!("image load setup failed for {src}: {e:?}")),
        }
    }
    log(&format!("{} images settled", sources.len()));
    Ok(())
}
