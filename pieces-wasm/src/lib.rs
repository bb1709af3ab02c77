use std::cell::RefCell;
use std::rc::Rc;

use pieces_core::{
    LetterGroup, ModeCoordinator, Options, PieceGrid, Property, Target, TextBlock,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

pub mod constants;
pub mod debounce;
pub mod dom;
pub mod events;
pub mod images;
pub mod pieces;
pub mod state;
pub mod utils;

use crate::constants::*;
use crate::dom::{DomStage, TargetElements, TextRefs, split_into_letters};
use crate::state::{STATE, State};
use crate::utils::{computed_style, js_err, log, offset_size, query_all_html, query_html, warn};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = boot(window, document).await {
            warn(&format!("pieces: start-up failed: {err:?}"));
        }
    });
    Ok(())
}

/// Run the mode switch now. Ignored while one is already in flight.
#[wasm_bindgen(js_name = switchMode)]
pub fn switch_mode() {
    let state = STATE.with(|st| st.borrow().clone());
    match state {
        Some(state) => events::run_switch(&state),
        None => warn("pieces: switchMode called before start-up finished"),
    }
}

/// Options from the container's `data-options`, falling back to defaults.
fn read_options(container: &HtmlElement) -> Options {
    let Some(text) = container.get_attribute(OPTIONS_ATTR) else {
        return Options::default();
    };
    Options::from_json(&text).unwrap_or_else(|e| {
        warn(&format!("ignoring {OPTIONS_ATTR}: {e}"));
        Options::default()
    })
}

/// Split the title, contact link and menu items into letters.
fn words_to_letters(
    document: &Document,
    refs: &TextRefs,
) -> Result<(Vec<LetterGroup>, Vec<Vec<HtmlElement>>), JsValue> {
    let mut groups = Vec::new();
    let mut elements = Vec::new();
    let mut add = |block: TextBlock, letters: Vec<HtmlElement>| {
        groups.push(LetterGroup {
            block,
            len: letters.len(),
        });
        elements.push(letters);
    };
    if let Some(title) = &refs.title {
        add(TextBlock::Title, split_into_letters(document, title)?);
    }
    if let Some(contact) = &refs.contact {
        add(TextBlock::Contact, split_into_letters(document, contact)?);
    }
    for item in query_all_html(document, MENU_ITEMS_SELECTOR)? {
        add(TextBlock::Menu, split_into_letters(document, &item)?);
    }
    Ok((groups, elements))
}

async fn boot(window: Window, document: Document) -> Result<(), JsValue> {
    let body = document.body().ok_or("no body")?;
    let container = query_html(&document, PIECES_SELECTOR)?.ok_or("no pieces container")?;

    images::wait_for_images(&window, &body, &[&container]).await?;
    if let Some(loading) = query_html(&document, LOADING_SELECTOR)? {
        loading.class_list().add_1(LOADING_HIDE_CLASS)?;
    }

    let options = read_options(&container);
    let mut rng = SmallRng::seed_from_u64(utils::random_seed());
    let grid = match PieceGrid::build(offset_size(&container), options.pieces, &mut rng) {
        Ok(grid) => grid,
        Err(e) if e.is_layout() => {
            warn(&format!("pieces: grid deferred until the container has a size: {e}"));
            PieceGrid::unmeasured(options.pieces)
        }
        Err(e) => return Err(js_err(e)),
    };
    let piece_elements = if grid.is_empty() {
        Vec::new()
    } else {
        pieces::build_pieces(&document, &container, &grid)?
    };
    log(&format!(
        "pieces: {}x{} grid, {} pieces",
        grid.config().rows,
        grid.config().columns,
        piece_elements.len()
    ));

    let refs = TextRefs {
        title: query_html(&document, TITLE_SELECTOR)?,
        contact: query_html(&document, CONTACT_SELECTOR)?,
        menu_wrapper: query_html(&document, MENU_WRAPPER_SELECTOR)?,
    };
    let (groups, letters) = words_to_letters(&document, &refs)?;
    let contact = refs.contact.clone();
    let overlay = query_html(&document, OVERLAY_SELECTOR)?;

    let mut coordinator = ModeCoordinator::new(DomStage::new(refs), grid, groups, rng);
    if let Some(overlay) = &overlay {
        let opacity = computed_style(&window, overlay, "opacity")
            .parse::<f64>()
            .unwrap_or(0.0);
        coordinator.seed(Target::Overlay, Property::Opacity, opacity);
    }

    let initial_delay_ms = options.initial_delay_ms;
    let resize_debounce_ms = options.resize_debounce_ms;
    let state = Rc::new(RefCell::new(State {
        window,
        container,
        contact,
        targets: TargetElements {
            pieces: piece_elements,
            letters,
            overlay,
        },
        coordinator,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    events::attach_resize(state.clone(), resize_debounce_ms)?;
    events::attach_hover(state.clone())?;
    events::start_animation(state.clone())?;
    events::schedule_switch(state, initial_delay_ms);
    Ok(())
}
