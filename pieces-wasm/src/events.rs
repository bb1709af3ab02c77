use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use pieces_core::Target;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::MouseEvent;

use crate::debounce::Debouncer;
use crate::pieces::{apply_layout, build_pieces, release_container};
use crate::state::State;
use crate::utils::{element_size, log, warn};

type RafClosure = Closure<dyn FnMut(f64)>;

/// Re-layout the grid from the container's current box.
pub fn relayout(state: &mut State) {
    if let Err(e) = release_container(&state.container) {
        warn(&format!("could not release container size: {e:?}"));
    }
    let size = element_size(&state.container);
    let layout = match state.coordinator.resize(size) {
        Ok(layout) => layout,
        Err(e) => {
            warn(&format!("resize skipped: {e}"));
            if state.coordinator.grid().is_empty() {
                return;
            }
            state.coordinator.grid().layout()
        }
    };
    if state.targets.pieces.len() != state.coordinator.grid().len() {
        if let Err(e) = build_deferred_pieces(state) {
            warn(&format!("could not build pieces: {e:?}"));
        }
        return;
    }
    if let Err(e) = apply_layout(&state.container, &state.targets.pieces, layout) {
        warn(&format!("could not apply layout: {e:?}"));
    }
}

// The grid could not be measured at start-up and has just been built.
fn build_deferred_pieces(state: &mut State) -> Result<(), JsValue> {
    let document = state.window.document().ok_or("no document")?;
    state.targets.pieces = build_pieces(&document, &state.container, state.coordinator.grid())?;
    log(&format!("pieces: built {} deferred pieces", state.targets.pieces.len()));
    for i in 0..state.targets.pieces.len() {
        let target = Target::Piece(i);
        state.targets.apply(target, state.coordinator.style(target))?;
    }
    Ok(())
}

/// Window resize, applied once the events stop for `debounce_ms`.
pub fn attach_resize(state: Rc<RefCell<State>>, debounce_ms: u32) -> Result<(), JsValue> {
    let window = state.borrow().window.clone();
    let debouncer = Debouncer::new(debounce_ms, move || relayout(&mut state.borrow_mut()));
    let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || debouncer.trigger()));
    window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
    onresize.forget();
    Ok(())
}

/// Hover on the contact link pushes the left half of the grid away.
pub fn attach_hover(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let Some(contact) = state.borrow().contact.clone() else {
        return Ok(());
    };
    {
        let st = state.clone();
        let enter = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            st.borrow_mut().coordinator.on_contact_enter();
        }));
        contact.add_event_listener_with_callback("mouseenter", enter.as_ref().unchecked_ref())?;
        enter.forget();
    }
    {
        let st = state;
        let leave = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            // Completion is not awaited; the reset just runs out.
            let _ = st.borrow_mut().coordinator.on_contact_leave();
        }));
        contact.add_event_listener_with_callback("mouseleave", leave.as_ref().unchecked_ref())?;
        leave.forget();
    }
    Ok(())
}

/// Drive the timeline from `requestAnimationFrame` and write changed styles.
pub fn start_animation(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let window = state.borrow().window.clone();
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let win = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        {
            let mut s = state.borrow_mut();
            let touched = s.coordinator.tick(ts);
            for target in touched {
                let style = s.coordinator.style(target);
                if let Err(e) = s.targets.apply(target, style) {
                    warn(&format!("could not style {target:?}: {e:?}"));
                }
            }
        }
        if let Some(cb) = f.borrow().as_ref() {
            let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(cb) = g.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}

/// Start a mode switch and release its lock once the pieces have left.
pub fn run_switch(state: &Rc<RefCell<State>>) {
    let switch = state.borrow_mut().coordinator.switch_mode();
    let Some(switch) = switch else {
        log("mode switch already running");
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        match switch.await {
            Ok(()) => log("switched to code mode"),
            Err(e) => warn(&format!("mode switch ended early: {e}")),
        }
    });
}

/// Switch into code mode after `delay_ms`.
pub fn schedule_switch(state: Rc<RefCell<State>>, delay_ms: u32) {
    Timeout::new(delay_ms, move || run_switch(&state)).forget();
}
