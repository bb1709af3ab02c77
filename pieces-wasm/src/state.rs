use std::cell::RefCell;
use std::rc::Rc;

use pieces_core::ModeCoordinator;
use web_sys::{HtmlElement, Window};

use crate::dom::{DomStage, TargetElements};

/// Page state shared by the event callbacks and the animation loop.
#[derive(Debug)]
pub struct State {
    pub window: Window,
    /// The `.pieces` element holding the grid.
    pub container: HtmlElement,
    pub contact: Option<HtmlElement>,
    pub targets: TargetElements,
    pub coordinator: ModeCoordinator<DomStage>,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
