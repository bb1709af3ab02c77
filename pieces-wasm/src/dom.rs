use std::rc::Rc;

use pieces_core::{Mode, Stage, Target, TargetStyle, TextBlock};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node};

use crate::constants::LETTER_CLASS_PREFIX;
use crate::utils::{set_style, warn};

/// Text containers touched by a mode switch.
#[derive(Debug, Default)]
pub struct TextRefs {
    pub title: Option<HtmlElement>,
    pub contact: Option<HtmlElement>,
    pub menu_wrapper: Option<HtmlElement>,
}

/// `Stage` backed by the live page.
#[derive(Clone, Debug, Default)]
pub struct DomStage(Rc<TextRefs>);

impl DomStage {
    pub fn new(refs: TextRefs) -> Self {
        DomStage(Rc::new(refs))
    }

    pub fn element(&self, block: TextBlock) -> Option<&HtmlElement> {
        match block {
            TextBlock::Title => self.0.title.as_ref(),
            TextBlock::Contact => self.0.contact.as_ref(),
            TextBlock::Menu => self.0.menu_wrapper.as_ref(),
        }
    }
}

impl Stage for DomStage {
    fn apply_mode(&self, block: TextBlock, mode: Mode) {
        let Some(el) = self.element(block) else {
            return;
        };
        let classes = el.class_list();
        if classes.remove_1(mode.other().class_name()).is_err()
            || classes.add_1(mode.class_name()).is_err()
        {
            warn(&format!("could not switch {block:?} to {}", mode.class_name()));
        }
    }

    fn reveal(&self, block: TextBlock) {
        let Some(el) = self.element(block) else {
            return;
        };
        let res = match block {
            TextBlock::Menu => set_style(el, "display", "block"),
            TextBlock::Title | TextBlock::Contact => {
                set_style(el, "opacity", "1").and_then(|_| set_style(el, "transform", "none"))
            }
        };
        if let Err(e) = res {
            warn(&format!("could not reveal {block:?}: {e:?}"));
        }
    }
}

/// Elements addressed by animation targets.
#[derive(Debug, Default)]
pub struct TargetElements {
    pub pieces: Vec<HtmlElement>,
    pub letters: Vec<Vec<HtmlElement>>,
    pub overlay: Option<HtmlElement>,
}

impl TargetElements {
    pub fn get(&self, target: Target) -> Option<&HtmlElement> {
        match target {
            Target::Piece(i) => self.pieces.get(i),
            Target::Letter { group, index } => self.letters.get(group)?.get(index),
            Target::Overlay => self.overlay.as_ref(),
        }
    }

    /// Write the current animated style of `target` into its inline style.
    pub fn apply(&self, target: Target, style: TargetStyle) -> Result<(), JsValue> {
        let Some(el) = self.get(target) else {
            return Ok(());
        };
        if let Target::Piece(_) = target {
            set_style(el, "transform", &style.transform_css())?;
        }
        set_style(el, "opacity", &style.opacity_css())
    }
}

// Text nodes under `node`, in document order.
fn text_nodes(node: &Node, out: &mut Vec<Node>) {
    let children = node.child_nodes();
    for i in 0..children.length() {
        let Some(child) = children.item(i) else {
            continue;
        };
        if child.node_type() == Node::TEXT_NODE {
            out.push(child);
        } else {
            text_nodes(&child, out);
        }
    }
}

/// Replace every character of `el`'s text with its own `span.charN`
/// (1-based across the element) and return the spans in order.
pub fn split_into_letters(document: &Document, el: &Element) -> Result<Vec<HtmlElement>, JsValue> {
    let mut nodes = Vec::new();
    text_nodes(el, &mut nodes);
    let mut letters = Vec::new();
    for node in nodes {
        let Some(parent) = node.parent_node() else {
            continue;
        };
        let text = node.text_content().unwrap_or_default();
        for ch in text.chars() {
            let span: HtmlElement = document.create_element("span")?.dyn_into()?;
            span.set_class_name(&format!("{LETTER_CLASS_PREFIX}{}", letters.len() + 1));
            span.set_attribute("aria-hidden", "true")?;
            span.set_text_content(Some(&ch.to_string()));
            parent.insert_before(&span, Some(&node))?;
            letters.push(span);
        }
        parent.remove_child(&node)?;
    }
    if !letters.is_empty() {
        let label = el.text_content().unwrap_or_default();
        el.set_attribute("aria-label", &label)?;
    }
    Ok(letters)
}
