/// Page selectors and class names the front-end expects.
pub const LOADING_SELECTOR: &str = ".loading";
pub const LOADING_HIDE_CLASS: &str = "loading--hide";
pub const PIECES_SELECTOR: &str = ".pieces";
pub const TITLE_SELECTOR: &str = ".title > .title__inner";
pub const CONTACT_SELECTOR: &str = ".contact-link";
pub const MENU_WRAPPER_SELECTOR: &str = ".menu--code";
pub const MENU_ITEMS_SELECTOR: &str = ".menu--code > .menu__inner a";
pub const OVERLAY_SELECTOR: &str = ".overlay";

pub const PIECE_CLASS: &str = "piece";
pub const LETTER_CLASS_PREFIX: &str = "char";

/// Container attributes.
pub const IMG_CODE_ATTR: &str = "data-img-code";
pub const OPTIONS_ATTR: &str = "data-options";
/// Piece attributes.
pub const COLUMN_ATTR: &str = "data-column";
pub const DELAY_ATTR: &str = "data-delay";
