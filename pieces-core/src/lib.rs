//! Pure model for the sliced-image piece effect: grid layout, tween timeline,
//! stagger policies and the mode coordinator. Nothing here touches the DOM.

pub mod config;
pub mod coordinator;
pub mod css;
pub mod easing;
pub mod error;
pub mod grid;
pub mod stagger;
pub mod timeline;

pub use config::{Options, TiltOptions};
pub use coordinator::{
    AnimationLock, Direction, FxDirection, LetterGroup, LetterOptions, LockGuard, Mode,
    ModeCoordinator, ModeSwitch, Stage, Target, TextBlock,
};
pub use easing::Easing;
pub use error::PiecesError;
pub use grid::{GridConfig, GridLayout, Piece, PieceGrid, Size};
pub use timeline::{Batch, Completion, Hook, Property, TargetStyle, Timeline, Track, Tween};
