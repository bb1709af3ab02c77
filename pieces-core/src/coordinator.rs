//! Sequences piece, letter and overlay animations and owns the animation lock.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use rand::rngs::SmallRng;

use crate::easing::{self, Easing};
use crate::error::PiecesError;
use crate::grid::{GridLayout, PieceGrid, Size};
use crate::stagger::{self, DelayFn};
use crate::timeline::{Batch, Completion, Hook, Property, TargetStyle, Timeline, Track, Tween};

pub const PIECES_OUT_MS: f64 = 600.0;
pub const PIECES_IN_MS: f64 = 500.0;
pub const PIECES_FADE_IN_MS: f64 = 300.0;
pub const FX_LEFT_MS: f64 = 400.0;
pub const FX_RESET_MS: f64 = 200.0;
pub const FX_FADE_MS: f64 = 200.0;
pub const LETTER_MS: f64 = 50.0;
pub const OVERLAY_MS: f64 = 800.0;

/// Anything the coordinator animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Index into the row-major piece sequence.
    Piece(usize),
    Letter { group: usize, index: usize },
    Overlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FxDirection {
    /// Push the left half away (hover enter).
    Left,
    /// Bring it back (hover leave).
    Enter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Design,
    Code,
}

impl Mode {
    pub fn class_name(self) -> &'static str {
        match self {
            Mode::Design => "mode--design",
            Mode::Code => "mode--code",
        }
    }

    pub fn other(self) -> Mode {
        match self {
            Mode::Design => Mode::Code,
            Mode::Code => Mode::Design,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBlock {
    Title,
    Contact,
    Menu,
}

/// Letters produced by splitting one text element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterGroup {
    pub block: TextBlock,
    pub len: usize,
}

/// Page-side effects the coordinator triggers but does not animate.
pub trait Stage: Clone + 'static {
    /// Swap the block's mode class.
    fn apply_mode(&self, block: TextBlock, mode: Mode);
    /// Make the block's container visible (opacity, transform, display).
    fn reveal(&self, block: TextBlock);
}

/// Held while a mode switch is in flight.
#[derive(Clone, Debug, Default)]
pub struct AnimationLock(Rc<Cell<bool>>);

impl AnimationLock {
    pub fn is_held(&self) -> bool {
        self.0.get()
    }

    pub fn try_acquire(&self) -> Option<LockGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(LockGuard(self.0.clone()))
    }
}

/// Releases the lock on drop.
#[derive(Debug)]
pub struct LockGuard(Rc<Cell<bool>>);

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Overrides for [`ModeCoordinator::animate_letters`].
#[derive(Default)]
pub struct LetterOptions {
    pub delay: Option<DelayFn>,
    pub begin: Option<Hook>,
}

impl std::fmt::Debug for LetterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LetterOptions")
            .field("delay", &self.delay.is_some())
            .field("begin", &self.begin.is_some())
            .finish()
    }
}

/// A mode switch in progress. Resolves when the pieces have left; the lock
/// is released when this is dropped, completed or not.
#[derive(Debug)]
pub struct ModeSwitch {
    completion: Completion,
    _guard: LockGuard,
}

impl Future for ModeSwitch {
    type Output = Result<(), PiecesError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.completion).poll(cx)
    }
}

pub struct ModeCoordinator<S> {
    stage: S,
    grid: PieceGrid,
    letters: Vec<LetterGroup>,
    timeline: Timeline<Target>,
    lock: AnimationLock,
    fx_triggered: bool,
    mode: Mode,
    rng: SmallRng,
    now: f64,
}

impl<S: std::fmt::Debug> std::fmt::Debug for ModeCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeCoordinator")
            .field("stage", &self.stage)
            .field("pieces", &self.grid.len())
            .field("letters", &self.letters)
            .field("timeline", &self.timeline)
            .field("lock", &self.lock)
            .field("fx_triggered", &self.fx_triggered)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<S: Stage> ModeCoordinator<S> {
    pub fn new(stage: S, grid: PieceGrid, letters: Vec<LetterGroup>, rng: SmallRng) -> Self {
        ModeCoordinator {
            stage,
            grid,
            letters,
            timeline: Timeline::new(),
            lock: AnimationLock::default(),
            fx_triggered: false,
            mode: Mode::Design,
            rng,
            now: 0.0,
        }
    }

    pub fn grid(&self) -> &PieceGrid {
        &self.grid
    }

    pub fn letters(&self) -> &[LetterGroup] {
        &self.letters
    }

    pub fn timeline(&self) -> &Timeline<Target> {
        &self.timeline
    }

    pub fn lock(&self) -> &AnimationLock {
        &self.lock
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_fx_triggered(&self) -> bool {
        self.fx_triggered
    }

    pub fn style(&self, target: Target) -> TargetStyle {
        self.timeline.style(target)
    }

    /// Record a value read from the page, e.g. the overlay's initial opacity.
    pub fn seed(&mut self, target: Target, property: Property, value: f64) {
        self.timeline.set(target, property, value);
    }

    /// Advance the clock and every running animation.
    pub fn tick(&mut self, now: f64) -> Vec<Target> {
        self.now = now;
        self.timeline.tick(now)
    }

    /// Lay the grid out for a new container box. A grid that could not be
    /// measured yet is built here; its pieces start hidden when the page has
    /// already left design mode.
    pub fn resize(&mut self, container: Size) -> Result<GridLayout, PiecesError> {
        if !self.grid.is_empty() {
            return self.grid.resize(container);
        }
        self.grid = PieceGrid::build(container, self.grid.config(), &mut self.rng)?;
        if self.mode == Mode::Code {
            for target in self.piece_targets() {
                self.timeline.set(target, Property::Opacity, 0.0);
            }
        }
        Ok(self.grid.layout())
    }

    fn piece_targets(&self) -> Vec<Target> {
        (0..self.grid.len()).map(Target::Piece).collect()
    }

    fn piece_batch(&mut self, direction: Direction) -> Batch<Target> {
        let mut tracks = Vec::with_capacity(self.grid.len());
        for (i, (pi, piece)) in self.grid.pieces().iter().enumerate().rev().enumerate() {
            let left = self.grid.is_left_half(piece);
            let drift = stagger::drift_x(left, &mut self.rng);
            let lift = stagger::lift_y(&mut self.rng);
            let tweens = match direction {
                Direction::Out => vec![
                    Tween::to(Property::TranslateX, drift, PIECES_OUT_MS, easing::EXIT),
                    Tween::between(Property::TranslateY, 0.0, lift, PIECES_OUT_MS, easing::EXIT),
                    Tween::to(Property::Opacity, 0.0, PIECES_OUT_MS, Easing::Linear),
                ],
                Direction::In => vec![
                    Tween::between(Property::TranslateX, drift, 0.0, PIECES_IN_MS, easing::ENTRANCE),
                    Tween::between(Property::TranslateY, lift, 0.0, PIECES_IN_MS, easing::ENTRANCE),
                    Tween::between(Property::Opacity, 0.0, 1.0, PIECES_FADE_IN_MS, Easing::Linear),
                ],
            };
            tracks.push(Track {
                target: Target::Piece(pi),
                delay: stagger::piece_delay(i, piece.delay_seed),
                tweens,
            });
        }
        Batch::new(tracks)
    }

    /// Staggered flight of every piece, last piece first.
    pub fn animate_pieces(&mut self, direction: Direction) -> Completion {
        let targets = self.piece_targets();
        self.timeline.cancel(&targets);
        let batch = self.piece_batch(direction);
        self.timeline.play(batch, self.now)
    }

    // Left-half pieces, last piece first.
    fn left_half(&self) -> Vec<(usize, i32)> {
        self.grid
            .pieces()
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, p)| self.grid.is_left_half(p))
            .map(|(i, p)| (i, p.delay_seed))
            .collect()
    }

    pub fn custom_fx(&mut self, direction: FxDirection) -> Option<Completion> {
        match direction {
            FxDirection::Left => Some(self.custom_fx_left()),
            FxDirection::Enter => self.custom_fx_reset(),
        }
    }

    /// Push the left half of the grid further left and down, fading it out.
    pub fn custom_fx_left(&mut self) -> Completion {
        self.fx_triggered = true;
        let subset = self.left_half();
        let targets: Vec<Target> = subset.iter().map(|&(i, _)| Target::Piece(i)).collect();
        self.timeline.cancel(&targets);
        let mut tracks = Vec::with_capacity(subset.len());
        for (i, &(pi, seed)) in subset.iter().enumerate() {
            let push = stagger::fx_push_x(&mut self.rng);
            let drop = stagger::fx_drop_y(&mut self.rng);
            tracks.push(Track {
                target: Target::Piece(pi),
                delay: stagger::fx_forward_delay(i, seed),
                tweens: vec![
                    Tween::to(Property::TranslateX, push, FX_LEFT_MS, easing::EXIT),
                    Tween::to(Property::TranslateY, drop, FX_LEFT_MS, easing::EXIT),
                    Tween::to(Property::Opacity, 0.0, FX_FADE_MS, Easing::Linear),
                ],
            });
        }
        self.timeline.play(Batch::new(tracks), self.now)
    }

    /// Return the left half to rest. Does nothing unless the push is active.
    pub fn custom_fx_reset(&mut self) -> Option<Completion> {
        if !self.fx_triggered {
            return None;
        }
        self.fx_triggered = false;
        let targets = self.piece_targets();
        self.timeline.cancel(&targets);
        let subset = self.left_half();
        let count = subset.len();
        let tracks = subset
            .iter()
            .enumerate()
            .map(|(i, &(pi, seed))| Track {
                target: Target::Piece(pi),
                delay: stagger::fx_reverse_delay(i, count, seed),
                tweens: vec![
                    Tween::to(Property::TranslateX, 0.0, FX_RESET_MS, easing::RESET),
                    Tween::to(Property::TranslateY, 0.0, FX_RESET_MS, easing::RESET),
                    Tween::to(Property::Opacity, 1.0, FX_FADE_MS, easing::RESET),
                ],
            })
            .collect();
        Some(self.timeline.play(Batch::new(tracks), self.now))
    }

    pub fn on_contact_enter(&mut self) -> bool {
        if self.lock.is_held() {
            return false;
        }
        self.custom_fx(FxDirection::Left);
        true
    }

    pub fn on_contact_leave(&mut self) -> Option<Completion> {
        if self.lock.is_held() {
            return None;
        }
        self.custom_fx(FxDirection::Enter)
    }

    fn letter_targets(&self, groups: &[usize]) -> Vec<Target> {
        groups
            .iter()
            .filter_map(|&g| self.letters.get(g).map(|lg| (g, lg.len)))
            .flat_map(|(group, len)| (0..len).map(move |index| Target::Letter { group, index }))
            .collect()
    }

    /// Fade the letters of `groups` in or out, one after another.
    pub fn animate_letters(
        &mut self,
        groups: &[usize],
        direction: Direction,
        options: LetterOptions,
    ) -> Completion {
        let targets = self.letter_targets(groups);
        self.timeline.cancel(&targets);
        let count = targets.len();
        let delay: DelayFn = options.delay.unwrap_or_else(|| match direction {
            Direction::In => Box::new(stagger::letter_in_delay) as DelayFn,
            Direction::Out => Box::new(stagger::letter_out_delay) as DelayFn,
        });
        let (from, to, curve) = match direction {
            Direction::In => (0.0, 1.0, Easing::InQuint),
            Direction::Out => (1.0, 0.0, Easing::OutQuint),
        };
        let tracks = targets
            .iter()
            .enumerate()
            .map(|(i, &target)| Track {
                target,
                delay: delay(i, count),
                tweens: vec![Tween::between(Property::Opacity, from, to, LETTER_MS, curve)],
            })
            .collect();
        let mut batch = Batch::new(tracks);
        if let Some(begin) = options.begin {
            batch = batch.on_begin(begin);
        }
        self.timeline.play(batch, self.now)
    }

    pub fn switch_overlay(&mut self) -> Completion {
        self.timeline.cancel(&[Target::Overlay]);
        let track = Track {
            target: Target::Overlay,
            delay: 0.0,
            tweens: vec![Tween::to(Property::Opacity, 1.0, OVERLAY_MS, Easing::Linear)],
        };
        self.timeline.play(Batch::new(vec![track]), self.now)
    }

    fn groups_of(&self, block: TextBlock) -> Vec<usize> {
        self.letters
            .iter()
            .enumerate()
            .filter(|(_, g)| g.block == block)
            .map(|(i, _)| i)
            .collect()
    }

    fn reveal_hook(&self, block: TextBlock) -> Hook {
        let stage = self.stage.clone();
        Box::new(move || stage.reveal(block))
    }

    fn show_text(&mut self, block: TextBlock, mode: Mode) {
        self.stage.apply_mode(block, mode);
        let groups = self.groups_of(block);
        if groups.is_empty() {
            self.stage.reveal(block);
            return;
        }
        let begin = self.reveal_hook(block);
        self.animate_letters(
            &groups,
            Direction::In,
            LetterOptions {
                delay: None,
                begin: Some(begin),
            },
        );
    }

    fn switch_to_code(&mut self) {
        self.show_text(TextBlock::Title, Mode::Code);
        self.show_text(TextBlock::Contact, Mode::Code);
        let menu = self.groups_of(TextBlock::Menu);
        let begin = self.reveal_hook(TextBlock::Menu);
        self.animate_letters(
            &menu,
            Direction::In,
            LetterOptions {
                delay: Some(Box::new(stagger::menu_delay)),
                begin: Some(begin),
            },
        );
    }

    /// Move the page into code mode. `None` while another switch holds the
    /// lock; otherwise the returned future owns the lock until it is dropped.
    pub fn switch_mode(&mut self) -> Option<ModeSwitch> {
        let guard = self.lock.try_acquire()?;
        self.mode = Mode::Code;
        self.switch_overlay();
        self.switch_to_code();
        let completion = self.animate_pieces(Direction::Out);
        Some(ModeSwitch {
            completion,
            _guard: guard,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use futures::executor::block_on;
    use rand::SeedableRng;
    use std::cell::RefCell;

    #[derive(Clone, Debug, Default)]
    struct RecordingStage(Rc<RefCell<Vec<String>>>);

    impl RecordingStage {
        fn events(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    impl Stage for RecordingStage {
        fn apply_mode(&self, block: TextBlock, mode: Mode) {
            self.0
                .borrow_mut()
                .push(format!("mode {block:?} {}", mode.class_name()));
        }

        fn reveal(&self, block: TextBlock) {
            self.0.borrow_mut().push(format!("reveal {block:?}"));
        }
    }

    fn coordinator(rows: u32, columns: u32, w: f64, h: f64) -> ModeCoordinator<RecordingStage> {
        let mut rng = SmallRng::seed_from_u64(42);
        let grid = PieceGrid::build(
            Size::new(w, h),
            GridConfig::new(rows, columns).unwrap(),
            &mut rng,
        )
        .unwrap();
        let letters = vec![
            LetterGroup {
                block: TextBlock::Title,
                len: 5,
            },
            LetterGroup {
                block: TextBlock::Contact,
                len: 7,
            },
            LetterGroup {
                block: TextBlock::Menu,
                len: 4,
            },
            LetterGroup {
                block: TextBlock::Menu,
                len: 3,
            },
        ];
        ModeCoordinator::new(RecordingStage::default(), grid, letters, rng)
    }

    #[test]
    fn piece_stagger_walks_the_sequence_backwards() {
        let mut c = coordinator(3, 4, 400.0, 300.0);
        let batch = c.piece_batch(Direction::Out);
        let n = c.grid().len();
        for (i, track) in batch.tracks.iter().enumerate() {
            let pi = n - 1 - i;
            assert_eq!(track.target, Target::Piece(pi));
            let seed = c.grid().pieces()[pi].delay_seed;
            assert_eq!(track.delay, (i as f64 * 6.0 + seed as f64).max(0.0));
            assert!(track.delay >= 0.0);
        }
    }

    #[test]
    fn pieces_drift_away_from_center() {
        let mut c = coordinator(2, 4, 400.0, 200.0);
        let batch = c.piece_batch(Direction::Out);
        for track in &batch.tracks {
            let Target::Piece(pi) = track.target else {
                panic!("unexpected target");
            };
            let column = c.grid().pieces()[pi].column;
            let dx = track.tweens[0].to;
            if column < 2 {
                assert!(dx > 0.0);
            } else {
                assert!(dx < 0.0);
            }
            assert_eq!(track.tweens[1].from, Some(0.0));
            assert!(track.tweens[1].to <= -800.0);
        }
    }

    #[test]
    fn pieces_out_completes_once_after_every_piece() {
        let mut c = coordinator(2, 2, 200.0, 100.0);
        let piece = c.grid().pieces()[0].clone();
        assert_eq!((piece.width, piece.height), (100.0, 50.0));

        let done = c.animate_pieces(Direction::Out);
        c.tick(300.0);
        assert_eq!(c.timeline().active(), 1);
        // 3 * 6 + 25 max delay plus the 600ms tween.
        c.tick(700.0);
        assert_eq!(c.timeline().active(), 0);
        assert!(block_on(done).is_ok());
        for i in 0..4 {
            assert_eq!(c.style(Target::Piece(i)).opacity, 0.0);
        }
    }

    #[test]
    fn pieces_in_return_to_rest() {
        let mut c = coordinator(2, 2, 200.0, 100.0);
        let _ = c.animate_pieces(Direction::Out);
        c.tick(1000.0);
        let done = c.animate_pieces(Direction::In);
        c.tick(2000.0);
        assert!(block_on(done).is_ok());
        for i in 0..4 {
            let s = c.style(Target::Piece(i));
            assert_eq!((s.translate_x, s.translate_y, s.opacity), (0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn new_piece_animation_cancels_the_previous_one() {
        let mut c = coordinator(2, 2, 200.0, 100.0);
        let first = c.animate_pieces(Direction::Out);
        let second = c.animate_pieces(Direction::In);
        assert_eq!(c.timeline().active(), 1);
        assert!(matches!(block_on(first), Err(PiecesError::Cancelled)));
        c.tick(1000.0);
        assert!(block_on(second).is_ok());
    }

    #[test]
    fn reset_without_push_is_a_no_op() {
        let mut c = coordinator(2, 4, 400.0, 200.0);
        let before: Vec<TargetStyle> = (0..8).map(|i| c.style(Target::Piece(i))).collect();
        assert!(c.custom_fx(FxDirection::Enter).is_none());
        assert!(c.on_contact_leave().is_none());
        assert_eq!(c.timeline().active(), 0);
        c.tick(500.0);
        let after: Vec<TargetStyle> = (0..8).map(|i| c.style(Target::Piece(i))).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn push_then_reset_only_moves_the_left_half() {
        let mut c = coordinator(2, 4, 400.0, 200.0);
        assert!(c.on_contact_enter());
        assert!(c.is_fx_triggered());
        c.tick(1000.0);
        for (i, p) in c.grid().pieces().iter().enumerate() {
            let s = c.style(Target::Piece(i));
            if p.column < 2 {
                assert_eq!(s.opacity, 0.0);
                assert!(s.translate_x <= -100.0);
            } else {
                assert_eq!(s.opacity, 1.0);
                assert_eq!(s.translate_x, 0.0);
            }
        }

        let done = c.on_contact_leave().expect("push was active");
        assert!(!c.is_fx_triggered());
        c.tick(1500.0);
        assert!(block_on(done).is_ok());
        for i in 0..8 {
            let s = c.style(Target::Piece(i));
            assert_eq!((s.translate_x, s.translate_y, s.opacity), (0.0, 0.0, 1.0));
        }
        assert!(c.custom_fx_reset().is_none());
    }

    #[test]
    fn reset_staggers_in_reverse() {
        let mut c = coordinator(1, 6, 600.0, 100.0);
        c.custom_fx_left();
        let subset = c.left_half();
        assert_eq!(
            subset.iter().map(|&(i, _)| i).collect::<Vec<_>>(),
            vec![2, 1, 0]
        );
        let count = subset.len();
        for (i, &(_, seed)) in subset.iter().enumerate() {
            let expected = (((count - 1 - i) * 2) as f64 + seed as f64).max(0.0);
            assert_eq!(stagger::fx_reverse_delay(i, count, seed), expected);
        }
    }

    #[test]
    fn letters_fade_in_with_default_and_custom_stagger() {
        let mut c = coordinator(1, 1, 100.0, 100.0);
        let done = c.animate_letters(&[0], Direction::In, LetterOptions::default());
        c.tick(0.0);
        assert_eq!(c.style(Target::Letter { group: 0, index: 4 }).opacity, 0.0);
        c.tick(50.0 * 4.0 + 50.0);
        assert!(block_on(done).is_ok());
        assert_eq!(c.style(Target::Letter { group: 0, index: 4 }).opacity, 1.0);

        let done = c.animate_letters(
            &[2, 3],
            Direction::Out,
            LetterOptions {
                delay: Some(Box::new(|i: usize, _: usize| i as f64 * 10.0)),
                begin: None,
            },
        );
        // 7 menu letters, flattened across both groups.
        c.tick(250.0 + 6.0 * 10.0 + 50.0);
        assert!(block_on(done).is_ok());
        assert_eq!(c.style(Target::Letter { group: 3, index: 2 }).opacity, 0.0);
    }

    #[test]
    fn unknown_letter_groups_are_ignored() {
        let mut c = coordinator(1, 1, 100.0, 100.0);
        let done = c.animate_letters(&[99], Direction::In, LetterOptions::default());
        assert_eq!(c.timeline().active(), 0);
        assert!(block_on(done).is_ok());
    }

    #[test]
    fn switch_mode_holds_lock_until_pieces_leave() {
        let mut c = coordinator(2, 2, 200.0, 100.0);
        c.seed(Target::Overlay, Property::Opacity, 0.0);
        assert_eq!(c.mode(), Mode::Design);

        let switch = c.switch_mode().expect("lock was free");
        assert!(c.lock().is_held());
        assert_eq!(c.mode(), Mode::Code);
        let events = c.stage.events();
        assert_eq!(
            events,
            vec!["mode Title mode--code", "mode Contact mode--code"]
        );

        c.tick(0.0);
        let events = c.stage.events();
        assert!(events.contains(&"reveal Title".to_string()));
        assert!(events.contains(&"reveal Contact".to_string()));
        assert!(events.contains(&"reveal Menu".to_string()));

        c.tick(400.0);
        assert!((c.style(Target::Overlay).opacity - 0.5).abs() < 1e-9);
        assert!(c.lock().is_held());

        c.tick(1000.0);
        assert!(block_on(switch).is_ok());
        assert!(!c.lock().is_held());
    }

    #[test]
    fn switch_mode_is_exclusive_while_locked() {
        let mut c = coordinator(2, 2, 200.0, 100.0);
        let switch = c.switch_mode().expect("lock was free");
        let active = c.timeline().active();
        let events = c.stage.events();

        assert!(c.switch_mode().is_none());
        assert_eq!(c.timeline().active(), active);
        assert_eq!(c.stage.events(), events);

        assert!(!c.on_contact_enter());
        assert!(!c.is_fx_triggered());
        assert!(c.on_contact_leave().is_none());
        drop(switch);
        assert!(!c.lock().is_held());
        assert!(c.switch_mode().is_some());
    }

    #[test]
    fn cancelled_switch_still_releases_the_lock() {
        let mut c = coordinator(2, 2, 200.0, 100.0);
        let switch = c.switch_mode().expect("lock was free");
        let targets = c.piece_targets();
        c.timeline.cancel(&targets);
        assert!(matches!(block_on(switch), Err(PiecesError::Cancelled)));
        assert!(!c.lock().is_held());
    }

    #[test]
    fn blocks_without_letters_are_revealed_immediately() {
        let mut rng = SmallRng::seed_from_u64(1);
        let grid = PieceGrid::build(
            Size::new(100.0, 100.0),
            GridConfig::new(1, 1).unwrap(),
            &mut rng,
        )
        .unwrap();
        let stage = RecordingStage::default();
        let mut c = ModeCoordinator::new(stage.clone(), grid, Vec::new(), rng);
        let _switch = c.switch_mode();
        assert_eq!(
            stage.events(),
            vec![
                "mode Title mode--code",
                "reveal Title",
                "mode Contact mode--code",
                "reveal Contact",
                "reveal Menu",
            ]
        );
    }

    #[test]
    fn unmeasured_grid_still_switches_and_builds_later() {
        let rng = SmallRng::seed_from_u64(5);
        let grid = PieceGrid::unmeasured(GridConfig::new(2, 2).unwrap());
        let letters = vec![LetterGroup {
            block: TextBlock::Title,
            len: 3,
        }];
        let stage = RecordingStage::default();
        let mut c = ModeCoordinator::new(stage.clone(), grid, letters, rng);

        let switch = c.switch_mode().expect("lock was free");
        c.tick(0.0);
        assert!(block_on(switch).is_ok());
        assert!(!c.lock().is_held());
        let events = stage.events();
        for block in ["Title", "Contact", "Menu"] {
            assert!(events.contains(&format!("reveal {block}")));
        }
        c.tick(1000.0);
        assert_eq!(c.style(Target::Letter { group: 0, index: 2 }).opacity, 1.0);
        assert_eq!(c.style(Target::Overlay).opacity, 1.0);

        assert!(c.resize(Size::new(0.0, 0.0)).is_err());
        assert!(c.grid().is_empty());
        let layout = c.resize(Size::new(200.0, 100.0)).unwrap();
        assert_eq!(layout.piece_width, 100.0);
        assert_eq!(c.grid().len(), 4);
        for i in 0..4 {
            assert_eq!(c.style(Target::Piece(i)).opacity, 0.0);
        }
    }

    #[test]
    fn resize_passes_through_to_the_grid() {
        let mut c = coordinator(2, 2, 200.0, 100.0);
        let layout = c.resize(Size::new(300.0, 300.0)).unwrap();
        assert_eq!(layout.container, Size::new(300.0, 300.0));
        assert_eq!(c.grid().pieces()[3].width, 150.0);
        assert!(c.resize(Size::new(0.0, 0.0)).is_err());
    }
}
