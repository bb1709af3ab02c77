//! A small tween engine: batches of per-target tracks advanced by wall-clock
//! ticks, with last-writer-wins cancellation.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::easing::Easing;
use crate::error::PiecesError;

/// Animatable style properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    TranslateX,
    TranslateY,
    Opacity,
}

impl Property {
    /// Value of an element nobody has animated yet.
    pub fn rest(self) -> f64 {
        match self {
            Property::TranslateX | Property::TranslateY => 0.0,
            Property::Opacity => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub property: Property,
    /// `None` starts from the target's current value.
    pub from: Option<f64>,
    pub to: f64,
    pub duration: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn to(property: Property, to: f64, duration: f64, easing: Easing) -> Self {
        Tween {
            property,
            from: None,
            to,
            duration,
            easing,
        }
    }

    pub fn between(property: Property, from: f64, to: f64, duration: f64, easing: Easing) -> Self {
        Tween {
            property,
            from: Some(from),
            to,
            duration,
            easing,
        }
    }

    fn value_at(&self, from: f64, local: f64) -> f64 {
        let progress = if self.duration <= 0.0 {
            if local >= 0.0 { 1.0 } else { 0.0 }
        } else {
            (local / self.duration).clamp(0.0, 1.0)
        };
        from + (self.to - from) * self.easing.apply(progress)
    }
}

/// Tweens applied to one target after `delay` milliseconds.
#[derive(Clone, Debug)]
pub struct Track<T> {
    pub target: T,
    pub delay: f64,
    pub tweens: Vec<Tween>,
}

impl<T> Track<T> {
    fn end(&self) -> f64 {
        self.tweens
            .iter()
            .map(|t| self.delay + t.duration.max(0.0))
            .fold(self.delay, f64::max)
    }
}

pub type Hook = Box<dyn FnOnce()>;

/// Everything started by one call into the engine.
pub struct Batch<T> {
    pub tracks: Vec<Track<T>>,
    begin: Option<Hook>,
}

impl<T> Batch<T> {
    pub fn new(tracks: Vec<Track<T>>) -> Self {
        Batch {
            tracks,
            begin: None,
        }
    }

    /// Run `hook` once, when the earliest track leaves its delay.
    pub fn on_begin(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.begin = Some(Box::new(hook));
        self
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Batch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch")
            .field("tracks", &self.tracks)
            .field("begin", &self.begin.is_some())
            .finish()
    }
}

/// Resolves once the batch has finished, or with `Cancelled` if every one of
/// its tracks was cancelled first.
#[derive(Debug)]
pub struct Completion(oneshot::Receiver<()>);

impl Future for Completion {
    type Output = Result<(), PiecesError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0)
            .poll(cx)
            .map(|r| r.map_err(|_| PiecesError::Cancelled))
    }
}

struct ResolvedTrack<T> {
    target: T,
    delay: f64,
    tweens: Vec<(Tween, f64)>,
    end: f64,
}

struct Running<T> {
    start: f64,
    tracks: Vec<ResolvedTrack<T>>,
    begin: Option<Hook>,
    first_delay: f64,
    done: Option<oneshot::Sender<()>>,
}

fn earliest_delay(delays: impl Iterator<Item = f64>) -> f64 {
    delays.fold(f64::INFINITY, f64::min)
}

/// Current rendered state of one target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetStyle {
    pub translate_x: f64,
    pub translate_y: f64,
    pub opacity: f64,
}

impl TargetStyle {
    pub fn transform_css(&self) -> String {
        crate::css::transform_css(self.translate_x, self.translate_y)
    }

    pub fn opacity_css(&self) -> String {
        format!("{}", self.opacity)
    }
}

pub struct Timeline<T> {
    running: Vec<Running<T>>,
    values: HashMap<(T, Property), f64>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Timeline {
            running: Vec::new(),
            values: HashMap::new(),
        }
    }
}

impl<T> std::fmt::Debug for Timeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("running", &self.running.len())
            .field("values", &self.values.len())
            .finish()
    }
}

impl<T: Copy + Eq + Hash> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, target: T, property: Property) -> f64 {
        self.values
            .get(&(target, property))
            .copied()
            .unwrap_or_else(|| property.rest())
    }

    pub fn style(&self, target: T) -> TargetStyle {
        TargetStyle {
            translate_x: self.value(target, Property::TranslateX),
            translate_y: self.value(target, Property::TranslateY),
            opacity: self.value(target, Property::Opacity),
        }
    }

    /// Force a value outside of any tween.
    pub fn set(&mut self, target: T, property: Property, value: f64) {
        self.values.insert((target, property), value);
    }

    /// Number of batches still in flight.
    pub fn active(&self) -> usize {
        self.running.len()
    }

    pub fn is_animating(&self, target: T) -> bool {
        self.running
            .iter()
            .any(|r| r.tracks.iter().any(|t| t.target == target))
    }

    /// Start a batch at `now`. `from: None` tweens capture the current value here.
    pub fn play(&mut self, batch: Batch<T>, now: f64) -> Completion {
        let (tx, rx) = oneshot::channel();
        let Batch { tracks, begin } = batch;
        if tracks.is_empty() {
            if let Some(hook) = begin {
                hook();
            }
            let _ = tx.send(());
            return Completion(rx);
        }
        let first_delay = earliest_delay(tracks.iter().map(|t| t.delay));
        let tracks: Vec<ResolvedTrack<T>> = tracks
            .into_iter()
            .map(|track| {
                let end = track.end();
                let tweens = track
                    .tweens
                    .iter()
                    .map(|tw| {
                        let from = tw
                            .from
                            .unwrap_or_else(|| self.value(track.target, tw.property));
                        (*tw, from)
                    })
                    .collect();
                ResolvedTrack {
                    target: track.target,
                    delay: track.delay,
                    tweens,
                    end,
                }
            })
            .collect();
        self.running.push(Running {
            start: now,
            tracks,
            begin,
            first_delay,
            done: Some(tx),
        });
        Completion(rx)
    }

    /// Drop every running track on `targets`. Batches left empty are
    /// discarded without completing; the rest begin with their earliest
    /// surviving track.
    pub fn cancel(&mut self, targets: &[T]) {
        for running in &mut self.running {
            running.tracks.retain(|t| !targets.contains(&t.target));
            running.first_delay = earliest_delay(running.tracks.iter().map(|t| t.delay));
        }
        self.running.retain(|r| !r.tracks.is_empty());
    }

    /// Advance all batches to `now`; returns the targets whose style changed.
    pub fn tick(&mut self, now: f64) -> Vec<T> {
        let mut touched: Vec<T> = Vec::new();
        let mut hooks: Vec<Hook> = Vec::new();
        let mut finished: Vec<oneshot::Sender<()>> = Vec::new();
        let values = &mut self.values;

        self.running.retain_mut(|running| {
            let elapsed = now - running.start;
            if elapsed >= running.first_delay
                && let Some(hook) = running.begin.take()
            {
                hooks.push(hook);
            }
            let mut all_done = true;
            for track in &running.tracks {
                let local = elapsed - track.delay;
                for (tween, from) in &track.tweens {
                    values.insert((track.target, tween.property), tween.value_at(*from, local));
                }
                if !touched.contains(&track.target) {
                    touched.push(track.target);
                }
                if elapsed < track.end {
                    all_done = false;
                }
            }
            if all_done {
                if let Some(tx) = running.done.take() {
                    finished.push(tx);
                }
                return false;
            }
            true
        });

        for hook in hooks {
            hook();
        }
        for tx in finished {
            let _ = tx.send(());
        }
        touched
    }
}
