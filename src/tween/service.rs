//! Tween service: time-driven interpolation of widget properties.
//!
//! A tween snapshots the current values of its target properties when it is
//! created. Each tick writes `original + (target - original) * eased_alpha`
//! through [`Scene::set_property`], with the owning widget's redraw blocked so
//! a tick produces one redraw. Tweens that stop playing leave the active set
//! and fire their ended signal.

use slotmap::{new_key_type, SlotMap};

use super::easing::Easing;
use crate::error::{GuiError, Result};
use crate::geometry::{Color, UDim, UDim2, Vec2};
use crate::reactive::Signal;
use crate::scene::{property::type_error, PropertyValue, Scene, WidgetId};

new_key_type! {
    /// Handle to a tween owned by a [`TweenService`].
    pub struct TweenId;
}

/// Lifecycle state of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenStatus {
    Paused,
    Playing,
    Canceled,
    Ended,
}

/// Timing of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenInfo {
    /// Seconds from start to end.
    pub duration: f64,
    pub easing: Easing,
}

impl TweenInfo {
    pub fn new(duration: f64, easing: Easing) -> Self {
        Self { duration, easing }
    }
}

impl Default for TweenInfo {
    fn default() -> Self {
        Self { duration: 1.0, easing: Easing::Linear }
    }
}

struct Tween {
    widget: WidgetId,
    /// (name, original, target) per tracked property.
    tracks: Vec<(String, PropertyValue, PropertyValue)>,
    info: TweenInfo,
    status: TweenStatus,
    started_at: f64,
    /// Progress kept across a pause, in seconds.
    elapsed: f64,
    ended: Signal<TweenStatus>,
}

impl Tween {
    fn alpha(&self, now: f64) -> f64 {
        if self.info.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.info.duration).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// TweenService
// ---------------------------------------------------------------------------

/// Owns every tween and drives the playing ones once per frame.
#[derive(Default)]
pub struct TweenService {
    tweens: SlotMap<TweenId, Tween>,
    /// Playing tweens in play order.
    active: Vec<TweenId>,
}

impl std::fmt::Debug for TweenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenService")
            .field("tweens", &self.tweens.len())
            .field("active", &self.active.len())
            .finish()
    }
}

impl TweenService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paused tween of `widget`'s `targets`.
    ///
    /// Every name must exist on the widget, hold an interpolable type, and
    /// match the target's type. The current values are captured as the
    /// interpolation base and the values [`cancel`](Self::cancel) restores.
    pub fn create<S: Into<String>>(
        &mut self,
        scene: &Scene,
        widget: WidgetId,
        targets: impl IntoIterator<Item = (S, PropertyValue)>,
        info: TweenInfo,
    ) -> Result<TweenId> {
        if !info.duration.is_finite() || info.duration < 0.0 {
            return Err(GuiError::InvalidWidget(format!("tween duration {} is invalid", info.duration)));
        }
        let mut tracks = Vec::new();
        for (name, target) in targets {
            let name = name.into();
            let original = scene.property(widget, &name)?;
            if original.kind() != target.kind() {
                return Err(type_error(&name, original.kind(), target.kind()));
            }
            if !target.kind().is_interpolable() {
                return Err(GuiError::NotInterpolable(name));
            }
            tracks.push((name, original, target));
        }
        let id = self.tweens.insert(Tween {
            widget,
            tracks,
            info,
            status: TweenStatus::Paused,
            started_at: 0.0,
            elapsed: 0.0,
            ended: Signal::new(),
        });
        tracing::debug!(?id, ?widget, "tween created");
        Ok(id)
    }

    /// Start or resume playback at `now`.
    ///
    /// A paused tween resumes from its kept progress; an ended or canceled
    /// one restarts from the beginning.
    pub fn play(&mut self, id: TweenId, now: f64) -> Result<()> {
        let tween = self.tweens.get_mut(id).ok_or(GuiError::UnknownTween)?;
        match tween.status {
            TweenStatus::Playing => return Err(GuiError::TweenAlreadyPlaying),
            TweenStatus::Paused => {}
            TweenStatus::Ended | TweenStatus::Canceled => tween.elapsed = 0.0,
        }
        tween.status = TweenStatus::Playing;
        tween.started_at = now - tween.elapsed;
        self.active.push(id);
        tracing::debug!(?id, "tween playing");
        Ok(())
    }

    /// Stop a playing tween, keeping its progress. Other states are left
    /// alone.
    pub fn pause(&mut self, id: TweenId, now: f64) -> Result<()> {
        let tween = self.tweens.get_mut(id).ok_or(GuiError::UnknownTween)?;
        if tween.status == TweenStatus::Playing {
            tween.status = TweenStatus::Paused;
            tween.elapsed = (now - tween.started_at).max(0.0);
            self.active.retain(|&a| a != id);
            tracing::debug!(?id, elapsed = tween.elapsed, "tween paused");
        }
        Ok(())
    }

    /// Restore every tracked property to its captured value and mark the
    /// tween canceled. Fires the ended signal.
    pub fn cancel(&mut self, id: TweenId, scene: &mut Scene) -> Result<()> {
        let tween = self.tweens.get_mut(id).ok_or(GuiError::UnknownTween)?;
        let widget = tween.widget;
        if scene.contains(widget) {
            scene.with_redraw_blocked(widget, |scene| {
                for (name, original, _) in &tween.tracks {
                    if let Err(err) = scene.set_property(widget, name, original.clone()) {
                        tracing::error!(?id, property = %name, error = %err, "tween restore failed");
                    }
                }
            });
        }
        tween.status = TweenStatus::Canceled;
        self.active.retain(|&a| a != id);
        tracing::debug!(?id, "tween canceled");
        tween.ended.fire(&TweenStatus::Canceled);
        Ok(())
    }

    /// Drop a tween entirely. Returns whether it existed.
    pub fn remove(&mut self, id: TweenId) -> bool {
        self.active.retain(|&a| a != id);
        self.tweens.remove(id).is_some()
    }

    pub fn status(&self, id: TweenId) -> Option<TweenStatus> {
        self.tweens.get(id).map(|t| t.status)
    }

    /// Fires with the final status when the tween stops playing.
    pub fn ended_signal(&self, id: TweenId) -> Result<Signal<TweenStatus>> {
        self.tweens.get(id).map(|t| t.ended.clone()).ok_or(GuiError::UnknownTween)
    }

    /// Number of playing tweens.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Drop every tween.
    pub fn reset(&mut self) {
        self.tweens.clear();
        self.active.clear();
    }

    /// Advance every playing tween to `now`.
    ///
    /// Write failures are logged and the tween keeps running. A tween whose
    /// widget was destroyed is canceled.
    pub fn update(&mut self, now: f64, scene: &mut Scene) {
        for id in self.active.clone() {
            let Some(tween) = self.tweens.get_mut(id) else { continue };
            let widget = tween.widget;
            if !scene.contains(widget) {
                tracing::debug!(?id, ?widget, "tween target destroyed");
                tween.status = TweenStatus::Canceled;
            } else {
                let eased = tween.info.easing.apply(tween.alpha(now));
                scene.with_redraw_blocked(widget, |scene| {
                    for (name, original, target) in &tween.tracks {
                        let Some(value) = interpolate(original, target, eased) else { continue };
                        if let Err(err) = scene.set_property(widget, name, value) {
                            tracing::error!(?id, property = %name, error = %err, "tween write failed");
                        }
                    }
                });
                if now > tween.started_at + tween.info.duration {
                    tween.status = TweenStatus::Ended;
                }
            }
            if tween.status != TweenStatus::Playing {
                let status = tween.status;
                let ended = tween.ended.clone();
                self.active.retain(|&a| a != id);
                tracing::debug!(?id, ?status, "tween finished");
                ended.fire(&status);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

fn lerp(start: f64, end: f64, alpha: f64) -> f64 {
    start + (end - start) * alpha
}

fn lerp32(start: f32, end: f32, alpha: f64) -> f32 {
    lerp(f64::from(start), f64::from(end), alpha) as f32
}

fn lerp_channel(start: u8, end: u8, alpha: f64) -> u8 {
    lerp(f64::from(start), f64::from(end), alpha).round().clamp(0.0, 255.0) as u8
}

fn lerp_udim(start: UDim, end: UDim, alpha: f64) -> UDim {
    UDim::new(lerp32(start.scale, end.scale, alpha), lerp32(start.offset, end.offset, alpha))
}

/// Value `alpha` of the way from `start` to `end`, component-wise. Integers
/// round and color channels saturate. `None` when the kinds differ or the
/// kind cannot be interpolated.
pub fn interpolate(start: &PropertyValue, end: &PropertyValue, alpha: f64) -> Option<PropertyValue> {
    let value = match (start, end) {
        (PropertyValue::Int(a), PropertyValue::Int(b)) => {
            PropertyValue::Int(lerp(*a as f64, *b as f64, alpha).round() as i64)
        }
        (PropertyValue::Float(a), PropertyValue::Float(b)) => PropertyValue::Float(lerp(*a, *b, alpha)),
        (PropertyValue::Color(a), PropertyValue::Color(b)) => PropertyValue::Color(Color::rgba(
            lerp_channel(a.r, b.r, alpha),
            lerp_channel(a.g, b.g, alpha),
            lerp_channel(a.b, b.b, alpha),
            lerp_channel(a.a, b.a, alpha),
        )),
        (PropertyValue::Vec2(a), PropertyValue::Vec2(b)) => {
            PropertyValue::Vec2(Vec2::new(lerp32(a.x, b.x, alpha), lerp32(a.y, b.y, alpha)))
        }
        (PropertyValue::UDim2(a), PropertyValue::UDim2(b)) => PropertyValue::UDim2(UDim2 {
            x: lerp_udim(a.x, b.x, alpha),
            y: lerp_udim(a.y, b.y, alpha),
        }),
        _ => return None,
    };
    Some(value)
}

// ===========================================================================
// Tests
// ===========================================================================
