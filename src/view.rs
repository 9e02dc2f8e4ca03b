//! Flip / auto-rotate / reset state machine and click dispatch.

use crate::scene::{InteractionKind, InteractionMetadata};
use std::f32::consts::PI;

/// In-flight flip tween. Times are seconds on the frame clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipAnimation {
    pub start_time: f64,
    pub start_angle: f32,
    pub target_angle: f32,
    pub duration_ms: f32,
}

impl FlipAnimation {
    /// Linear progress in 0..=1. A zero duration is already complete.
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        let elapsed_ms = ((now - self.start_time) * 1000.0).max(0.0);
        (elapsed_ms as f32 / self.duration_ms).min(1.0)
    }

    pub fn angle_at(&self, now: f64) -> f32 {
        let eased = ease_out_cubic(self.progress(now));
        self.start_angle + (self.target_angle - self.start_angle) * eased
    }
}

#[inline]
pub fn ease_out_cubic(progress: f32) -> f32 {
    1.0 - (1.0 - progress).powi(3)
}

/// Page-lifetime view flags.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub is_flipped: bool,
    pub is_auto_rotating: bool,
    pub is_in_ar: bool,
    pub flip_animation: Option<FlipAnimation>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_flipping(&self) -> bool {
        self.flip_animation.is_some()
    }

    /// Returns the new value, or `None` when refused (in AR).
    pub fn toggle_auto_rotate(&mut self) -> Option<bool> {
        if self.is_in_ar {
            return None;
        }
        self.is_auto_rotating = !self.is_auto_rotating;
        Some(self.is_auto_rotating)
    }

    /// Start a flip from the card's live rotation towards the face that is
    /// now requested. A flip already in flight is replaced, not queued.
    pub fn flip(&mut self, now: f64, current_angle: f32, duration_ms: f32) {
        self.is_flipped = !self.is_flipped;
        let target_angle = if self.is_flipped { PI } else { 0.0 };
        self.flip_animation = Some(FlipAnimation {
            start_time: now,
            start_angle: current_angle,
            target_angle,
            duration_ms,
        });
    }

    /// Rotation to apply this tick, if a flip is running. The record is
    /// dropped once it reaches its target.
    pub fn advance_flip(&mut self, now: f64) -> Option<f32> {
        let anim = self.flip_animation?;
        let angle = anim.angle_at(now);
        if anim.progress(now) >= 1.0 {
            self.flip_animation = None;
        }
        Some(angle)
    }

    /// Clear flip/rotate flags. Refused (returns `false`) in AR, where the
    /// camera belongs to the session host.
    pub fn reset(&mut self) -> bool {
        if self.is_in_ar {
            return false;
        }
        self.is_flipped = false;
        self.is_auto_rotating = false;
        self.flip_animation = None;
        true
    }

    pub fn set_in_ar(&mut self, in_ar: bool) {
        self.is_in_ar = in_ar;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionAction {
    CopyToClipboard(String),
    OpenUrl(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionOutcome {
    pub message: String,
    pub action: Option<InteractionAction>,
}

impl InteractionOutcome {
    fn notify(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action: None,
        }
    }
}

/// Message (and optional side effect) for a click on an element. Social
/// links only navigate when `open_social_links` is set.
pub fn handle_interaction(
    metadata: &InteractionMetadata,
    open_social_links: bool,
) -> Option<InteractionOutcome> {
    let outcome = match metadata.kind {
        InteractionKind::Social => {
            let name = metadata.get("name").unwrap_or("Social");
            let url = metadata.get("url").unwrap_or_default();
            log::info!("[view] {} clicked: {}", name, url);
            InteractionOutcome {
                message: format!("{name} link clicked!"),
                action: (open_social_links && !url.is_empty())
                    .then(|| InteractionAction::OpenUrl(url.to_string())),
            }
        }
        InteractionKind::Contact => InteractionOutcome {
            message: "Contact info copied to clipboard!".to_string(),
            action: metadata
                .get("value")
                .map(|v| InteractionAction::CopyToClipboard(v.to_string())),
        },
        InteractionKind::QrCode => {
            InteractionOutcome::notify("QR Code - Replace with your vCard QR!")
        }
        InteractionKind::Profile => InteractionOutcome::notify(
            "Profile Photo placeholder - Add your image URL in the card configuration",
        ),
        InteractionKind::Logo => InteractionOutcome::notify(
            "Logo placeholder - Add your logo URL in the card configuration",
        ),
        InteractionKind::Decoration => return None,
    };
    Some(outcome)
}
