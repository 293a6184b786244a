//! Crew notification banner and its fade model.
use serde::{Deserialize, Serialize};

use crate::constants::BANNER_FADE_STEP;

/// What the presentation layer should do with the banner text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Show,
    Fade,
    Expire,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub directive: Directive,
}

impl Notification {
    fn new(text: &str, directive: Directive) -> Self {
        Self {
            text: text.to_string(),
            directive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationBanner {
    message: String,
    alpha: f32,
    fading: bool,
}

impl Default for NotificationBanner {
    fn default() -> Self {
        Self {
            message: String::new(),
            alpha: 1.0,
            fading: false,
        }
    }
}

impl NotificationBanner {
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    #[must_use]
    pub const fn is_fading(&self) -> bool {
        self.fading
    }

    /// Replace the banner text. Repeating the current text is ignored.
    pub fn post(&mut self, text: &str) -> Option<Notification> {
        if self.message == text {
            return None;
        }
        self.message = text.to_string();
        self.alpha = 1.0;
        self.fading = false;
        Some(Notification::new(text, Directive::Show))
    }

    /// Begin fading a visible message.
    pub fn start_fade(&mut self) -> Option<Notification> {
        if self.message.is_empty() || self.fading {
            return None;
        }
        self.fading = true;
        Some(Notification::new(&self.message, Directive::Fade))
    }

    /// One fine tick of fading; clears the message once alpha drops below zero.
    pub fn step(&mut self) -> Option<Notification> {
        if !self.fading {
            return None;
        }
        self.alpha -= BANNER_FADE_STEP;
        if self.alpha >= 0.0 {
            return None;
        }
        let expired = Notification::new(&self.message, Directive::Expire);
        self.clear();
        Some(expired)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_text_is_not_reposted() {
        let mut banner = NotificationBanner::default();
        assert_eq!(
            banner.post("We've got a leak!").map(|n| n.directive),
            Some(Directive::Show)
        );
        assert!(banner.post("We've got a leak!").is_none());
        assert!(banner.post("Our nets are torn!").is_some());
    }

    #[test]
    fn empty_banner_never_fades() {
        let mut banner = NotificationBanner::default();
        assert!(banner.start_fade().is_none());
        assert!(banner.step().is_none());
    }

    #[test]
    fn fade_expires_after_alpha_runs_out() {
        let mut banner = NotificationBanner::default();
        banner.post("Yoba be praised!");
        assert_eq!(
            banner.start_fade().map(|n| n.directive),
            Some(Directive::Fade)
        );
        let mut steps = 0;
        let expired = loop {
            steps += 1;
            if let Some(notification) = banner.step() {
                break notification;
            }
            assert!(steps < 20, "banner never expired");
        };
        assert_eq!(expired.directive, Directive::Expire);
        assert_eq!(expired.text, "Yoba be praised!");
        assert!(steps >= 10);
        assert!(banner.message().is_empty());
        assert!((banner.alpha() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn new_post_interrupts_fade() {
        let mut banner = NotificationBanner::default();
        banner.post("We've got a leak!");
        banner.start_fade();
        banner.step();
        banner.post("We're taking on water!");
        assert!(!banner.is_fading());
        assert!((banner.alpha() - 1.0).abs() < f32::EPSILON);
    }
}
