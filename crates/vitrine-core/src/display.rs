//! Advertising-display rotation.

use crate::templates::{Template, TemplateId, TemplateStore};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Advertising display errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayError {
    #[error("Display interval must be at least one second")]
    InvalidInterval,
    #[error("Select at least one template before going fullscreen")]
    NothingSelected,
}

/// Which saved templates rotate on the display, and which one is showing.
#[derive(Debug, Clone)]
pub struct AdvertisingDisplay {
    selected: Vec<TemplateId>,
    current: usize,
    interval: Duration,
    /// Time accumulated towards the next rotation.
    elapsed: Duration,
    fullscreen: bool,
}

impl Default for AdvertisingDisplay {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
            current: 0,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            elapsed: Duration::ZERO,
            fullscreen: false,
        }
    }
}

impl AdvertisingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the template to the rotation, or remove it if already present.
    pub fn toggle_template(&mut self, id: &str) {
        if let Some(index) = self.selected.iter().position(|t| t == id) {
            self.selected.remove(index);
        } else {
            self.selected.push(id.to_string());
        }
        self.restart();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|t| t == id)
    }

    /// Selected template ids in rotation order.
    pub fn selected(&self) -> &[TemplateId] {
        &self.selected
    }

    /// Drop selections whose template no longer exists.
    pub fn prune(&mut self, store: &TemplateStore) {
        let before = self.selected.len();
        self.selected.retain(|id| store.contains(id));
        if self.selected.len() != before {
            self.restart();
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Set the rotation interval in whole seconds. Zero is rejected.
    pub fn set_interval_secs(&mut self, secs: u64) -> Result<(), DisplayError> {
        if secs == 0 {
            return Err(DisplayError::InvalidInterval);
        }
        self.interval = Duration::from_secs(secs);
        self.elapsed = Duration::ZERO;
        Ok(())
    }

    /// Advance the clock. Returns true if the showing template changed.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.selected.is_empty() {
            self.elapsed = Duration::ZERO;
            return false;
        }
        self.elapsed += elapsed;
        let mut advanced = false;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.current = (self.current + 1) % self.selected.len();
            advanced = true;
        }
        advanced
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_template_id(&self) -> Option<&str> {
        self.selected.get(self.current).map(String::as_str)
    }

    pub fn current_template<'a>(&self, store: &'a TemplateStore) -> Option<&'a Template> {
        self.current_template_id().and_then(|id| store.get(id))
    }

    pub fn enter_fullscreen(&mut self) -> Result<(), DisplayError> {
        if self.selected.is_empty() {
            return Err(DisplayError::NothingSelected);
        }
        self.fullscreen = true;
        Ok(())
    }

    pub fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        if self.current >= self.selected.len() {
            self.current = 0;
        }
    }
}
