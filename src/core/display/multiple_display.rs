use super::display::{Display, DisplayTile};
use crate::core::error::*;
use std::sync::{Arc, PoisonError, RwLock};

/// Forwards every call to a list of displays, stopping at the first error.
#[derive(Default)]
pub struct MultipleDisplay {
    pub displays: Vec<Arc<RwLock<dyn Display>>>,
}

impl MultipleDisplay {
    pub fn new() -> Self {
        MultipleDisplay {
            displays: Vec::new(),
        }
    }

    pub fn add_display(&mut self, display: &Arc<RwLock<dyn Display>>) {
        self.displays.push(display.clone());
    }

    pub fn len(&self) -> usize {
        return self.displays.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.displays.is_empty();
    }
}

impl Display for MultipleDisplay {
    fn start(
        &mut self,
        title: &str,
        resolution: &[usize; 2],
        channel_names: &[&str],
    ) -> Result<(), RenderError> {
        for d in self.displays.iter() {
            let mut display = d.write().unwrap_or_else(PoisonError::into_inner);
            display.start(title, resolution, channel_names)?;
        }
        return Ok(());
    }

    fn update(&mut self, tile: &DisplayTile) -> Result<(), RenderError> {
        for d in self.displays.iter() {
            let mut display = d.write().unwrap_or_else(PoisonError::into_inner);
            display.update(tile)?;
        }
        return Ok(());
    }

    fn end(&mut self) -> Result<(), RenderError> {
        for d in self.displays.iter() {
            let mut display = d.write().unwrap_or_else(PoisonError::into_inner);
            display.end()?;
        }
        return Ok(());
    }
}
