// Gesture state
//
// At most one gesture exists at a time and it belongs to the pointer that
// started it. The cell hands the gesture out by value on commit or cancel so
// nothing keeps a reference to a finished interaction.

use chrono::{DateTime, Utc};

use super::autoscroll::AutoScrollTask;

/// What the active gesture does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    Creating,
    Moving,
    ResizingStart,
    ResizingEnd,
}

/// The tentative result of a gesture, drawn while the pointer is down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub event_id: Option<String>,
    pub resource_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// State of one pointer interaction, from press to release.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub pointer_id: u64,
    pub mode: GestureMode,
    pub event_id: Option<String>,
    pub resource_id: String,
    pub origin_start: DateTime<Utc>,
    pub origin_end: DateTime<Utc>,
    pub start_slot_idx: usize,
    /// Pointer position at press, in viewport coordinates.
    pub start_client: (f32, f32),
    /// Latest pointer position, in viewport coordinates.
    pub last_client: (f32, f32),
    /// Set once the pointer travelled past the drag threshold.
    pub moved: bool,
    pub preview: Option<Preview>,
    pub autoscroll: AutoScrollTask,
}

/// Single-owner slot for the active gesture.
#[derive(Debug, Default)]
pub struct GestureCell {
    active: Option<Gesture>,
}

impl GestureCell {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn get(&self) -> Option<&Gesture> {
        self.active.as_ref()
    }

    /// Mutable access for the owning pointer only.
    pub fn get_for(&mut self, pointer_id: u64) -> Option<&mut Gesture> {
        self.active.as_mut().filter(|g| g.pointer_id == pointer_id)
    }

    pub fn get_mut(&mut self) -> Option<&mut Gesture> {
        self.active.as_mut()
    }

    /// Install a new gesture. Refused while another one is active.
    pub fn begin(&mut self, gesture: Gesture) -> bool {
        if self.active.is_some() {
            return false;
        }
        log::trace!(
            "Gesture {:?} started by pointer {}",
            gesture.mode,
            gesture.pointer_id
        );
        self.active = Some(gesture);
        true
    }

    /// Remove and return the gesture, stopping its autoscroll task.
    pub fn take(&mut self) -> Option<Gesture> {
        let mut gesture = self.active.take()?;
        gesture.autoscroll.stop();
        Some(gesture)
    }
}
