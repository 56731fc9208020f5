use tracing::{debug, trace};

use crate::core::Viewport;
use crate::labels::LabelDescriptor;

/// Index of a pooled label slot.
pub type LabelHandle = usize;

/// Host-side consumer of pooled labels.
pub trait LabelController {
    /// Shows or updates the label object behind `handle`.
    fn show(&mut self, handle: LabelHandle, label: &LabelDescriptor);
    /// Hides the label object behind `handle` without freeing it.
    fn hide(&mut self, handle: LabelHandle);
}

#[derive(Debug, Clone, Default)]
struct LabelSlot {
    label: Option<LabelDescriptor>,
    shown: bool,
}

/// Frame-to-frame label arena.
///
/// Each frame resets a cursor, fills slots from the front and leaves the tail
/// hidden, so label objects are reused instead of reallocated.
#[derive(Debug, Clone, Default)]
pub struct LabelPool {
    slots: Vec<LabelSlot>,
    cursor: usize,
    viewport: Option<Viewport>,
    clipped: usize,
}

impl LabelPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self, viewport: Viewport) {
        self.cursor = 0;
        self.clipped = 0;
        self.viewport = Some(viewport);
    }

    /// Places `label` in the next slot; returns `None` when it was clipped away.
    pub fn push(&mut self, label: LabelDescriptor) -> Option<LabelHandle> {
        if label.clip_to_plot {
            if let Some(viewport) = self.viewport {
                if !label.is_inside(viewport) {
                    trace!(key = %label.key, "label outside plot dropped");
                    self.clipped += 1;
                    return None;
                }
            }
        }
        let handle = self.cursor;
        if handle == self.slots.len() {
            self.slots.push(LabelSlot::default());
        }
        self.slots[handle].label = Some(label);
        self.cursor += 1;
        Some(handle)
    }

    pub fn extend<I>(&mut self, labels: I)
    where
        I: IntoIterator<Item = LabelDescriptor>,
    {
        for label in labels {
            self.push(label);
        }
    }

    /// Clears the unused tail of the arena.
    pub fn finish_frame(&mut self) {
        for slot in &mut self.slots[self.cursor..] {
            slot.label = None;
        }
        debug!(
            active = self.cursor,
            capacity = self.slots.len(),
            clipped = self.clipped,
            "label frame finished"
        );
    }

    /// Pushes active labels to `controller` and hides tail slots that were showing.
    pub fn flush<C: LabelController + ?Sized>(&mut self, controller: &mut C) {
        for (handle, slot) in self.slots.iter_mut().enumerate() {
            match &slot.label {
                Some(label) if handle < self.cursor => {
                    controller.show(handle, label);
                    slot.shown = true;
                }
                _ => {
                    if slot.shown {
                        controller.hide(handle);
                        slot.shown = false;
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn active_len(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn get(&self, handle: LabelHandle) -> Option<&LabelDescriptor> {
        if handle >= self.cursor {
            return None;
        }
        self.slots.get(handle).and_then(|slot| slot.label.as_ref())
    }

    /// Active labels in slot order.
    pub fn labels(&self) -> impl Iterator<Item = &LabelDescriptor> {
        self.slots[..self.cursor]
            .iter()
            .filter_map(|slot| slot.label.as_ref())
    }

    #[must_use]
    pub fn find(&self, key: &str) -> Option<&LabelDescriptor> {
        self.labels().find(|label| label.key == key)
    }
}
