//! Frame lifecycle: insertion (duplicating the previous frame's content),
//! removal, reordering and duration control.

use crate::document::cel::Cel;
use crate::document::layer::LayerId;
use crate::journal::record::Record;
use crate::transaction::guard::Transaction;

impl Transaction<'_> {
    /// Insert a new frame after the current one and select it.
    ///
    /// Every layer's cels at or after the new frame shift one frame later,
    /// and the previous frame's cel content is duplicated into the gap (a
    /// stock copy plus a new cel; a frame with no source cel stays empty).
    #[tracing::instrument(skip(self))]
    pub fn new_frame(&mut self) {
        let frame = self.sprite().current_frame() + 1;
        for id in self.sprite().subtree(self.sprite().root()) {
            if !self.sprite().layer(id).is_image() {
                continue;
            }
            let mut shifting: Vec<u32> = self
                .sprite()
                .layer(id)
                .cels()
                .keys()
                .copied()
                .filter(|&f| f >= frame)
                .collect();
            shifting.reverse();
            for f in shifting {
                self.set_cel_frame(id, f, f + 1);
            }
            self.copy_previous_frame(id, frame);
        }
        self.set_frame_count(self.sprite().total_frames() + 1);
        self.set_current_frame(frame);
    }

    /// Duplicate the cel of `frame - 1` into the vacant `frame`. A true
    /// no-op when the source frame has no cel.
    fn copy_previous_frame(&mut self, layer: LayerId, frame: u32) {
        assert!(frame > 0, "frame 0 has no previous frame to copy");
        let Some(source) = self.sprite().layer(layer).cel(frame - 1).copied() else {
            return;
        };
        let image = self.sprite().stock().get(source.image).clone();
        let index = self.add_image_in_stock(image);
        let cel = Cel {
            x: source.x,
            y: source.y,
            opacity: source.opacity,
            image: index,
        };
        self.add_cel(layer, frame, cel);
    }

    /// Remove a frame: each layer's cel at `frame` is removed (freeing its
    /// stock slot when unshared), later cels shift one frame earlier, the
    /// current frame is clamped into the shrunk range, and the frame count
    /// drops by one. At least two frames must exist.
    #[tracing::instrument(skip(self))]
    pub fn remove_frame(&mut self, frame: u32) {
        let total = self.sprite().total_frames();
        assert!(frame < total, "frame {frame} out of range");
        assert!(total >= 2, "cannot remove the only frame");

        for id in self.sprite().subtree(self.sprite().root()) {
            if !self.sprite().layer(id).is_image() {
                continue;
            }
            if self.sprite().layer(id).cel(frame).is_some() {
                self.remove_cel(id, frame);
            }
            for f in frame + 1..total {
                if self.sprite().layer(id).cel(f).is_some() {
                    self.set_cel_frame(id, f, f - 1);
                }
            }
        }

        let new_total = total - 1;
        if self.sprite().current_frame() >= new_total {
            self.set_current_frame(new_total - 1);
        }
        self.set_frame_count(new_total);
    }

    /// Move `frame`'s content (duration and every layer's cel) so it sits
    /// just before `before_frame`. A no-op when the indices are equal or
    /// either is out of range.
    #[tracing::instrument(skip(self))]
    pub fn move_frame_before(&mut self, frame: u32, before_frame: u32) {
        let total = self.sprite().total_frames();
        if frame == before_frame || frame >= total || before_frame >= total {
            return;
        }

        // Rotate the durations of the affected range.
        let moved = self.sprite().frame_duration(frame);
        if frame < before_frame {
            for f in frame..before_frame - 1 {
                let next = self.sprite().frame_duration(f + 1);
                self.set_frame_duration(f, next);
            }
            self.set_frame_duration(before_frame - 1, moved);
        } else {
            for f in (before_frame + 1..=frame).rev() {
                let previous = self.sprite().frame_duration(f - 1);
                self.set_frame_duration(f, previous);
            }
            self.set_frame_duration(before_frame, moved);
        }

        // Remap cel frame indices by the same rotation. The moving cel is
        // staged through a transient out-of-range slot so every single-step
        // move (and its reverse during undo) lands on a vacant frame.
        let target = if frame < before_frame {
            before_frame - 1
        } else {
            before_frame
        };
        for id in self.sprite().subtree(self.sprite().root()) {
            if !self.sprite().layer(id).is_image() {
                continue;
            }
            let staged = self.sprite().layer(id).cel(frame).is_some();
            if staged {
                self.set_cel_frame(id, frame, total);
            }
            if frame < before_frame {
                for f in frame + 1..before_frame {
                    if self.sprite().layer(id).cel(f).is_some() {
                        self.set_cel_frame(id, f, f - 1);
                    }
                }
            } else {
                for f in (before_frame..frame).rev() {
                    if self.sprite().layer(id).cel(f).is_some() {
                        self.set_cel_frame(id, f, f + 1);
                    }
                }
            }
            if staged {
                self.set_cel_frame(id, total, target);
            }
        }
    }

    /// Change one frame's duration in milliseconds.
    pub fn set_frame_duration(&mut self, frame: u32, millis: u32) {
        let old = self.sprite().frame_duration(frame);
        self.push(Record::SetFrameDuration { frame, millis: old });
        self.sprite_mut().set_frame_duration(frame, millis);
    }

    /// Set every frame's duration to the same value.
    pub fn set_constant_frame_rate(&mut self, millis: u32) {
        for frame in 0..self.sprite().total_frames() {
            let old = self.sprite().frame_duration(frame);
            self.push(Record::SetFrameDuration { frame, millis: old });
        }
        self.sprite_mut().set_all_durations(millis);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transaction/frame_ops.rs"]
mod tests;
