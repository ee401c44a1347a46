//! # Static frame detection

/// Cheap sampled equality check between two frames.
///
/// Comparing every byte of a frame is wasted work on a static webcam shot, so only one pixel in
/// every `sample_step` is compared on each row. The starting column shifts by one on every row,
/// so `sample_step` consecutive rows together cover every column.
///
/// "Identical" here means identical on the sampled subset. A change confined to unsampled
/// pixels is missed; with `sample_step == 1` the check is exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDiffer {
    sample_step: usize,
}

impl Default for FrameDiffer {
    fn default() -> Self {
        Self { sample_step: 2 }
    }
}

impl FrameDiffer {
    /// Create a new differ.
    ///
    /// # Arguments
    ///
    /// * `sample_step` - compare one pixel out of this many per row. Zero is treated as one.
    pub fn new(sample_step: usize) -> Self {
        Self {
            sample_step: sample_step.max(1),
        }
    }

    pub fn sample_step(&self) -> usize {
        self.sample_step
    }

    /// Check whether two frames are the same on the sampled pixels.
    ///
    /// Every channel of a sampled pixel is compared exactly. Buffers of different length are
    /// never the same.
    ///
    /// # Arguments
    ///
    /// * `previous` - previous frame.
    /// * `current` - current frame.
    /// * `stride` - bytes per pixel (4 for RGBA).
    /// * `width` - frame width in pixels. Only decides where rows start for the sampling pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use motion_cam::differ::FrameDiffer;
    ///
    /// let still = vec![0u8; 4 * 4 * 4];
    /// let mut moved = still.clone();
    /// moved[0] = 255;
    ///
    /// let differ = FrameDiffer::new(1);
    /// assert!(differ.same(&still, &still, 4, 4));
    /// assert!(!differ.same(&still, &moved, 4, 4));
    /// ```
    pub fn same(&self, previous: &[u8], current: &[u8], stride: usize, width: usize) -> bool {
        if previous.len() != current.len() {
            return false;
        }

        let stride = stride.max(1);
        let row_bytes = match width.saturating_mul(stride) {
            0 => previous.len().max(1),
            n => n,
        };

        previous
            .chunks(row_bytes)
            .zip(current.chunks(row_bytes))
            .enumerate()
            .all(|(y, (prev_row, cur_row))| {
                prev_row
                    .chunks(stride)
                    .zip(cur_row.chunks(stride))
                    .skip(y % self.sample_step)
                    .step_by(self.sample_step)
                    .all(|(a, b)| a == b)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn frame_4x4() -> Vec<u8> {
        (0..64).map(|i| (i * 3) as u8).collect()
    }

    #[test]
    fn identical_frames() {
        let f = frame_4x4();
        for step in 1..6 {
            assert!(FrameDiffer::new(step).same(&f, &f.clone(), 4, 4));
        }
    }

    #[test]
    fn single_channel_change() {
        let prev = frame_4x4();

        // Every channel of every pixel, exact mode.
        for i in 0..prev.len() {
            let mut cur = prev.clone();
            cur[i] = cur[i].wrapping_add(255);
            assert!(!FrameDiffer::new(1).same(&prev, &cur, 4, 4), "byte {}", i);
        }

        // Pixel (1, 1) is sampled by step 2 on the odd row.
        let mut cur = prev.clone();
        cur[(4 + 1) * 4 + 2] ^= 0xff;
        assert!(!FrameDiffer::new(2).same(&prev, &cur, 4, 4));
    }

    #[test]
    fn unsampled_change_is_missed() {
        let prev = frame_4x4();
        let mut cur = prev.clone();
        // Pixel (1, 0): row 0 samples columns 0 and 2 only.
        cur[4] ^= 0xff;
        assert!(FrameDiffer::new(2).same(&prev, &cur, 4, 4));
        assert!(!FrameDiffer::new(1).same(&prev, &cur, 4, 4));
    }

    #[test]
    fn staggered_rows_cover_all_columns() {
        let (w, h, step) = (9usize, 6usize, 3usize);
        let prev = vec![0u8; w * h * 4];

        // Any column is hit by some row, so a whole changed column is always noticed.
        for x in 0..w {
            let mut cur = prev.clone();
            for y in 0..h {
                cur[(y * w + x) * 4] = 1;
            }
            assert!(!FrameDiffer::new(step).same(&prev, &cur, 4, w), "column {}", x);
        }
    }

    #[test]
    fn length_mismatch() {
        assert!(!FrameDiffer::default().same(&[0; 8], &[0; 12], 4, 2));
    }

    #[test]
    fn degenerate_width() {
        let mut rng = StdRng::seed_from_u64(7);
        let prev: Vec<u8> = (0..48).map(|_| rng.gen()).collect();
        let mut cur = prev.clone();
        assert!(FrameDiffer::new(1).same(&prev, &cur, 4, 0));
        cur[47] ^= 1;
        assert!(!FrameDiffer::new(1).same(&prev, &cur, 4, 0));
        assert!(FrameDiffer::new(1).same(&[], &[], 4, 0));
    }
}
