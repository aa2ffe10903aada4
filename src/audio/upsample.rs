//! 16 kHz to 48 kHz linear-interpolation upsampler
//!
//! Each input sample becomes a triplet of output samples. The triplet is
//! first written as a hold of the sample; when the next input sample
//! arrives, the last two slots of the previous triplet are rewritten as a
//! ramp towards it. The ramp therefore trails the input by one sample.
//!
//! The very first sample has nothing to ramp from and is left as a hold.
//! Slots that were already handed to the device are never revisited, so
//! the first triplet of a fresh device buffer is not ramped into either.

/// Output samples per input sample
pub const UPSAMPLE_FACTOR: usize = 3;

/// Interpolation state carried across chunks and device buffers
#[derive(Debug, Default, Clone)]
pub struct Upsampler {
    /// Last fully converted input sample
    prev: Option<i16>,
}

impl Upsampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous sample, as at the start of a stream
    pub fn reset(&mut self) {
        self.prev = None;
    }

    /// The last input sample that was converted
    pub fn previous(&self) -> Option<i16> {
        self.prev
    }

    /// Convert as much of `input` as fits into `out`, starting at `pos`
    ///
    /// Returns the number of input samples consumed and the new output
    /// position. A sample whose triplet does not fit is not consumed and
    /// must be offered again once `out` has room.
    pub fn process(&mut self, input: &[i16], out: &mut [i16], mut pos: usize) -> (usize, usize) {
        let mut consumed = 0;

        for &cur in input {
            if pos + UPSAMPLE_FACTOR > out.len() {
                break;
            }

            out[pos..pos + UPSAMPLE_FACTOR].fill(cur);

            if let Some(prev) = self.prev {
                if pos >= UPSAMPLE_FACTOR {
                    let (ramp_a, ramp_b) = ramp(prev, cur);
                    out[pos - 2] = ramp_a;
                    out[pos - 1] = ramp_b;
                }
            }

            self.prev = Some(cur);
            pos += UPSAMPLE_FACTOR;
            consumed += 1;
        }

        (consumed, pos)
    }
}

/// The two interpolated values between `prev` and `cur`
fn ramp(prev: i16, cur: i16) -> (i16, i16) {
    let cur = i32::from(cur);
    let delta = cur - i32::from(prev);
    // Both values lie between prev and cur
    ((cur - 2 * delta / 3) as i16, (cur - delta / 3) as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_samples() {
        let mut up = Upsampler::new();
        let mut out = [0i16; 9];
        let (consumed, pos) = up.process(&[0, 300, -300], &mut out, 0);
        assert_eq!((consumed, pos), (3, 9));
        assert_eq!(out, [0, 100, 200, 300, 100, -100, -300, -300, -300]);
    }

    #[test]
    fn test_delta_formula_with_truncation() {
        let (a, b, c) = (10i16, 17i16, -4i16);
        let mut up = Upsampler::new();
        let mut out = [0i16; 9];
        up.process(&[a, b, c], &mut out, 0);

        let d1 = i32::from(b) - i32::from(a);
        let d2 = i32::from(c) - i32::from(b);
        assert_eq!(out[0], a);
        assert_eq!(i32::from(out[1]), i32::from(b) - 2 * d1 / 3);
        assert_eq!(i32::from(out[2]), i32::from(b) - d1 / 3);
        assert_eq!(out[3], b);
        assert_eq!(i32::from(out[4]), i32::from(c) - 2 * d2 / 3);
        assert_eq!(i32::from(out[5]), i32::from(c) - d2 / 3);
        assert_eq!(out[6], c);
    }

    #[test]
    fn test_output_is_three_times_input() {
        let input: Vec<i16> = (0..100).map(|i| (i * 37 % 200) as i16 - 100).collect();
        let mut out = vec![0i16; 300];
        let mut up = Upsampler::new();
        let (consumed, pos) = up.process(&input, &mut out, 0);
        assert_eq!(consumed, 100);
        assert_eq!(pos, 300);
        for (i, &sample) in input.iter().enumerate() {
            assert_eq!(out[i * UPSAMPLE_FACTOR], sample);
        }
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let mut up = Upsampler::new();
        let mut out = [0i16; 9];
        up.process(&[i16::MIN, i16::MAX, i16::MIN], &mut out, 0);
        assert_eq!(out[0], i16::MIN);
        assert_eq!(out[3], i16::MAX);
        assert!(out[1] > i16::MIN && out[2] > out[1] && out[2] < i16::MAX);
    }

    #[test]
    fn test_stops_when_triplet_does_not_fit() {
        let mut up = Upsampler::new();
        let mut out = [0i16; 10];
        let (consumed, pos) = up.process(&[1, 2, 3, 4], &mut out, 0);
        assert_eq!((consumed, pos), (3, 9));
        assert_eq!(out[9], 0);
        assert_eq!(up.previous(), Some(3));

        // Resumes with the sample that did not fit
        let mut fresh = [0i16; 10];
        let (consumed, pos) = up.process(&[4], &mut fresh, 0);
        assert_eq!((consumed, pos), (1, 3));
        assert_eq!(&fresh[..3], &[4, 4, 4]);
    }

    #[test]
    fn test_continuity_across_chunks() {
        let mut whole = [0i16; 12];
        Upsampler::new().process(&[0, 30, 60, 90], &mut whole, 0);

        let mut split = [0i16; 12];
        let mut up = Upsampler::new();
        let (_, pos) = up.process(&[0, 30], &mut split, 0);
        up.process(&[60, 90], &mut split, pos);

        assert_eq!(whole, split);
    }

    #[test]
    fn test_reset() {
        let mut up = Upsampler::new();
        let mut out = [0i16; 6];
        up.process(&[5], &mut out, 0);
        up.reset();
        assert_eq!(up.previous(), None);
        up.process(&[50], &mut out, 3);
        // No ramp after a reset
        assert_eq!(out, [5, 5, 5, 50, 50, 50]);
    }
}
