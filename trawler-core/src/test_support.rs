use rand::RngCore;
use std::collections::VecDeque;

/// RNG replaying a fixed script of `u64` words.
///
/// `from_unit_draws` encodes each value so that `gen::<f64>()` yields it back
/// exactly (53-bit precision). Running past the end of the script panics so a
/// test never silently consumes draws it did not plan for.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedRng {
    words: VecDeque<u64>,
}

impl ScriptedRng {
    pub(crate) fn from_unit_draws(draws: &[f64]) -> Self {
        let scale = (1u64 << 53) as f64;
        let words = draws
            .iter()
            .map(|&draw| {
                assert!((0.0..1.0).contains(&draw), "unit draw out of range: {draw}");
                ((draw * scale) as u64) << 11
            })
            .collect();
        Self { words }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.words.len()
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.words.pop_front().expect("scripted rng exhausted")
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
