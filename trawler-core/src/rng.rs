//! Deterministic RNG streams segregated by simulation domain.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

/// Bundle of independent RNG streams derived from one user-visible seed.
///
/// Hazard rounds, reward rolls and ambient cues draw from separate streams so
/// that, e.g., an extra leak cue never shifts which hazards a round creates.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    events: CountingRng<SmallRng>,
    rewards: CountingRng<SmallRng>,
    ambience: CountingRng<SmallRng>,
}

impl RngBundle {
    /// Derive all three streams from the seed a trip was launched with.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            events: CountingRng::new(derive_stream_seed(seed, b"events")),
            rewards: CountingRng::new(derive_stream_seed(seed, b"rewards")),
            ambience: CountingRng::new(derive_stream_seed(seed, b"ambience")),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw counts for the events, rewards and ambience streams, in that order.
    #[must_use]
    pub const fn draws(&self) -> [u64; 3] {
        [
            self.events.draws(),
            self.rewards.draws(),
            self.ambience.draws(),
        ]
    }

    /// Access the hazard event stream.
    pub const fn events(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.events
    }

    /// Access the reward stream.
    pub const fn rewards(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.rewards
    }

    /// Access the ambient cue stream.
    pub const fn ambience(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.ambience
    }
}

/// RNG wrapper that counts every draw, so replays can be compared stream by stream.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Draw calls made so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
