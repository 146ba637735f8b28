//! System-wide constants for the PariPool voting engine.

/// Number of fixed voting options per round.
pub const OPTION_COUNT: usize = 4;

/// Default per-round participant capacity.
pub const DEFAULT_CAPACITY: usize = 500;

/// Default option display labels used until an administrator sets real ones.
pub const DEFAULT_OPTION_LABELS: [&str; OPTION_COUNT] =
    ["Option A", "Option B", "Option C", "Option D"];

/// Domain-separation prefix for settlement digests.
pub const SETTLEMENT_DIGEST_DOMAIN: &[u8] = b"paripool:settlement:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "PariPool";
