//! Zone and rate matching.

mod observer;
mod rate;
mod zone;

pub use observer::{MatchObserver, NoopObserver, RateTrace, RecordingObserver};
pub use rate::{Ineligibility, RateEvaluation, RateMatcher, RateSelection};
pub use zone::ZoneMatcher;
