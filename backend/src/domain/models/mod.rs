//! Domain models. These carry parsed, validated values; the wire shapes live
//! in the `shared` crate and are converted by the REST mappers.

pub mod child;
pub mod reward;
pub mod slot;
pub mod snapshot;
pub mod usage_log;

pub use child::{ChildContext, ChildProfile};
pub use reward::{RewardConfig, RewardWeights};
pub use slot::{Slot, MAX_SLOT_MINUTES, STANDARD_SLOT_MINUTES};
pub use snapshot::ScheduleSnapshot;
pub use usage_log::UsageLogEntry;
