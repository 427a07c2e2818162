pub mod child_mapper;
pub mod reward_mapper;
pub mod slot_mapper;
pub mod snapshot_mapper;
pub mod usage_log_mapper;

pub use child_mapper::ChildMapper;
pub use reward_mapper::RewardMapper;
pub use slot_mapper::SlotMapper;
pub use snapshot_mapper::SnapshotMapper;
pub use usage_log_mapper::UsageLogMapper;
