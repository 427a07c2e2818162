// Repository modules
pub mod child_repository;
pub mod reward_config_repository;
pub mod schedule_repository;
pub mod snapshot_repository;
pub mod usage_log_repository;

mod row;

pub use child_repository::ChildRepository;
pub use reward_config_repository::RewardConfigRepository;
pub use schedule_repository::ScheduleRepository;
pub use snapshot_repository::SnapshotRepository;
pub use usage_log_repository::UsageLogRepository;
