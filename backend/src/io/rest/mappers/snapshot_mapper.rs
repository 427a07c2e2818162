use shared::{CreateSnapshotRequest, ScheduleSnapshot as SharedSnapshot, SnapshotListResponse};

use crate::domain::commands::snapshot::CreateSnapshotCommand;
use crate::domain::models::ScheduleSnapshot;
use crate::io::rest::mappers::SlotMapper;

pub struct SnapshotMapper;

impl SnapshotMapper {
    pub fn to_create_command(request: CreateSnapshotRequest) -> CreateSnapshotCommand {
        CreateSnapshotCommand {
            name: request.name,
            date: request.date,
        }
    }

    pub fn to_dto(domain: ScheduleSnapshot) -> SharedSnapshot {
        SharedSnapshot {
            slots: SlotMapper::to_dto_list(&domain.slots),
            id: domain.id,
            child_id: domain.child_id,
            name: domain.name,
            date: domain.date,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_list_dto(snapshots: Vec<ScheduleSnapshot>) -> SnapshotListResponse {
        SnapshotListResponse {
            snapshots: snapshots.into_iter().map(Self::to_dto).collect(),
        }
    }
}
