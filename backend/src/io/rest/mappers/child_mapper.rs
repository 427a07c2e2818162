use shared::{
    Child as SharedChild, ChildListResponse, ChildResponse, CreateChildRequest, TimeRangeResponse,
    UpdateChildRequest,
};

use crate::domain::commands::child::{CreateChildCommand, UpdateChildCommand};
use crate::domain::grid::{TimeMark, TimeRange};
use crate::domain::models::ChildProfile;

/// Mapper between child DTOs and domain child profiles
pub struct ChildMapper;

impl ChildMapper {
    pub fn to_create_command(request: CreateChildRequest) -> CreateChildCommand {
        CreateChildCommand {
            name: request.name,
            color: request.color,
            grade: request.grade,
            with_template: request.with_template,
        }
    }

    pub fn to_update_command(request: UpdateChildRequest) -> UpdateChildCommand {
        UpdateChildCommand {
            name: request.name,
            color: request.color,
            grade: request.grade,
            start_time: request.start_time,
            end_time: request.end_time,
        }
    }

    /// The owner never leaves the server
    pub fn to_dto(domain: ChildProfile) -> SharedChild {
        SharedChild {
            id: domain.id,
            name: domain.name,
            color: domain.color,
            grade: domain.grade,
            start_time: domain.start_time.map(|mark| mark.as_str().to_string()),
            end_time: domain.end_time.map(|mark| mark.as_str().to_string()),
            plan_state: domain.plan_state,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_child_response(domain: ChildProfile, success_message: impl Into<String>) -> ChildResponse {
        ChildResponse {
            child: Self::to_dto(domain),
            success_message: success_message.into(),
        }
    }

    pub fn to_child_list_dto(domain_children: Vec<ChildProfile>) -> ChildListResponse {
        ChildListResponse {
            children: domain_children.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_time_range_dto(range: &TimeRange) -> TimeRangeResponse {
        TimeRangeResponse {
            start_time: range.start().as_str().to_string(),
            end_time: range.end().as_str().to_string(),
            times: range.marks().map(TimeMark::as_str).map(String::from).collect(),
        }
    }
}
