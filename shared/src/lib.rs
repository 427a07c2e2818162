use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of activity categories a slot can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Study,
    Academy,
    School,
    Routine,
    Rest,
    Sleep,
}

impl ActivityType {
    /// Every category, in display order
    pub const ALL: [ActivityType; 6] = [
        ActivityType::Study,
        ActivityType::Academy,
        ActivityType::School,
        ActivityType::Routine,
        ActivityType::Rest,
        ActivityType::Sleep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Study => "study",
            ActivityType::Academy => "academy",
            ActivityType::School => "school",
            ActivityType::Routine => "routine",
            ActivityType::Rest => "rest",
            ActivityType::Sleep => "sleep",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown activity type: {}", s))
    }
}

/// Outcome of a slot. `Skipped` is accepted on the wire but never produced by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Pending,
    Completed,
    Failed,
    Skipped,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Pending => "pending",
            SlotStatus::Completed => "completed",
            SlotStatus::Failed => "failed",
            SlotStatus::Skipped => "skipped",
        }
    }
}

impl FromStr for SlotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SlotStatus::Pending),
            "completed" => Ok(SlotStatus::Completed),
            "failed" => Ok(SlotStatus::Failed),
            "skipped" => Ok(SlotStatus::Skipped),
            other => Err(format!("Unknown slot status: {}", other)),
        }
    }
}

/// How a reward balance is presented to the family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardMode {
    /// Points are minutes of earned screen/game time
    Time,
    /// Points are an amount in a caregiver-chosen unit
    Currency,
}

impl RewardMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardMode::Time => "time",
            RewardMode::Currency => "currency",
        }
    }
}

impl FromStr for RewardMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time" => Ok(RewardMode::Time),
            "currency" => Ok(RewardMode::Currency),
            other => Err(format!("Unknown reward mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeLevel {
    Elementary,
    Middle,
    High,
}

impl GradeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeLevel::Elementary => "elementary",
            GradeLevel::Middle => "middle",
            GradeLevel::High => "high",
        }
    }
}

impl FromStr for GradeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elementary" => Ok(GradeLevel::Elementary),
            "middle" => Ok(GradeLevel::Middle),
            "high" => Ok(GradeLevel::High),
            other => Err(format!("Unknown grade level: {}", other)),
        }
    }
}

/// Whether a schedule is being laid out or has been confirmed for outcome marking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanState {
    #[default]
    Drafting,
    Confirmed,
}

impl PlanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanState::Drafting => "drafting",
            PlanState::Confirmed => "confirmed",
        }
    }
}

impl FromStr for PlanState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drafting" => Ok(PlanState::Drafting),
            "confirmed" => Ok(PlanState::Confirmed),
            other => Err(format!("Unknown plan state: {}", other)),
        }
    }
}

/// One scheduled activity occupying a (day, time) cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Caller-assigned opaque ID, stable across edits and syncs
    pub id: String,
    /// 0..=6 in display order (Saturday first)
    pub day_index: u8,
    /// Half-hour mark such as "09:30"
    pub start_time: String,
    pub duration_minutes: u32,
    pub activity: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub status: SlotStatus,
}

/// Per-child reward table. Missing weights deserialize as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    pub mode: RewardMode,
    pub unit: String,
    #[serde(default)]
    pub study: u32,
    #[serde(default)]
    pub academy: u32,
    #[serde(default)]
    pub school: u32,
    #[serde(default)]
    pub routine: u32,
    #[serde(default)]
    pub rest: u32,
    #[serde(default)]
    pub sleep: u32,
}

/// Append-only record of points spent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub id: String,
    pub child_id: String,
    pub amount: i64,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub reason: Option<String>,
}

/// Represents a child profile owned by one caregiver account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub name: String,
    pub color: String,
    pub grade: GradeLevel,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub plan_state: PlanState,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
    pub color: Option<String>,
    pub grade: GradeLevel,
    /// Seed the schedule with the grade's recommended week instead of an empty grid
    #[serde(default)]
    pub with_template: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub grade: Option<GradeLevel>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPlanStateRequest {
    pub plan_state: PlanState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildResponse {
    pub child: Child,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildListResponse {
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub slots: Vec<TimeSlot>,
}

/// Full locally edited schedule to reconcile against the stored one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncScheduleRequest {
    pub slots: Vec<TimeSlot>,
}

/// Number of writes a sync performed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncScheduleResponse {
    pub slots: Vec<TimeSlot>,
    pub summary: SyncSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyTemplateRequest {
    pub grade: GradeLevel,
}

/// Visible rows of the grid for one child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRangeResponse {
    pub start_time: String,
    pub end_time: String,
    pub times: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendUsageLogRequest {
    pub amount: i64,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogListResponse {
    pub entries: Vec<UsageLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardBalanceResponse {
    pub earned_points: i64,
    pub used_points: i64,
    pub current_balance: i64,
    pub mode: RewardMode,
    pub unit: String,
    pub formatted_earned: String,
    pub formatted_used: String,
    pub formatted_balance: String,
}

/// One slice of the time-by-category chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTime {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub minutes: u32,
    /// Share of all scheduled minutes, 0.0..=100.0
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBreakdownResponse {
    pub total_minutes: u32,
    pub categories: Vec<CategoryTime>,
}

/// Named saved copy of a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub id: String,
    pub child_id: String,
    pub name: String,
    /// Caregiver-facing date label
    pub date: String,
    pub slots: Vec<TimeSlot>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSnapshotRequest {
    pub name: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotListResponse {
    pub snapshots: Vec<ScheduleSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
