mod answers;
mod calculation;
mod chat;
mod job;
mod results;
mod sex;
mod sick_leave;
mod statistics;

pub use answers::{AnswerSet, AnswerUpdate, DEFAULT_RETIREMENT_AGE};
pub use calculation::{
    AnalysisReply, AnalysisReport, CalculationDetail, CalculationPage, CalculationRequest,
    CalculationResponse, DEFAULT_PAGE_SIZE, ExportFormat, JobPayload, LeavePayload,
};
pub use chat::{AssistantProfile, ChatMessage, ChatReply};
pub use job::{JobHistorySummary, JobId, JobRecord, sort_jobs};
pub use results::PensionResults;
pub use sex::Sex;
pub use sick_leave::{SickLeave, SickLeaveOption};
pub use statistics::{HealthStatus, LifeExpectancy, Statistics, YearValue};
