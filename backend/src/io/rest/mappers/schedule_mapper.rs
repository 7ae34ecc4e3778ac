use crate::domain::aggregator::ScheduleSnapshot;
use crate::domain::models::schedule::{Schedule, Step};
use shared::{ScheduleDto, ScheduleListResponse, StepDto};

pub struct ScheduleMapper;

impl ScheduleMapper {
    pub fn to_dto(schedule: Schedule) -> ScheduleDto {
        ScheduleDto {
            id: schedule.id,
            user_id: schedule.user_id,
            name: schedule.name,
            steps: schedule.steps.into_iter().map(Self::step_to_dto).collect(),
            is_published: schedule.is_published,
            routine_type: schedule.routine_type,
            creator_role: schedule.creator_role,
            caregiver_id: schedule.caregiver_id,
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }

    pub fn to_list_response(schedules: Vec<Schedule>, snapshot: &ScheduleSnapshot) -> ScheduleListResponse {
        ScheduleListResponse {
            schedules: schedules.into_iter().map(Self::to_dto).collect(),
            source_errors: snapshot.source_errors.clone(),
        }
    }

    pub fn step_to_dto(step: Step) -> StepDto {
        StepDto {
            id: step.id,
            name: step.name,
            icon: step.icon,
            duration: step.duration,
            step_number: step.step_number,
            notes: step.notes,
            color_tag: step.color_tag,
            voice_prompt: step.voice_prompt,
            audio_note: step.audio_note,
        }
    }

    pub fn step_from_dto(dto: StepDto) -> Step {
        Step {
            id: dto.id,
            name: dto.name,
            icon: dto.icon,
            duration: dto.duration,
            step_number: dto.step_number,
            notes: dto.notes,
            color_tag: dto.color_tag,
            voice_prompt: dto.voice_prompt,
            audio_note: dto.audio_note,
        }
    }
}
