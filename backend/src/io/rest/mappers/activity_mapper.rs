use crate::domain::models::activity::RecentActivity;
use shared::RecentActivityDto;

pub struct ActivityMapper;

impl ActivityMapper {
    pub fn to_dto(activity: RecentActivity) -> RecentActivityDto {
        RecentActivityDto {
            id: activity.id,
            user_id: activity.user_id,
            activity_type: activity.activity_type,
            title: activity.title,
            icon: activity.icon,
            duration: activity.duration,
            action: activity.action,
            timestamp: activity.timestamp,
        }
    }
}
