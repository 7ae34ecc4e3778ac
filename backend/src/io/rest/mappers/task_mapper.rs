use crate::domain::models::task::Task;
use shared::TaskDto;

pub struct TaskMapper;

impl TaskMapper {
    pub fn to_dto(task: Task) -> TaskDto {
        TaskDto {
            id: task.id,
            user_id: task.user_id,
            title: task.title,
            done: task.done,
            created_at: task.created_at,
        }
    }
}
