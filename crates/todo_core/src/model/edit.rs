use super::task::TaskId;

/// Single-slot edit state for the task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing { task_id: TaskId, draft: String },
}

impl EditState {
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::Idle => None,
            Self::Editing { task_id, .. } => Some(*task_id),
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Editing { draft, .. } => Some(draft.as_str()),
        }
    }

    pub fn is_editing(&self, id: TaskId) -> bool {
        self.task_id() == Some(id)
    }
}
