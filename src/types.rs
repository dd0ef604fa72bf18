use std::fmt;

/// Category of rebuild work.
///
/// The declaration order is the execution priority: asset pipelines finish
/// before the binary is rebuilt, and tests only run after the binary they
/// exercise. `Ord` is derived from this order, so keep it stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskKind {
    BuildImages,
    BuildStyles,
    BuildJavaScripts,
    BuildBinary,
    BinaryTest,
}

impl TaskKind {
    /// All kinds, in priority order.
    pub const ALL: [TaskKind; 5] = [
        TaskKind::BuildImages,
        TaskKind::BuildStyles,
        TaskKind::BuildJavaScripts,
        TaskKind::BuildBinary,
        TaskKind::BinaryTest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::BuildImages => "build_images",
            TaskKind::BuildStyles => "build_styles",
            TaskKind::BuildJavaScripts => "build_javascripts",
            TaskKind::BuildBinary => "build_binary",
            TaskKind::BinaryTest => "binary_test",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of rebuild work.
///
/// `target` is the root-relative module directory (`"."` for the root
/// package) or empty for project-wide work. Two tasks are the same task iff
/// kind and target match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    pub kind: TaskKind,
    pub target: String,
}

impl Task {
    pub fn new(kind: TaskKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }

    /// A task that applies to the whole project.
    pub fn project_wide(kind: TaskKind) -> Self {
        Self::new(kind, String::new())
    }

    pub fn is_project_wide(&self) -> bool {
        self.target.is_empty()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_project_wide() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({})", self.kind, self.target)
        }
    }
}

/// The task set scheduled after the project configuration changes, or for a
/// one-shot build.
pub fn full_rebuild_tasks() -> Vec<Task> {
    vec![
        Task::project_wide(TaskKind::BuildImages),
        Task::project_wide(TaskKind::BuildStyles),
        Task::project_wide(TaskKind::BuildJavaScripts),
        Task::project_wide(TaskKind::BuildBinary),
    ]
}

/// Outcome of a single executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(i32),
}

impl TaskOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, TaskOutcome::Success)
    }
}
