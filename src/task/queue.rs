use crate::task::executor::TaskExecutor;
use crate::task::types::*;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Outcome of one successful [`TaskQueue::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    /// Nothing was queued
    Empty,
    /// Work remains
    Busy,
    /// The last queued task finished during this tick
    Drained,
}

/// A task failure, reported after the queue cleared itself
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFailure {
    pub task: Task,
    pub error: TaskError,
}

impl std::fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.task, self.error)
    }
}

/// Cooperative FIFO scheduler. Only the head executor is ever driven.
///
/// Per tick: a head that has not started is started, and any run of heads
/// whose start reports nothing to do is drained in the same tick, stopping at
/// the first start that needs ticking. A started head is updated once; when
/// it completes the next head waits for the following tick.
#[derive(Debug, Default)]
pub struct TaskQueue {
    executors: VecDeque<TaskExecutor>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, tasks: impl IntoIterator<Item = Task>) {
        for task in tasks {
            debug!("Queued task {}", task);
            self.executors.push_back(TaskExecutor::new(task));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn current_executor(&self) -> Option<&TaskExecutor> {
        self.executors.front()
    }

    pub fn current_executor_mut(&mut self) -> Option<&mut TaskExecutor> {
        self.executors.front_mut()
    }

    /// Names of every queued task, head first
    pub fn remaining_task_names(&self) -> Vec<String> {
        self.executors
            .iter()
            .map(|executor| executor.task().to_string())
            .collect()
    }

    pub fn tick(&mut self, ctx: &TaskContext) -> Result<QueueStatus, TaskFailure> {
        let mut popped_any = false;

        loop {
            let Some(head) = self.executors.front_mut() else {
                return Ok(if popped_any {
                    QueueStatus::Drained
                } else {
                    QueueStatus::Empty
                });
            };

            if !head.is_started() {
                match head.start(ctx) {
                    Ok(true) => return Ok(QueueStatus::Busy),
                    Ok(false) => {
                        self.executors.pop_front();
                        popped_any = true;
                    }
                    Err(error) => {
                        let task = head.task().clone();
                        return Err(self.fail(task, error));
                    }
                }
                continue;
            }

            return match head.update(ctx) {
                Ok(TaskProgress::StillRunning) => Ok(QueueStatus::Busy),
                Ok(TaskProgress::TaskComplete) => {
                    self.executors.pop_front();
                    Ok(if self.executors.is_empty() {
                        QueueStatus::Drained
                    } else {
                        QueueStatus::Busy
                    })
                }
                Err(error) => {
                    let task = head.task().clone();
                    Err(self.fail(task, error))
                }
            };
        }
    }

    /// Drop every queued task without calling into any executor
    pub fn abort_all(&mut self, reason: &str) {
        if self.executors.is_empty() {
            return;
        }
        info!(
            "Aborting {} queued task(s): {}",
            self.executors.len(),
            reason
        );
        self.executors.clear();
    }

    fn fail(&mut self, task: Task, error: TaskError) -> TaskFailure {
        let behind = self.executors.len().saturating_sub(1);
        if behind > 0 {
            warn!(
                "Dropping {} task(s) queued behind failed task {}",
                behind, task
            );
        }
        self.executors.clear();
        TaskFailure { task, error }
    }
}
