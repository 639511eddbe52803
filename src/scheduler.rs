use super::*;

/// Work a timer performs when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimerTask {
    HideSuccess { form: NodeId, token: u64 },
    FilterMenu { input: NodeId },
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) task: TimerTask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
}

/// One-shot timers on a virtual clock, fired in `(due_at, order)` order.
#[derive(Debug)]
pub(crate) struct Scheduler {
    pub(crate) now_ms: i64,
    pub(crate) timer_step_limit: usize,
    task_queue: Vec<ScheduledTask>,
    next_timer_id: i64,
    next_task_order: i64,
}

impl Scheduler {
    pub(crate) fn new(timer_step_limit: usize) -> Self {
        Self {
            now_ms: 0,
            timer_step_limit,
            task_queue: Vec::new(),
            next_timer_id: 1,
            next_task_order: 0,
        }
    }

    /// Negative delays fire at the current time, as `setTimeout` clamps them.
    pub(crate) fn schedule(&mut self, delay_ms: i64, task: TimerTask) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        self.task_queue.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms.max(0)),
            order,
            task,
        });
        id
    }

    pub(crate) fn clear(&mut self, timer_id: i64) -> bool {
        let before = self.task_queue.len();
        self.task_queue.retain(|task| task.id != timer_id);
        before != self.task_queue.len()
    }

    pub(crate) fn clear_all(&mut self) -> usize {
        let cleared = self.task_queue.len();
        self.task_queue.clear();
        cleared
    }

    pub(crate) fn len(&self) -> usize {
        self.task_queue.len()
    }

    pub(crate) fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    pub(crate) fn peek_next(&self, due_limit: Option<i64>) -> Option<&ScheduledTask> {
        self.next_task_index(due_limit)
            .and_then(|idx| self.task_queue.get(idx))
    }

    /// Removes the next task due by `due_limit` (any task when `None`).
    pub(crate) fn take_next(&mut self, due_limit: Option<i64>) -> Option<ScheduledTask> {
        let idx = self.next_task_index(due_limit)?;
        Some(self.task_queue.remove(idx))
    }
}
