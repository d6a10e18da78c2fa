//! Task service: per-office FIFO queues and the completion loop.
//!
//! Completing a task credits the reward and queues a fresh instance of the
//! same definition to the office the employee is assigned to, so an
//! office's work never runs dry.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use founder_domain::{DomainError, Employee, GlobalModifiers, TaskInstance, TaskSnapshot, YieldContext, YieldStrategy};
use founder_events::EventBus;
use founder_types::catalog::MIN_TASK_DURATION_SECS;
use founder_types::{Catalog, EmployeeId, GameEvent, OfficeId, RewardBundle, TaskDefinition, TaskId};

use super::economy::EconomyService;
use super::employee::EmployeeService;
use super::office::OfficeService;
use super::{ServiceError, SkippedEntity};

/// Largest duration spread honored; keeps every roll positive.
const MAX_DURATION_VARIATION: f64 = 0.9;

/// Persisted queue of one office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeQueueSnapshot {
    /// Owning office.
    pub office: OfficeId,
    /// Queued tasks, head first.
    pub tasks: Vec<TaskSnapshot>,
}

/// Persisted form of the task service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskServiceSnapshot {
    /// Every non-empty queue, in office id order.
    pub queues: Vec<OfficeQueueSnapshot>,
}

/// Owns the per-office task queues.
pub struct TaskService {
    queues: BTreeMap<OfficeId, VecDeque<TaskInstance>>,
    yields: Box<dyn YieldStrategy>,
    stat_level_scaling: f64,
    rng: StdRng,
    bus: EventBus,
}

impl core::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskService")
            .field("queues", &self.queues.len())
            .field("queued", &self.total_queued())
            .finish_non_exhaustive()
    }
}

impl TaskService {
    /// Create a service with empty queues.
    ///
    /// `seed` fixes the duration rolls; `None` seeds from the OS.
    pub fn new(yields: Box<dyn YieldStrategy>, stat_level_scaling: f64, seed: Option<u64>, bus: EventBus) -> Self {
        Self {
            queues: BTreeMap::new(),
            yields,
            stat_level_scaling,
            rng: seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64),
            bus,
        }
    }

    /// Create a new instance of `definition` at the back of `office`'s
    /// queue.
    pub fn queue_task(&mut self, definition: Arc<TaskDefinition>, office: OfficeId) -> Result<TaskId, DomainError> {
        let duration = self.roll_duration(&definition);
        let task = TaskInstance::new(definition, duration)?;
        let id = task.id();
        let definition_id = task.definition().id.clone();
        debug!(task = %id, %office, definition = %definition_id, duration, "task queued");
        self.queues.entry(office).or_default().push_back(task);
        self.bus.publish(&GameEvent::TaskQueued {
            task: id,
            office,
            definition: definition_id,
        });
        Ok(id)
    }

    /// Take the head of `office`'s queue for `employee`.
    pub fn get_next_task(&mut self, office: OfficeId, employee: EmployeeId) -> Option<TaskInstance> {
        let task = self.queues.get_mut(&office)?.pop_front()?;
        debug!(task = %task.id(), %office, %employee, "task started");
        self.bus.publish(&GameEvent::TaskStarted {
            employee,
            task: task.id(),
        });
        Some(task)
    }

    /// Settle a finished task.
    ///
    /// The reward comes from the yield strategy, is credited to `economy`,
    /// and a new instance of the same definition is queued to the office
    /// the employee is assigned to in `offices`.
    pub fn complete_task(
        &mut self,
        employee: &Employee,
        task: &TaskInstance,
        economy: &mut EconomyService,
        offices: &OfficeService,
        globals: &GlobalModifiers,
    ) -> Result<RewardBundle, ServiceError> {
        let office = offices.office_for_employee(employee.id());
        let reward = self.yields.reward(&YieldContext {
            employee,
            quality: employee.stats(self.stat_level_scaling).quality,
            task: task.definition(),
            office: offices.modifiers_for_employee(employee.id()),
            globals,
        });

        economy.add(&reward)?;
        info!(
            employee = %employee.id(),
            task = %task.id(),
            cash = reward.cash,
            experience = reward.experience,
            "task completed"
        );
        self.bus.publish(&GameEvent::TaskCompleted {
            employee: employee.id(),
            task: task.id(),
            reward,
        });

        match office {
            Some(office) => {
                self.queue_task(Arc::clone(task.definition()), office)?;
            }
            None => warn!(employee = %employee.id(), task = %task.id(), "no office to re-queue task into"),
        }
        Ok(reward)
    }

    /// Give queued work to every idle employee that has an office.
    ///
    /// Returns how many tasks were handed out.
    pub fn dispatch_idle(&mut self, offices: &OfficeService, employees: &mut EmployeeService) -> usize {
        let mut dispatched = 0_usize;
        for employee in employees.idle_employees() {
            let Some(office) = offices.office_for_employee(employee) else {
                continue;
            };
            let Some(task) = self.get_next_task(office, employee) else {
                continue;
            };
            match employees.assign_task(employee, task) {
                Ok(()) => dispatched = dispatched.saturating_add(1),
                Err(task) => {
                    warn!(%employee, task = %task.id(), "employee refused task; returned to queue");
                    self.queues.entry(office).or_default().push_front(task);
                }
            }
        }
        dispatched
    }

    /// Number of tasks waiting in `office`'s queue.
    pub fn queue_len(&self, office: OfficeId) -> usize {
        self.queues.get(&office).map_or(0, VecDeque::len)
    }

    /// Tasks waiting in `office`'s queue, head first.
    pub fn queue(&self, office: OfficeId) -> impl Iterator<Item = &TaskInstance> {
        self.queues.get(&office).into_iter().flatten()
    }

    /// Tasks waiting across all offices.
    pub fn total_queued(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Capture every non-empty queue.
    pub fn capture_state(&self) -> TaskServiceSnapshot {
        TaskServiceSnapshot {
            queues: self
                .queues
                .iter()
                .filter(|(_, queue)| !queue.is_empty())
                .map(|(office, queue)| OfficeQueueSnapshot {
                    office: *office,
                    tasks: queue.iter().map(TaskInstance::snapshot).collect(),
                })
                .collect(),
        }
    }

    /// Replace all queues with captured ones.
    ///
    /// Queues of offices unknown to `offices` and tasks whose definition is
    /// missing from `catalog` are skipped.
    pub fn restore_state(
        &mut self,
        snapshot: &TaskServiceSnapshot,
        catalog: &Catalog,
        offices: &OfficeService,
    ) -> Vec<SkippedEntity> {
        self.queues.clear();
        let mut skipped = Vec::new();

        for saved in &snapshot.queues {
            if offices.office(saved.office).is_none() {
                warn!(office = %saved.office, tasks = saved.tasks.len(), "skipping queue of unknown office");
                skipped.extend(
                    saved
                        .tasks
                        .iter()
                        .map(|task| SkippedEntity::new("task", task.id, format!("unknown office {}", saved.office))),
                );
                continue;
            }
            let queue = self.queues.entry(saved.office).or_default();
            for task in &saved.tasks {
                let restored = catalog
                    .task(&task.definition)
                    .ok_or_else(|| format!("unknown definition {}", task.definition))
                    .and_then(|def| TaskInstance::from_snapshot(task, def).map_err(|err| err.to_string()));
                match restored {
                    Ok(instance) => queue.push_back(instance),
                    Err(reason) => {
                        warn!(task = %task.id, %reason, "skipping queued task");
                        skipped.push(SkippedEntity::new("task", task.id, reason));
                    }
                }
            }
        }

        info!(queued = self.total_queued(), skipped = skipped.len(), "task queues restored");
        skipped
    }

    fn roll_duration(&mut self, definition: &TaskDefinition) -> f64 {
        let base = definition.duration();
        let spread = if definition.duration_variation.is_finite() {
            definition.duration_variation.clamp(0.0, MAX_DURATION_VARIATION)
        } else {
            0.0
        };
        if spread <= 0.0 {
            return base;
        }
        let factor = self.rng.random_range((1.0 - spread)..=(1.0 + spread));
        (base * factor).max(MIN_TASK_DURATION_SECS)
    }
}
