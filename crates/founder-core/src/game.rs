//! The game orchestrator: one tick driver over every service.
//!
//! Each call to [`Game::tick`] runs these phases:
//!
//! 1. **Focus** -- fire due debounce and session timers.
//! 2. **Clock** -- turn the raw frame delta into simulated seconds. When
//!    the player is unfocused or the clock is stopped the delta is zero and
//!    the remaining phases are skipped.
//! 3. **Dispatch** -- hand the head of each office queue to idle members.
//! 4. **Work** -- advance every employee with its productivity rate.
//! 5. **Settle** -- pay out finished tasks, grant the reward experience to
//!    the employee, and re-queue the same work to the employee's office.
//!
//! Everything runs to completion on the caller's thread.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use founder_domain::{
    BaseProductivityStrategy, BaseYieldStrategy, Footprint, GlobalModifiers, GridPosition,
    PlacementId, ProductivityStrategy, YieldStrategy,
};
use founder_events::EventBus;
use founder_ledger::LedgerError;
use founder_types::{Catalog, EmployeeId, OfficeId, TaskId};

use crate::clock::{ClockError, ClockSnapshot, SimulationClock};
use crate::config::FounderConfig;
use crate::focus::{FocusSnapshot, FocusTracker, TimerHandle};
use crate::services::{
    EconomyService, EconomySnapshot, EmployeeService, EmployeeServiceSnapshot, OfficeService, OfficeServiceSnapshot,
    PurchaseOutcome, ServiceError, SkippedEntity, TaskService, TaskServiceSnapshot, UpgradeService,
    UpgradeServiceSnapshot,
};
use crate::time::TimeSource;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A service rejected an operation.
    #[error("service error: {source}")]
    Service {
        /// The underlying service error.
        #[from]
        source: ServiceError,
    },
}

/// Errors a player command can raise.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The command named a definition the catalog does not have.
    #[error("unknown {kind}: {id}")]
    UnknownDefinition {
        /// Definition kind.
        kind: &'static str,
        /// The unresolved id.
        id: String,
    },

    /// A service rejected the command.
    #[error("service error: {source}")]
    Service {
        /// The underlying service error.
        #[from]
        source: ServiceError,
    },
}

/// Errors that abort a restore.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    /// The captured balance is unusable. Nothing was changed.
    #[error("invalid balance: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// Rebuilding modifiers failed.
    #[error("service error: {source}")]
    Service {
        /// The underlying service error.
        #[from]
        source: ServiceError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulated seconds granted.
    pub delta: f64,
    /// Tasks handed to idle employees.
    pub dispatched: usize,
    /// Tasks finished and paid out.
    pub completed: usize,
    /// Level-up events published.
    pub level_ups: usize,
}

/// Everything needed to rebuild a [`Game`] against the same catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// When the snapshot was taken.
    pub captured_at: DateTime<Utc>,
    /// Clock counters.
    pub clock: ClockSnapshot,
    /// Daily focus total.
    pub focus: FocusSnapshot,
    /// Currency balance.
    pub economy: EconomySnapshot,
    /// Offices with rosters, layouts, and modifiers.
    pub offices: OfficeServiceSnapshot,
    /// Employees with their current tasks.
    pub employees: EmployeeServiceSnapshot,
    /// Office task queues.
    pub tasks: TaskServiceSnapshot,
    /// Owned upgrade levels.
    pub upgrades: UpgradeServiceSnapshot,
}

/// What a restore brought back and what it left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Offices restored.
    pub offices: usize,
    /// Employees restored.
    pub employees: usize,
    /// Tasks restored into queues.
    pub queued_tasks: usize,
    /// Entities skipped because a reference could not be resolved.
    pub skipped: Vec<SkippedEntity>,
}

/// The whole simulation.
#[derive(Debug)]
pub struct Game {
    config: FounderConfig,
    catalog: Catalog,
    bus: EventBus,
    focus: FocusTracker,
    clock: SimulationClock,
    economy: EconomyService,
    globals: GlobalModifiers,
    offices: OfficeService,
    employees: EmployeeService,
    tasks: TaskService,
    upgrades: UpgradeService,
}

impl Game {
    /// Create a game using the base productivity and reward formulas.
    pub fn new(config: FounderConfig, catalog: Catalog, time: Arc<dyn TimeSource>) -> Self {
        let productivity = Box::new(BaseProductivityStrategy::new(config.productivity.clone()));
        let yields = Box::new(BaseYieldStrategy::new(config.reward.clone()));
        Self::with_strategies(config, catalog, time, productivity, yields)
    }

    /// Create a game with custom rate and reward policies.
    pub fn with_strategies(
        config: FounderConfig,
        catalog: Catalog,
        time: Arc<dyn TimeSource>,
        productivity: Box<dyn ProductivityStrategy>,
        yields: Box<dyn YieldStrategy>,
    ) -> Self {
        let bus = EventBus::new();
        Self {
            focus: FocusTracker::new(config.focus.clone(), bus.clone(), Arc::clone(&time)),
            clock: SimulationClock::new(time),
            economy: EconomyService::new(config.economy.starting_balance, bus.clone()),
            globals: GlobalModifiers::new(),
            offices: OfficeService::new(bus.clone()),
            employees: EmployeeService::new(config.employee.clone(), productivity, bus.clone()),
            tasks: TaskService::new(yields, config.employee.stat_level_scaling, config.engine.seed, bus.clone()),
            upgrades: UpgradeService::new(bus.clone()),
            bus,
            catalog,
            config,
        }
    }

    /// Unlock the starter office, queue the starter tasks, and hire the
    /// starter employees named in the engine configuration.
    ///
    /// Returns the starter office, or `None` if it could not be unlocked.
    pub fn start_new_company(&mut self) -> Result<Option<OfficeId>, CommandError> {
        let engine = self.config.engine.clone();
        let Some(office) = self.unlock_office(&engine.starter_office)? else {
            warn!(office = %engine.starter_office, "starter office could not be unlocked");
            return Ok(None);
        };
        for task in &engine.starter_tasks {
            self.queue_task(task, office)?;
        }
        for archetype in &engine.starter_hires {
            if self.hire(archetype, Some(office))?.is_none() {
                warn!(%archetype, "starter hire not affordable");
            }
        }
        info!(%office, tasks = engine.starter_tasks.len(), "new company started");
        Ok(Some(office))
    }

    // -----------------------------------------------------------------------
    // Host signals
    // -----------------------------------------------------------------------

    /// The application gained focus.
    pub fn focus_gained(&mut self) -> Option<TimerHandle> {
        self.focus.host_focus_gained()
    }

    /// The application lost focus.
    pub fn focus_lost(&mut self) {
        self.focus.host_focus_lost();
    }

    /// The player paused the game.
    pub fn pause(&mut self) {
        self.focus.pause();
    }

    /// The player resumed the game.
    pub fn resume(&mut self) -> Option<TimerHandle> {
        self.focus.resume()
    }

    /// Fire a focus timer now instead of waiting for the next tick.
    pub fn fire_timer(&mut self, handle: TimerHandle) -> bool {
        self.focus.fire(handle)
    }

    /// Toggle the clock's run flag.
    pub const fn set_running(&mut self, running: bool) {
        self.clock.set_running(running);
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run one frame of `raw` real seconds.
    pub fn tick(&mut self, raw: f64) -> Result<TickSummary, TickError> {
        self.focus.poll();
        let step = self.clock.advance(raw, &self.focus)?;
        let mut summary = TickSummary {
            tick: step.tick,
            delta: step.delta,
            ..TickSummary::default()
        };
        if step.delta <= 0.0 {
            return Ok(summary);
        }

        summary.dispatched = self.tasks.dispatch_idle(&self.offices, &mut self.employees);

        let report = self
            .employees
            .tick_all(step.delta, &self.offices, &self.globals)
            .map_err(ServiceError::from)?;
        summary.level_ups = report.level_ups;

        for (employee_id, task) in report.completed {
            let Some(employee) = self.employees.employee(employee_id) else {
                continue;
            };
            let reward = self
                .tasks
                .complete_task(employee, &task, &mut self.economy, &self.offices, &self.globals)?;
            summary.completed = summary.completed.saturating_add(1);

            let gained = self
                .employees
                .grant_experience(employee_id, reward.experience)
                .map_err(ServiceError::from)?;
            if gained.is_some_and(|levels| levels > 0) {
                summary.level_ups = summary.level_ups.saturating_add(1);
            }
        }

        debug!(
            tick = summary.tick,
            delta = summary.delta,
            dispatched = summary.dispatched,
            completed = summary.completed,
            "tick complete"
        );
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Hire an employee of the archetype `archetype`, optionally into
    /// `office`. `Ok(None)` means the cost was not affordable.
    pub fn hire(&mut self, archetype: &str, office: Option<OfficeId>) -> Result<Option<EmployeeId>, CommandError> {
        let definition = self
            .catalog
            .archetype(archetype)
            .ok_or_else(|| unknown("archetype", archetype))?;
        Ok(self
            .employees
            .try_hire_employee(definition, office, &mut self.economy, &mut self.offices)?)
    }

    /// Unlock an office of the definition `office`. `Ok(None)` means the
    /// cost was not affordable.
    pub fn unlock_office(&mut self, office: &str) -> Result<Option<OfficeId>, CommandError> {
        let definition = self.catalog.office(office).ok_or_else(|| unknown("office", office))?;
        Ok(self
            .offices
            .try_unlock_office(definition, &mut self.economy)
            .map_err(ServiceError::from)?)
    }

    /// Move an employee to another office.
    pub fn assign(&mut self, employee: EmployeeId, office: OfficeId) -> bool {
        self.employees.contains(employee) && self.offices.assign_employee_to_office(employee, office)
    }

    /// Queue a task of the definition `task` in `office`.
    pub fn queue_task(&mut self, task: &str, office: OfficeId) -> Result<TaskId, CommandError> {
        let definition = self.catalog.task(task).ok_or_else(|| unknown("task", task))?;
        if self.offices.office(office).is_none() {
            return Err(CommandError::UnknownDefinition {
                kind: "office instance",
                id: office.to_string(),
            });
        }
        Ok(self
            .tasks
            .queue_task(definition, office)
            .map_err(ServiceError::from)?)
    }

    /// Place a decoration in an office.
    pub fn place_decoration(
        &mut self,
        office: OfficeId,
        item: &str,
        origin: GridPosition,
        footprint: Footprint,
    ) -> Option<PlacementId> {
        self.offices.place_decoration(office, item, origin, footprint)
    }

    /// Buy the next level of the upgrade `upgrade`.
    pub fn purchase_upgrade(&mut self, upgrade: &str, office: Option<OfficeId>) -> Result<PurchaseOutcome, CommandError> {
        let definition = self.catalog.upgrade(upgrade).ok_or_else(|| unknown("upgrade", upgrade))?;
        Ok(self.upgrades.try_purchase(
            &definition,
            office,
            &mut self.economy,
            &mut self.offices,
            &mut self.globals,
        )?)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Capture the whole game.
    pub fn capture_state(&self) -> GameSnapshot {
        GameSnapshot {
            captured_at: self.clock.now(),
            clock: self.clock.capture(),
            focus: self.focus.capture(),
            economy: self.economy.capture_state(),
            offices: self.offices.capture_state(),
            employees: self.employees.capture_state(),
            tasks: self.tasks.capture_state(),
            upgrades: self.upgrades.capture_state(),
        }
    }

    /// Replace the game state with a snapshot.
    ///
    /// Entities whose references cannot be resolved against the catalog are
    /// skipped and listed in the report. An invalid balance aborts the
    /// restore before anything changes.
    pub fn restore_state(&mut self, snapshot: &GameSnapshot) -> Result<RestoreReport, RestoreError> {
        self.economy.restore_state(&snapshot.economy)?;
        self.clock.restore(snapshot.clock);
        self.focus.restore(&snapshot.focus);

        let mut skipped = self.offices.restore_state(&snapshot.offices, &self.catalog);
        skipped.extend(self.employees.restore_state(&snapshot.employees, &self.catalog));
        let employees = &self.employees;
        let orphans = self.offices.retain_employees(|id| employees.contains(id));
        skipped.extend(
            self.tasks
                .restore_state(&snapshot.tasks, &self.catalog, &self.offices),
        );
        skipped.extend(
            self.upgrades
                .restore_state(&snapshot.upgrades, &self.catalog, &mut self.globals)?,
        );

        let report = RestoreReport {
            offices: self.offices.len(),
            employees: self.employees.len(),
            queued_tasks: self.tasks.total_queued(),
            skipped,
        };
        info!(
            offices = report.offices,
            employees = report.employees,
            queued_tasks = report.queued_tasks,
            skipped = report.skipped.len(),
            orphans,
            "game restored"
        );
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The bus every service publishes on. Clone it to subscribe.
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The loaded configuration.
    pub const fn config(&self) -> &FounderConfig {
        &self.config
    }

    /// The content catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The focus tracker.
    pub const fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    /// The simulation clock.
    pub const fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// The economy.
    pub const fn economy(&self) -> &EconomyService {
        &self.economy
    }

    /// Company-wide modifier stacks.
    pub const fn globals(&self) -> &GlobalModifiers {
        &self.globals
    }

    /// Offices and assignments.
    pub const fn offices(&self) -> &OfficeService {
        &self.offices
    }

    /// Employees.
    pub const fn employees(&self) -> &EmployeeService {
        &self.employees
    }

    /// Mutable employee access for morale and break commands.
    pub const fn employees_mut(&mut self) -> &mut EmployeeService {
        &mut self.employees
    }

    /// Task queues.
    pub const fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    /// Upgrade levels.
    pub const fn upgrades(&self) -> &UpgradeService {
        &self.upgrades
    }
}

fn unknown(kind: &'static str, id: &str) -> CommandError {
    CommandError::UnknownDefinition {
        kind,
        id: id.to_owned(),
    }
}
