//! Employee service: the canonical employee collection.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use founder_domain::{
    DomainError, Employee, EmployeeConfig, EmployeeSnapshot, GlobalModifiers, ProductivityContext,
    ProductivityStrategy, TaskInstance, TickRates,
};
use founder_events::EventBus;
use founder_types::{
    Catalog, CostBundle, EmployeeArchetype, EmployeeId, EmployeeStats, GameEvent, ModifierCategory, OfficeId,
};

use super::economy::EconomyService;
use super::office::OfficeService;
use super::{ServiceError, SkippedEntity};

/// What one [`EmployeeService::tick_all`] call produced.
#[derive(Debug, Default)]
pub struct EmployeeTickReport {
    /// Tasks finished this tick, with the employee who finished each.
    pub completed: Vec<(EmployeeId, TaskInstance)>,
    /// Employees that gained at least one level.
    pub level_ups: usize,
}

/// Persisted form of the employee service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeServiceSnapshot {
    /// Every employee, in id order.
    pub employees: Vec<EmployeeSnapshot>,
}

/// Owns every employee.
pub struct EmployeeService {
    employees: BTreeMap<EmployeeId, Employee>,
    config: EmployeeConfig,
    productivity: Box<dyn ProductivityStrategy>,
    bus: EventBus,
}

impl core::fmt::Debug for EmployeeService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EmployeeService")
            .field("employees", &self.employees.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EmployeeService {
    /// Create an empty service.
    pub fn new(config: EmployeeConfig, productivity: Box<dyn ProductivityStrategy>, bus: EventBus) -> Self {
        Self {
            employees: BTreeMap::new(),
            config,
            productivity,
            bus,
        }
    }

    /// Price of hiring one more employee of `archetype`.
    ///
    /// `base * (1 + scaling * headcount) * mean(productivity, efficiency)`.
    pub fn hiring_cost(&self, archetype: &EmployeeArchetype) -> CostBundle {
        let headcount = u32::try_from(self.employees.len()).map_or(f64::from(u32::MAX), f64::from);
        let growth = self.config.hire_count_scaling.mul_add(headcount, 1.0);
        let quality = (archetype.base_stats.productivity + archetype.base_stats.efficiency) / 2.0;
        CostBundle::cash(self.config.base_hire_cost * growth * quality)
    }

    /// Pay the hiring cost and add a new employee.
    ///
    /// Returns `Ok(None)` when the cost is not affordable. When `office` is
    /// given the new hire is assigned to it; a failed assignment leaves the
    /// employee hired but unassigned.
    pub fn try_hire_employee(
        &mut self,
        archetype: Arc<EmployeeArchetype>,
        office: Option<OfficeId>,
        economy: &mut EconomyService,
        offices: &mut OfficeService,
    ) -> Result<Option<EmployeeId>, ServiceError> {
        let cost = self.hiring_cost(&archetype);
        if !economy.try_spend(&cost)? {
            debug!(archetype = %archetype.id, cost = cost.cash, "cannot afford hire");
            return Ok(None);
        }

        let employee = Employee::new(archetype, &self.config);
        let id = employee.id();
        let archetype_id = employee.archetype().id.clone();
        self.employees.insert(id, employee);
        info!(employee = %id, archetype = %archetype_id, cost = cost.cash, "employee hired");
        self.bus.publish(&GameEvent::EmployeeHired {
            employee: id,
            archetype: archetype_id,
        });

        if let Some(office) = office
            && !offices.assign_employee_to_office(id, office)
        {
            warn!(employee = %id, %office, "new hire could not join office");
        }
        Ok(Some(id))
    }

    /// Look up an employee.
    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.get(&id)
    }

    /// Every employee, in id order.
    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    /// Whether `id` is a current employee.
    pub fn contains(&self, id: EmployeeId) -> bool {
        self.employees.contains_key(&id)
    }

    /// Headcount.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Whether nobody has been hired.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Ids of employees waiting for work.
    pub fn idle_employees(&self) -> Vec<EmployeeId> {
        self.employees
            .values()
            .filter(|e| e.is_idle())
            .map(Employee::id)
            .collect()
    }

    /// Current stats of an employee.
    pub fn stats(&self, id: EmployeeId) -> Option<EmployeeStats> {
        self.employees
            .get(&id)
            .map(|e| e.stats(self.config.stat_level_scaling))
    }

    /// Hand a task to an idle employee. Returns the task back otherwise.
    pub fn assign_task(&mut self, id: EmployeeId, task: TaskInstance) -> Result<(), TaskInstance> {
        match self.employees.get_mut(&id) {
            Some(employee) => employee.assign_task(task),
            None => Err(task),
        }
    }

    /// Put an idle employee on break.
    pub fn send_on_break(&mut self, id: EmployeeId) -> bool {
        self.employees.get_mut(&id).is_some_and(Employee::send_on_break)
    }

    /// Bring an employee back from break.
    pub fn end_break(&mut self, id: EmployeeId) -> bool {
        self.employees.get_mut(&id).is_some_and(Employee::end_break)
    }

    /// Shift an employee's morale. Returns `false` for an unknown id.
    pub fn modify_morale(&mut self, id: EmployeeId, delta: f64) -> Result<bool, DomainError> {
        let Some(employee) = self.employees.get_mut(&id) else {
            return Ok(false);
        };
        employee.modify_morale(delta)?;
        Ok(true)
    }

    /// Grant experience, publishing level-up when the level rose.
    ///
    /// Returns the levels gained, or `None` for an unknown id.
    pub fn grant_experience(&mut self, id: EmployeeId, amount: f64) -> Result<Option<u32>, DomainError> {
        let Some(employee) = self.employees.get_mut(&id) else {
            return Ok(None);
        };
        let gained = employee.grant_experience(amount, self.config.level_xp_factor)?;
        if gained > 0 {
            let level = employee.level();
            info!(employee = %id, level, gained, "employee leveled up");
            self.bus.publish(&GameEvent::EmployeeLevelUp { employee: id, level });
        }
        Ok(Some(gained))
    }

    /// Advance every employee by `dt` simulated seconds.
    ///
    /// Each employee's rate comes from the productivity strategy with its
    /// office's modifiers and `globals`. Morale regenerates at the
    /// configured rate scaled by the global morale multiplier.
    pub fn tick_all(
        &mut self,
        dt: f64,
        offices: &OfficeService,
        globals: &GlobalModifiers,
    ) -> Result<EmployeeTickReport, DomainError> {
        let morale_regen = self.config.morale_regen_rate * globals.multiplier(ModifierCategory::Morale);
        let mut report = EmployeeTickReport::default();

        for (id, employee) in &mut self.employees {
            let productivity = self.productivity.rate(&ProductivityContext {
                employee: &*employee,
                office: offices.modifiers_for_employee(*id),
                globals,
            });
            let outcome = employee.tick(
                dt,
                TickRates {
                    productivity,
                    morale_regen,
                },
                &self.config,
            )?;

            if outcome.levels_gained > 0 {
                let level = employee.level();
                info!(employee = %id, level, "employee leveled up");
                self.bus.publish(&GameEvent::EmployeeLevelUp { employee: *id, level });
                report.level_ups = report.level_ups.saturating_add(1);
            }
            if let Some(task) = outcome.completed {
                debug!(employee = %id, task = %task.id(), "task finished");
                report.completed.push((*id, task));
            }
        }
        Ok(report)
    }

    /// Capture every employee.
    pub fn capture_state(&self) -> EmployeeServiceSnapshot {
        EmployeeServiceSnapshot {
            employees: self.employees.values().map(Employee::snapshot).collect(),
        }
    }

    /// Replace all employees with captured ones.
    ///
    /// Employees whose archetype is missing from `catalog` are skipped. A
    /// current task that cannot be resolved is dropped and the employee
    /// comes back idle.
    pub fn restore_state(&mut self, snapshot: &EmployeeServiceSnapshot, catalog: &Catalog) -> Vec<SkippedEntity> {
        self.employees.clear();
        let mut skipped = Vec::new();

        for saved in &snapshot.employees {
            let Some(archetype) = catalog.archetype(&saved.archetype) else {
                warn!(employee = %saved.id, archetype = %saved.archetype, "skipping employee with unknown archetype");
                skipped.push(SkippedEntity::new(
                    "employee",
                    saved.id,
                    format!("unknown archetype {}", saved.archetype),
                ));
                continue;
            };

            let task = saved.current_task.as_ref().and_then(|task| {
                let resolved = catalog
                    .task(&task.definition)
                    .ok_or_else(|| format!("unknown definition {}", task.definition))
                    .and_then(|def| TaskInstance::from_snapshot(task, def).map_err(|err| err.to_string()));
                match resolved {
                    Ok(instance) => Some(instance),
                    Err(reason) => {
                        warn!(employee = %saved.id, task = %task.id, %reason, "dropping current task");
                        skipped.push(SkippedEntity::new("task", task.id, reason));
                        None
                    }
                }
            });

            match Employee::from_snapshot(saved, archetype, task) {
                Ok(employee) => {
                    self.employees.insert(employee.id(), employee);
                }
                Err(err) => {
                    warn!(employee = %saved.id, error = %err, "skipping employee");
                    skipped.push(SkippedEntity::new("employee", saved.id, err));
                }
            }
        }

        info!(employees = self.employees.len(), skipped = skipped.len(), "employees restored");
        skipped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use founder_domain::BaseProductivityStrategy;
    use founder_types::{CurrencyBalance, EmployeeState, EventKind};

    use super::*;
    use crate::testing::{Recorder, archetype, office_definition, task_definition};

    struct Fixture {
        employees: EmployeeService,
        offices: OfficeService,
        economy: EconomyService,
        recorder: Recorder,
    }

    fn fixture(cash: f64) -> Fixture {
        let bus = EventBus::new();
        let recorder = Recorder::attach(&bus);
        Fixture {
            employees: EmployeeService::new(
                EmployeeConfig::default(),
                Box::new(BaseProductivityStrategy::default()),
                bus.clone(),
            ),
            offices: OfficeService::new(bus.clone()),
            economy: EconomyService::new(CurrencyBalance::new(cash, 0.0, 0.0), bus),
            recorder,
        }
    }

    #[test]
    fn hiring_cost_grows_with_headcount() {
        let mut fx = fixture(1_000.0);
        let dev = archetype("dev", 1.0, 3.0);
        // 100 * 1.0 * 2.0
        assert!((fx.employees.hiring_cost(&dev).cash - 200.0).abs() < 1e-9);

        fx.employees
            .try_hire_employee(Arc::clone(&dev), None, &mut fx.economy, &mut fx.offices)
            .unwrap()
            .unwrap();
        // 100 * 1.1 * 2.0
        assert!((fx.employees.hiring_cost(&dev).cash - 220.0).abs() < 1e-9);
        assert!((fx.economy.balance().cash - 800.0).abs() < 1e-9);
    }

    #[test]
    fn unaffordable_hire_changes_nothing() {
        let mut fx = fixture(50.0);
        let hired = fx
            .employees
            .try_hire_employee(archetype("dev", 1.0, 1.0), None, &mut fx.economy, &mut fx.offices)
            .unwrap();
        assert!(hired.is_none());
        assert!(fx.employees.is_empty());
        assert!(fx.recorder.kinds().is_empty());
    }

    #[test]
    fn hire_into_office_emits_hired_then_assigned() {
        let mut fx = fixture(500.0);
        let office = fx
            .offices
            .try_unlock_office(office_definition("garage", 1, 0.0), &mut fx.economy)
            .unwrap()
            .unwrap();
        fx.recorder.clear();

        let first = fx
            .employees
            .try_hire_employee(archetype("dev", 1.0, 1.0), Some(office), &mut fx.economy, &mut fx.offices)
            .unwrap()
            .unwrap();
        assert_eq!(
            fx.recorder.kinds(),
            vec![
                EventKind::CostPaid,
                EventKind::BalanceChanged,
                EventKind::EmployeeHired,
                EventKind::EmployeeAssigned,
            ]
        );
        assert_eq!(fx.offices.office_for_employee(first), Some(office));

        // Office is full: the second hire stays unassigned.
        let second = fx
            .employees
            .try_hire_employee(archetype("dev", 1.0, 1.0), Some(office), &mut fx.economy, &mut fx.offices)
            .unwrap()
            .unwrap();
        assert_eq!(fx.offices.office_for_employee(second), None);
        assert_eq!(fx.employees.len(), 2);
    }

    #[test]
    fn tick_all_completes_tasks_and_reports_level_ups() {
        let mut fx = fixture(1_000.0);
        let id = fx
            .employees
            .try_hire_employee(archetype("dev", 1.0, 1.0), None, &mut fx.economy, &mut fx.offices)
            .unwrap()
            .unwrap();
        fx.employees.grant_experience(id, 95.0).unwrap();

        let task = TaskInstance::new(task_definition("code", 2.0, 5.0), 2.0).unwrap();
        fx.employees.assign_task(id, task).unwrap();
        fx.recorder.clear();

        // Rate without an office: 1.0 * 1.5 * 1.0 * 1.2 = 1.8/s.
        let report = fx.employees.tick_all(1.0, &fx.offices, &GlobalModifiers::new()).unwrap();
        assert!(report.completed.is_empty());
        let report = fx.employees.tick_all(1.0, &fx.offices, &GlobalModifiers::new()).unwrap();
        assert_eq!(report.completed.len(), 1);
        assert_eq!(report.level_ups, 1);
        assert_eq!(fx.employees.employee(id).unwrap().state(), EmployeeState::Celebrating);
        assert_eq!(fx.recorder.kinds(), vec![EventKind::EmployeeLevelUp]);
    }

    #[test]
    fn global_morale_multiplier_scales_regen() {
        let mut fx = fixture(1_000.0);
        let id = fx
            .employees
            .try_hire_employee(archetype("dev", 1.0, 1.0), None, &mut fx.economy, &mut fx.offices)
            .unwrap()
            .unwrap();
        fx.employees.modify_morale(id, -50.0).unwrap();

        let mut globals = GlobalModifiers::new();
        globals.add(ModifierCategory::Morale, "plants#1", 2.0).unwrap();
        fx.employees.tick_all(1.0, &fx.offices, &globals).unwrap();
        // 50 + 1.0 * 2.0 * 2.0
        assert!((fx.employees.employee(id).unwrap().morale() - 54.0).abs() < 1e-9);
    }

    #[test]
    fn breaks_keep_employee_out_of_idle_list() {
        let mut fx = fixture(1_000.0);
        let id = fx
            .employees
            .try_hire_employee(archetype("dev", 1.0, 1.0), None, &mut fx.economy, &mut fx.offices)
            .unwrap()
            .unwrap();
        assert_eq!(fx.employees.idle_employees(), vec![id]);
        assert!(fx.employees.send_on_break(id));
        assert!(fx.employees.idle_employees().is_empty());
        assert!(fx.employees.end_break(id));
        assert!(!fx.employees.end_break(id));
        assert!(!fx.employees.send_on_break(EmployeeId::new()));
    }

    #[test]
    fn restore_skips_unknown_archetypes_and_drops_bad_tasks() {
        let mut fx = fixture(1_000.0);
        let dev = archetype("dev", 1.0, 1.0);
        let intern = archetype("intern", 0.5, 0.5);
        let a = fx
            .employees
            .try_hire_employee(Arc::clone(&dev), None, &mut fx.economy, &mut fx.offices)
            .unwrap()
            .unwrap();
        fx.employees
            .try_hire_employee(intern, None, &mut fx.economy, &mut fx.offices)
            .unwrap()
            .unwrap();
        let task = TaskInstance::new(task_definition("retired-task", 5.0, 1.0), 5.0).unwrap();
        fx.employees.assign_task(a, task).unwrap();

        let snapshot = fx.employees.capture_state();
        let mut catalog = Catalog::new();
        catalog.insert_archetype((*dev).clone());

        let mut restored = EmployeeService::new(
            EmployeeConfig::default(),
            Box::new(BaseProductivityStrategy::default()),
            EventBus::new(),
        );
        let skipped = restored.restore_state(&snapshot, &catalog);
        let kinds: Vec<&str> = skipped.iter().map(|s| s.kind).collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&"employee"));
        assert!(kinds.contains(&"task"));
        assert_eq!(restored.len(), 1);
        assert!(restored.employee(a).unwrap().is_idle());
    }
}
