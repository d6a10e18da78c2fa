//! Shared helpers for unit tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use founder_events::{EventBus, Subscription};
use founder_types::{
    CostBundle, Curve, EmployeeArchetype, EmployeeStats, EventKind, GameEvent, OfficeDefinition,
    RewardBundle, TaskCategory, TaskDefinition, UpgradeDefinition, UpgradeTarget,
};

/// Records every event published on a bus, in publish order.
pub struct Recorder {
    events: Rc<RefCell<Vec<GameEvent>>>,
    _subscriptions: Vec<Subscription>,
}

impl Recorder {
    pub fn attach(bus: &EventBus) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let subscriptions = EventKind::ALL
            .iter()
            .map(|kind| {
                let sink = Rc::clone(&events);
                bus.subscribe(*kind, move |event| {
                    sink.borrow_mut().push(event.clone());
                    Ok(())
                })
            })
            .collect();
        Self {
            events,
            _subscriptions: subscriptions,
        }
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.borrow().iter().map(GameEvent::kind).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

pub fn archetype(id: &str, productivity: f64, efficiency: f64) -> Arc<EmployeeArchetype> {
    Arc::new(EmployeeArchetype {
        id: id.to_owned(),
        display_name: id.to_owned(),
        base_stats: EmployeeStats::new(productivity, 100.0, efficiency, 50.0),
    })
}

pub fn task_definition(id: &str, base_duration: f64, cash: f64) -> Arc<TaskDefinition> {
    Arc::new(TaskDefinition {
        id: id.to_owned(),
        display_name: id.to_owned(),
        category: TaskCategory::Development,
        base_duration,
        duration_variation: 0.0,
        base_reward: RewardBundle::new(cash, 0.0, 0.0, 0.0),
        difficulty: Curve::default(),
    })
}

pub fn office_definition(id: &str, max_staff: u32, cost: f64) -> Arc<OfficeDefinition> {
    Arc::new(OfficeDefinition {
        id: id.to_owned(),
        display_name: id.to_owned(),
        max_staff,
        grid_size: (6, 6),
        productivity_multiplier: 1.0,
        morale_bonus: 0.0,
        revenue_multiplier: 1.0,
        unlock_cost: CostBundle::cash(cost),
    })
}

pub fn upgrade_definition(id: &str, target: UpgradeTarget, productivity: f64) -> UpgradeDefinition {
    UpgradeDefinition {
        id: id.to_owned(),
        display_name: id.to_owned(),
        target,
        productivity_multiplier: productivity,
        morale_bonus: 0.0,
        morale_multiplier: 1.0,
        revenue_multiplier: 1.0,
        stats_multiplier: 1.0,
        cost: CostBundle::cash(10.0),
        repeatable: true,
        max_level: 3,
        cost_scaling: Curve::linear(1.0, 1.0, 3.0, 2.0),
    }
}
