//! Shared fixture for the founder-core integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use founder_core::{FounderConfig, Game, ManualTimeSource};
use founder_events::{EventBus, Subscription};
use founder_types::{
    Catalog, CostBundle, CurrencyBalance, Curve, EmployeeArchetype, EmployeeStats, EventKind, GameEvent,
    OfficeDefinition, RewardBundle, TaskCategory, TaskDefinition, UpgradeDefinition, UpgradeTarget,
};

/// Every event published on a bus, in publish order.
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

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// A small catalog: one archetype, one 10 second task, a free garage with
/// two desks, and a global productivity upgrade.
pub fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert_archetype(EmployeeArchetype {
        id: "dev".to_owned(),
        display_name: "Developer".to_owned(),
        base_stats: EmployeeStats::new(1.0, 100.0, 1.0, 50.0),
    });
    catalog.insert_task(TaskDefinition {
        id: "code".to_owned(),
        display_name: "Write code".to_owned(),
        category: TaskCategory::Development,
        base_duration: 10.0,
        duration_variation: 0.0,
        base_reward: RewardBundle::new(10.0, 0.0, 0.0, 0.0),
        difficulty: Curve::default(),
    });
    catalog.insert_office(OfficeDefinition {
        id: "garage".to_owned(),
        display_name: "Garage".to_owned(),
        max_staff: 2,
        grid_size: (6, 6),
        productivity_multiplier: 1.0,
        morale_bonus: 0.0,
        revenue_multiplier: 1.0,
        unlock_cost: CostBundle::default(),
    });
    catalog.insert_upgrade(UpgradeDefinition {
        id: "coffee".to_owned(),
        display_name: "Coffee machine".to_owned(),
        target: UpgradeTarget::Global,
        productivity_multiplier: 1.5,
        morale_bonus: 0.0,
        morale_multiplier: 1.0,
        revenue_multiplier: 1.0,
        stats_multiplier: 1.0,
        cost: CostBundle::cash(50.0),
        repeatable: false,
        max_level: 1,
        cost_scaling: Curve::default(),
    });
    catalog
}

/// Default configuration with a fixed seed and the given starting cash.
pub fn config(cash: f64) -> FounderConfig {
    let mut config = FounderConfig::default();
    config.economy.starting_balance = CurrencyBalance::new(cash, 0.0, 0.0);
    config.engine.starter_office = "garage".to_owned();
    config.engine.starter_tasks = vec!["code".to_owned()];
    config.engine.starter_hires = Vec::new();
    config.engine.seed = Some(7);
    config
}

/// A game on a manual clock starting 2026-03-02 09:00 UTC.
pub fn game(config: FounderConfig) -> (Game, ManualTimeSource) {
    let time = ManualTimeSource::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    let game = Game::new(config, catalog(), Arc::new(time.clone()));
    (game, time)
}

/// Signal focus and let the debounce elapse.
pub fn focus(game: &mut Game, time: &ManualTimeSource) {
    game.focus_gained();
    time.advance_secs(game.config().focus.debounce_secs);
    game.tick(0.0).unwrap();
    assert!(game.focus().focused());
}

/// Advance wall time and the game by one second.
pub fn step(game: &mut Game, time: &ManualTimeSource) -> founder_core::TickSummary {
    time.advance_secs(1.0);
    game.tick(1.0).unwrap()
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
