//! Load, unload and finish-load sequences including fault recovery

mod common;

use common::{slot, test_config, Sim, EXTRUDER_AT, FINDA_AT, STEPS_PER_MM};
use filamux_core::config::ExtruderSensorPlacement;
use filamux_core::state::IdlerStatus;
use filamux_core::Fault;

#[test]
fn test_unload_with_sensor_clear_does_not_move() {
    let mut sim = Sim::booted();
    let steps = sim.total_steps();

    sim.mmu.unload_from_selector_exit();

    assert_eq!(sim.total_steps(), steps);
}

#[test]
fn test_load_stops_behind_selector() {
    let mut sim = Sim::booted();
    sim.mmu.load(slot(2));

    let back = 10 * STEPS_PER_MM;
    assert!(sim.tip(2) < FINDA_AT);
    assert!(sim.tip(2) >= FINDA_AT - back - STEPS_PER_MM);
    assert_eq!(sim.mmu.selected_slot(), slot(2));
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::Parked);
}

#[test]
fn test_load_recovers_once_per_timeout_window() {
    let mut sim = Sim::booted();
    sim.world.borrow_mut().blocked_at[2] = Some(0);
    sim.on_fault(|world, _| {
        if world.faults.len() == 3 {
            world.blocked_at[2] = None;
        }
    });

    sim.mmu.load(slot(2));

    let world = sim.world.borrow();
    assert_eq!(world.fault_kinds(), vec![Fault::NotAtSelectorExit; 3]);
    for pair in world.faults.windows(2) {
        assert!(pair[1].0 - pair[0].0 >= 10_000);
    }
    assert!(world.faults[0].0 >= 10_000);
}

#[test]
fn test_unload_stuck_in_extruder() {
    let mut sim = Sim::booted();
    sim.mmu.select(slot(1));
    sim.world.borrow_mut().extruder_switch_stuck = true;
    sim.on_fault(|world, _| world.extruder_switch_stuck = false);

    sim.mmu.unload();

    assert_eq!(sim.faults(), vec![Fault::StuckInExtruder]);
    assert!(sim.tip(1) < FINDA_AT);
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::Parked);
}

#[test]
fn test_unload_stuck_between_stages() {
    let mut sim = Sim::booted();
    sim.mmu.select(slot(1));
    // Strand binds in the tube, past the extruder but short of the selector
    sim.world.borrow_mut().held_at[1] = Some(FINDA_AT + 200 * STEPS_PER_MM);
    sim.on_fault(|world, _| world.held_at[1] = None);

    sim.mmu.unload();

    assert_eq!(sim.faults(), vec![Fault::StuckBetweenStages]);
    assert!(sim.tip(1) < FINDA_AT);
}

#[test]
fn test_extruder_switch_stuck_before_load() {
    let mut sim = Sim::booted();
    sim.world.borrow_mut().extruder_switch_stuck = true;
    sim.on_fault(|world, _| world.extruder_switch_stuck = false);

    sim.mmu.select(slot(3));

    assert_eq!(sim.faults(), vec![Fault::ExtruderSwitchStuck]);
    assert!(sim.tip(3) >= EXTRUDER_AT);
}

#[test]
fn test_selector_refuses_to_move_with_filament() {
    let mut sim = Sim::booted();
    sim.mmu.select(slot(1));
    sim.on_fault(|world, _| world.tips[1] = 0);

    sim.mmu.load(slot(3));

    assert_eq!(sim.faults(), vec![Fault::FilamentInSelector]);
    assert_eq!(sim.selector_pos(), sim.selector_position_of(slot(3)));
    assert_eq!(sim.mmu.selected_slot(), slot(3));
}

#[test]
fn test_finish_load_pushes_into_gear() {
    let mut sim = Sim::booted();
    sim.mmu.select(slot(2));
    let tip = sim.tip(2);

    assert!(sim.mmu.finish_load());

    let pushed = i64::from(sim.mmu.config().feed.finish_load_steps());
    assert_eq!(sim.tip(2), tip + pushed);
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::Parked);
    assert!(!sim.world.borrow().led);
}

#[test]
fn test_finish_load_skipped_after_repeat() {
    let mut sim = Sim::booted();
    sim.mmu.select(slot(2));
    sim.mmu.select(slot(2));
    let steps = sim.total_steps();

    assert!(!sim.mmu.finish_load());

    assert_eq!(sim.total_steps(), steps);
    assert!(!sim.mmu.selection().is_repeat());
}

#[test]
fn test_finish_load_without_filament() {
    let mut sim = Sim::booted();
    let steps = sim.total_steps();

    assert!(!sim.mmu.finish_load());
    assert_eq!(sim.total_steps(), steps);
}

#[test]
fn test_load_stalled_short_of_extruder_recovers_per_window() {
    let mut sim = Sim::booted();
    sim.world.borrow_mut().blocked_at[2] = Some(FINDA_AT + 505 * STEPS_PER_MM);
    sim.on_fault(|world, _| {
        if world.faults.len() == 2 {
            world.blocked_at[2] = None;
        }
    });

    sim.mmu.select(slot(2));

    let world = sim.world.borrow();
    assert_eq!(world.fault_kinds(), vec![Fault::NotAtExtruder; 2]);
    assert!(world.faults[1].0 - world.faults[0].0 >= 10_000);
    assert!(world.tips[2] >= EXTRUDER_AT);
    drop(world);
    assert_eq!(sim.mmu.selected_slot(), slot(2));
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::QuickDisengaged);
}

#[test]
fn test_finish_load_reports_switch_clear_after_grace() {
    let mut sim = Sim::booted();
    sim.mmu.select(slot(2));
    {
        // Strand slipped back into the tube and binds there
        let mut world = sim.world.borrow_mut();
        world.tips[2] = FINDA_AT + 100 * STEPS_PER_MM;
        world.blocked_at[2] = Some(FINDA_AT + 100 * STEPS_PER_MM);
    }
    let started = sim.now_ms();

    assert!(!sim.mmu.finish_load());

    let grace = u64::from(sim.mmu.config().timing.finish_load_grace_ms);
    assert!(sim.now_ms() - started >= grace);
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::Parked);
    assert!(!sim.world.borrow().led);
    assert!(sim.faults().is_empty());
}

#[test]
fn test_sensor_after_gear_loads_fixed_distance() {
    let mut config = test_config();
    config.feed.sensor_placement = ExtruderSensorPlacement::AfterGear;
    let mut sim = Sim::new(config);
    sim.mmu.init();
    // The switch sits past the gear, so the feed alone never reaches it
    sim.world.borrow_mut().blocked_at[2] = Some(EXTRUDER_AT - 1);

    sim.mmu.select(slot(2));

    assert_eq!(sim.tip(2), FINDA_AT + 500 * STEPS_PER_MM);
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::QuickDisengaged);

    assert!(sim.mmu.finish_load());

    assert!(!sim.world.borrow().extruder_entry());
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::Parked);
    assert!(sim.faults().is_empty());
}
