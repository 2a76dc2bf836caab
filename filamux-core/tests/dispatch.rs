//! Printer and console command handling

mod common;

use common::{slot, Sim, EXTRUDER_AT, FINDA_AT, STEPS_PER_MM};
use filamux_core::state::IdlerStatus;
use filamux_protocol::{ConsoleCommand, PrinterCommand, Response};

fn run(sim: &mut Sim, line: &[u8]) -> Option<Response> {
    let cmd = PrinterCommand::parse(line).expect("valid line");
    sim.mmu.dispatch(cmd)
}

#[test]
fn test_tool_change_zero_without_filament() {
    let mut sim = Sim::booted();

    assert_eq!(run(&mut sim, b"T0"), Some(Response::Ok));

    let quick = sim.mmu.config().idler.quick_step;
    assert_eq!(sim.selector_pos(), sim.selector_position_of(slot(0)));
    assert_eq!(sim.idler_pos(), sim.idler_position_of(slot(0)) + quick);
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::QuickDisengaged);
    assert!(sim.tip(0) >= EXTRUDER_AT);
}

#[test]
fn test_invalid_tool_change_still_acknowledged() {
    let mut sim = Sim::booted();
    let steps = sim.total_steps();

    assert_eq!(run(&mut sim, b"T7"), Some(Response::Ok));
    assert_eq!(sim.total_steps(), steps);
}

#[test]
fn test_invalid_load_acknowledged_after_delay() {
    let mut sim = Sim::booted();
    let steps = sim.total_steps();
    let start = sim.now_ms();

    assert_eq!(run(&mut sim, b"L9"), Some(Response::Ok));

    assert_eq!(sim.total_steps(), steps);
    assert_eq!(sim.now_ms() - start, 200);
}

#[test]
fn test_invalid_unload_does_not_move() {
    let mut sim = Sim::booted();
    sim.mmu.select(slot(1));
    let steps = sim.total_steps();

    assert_eq!(run(&mut sim, b"UX"), Some(Response::Ok));
    assert_eq!(sim.total_steps(), steps);
}

#[test]
fn test_unload_then_load() {
    let mut sim = Sim::booted();
    sim.mmu.select(slot(1));

    assert_eq!(run(&mut sim, b"U1"), Some(Response::Ok));
    assert_eq!(run(&mut sim, b"P0"), Some(Response::FilamentPresent(false)));

    assert_eq!(run(&mut sim, b"L4"), Some(Response::Ok));
    assert_eq!(sim.mmu.selected_slot(), slot(4));
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::Parked);
}

#[test]
fn test_status_queries() {
    let mut sim = Sim::booted();
    let link = sim.mmu.config().link;

    assert_eq!(run(&mut sim, b"S0"), Some(Response::Ok));
    assert_eq!(run(&mut sim, b"S1"), Some(Response::Version(link.fw_version)));
    assert_eq!(run(&mut sim, b"S2"), Some(Response::BuildNumber(link.build_number)));
    assert_eq!(run(&mut sim, b"S3"), None);
}

#[test]
fn test_filament_query_follows_sensor() {
    let mut sim = Sim::booted();
    assert_eq!(run(&mut sim, b"P0"), Some(Response::FilamentPresent(false)));

    sim.mmu.select(slot(2));
    assert_eq!(run(&mut sim, b"P0"), Some(Response::FilamentPresent(true)));
}

#[test]
fn test_finish_load_response() {
    let mut sim = Sim::booted();
    // Nothing loaded, no acknowledgement
    assert_eq!(run(&mut sim, b"C0"), None);

    run(&mut sim, b"T2");
    assert_eq!(run(&mut sim, b"C0"), Some(Response::Ok));
}

#[test]
fn test_filament_type_and_unknown() {
    let mut sim = Sim::booted();
    let steps = sim.total_steps();

    assert_eq!(run(&mut sim, b"F1"), Some(Response::Ok));
    assert_eq!(run(&mut sim, b"X5"), Some(Response::Ok));
    assert_eq!(sim.total_steps(), steps);
}

#[test]
fn test_console_sensor_report() {
    let mut sim = Sim::booted();
    sim.mmu.select(slot(1));

    let report = sim.mmu.console(ConsoleCommand::SensorReport).expect("report");
    assert!(report.selector_exit);
    assert!(report.extruder_entry);
    assert!(!report.selector_endstop);
}

#[test]
fn test_console_diagnostics_disabled() {
    let mut sim = Sim::booted();
    let steps = sim.total_steps();

    assert_eq!(sim.mmu.console(ConsoleCommand::Exercise), None);
    assert_eq!(sim.mmu.console(ConsoleCommand::SoakTest), None);
    assert_eq!(sim.total_steps(), steps);
}

#[test]
fn test_console_soak_test() {
    let mut config = common::test_config();
    config.link.diagnostics = true;
    let mut sim = Sim::new(config);
    sim.mmu.init();

    sim.mmu.console(ConsoleCommand::SoakTest);

    assert_eq!(sim.mmu.selected_slot(), slot(0));
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::Parked);
    assert_eq!(sim.mmu.selection().total(), 6);
    assert!(sim.faults().is_empty());
}

#[test]
fn test_console_exercise_visits_every_slot() {
    let mut config = common::test_config();
    config.link.diagnostics = true;
    let mut sim = Sim::new(config);
    sim.mmu.init();

    sim.mmu.console(ConsoleCommand::Exercise);

    assert_eq!(sim.selector_pos(), sim.selector_position_of(slot(4)));
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::Parked);
}

#[test]
fn test_unload_after_exercise_grips_selected_strand() {
    let mut config = common::test_config();
    config.link.diagnostics = true;
    let mut sim = Sim::new(config);
    sim.mmu.init();
    sim.mmu.load(slot(1));

    sim.mmu.console(ConsoleCommand::Exercise);
    // Strand pushed back up to the selector by hand
    sim.world.borrow_mut().tips[1] = FINDA_AT + 50 * STEPS_PER_MM;

    sim.mmu.console(ConsoleCommand::Unload);

    assert!(sim.tip(1) < FINDA_AT);
    assert_eq!(sim.tip(4), 0);
    assert_eq!(sim.mmu.selected_slot(), slot(1));
    assert_eq!(sim.mmu.idler_status(), IdlerStatus::Parked);
    assert!(sim.faults().is_empty());
}
