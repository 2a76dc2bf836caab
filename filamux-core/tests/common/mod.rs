//! Simulated unit for scenario tests
//!
//! A single [`World`] holds the physical state: axis positions, the
//! tip of each filament strand and a virtual clock. Axes, sensors and
//! the operator all share it through `Rc<RefCell<_>>`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use filamux_core::config::{AxisTiming, MmuConfig, SlotTable};
use filamux_core::traits::{
    Board, Clock, Direction, FaultSink, FilamentSensor, StatusLed, StepperAxis,
};
use filamux_core::{Fault, Hardware, Mmu, Slot};

/// Feed steps per millimetre used by the simulation
pub const STEPS_PER_MM: i64 = 144;

/// Strand tip position (feed steps) that trips the selector exit sensor
pub const FINDA_AT: i64 = 30 * STEPS_PER_MM;

/// Strand tip position that trips the extruder switch
pub const EXTRUDER_AT: i64 = FINDA_AT + 520 * STEPS_PER_MM;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Selector,
    Idler,
    Feed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    SelectorExit,
    ExtruderEntry,
    SelectorEndstop,
}

type Operator = Box<dyn FnMut(&mut World, Fault)>;

/// Physical state of the simulated unit
pub struct World {
    pub now_us: u64,
    pub selector_pos: i32,
    pub idler_pos: i32,
    pub max_travel: i32,
    pub idler_table: SlotTable,
    /// Idler distance within which a roller still grips its strand
    pub grip_window: i32,
    /// Tip of each strand in feed steps, 0 = fully behind the selector
    pub tips: [i64; 5],
    /// Furthest each strand can be pushed
    pub blocked_at: [Option<i64>; 5],
    /// Furthest each strand can be pulled back
    pub held_at: [Option<i64>; 5],
    pub extruder_switch_stuck: bool,
    pub led: bool,
    pub steps: [u64; 3],
    pub faults: Vec<(u64, Fault)>,
    operator: Option<Operator>,
}

impl World {
    fn new(config: &MmuConfig) -> Self {
        Self {
            now_us: 0,
            selector_pos: config.selector.max_travel / 3,
            idler_pos: config.idler.parked_position / 2,
            max_travel: config.selector.max_travel,
            idler_table: config.idler.table(),
            grip_window: config.idler.partial_step() - 1,
            tips: [0; 5],
            blocked_at: [None; 5],
            held_at: [None; 5],
            extruder_switch_stuck: false,
            led: false,
            steps: [0; 3],
            faults: Vec::new(),
            operator: None,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_us / 1000
    }

    /// Strand currently pressed against the feed gear, if any
    pub fn gripped(&self) -> Option<usize> {
        Slot::ALL
            .iter()
            .map(|s| s.index())
            .find(|&k| {
                (self.idler_pos - self.idler_table.position(Slot::ALL[k])).abs() <= self.grip_window
            })
    }

    pub fn selector_exit(&self) -> bool {
        self.tips.iter().any(|&t| t >= FINDA_AT)
    }

    pub fn extruder_entry(&self) -> bool {
        self.extruder_switch_stuck || self.tips.iter().any(|&t| t >= EXTRUDER_AT)
    }

    pub fn selector_endstop(&self) -> bool {
        self.selector_pos >= self.max_travel
    }

    pub fn total_steps(&self) -> u64 {
        self.steps.iter().sum()
    }

    pub fn fault_kinds(&self) -> Vec<Fault> {
        self.faults.iter().map(|&(_, f)| f).collect()
    }

    fn apply_step(&mut self, axis: AxisKind, direction: Direction) {
        match axis {
            AxisKind::Selector => {
                let delta = if direction == Direction::Clockwise { 1 } else { -1 };
                self.selector_pos = (self.selector_pos + delta).clamp(0, self.max_travel);
                self.steps[0] += 1;
            }
            AxisKind::Idler => {
                let delta = if direction == Direction::CounterClockwise { 1 } else { -1 };
                self.idler_pos = (self.idler_pos + delta).max(0);
                self.steps[1] += 1;
            }
            AxisKind::Feed => {
                if let Some(k) = self.gripped() {
                    let delta = if direction == Direction::CounterClockwise { 1 } else { -1 };
                    let max = self.blocked_at[k].unwrap_or(i64::MAX);
                    let min = self.held_at[k].unwrap_or(i64::MIN);
                    self.tips[k] = (self.tips[k] + delta).clamp(min, max);
                }
                self.steps[2] += 1;
            }
        }
    }
}

pub struct SimAxis {
    world: Rc<RefCell<World>>,
    kind: AxisKind,
    timing: AxisTiming,
    delay_us: u32,
    enabled: bool,
}

impl StepperAxis for SimAxis {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn step(&mut self, direction: Direction, steps: u32, stop: &mut dyn FnMut() -> bool) -> u32 {
        self.enabled = true;
        let period = u64::from(
            (self.timing.pulse_high_us + self.timing.pulse_low_us + self.delay_us)
                * self.timing.microsteps,
        );
        self.world.borrow_mut().now_us += u64::from(self.timing.settle_us);

        for taken in 1..=steps {
            {
                let mut world = self.world.borrow_mut();
                world.apply_step(self.kind, direction);
                world.now_us += period;
            }
            if stop() {
                return taken;
            }
        }
        steps
    }

    fn set_step_delay_us(&mut self, delay_us: u32) {
        self.delay_us = delay_us;
    }

    fn step_delay_us(&self) -> u32 {
        self.delay_us
    }
}

pub struct SimSensor {
    world: Rc<RefCell<World>>,
    kind: SensorKind,
}

impl FilamentSensor for SimSensor {
    fn is_triggered(&mut self) -> bool {
        let world = self.world.borrow();
        match self.kind {
            SensorKind::SelectorExit => world.selector_exit(),
            SensorKind::ExtruderEntry => world.extruder_entry(),
            SensorKind::SelectorEndstop => world.selector_endstop(),
        }
    }
}

pub struct SimClock {
    world: Rc<RefCell<World>>,
}

impl Clock for SimClock {
    fn now_ms(&mut self) -> u64 {
        self.world.borrow().now_ms()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.world.borrow_mut().now_us += u64::from(ms) * 1000;
    }
}

/// Stands in for the operator answering a fault
pub struct SimOperator {
    world: Rc<RefCell<World>>,
}

impl FaultSink for SimOperator {
    fn on_fault(&mut self, fault: Fault) {
        let mut world = self.world.borrow_mut();
        let now = world.now_ms();
        world.faults.push((now, fault));

        match world.operator.take() {
            Some(mut operator) => {
                operator(&mut *world, fault);
                world.operator = Some(operator);
            }
            None => panic!("unexpected fault {:?}", fault),
        }
    }
}

pub struct SimLed {
    world: Rc<RefCell<World>>,
}

impl StatusLed for SimLed {
    fn set(&mut self, on: bool) {
        self.world.borrow_mut().led = on;
    }
}

pub struct SimBoard;

impl Board for SimBoard {
    type Selector = SimAxis;
    type Idler = SimAxis;
    type Feed = SimAxis;
    type Sensor = SimSensor;
    type Clock = SimClock;
    type Faults = SimOperator;
    type Led = SimLed;
}

/// Configuration whose idler geometry lets the simulation tell slots
/// apart from a backed-off roller
pub fn test_config() -> MmuConfig {
    let mut config = MmuConfig::default();
    config.idler.pitch = 40;
    config.idler.parked_position = 200;
    config.idler.quick_step = 23;
    config
}

pub struct Sim {
    pub world: Rc<RefCell<World>>,
    pub mmu: Mmu<SimBoard>,
}

impl Sim {
    /// Create a unit without running the boot sequence
    pub fn new(config: MmuConfig) -> Self {
        let world = Rc::new(RefCell::new(World::new(&config)));

        let axis = |kind, timing: AxisTiming| SimAxis {
            world: world.clone(),
            kind,
            timing,
            delay_us: timing.step_delay_us,
            enabled: false,
        };
        let sensor = |kind| SimSensor {
            world: world.clone(),
            kind,
        };

        let hw = Hardware::<SimBoard> {
            selector: axis(AxisKind::Selector, config.selector.timing),
            idler: axis(AxisKind::Idler, config.idler.timing),
            feed: axis(AxisKind::Feed, config.feed.timing),
            selector_exit: sensor(SensorKind::SelectorExit),
            extruder_entry: sensor(SensorKind::ExtruderEntry),
            selector_endstop: sensor(SensorKind::SelectorEndstop),
            clock: SimClock {
                world: world.clone(),
            },
            faults: SimOperator {
                world: world.clone(),
            },
            led: SimLed {
                world: world.clone(),
            },
        };

        Self {
            mmu: Mmu::new(hw, config),
            world,
        }
    }

    /// Create a unit that has run its boot sequence
    pub fn booted() -> Self {
        let mut sim = Self::new(test_config());
        sim.mmu.init();
        sim
    }

    /// Install the operator reaction to faults
    pub fn on_fault(&self, operator: impl FnMut(&mut World, Fault) + 'static) {
        self.world.borrow_mut().operator = Some(Box::new(operator));
    }

    pub fn selector_pos(&self) -> i32 {
        self.world.borrow().selector_pos
    }

    pub fn idler_pos(&self) -> i32 {
        self.world.borrow().idler_pos
    }

    pub fn tip(&self, slot: usize) -> i64 {
        self.world.borrow().tips[slot]
    }

    pub fn total_steps(&self) -> u64 {
        self.world.borrow().total_steps()
    }

    pub fn now_ms(&self) -> u64 {
        self.world.borrow().now_ms()
    }

    pub fn faults(&self) -> Vec<Fault> {
        self.world.borrow().fault_kinds()
    }

    pub fn selector_position_of(&self, slot: Slot) -> i32 {
        self.mmu.config().selector.table().position(slot)
    }

    pub fn idler_position_of(&self, slot: Slot) -> i32 {
        self.mmu.config().idler.table().position(slot)
    }
}

pub fn slot(k: u8) -> Slot {
    Slot::ALL[k as usize]
}
