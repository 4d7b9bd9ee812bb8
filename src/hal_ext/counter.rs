use crate::hal;
use crate::bsp::Stopwatch;

type TimerRegs = hal::pac::TIM3;

// TIMx_CR1 bits
const CR1_CEN: u32 = 1 << 0;
const CR1_OPM: u32 = 1 << 3;
const CR1_DIR: u32 = 1 << 4;
// TIMx_SR bits
const SR_UIF: u32 = 1 << 0;
// TIMx_EGR bits
const EGR_UG: u32 = 1 << 0;

/// Ticks left in the window given halted counter status and value
///
/// Underflow reloads the counter with the window length, so a raised update
/// flag means the window is over whatever the counter reads.
pub fn remaining(sr: u32, cnt: u32) -> u16 {
    if sr & SR_UIF != 0 {
        0
    } else {
        cnt as u16
    }
}

/// Down-counting stopwatch on TIM3
///
/// The counter is loaded with the number of ticks of the measurement window and
/// counts down in one-pulse mode, so it stops by itself when reaching zero.
/// HAL only provides periodic timers, so registers are configured directly.
pub struct DownCounter {
    tim: TimerRegs,
    tick_hz: u32,
}

impl DownCounter {
    /// Configure counter to tick at `tick_hz` given the timer kernel clock
    pub fn new(tim: TimerRegs, timer_clock_hz: u32, tick_hz: u32) -> Self {
        // Need to access `.regs` but it's private
        let rcc_regs = unsafe { &*hal::pac::RCC::ptr() };
        rcc_regs.apb1enr.modify(|_, w| w.tim3en().set_bit());

        let psc = (timer_clock_hz / tick_hz.max(1)).saturating_sub(1);
        let psc = u16::try_from(psc).unwrap_or(u16::MAX);
        defmt::debug!("Counter: clk={=u32} tick={=u32} psc={=u16}", timer_clock_hz, tick_hz, psc);

        tim.cr1.write(|w| unsafe { w.bits(CR1_OPM | CR1_DIR) });
        tim.psc.write(|w| unsafe { w.bits(psc as u32) });
        // Load prescaler immediately
        tim.egr.write(|w| unsafe { w.bits(EGR_UG) });

        Self { tim, tick_hz }
    }
}

impl Stopwatch for DownCounter {
    fn ticks_per_second(&self) -> u32 {
        self.tick_hz
    }

    fn start(&mut self, ticks: u16) {
        self.tim.cr1.modify(|r, w| unsafe { w.bits(r.bits() & !CR1_CEN) });
        self.tim.arr.write(|w| unsafe { w.bits(ticks as u32) });
        self.tim.cnt.write(|w| unsafe { w.bits(ticks as u32) });
        // UG in `new` or a previous underflow left the flag raised, rc_w0
        self.tim.sr.write(|w| unsafe { w.bits(!SR_UIF) });
        self.tim.cr1.modify(|r, w| unsafe { w.bits(r.bits() | CR1_CEN) });
    }

    fn stop(&mut self) -> u16 {
        // Halt first so an underflow can't slip in between the reads
        self.tim.cr1.modify(|r, w| unsafe { w.bits(r.bits() & !CR1_CEN) });
        remaining(self.tim.sr.read().bits(), self.tim.cnt.read().bits())
    }
}
