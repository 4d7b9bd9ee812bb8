use crate::hal;

// RCC_APB2ENR bits
const APB2ENR_SYSCFGEN: u32 = 1 << 0;

/// GPIO port an EXTI line is routed to
#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum Port {
    A = 0,
    B = 1,
    C = 2,
}

/// EXTI line (pin number) and its port
pub type Line = (u8, Port);

/// Values of SYSCFG_EXTICR1..4 routing all `lines`, other lines stay on port A
pub const fn routing(lines: &[Line]) -> [u32; 4] {
    let mut exticr = [0; 4];
    let mut i = 0;
    while i < lines.len() {
        let (line, port) = lines[i];
        let reg = (line / 4) as usize;
        let shift = (line % 4) * 4;
        exticr[reg] |= (port as u32) << shift;
        i += 1;
    }
    exticr
}

/// Bit mask of `lines` in EXTI registers
pub const fn line_mask(lines: &[Line]) -> u32 {
    let mut mask = 0;
    let mut i = 0;
    while i < lines.len() {
        mask |= 1 << lines[i].0;
        i += 1;
    }
    mask
}

/// Rising edge interrupts on button pins
///
/// HAL has no EXTI abstraction so SYSCFG and EXTI are configured directly.
pub struct ButtonInterrupts {
    exti: hal::pac::EXTI,
    mask: u32,
}

impl ButtonInterrupts {
    pub fn new(syscfg: hal::pac::SYSCFG, exti: hal::pac::EXTI, lines: &[Line]) -> Self {
        // Need to access `.regs` but it's private
        let rcc_regs = unsafe { &*hal::pac::RCC::ptr() };
        rcc_regs.apb2enr.modify(|r, w| unsafe { w.bits(r.bits() | APB2ENR_SYSCFGEN) });

        let [cr1, cr2, cr3, cr4] = routing(lines);
        syscfg.exticr1.write(|w| unsafe { w.bits(cr1) });
        syscfg.exticr2.write(|w| unsafe { w.bits(cr2) });
        syscfg.exticr3.write(|w| unsafe { w.bits(cr3) });
        syscfg.exticr4.write(|w| unsafe { w.bits(cr4) });

        let mask = line_mask(lines);
        exti.rtsr.modify(|r, w| unsafe { w.bits(r.bits() | mask) });
        exti.ftsr.modify(|r, w| unsafe { w.bits(r.bits() & !mask) });
        // Drop anything latched during configuration
        exti.pr.write(|w| unsafe { w.bits(mask) });
        exti.imr.modify(|r, w| unsafe { w.bits(r.bits() | mask) });

        Self { exti, mask }
    }

    /// Clear pending flags of our lines, returning the lines that were pending
    pub fn clear_pending(&mut self) -> u32 {
        let pending = self.exti.pr.read().bits() & self.mask;
        self.exti.pr.write(|w| unsafe { w.bits(pending) });
        pending
    }
}
