#![no_main]
#![no_std]

use panic_probe as _;
use defmt_rtt as _;
use stm32f0xx_hal as hal;
use reaction_game as lib;

#[rtic::app(device = crate::hal::pac, dispatchers = [CEC_CAN, USART3_4])]
mod app {
    use cortex_m::interrupt::free as ifree;
    use cortex_m::peripheral::{SYST, syst::SystClkSource};
    use rtic::Mutex;
    use super::hal;
    use hal::prelude::*;
    use hal::gpio::{Input, Output, Pin, PullDown, PushPull};
    use hal::pac::{TIM1, TIM2};
    use hal::pwm::{PwmChannels, C1, C2, C3};

    use super::lib;
    use lib::arcade::{Fader, Glower, LedBank};
    use lib::bsp::{Buttons, Position, SevenSegment};
    use lib::bsp::{buttons::ButtonPanel, console::SerialConsole, dimmer::PwmDimmer, seven::SevenSegmentDisplay};
    use lib::config::CONFIG;
    use lib::game::{Dice, GameState, IoContext, ReactionGame};
    use lib::game::events::{classify_press, on_timeout, WAIT_MASK};
    use lib::hal_ext::{counter::DownCounter, exti::{self, ButtonInterrupts, Port}};
    use lib::os::{ms_to_ticks, AlarmId, Callback, EventMask, Scheduler, Task, TICK_HZ};

    /// Presses closer than this to the previous one are contact bounce
    const DEBOUNCE_MS: u32 = 50;

    /// EXTI lines of buttons in `Button::ALL` order
    const BUTTON_LINES: [exti::Line; 4] = [(4, Port::B), (5, Port::B), (6, Port::B), (7, Port::B)];

    type Display = SevenSegmentDisplay<Pin<Output<PushPull>>>;
    type Console = SerialConsole<hal::serial::Tx<hal::pac::USART2>>;
    type Panel = ButtonPanel<Pin<Input<PullDown>>>;

    /// Game state as seen by interrupts when classifying their events
    #[derive(Clone, Copy)]
    pub struct GameView {
        state: GameState,
        digit: Option<u8>,
    }

    /// Traffic light LEDs on TIM1 and the RGB LED on TIM2
    pub struct Leds {
        red: PwmDimmer<PwmChannels<TIM1, C1>>,
        yellow: PwmDimmer<PwmChannels<TIM1, C2>>,
        green: PwmDimmer<PwmChannels<TIM1, C3>>,
        rgb_red: PwmDimmer<PwmChannels<TIM2, C1>>,
        rgb_green: PwmDimmer<PwmChannels<TIM2, C2>>,
        rgb_blue: PwmDimmer<PwmChannels<TIM2, C3>>,
    }

    impl Leds {
        fn bank(&mut self) -> LedBank<'_> {
            LedBank::new([
                &mut self.red,
                &mut self.yellow,
                &mut self.green,
                &mut self.rgb_red,
                &mut self.rgb_green,
                &mut self.rgb_blue,
            ])
        }
    }

    #[shared]
    struct Shared {
        scheduler: Scheduler,
        view: GameView,
        leds: Leds,
        now: u32,
    }

    #[local]
    struct Local {
        timer: hal::timers::Timer<hal::pac::TIM15>,
        exti: ButtonInterrupts,
        buttons: Panel,
        game: ReactionGame,
        console: Console,
        display: Display,
        stopwatch: DownCounter,
        dice: Dice,
        fader: Fader,
        glower: Glower,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut core = cx.core;
        let mut dev = cx.device;

        // Automatically enter sleep mode when leaving an ISR
        if cfg!(feature = "idle-sleep") {
            core.SCB.set_sleeponexit();
        }

        // Free running SysTick, only used as a time source for the random seed
        core.SYST.set_clock_source(SystClkSource::Core);
        core.SYST.set_reload(0x00ff_ffff);
        core.SYST.clear_current();
        core.SYST.enable_counter();

        // Timers run at pclk as long as the APB prescaler is 1
        let mut rcc = dev.RCC
            .configure()
            .hsi48()
            .sysclk(48.mhz())
            .pclk(48.mhz())
            .freeze(&mut dev.FLASH);

        // Pinout
        let gpioa = dev.GPIOA.split(&mut rcc);
        let gpiob = dev.GPIOB.split(&mut rcc);
        let gpioc = dev.GPIOC.split(&mut rcc);

        // Seven-segment display, segments A..G of each digit
        let left = ifree(|cs| [
            gpioc.pc0.into_push_pull_output(cs).downgrade(),
            gpioc.pc1.into_push_pull_output(cs).downgrade(),
            gpioc.pc2.into_push_pull_output(cs).downgrade(),
            gpioc.pc3.into_push_pull_output(cs).downgrade(),
            gpioc.pc4.into_push_pull_output(cs).downgrade(),
            gpioc.pc5.into_push_pull_output(cs).downgrade(),
            gpioc.pc6.into_push_pull_output(cs).downgrade(),
        ]);
        let right = ifree(|cs| [
            gpioc.pc7.into_push_pull_output(cs).downgrade(),
            gpioc.pc8.into_push_pull_output(cs).downgrade(),
            gpioc.pc9.into_push_pull_output(cs).downgrade(),
            gpioc.pc10.into_push_pull_output(cs).downgrade(),
            gpioc.pc11.into_push_pull_output(cs).downgrade(),
            gpioc.pc12.into_push_pull_output(cs).downgrade(),
            gpiob.pb12.into_push_pull_output(cs).downgrade(),
        ]);
        let display = SevenSegmentDisplay::new(left, right);

        // Buttons pull the pins high when pressed
        let buttons = ifree(|cs| [
            gpiob.pb4.into_pull_down_input(cs).downgrade(),
            gpiob.pb5.into_pull_down_input(cs).downgrade(),
            gpiob.pb6.into_pull_down_input(cs).downgrade(),
            gpiob.pb7.into_pull_down_input(cs).downgrade(),
        ]);
        let buttons = ButtonPanel::new(buttons);
        let exti = ButtonInterrupts::new(dev.SYSCFG, dev.EXTI, &BUTTON_LINES);

        // Console
        let tx = ifree(|cs| gpioa.pa2.into_alternate_af1(cs));
        let rx = ifree(|cs| gpioa.pa3.into_alternate_af1(cs));
        let (tx, _rx) = hal::serial::Serial::usart2(dev.USART2, (tx, rx), 115_200.bps(), &mut rcc).split();
        let console = SerialConsole::new(tx);

        // LEDs
        let (red, yellow, green) = ifree(|cs| (
            gpioa.pa8.into_alternate_af2(cs),
            gpioa.pa9.into_alternate_af2(cs),
            gpioa.pa10.into_alternate_af2(cs),
        ));
        let (red, yellow, green) = hal::pwm::tim1(dev.TIM1, (red, yellow, green), &mut rcc, 20.khz());
        let (rgb_red, rgb_green, rgb_blue) = ifree(|cs| (
            gpioa.pa0.into_alternate_af2(cs),
            gpioa.pa1.into_alternate_af2(cs),
            gpiob.pb10.into_alternate_af2(cs),
        ));
        let (rgb_red, rgb_green, rgb_blue) = hal::pwm::tim2(dev.TIM2, (rgb_red, rgb_green, rgb_blue), &mut rcc, 20.khz());
        let mut leds = Leds {
            red: PwmDimmer::new(red),
            yellow: PwmDimmer::new(yellow),
            green: PwmDimmer::new(green),
            rgb_red: PwmDimmer::new(rgb_red),
            rgb_green: PwmDimmer::new(rgb_green),
            rgb_blue: PwmDimmer::new(rgb_blue),
        };

        // Reaction stopwatch
        let stopwatch = DownCounter::new(dev.TIM3, rcc.clocks.pclk().0, CONFIG.stopwatch_hz);

        // Alarm tick
        let mut timer = hal::timers::Timer::tim15(dev.TIM15, TICK_HZ.hz(), &mut rcc);
        timer.listen(hal::timers::Event::TimeOut);

        defmt::info!("Reaction game v{=str} ({=str})",
            lib::build_info::PKG_VERSION,
            lib::build_info::GIT_COMMIT_HASH_SHORT.unwrap_or("unknown"),
        );
        if let Err(e) = CONFIG.validate() {
            defmt::error!("Invalid configuration: {}", e);
        }

        let mut scheduler = Scheduler::new();

        let mut fader = Fader::new(&CONFIG.fader);
        fader.start(&mut leds.bank());
        let glower = Glower::new(&CONFIG.glow);
        let armed = scheduler
            .set_alarm(AlarmId::Fader, ms_to_ticks(CONFIG.fader.start_delay_ms), ms_to_ticks(CONFIG.fader.step_ms))
            .and_then(|_| scheduler.set_alarm(AlarmId::Glower, ms_to_ticks(CONFIG.glow.start_delay_ms), 0));
        if let Err(e) = armed {
            defmt::error!("LED alarms: {}", e);
        }

        let seed = random_seed();
        defmt::debug!("Seed: {=u64:x}", seed);

        // Welcome message is printed from the game task
        if reaction_game::spawn().is_err() {
            defmt::error!("Spawn failed: reaction_game");
        }

        let shared = Shared {
            scheduler,
            view: GameView { state: GameState::Uninitialized, digit: None },
            leds,
            now: 0,
        };

        let local = Local {
            timer,
            exti,
            buttons,
            game: ReactionGame::new(&CONFIG.game),
            console,
            display,
            stopwatch,
            dice: Dice::seeded(seed),
            fader,
            glower,
        };

        (shared, local, init::Monotonics())
    }

    /// Alarm tick
    #[task(binds = TIM15, priority = 3, shared = [scheduler, view, now], local = [timer])]
    fn tick(cx: tick::Context) {
        let tick::SharedResources { mut scheduler, mut view, mut now } = cx.shared;
        // Clears interrupt flag
        if cx.local.timer.wait().is_err() {
            return;
        }
        now.lock(|now| *now = now.wrapping_add(1));

        for callback in scheduler.lock(|s| s.tick()) {
            match callback {
                Callback::RoundTimeout => {
                    let state = view.lock(|v| v.state);
                    if let Some(mask) = on_timeout(state) {
                        post(&mut scheduler, mask);
                    }
                },
            }
        }

        spawn_ready(&mut scheduler);
    }

    #[task(binds = EXTI4_15, priority = 2, shared = [scheduler, view, now], local = [
        exti,
        buttons,
        last_press: Option<u32> = None,
    ])]
    fn button(cx: button::Context) {
        let button::SharedResources { mut scheduler, mut view, now: mut clock } = cx.shared;
        if cx.local.exti.clear_pending() == 0 {
            return;
        }

        let now = clock.lock(|now| *now);
        if let Some(last) = *cx.local.last_press {
            if now.wrapping_sub(last) < DEBOUNCE_MS {
                return;
            }
        }
        *cx.local.last_press = Some(now);

        let side = cx.local.buttons.pressed_side();
        let view = view.lock(|v| *v);
        defmt::trace!("Press {} in {}", side, view.state);
        if let Some(mask) = classify_press(view.state, view.digit, side) {
            post(&mut scheduler, mask);
        }

        spawn_ready(&mut scheduler);
    }

    /// Game task, waits for any of the game events
    #[task(priority = 1, capacity = 1, shared = [scheduler, view], local = [game, console, display, stopwatch, dice])]
    fn reaction_game(cx: reaction_game::Context) {
        let reaction_game::SharedResources { scheduler, mut view } = cx.shared;
        let reaction_game::LocalResources { game, console, display, stopwatch, dice } = cx.local;
        let mut io = IoContext { console, display, stopwatch, dice, scheduler };

        if game.state() == GameState::Uninitialized {
            if let Err(e) = game.init(&mut io) {
                defmt::error!("Game init: {}", e);
            }
        } else if let Some(pending) = io.scheduler.lock(|s| s.take_events(WAIT_MASK)) {
            match game.dispatch(pending, &mut io) {
                Ok(Some(event)) => defmt::debug!("{} -> {}", event, game.state()),
                Ok(None) => defmt::trace!("Events {} ignored in {}", pending, game.state()),
                Err(e) => defmt::warn!("Game: {}", e),
            }
        }

        let state = game.state();
        let digit = io.display.get(Position::Left);
        view.lock(|v| *v = GameView { state, digit });

        spawn_ready(&mut io.scheduler);
    }

    #[task(priority = 1, shared = [leds], local = [fader])]
    fn fader(mut cx: fader::Context) {
        let fader = cx.local.fader;
        cx.shared.leds.lock(|leds| fader.step(&mut leds.bank()));
    }

    #[task(priority = 1, shared = [leds, scheduler], local = [glower])]
    fn glower(cx: glower::Context) {
        let glower::SharedResources { mut leds, mut scheduler } = cx.shared;
        let glower = cx.local.glower;
        let Some(next_ms) = leds.lock(|leds| glower.step(&mut leds.bank())) else {
            return;
        };
        if let Err(e) = scheduler.lock(|s| s.set_alarm(AlarmId::Glower, ms_to_ticks(next_ms), 0)) {
            defmt::warn!("Glower alarm: {}", e);
        }
    }

    /// Post events to the game task
    fn post(scheduler: &mut impl Mutex<T = Scheduler>, mask: EventMask) {
        if let Err(e) = scheduler.lock(|s| s.set_event(Task::ReactionGame, mask)) {
            defmt::warn!("Post {}: {}", mask, e);
        }
    }

    /// Turn pending activations into RTIC spawns
    fn spawn_ready(scheduler: &mut impl Mutex<T = Scheduler>) {
        while let Some(task) = scheduler.lock(|s| s.next_ready()) {
            let spawned = match task {
                Task::ReactionGame => reaction_game::spawn(),
                Task::Fader => fader::spawn(),
                Task::Glower => glower::spawn(),
            };
            // Pending spawn of the same task will handle this activation too
            if spawned.is_err() {
                defmt::trace!("Already pending: {}", task);
            }
        }
    }

    /// Mix of the 96-bit device unique ID and the SysTick counter
    fn random_seed() -> u64 {
        const UID: *const u32 = 0x1fff_f7ac as *const u32;
        let mut seed = SYST::get_current() as u64;
        for i in 0..3 {
            let word = unsafe { core::ptr::read_volatile(UID.add(i)) };
            seed = seed.rotate_left(21) ^ word as u64;
        }
        seed
    }
}
