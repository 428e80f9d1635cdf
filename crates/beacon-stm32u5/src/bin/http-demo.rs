//! Demo firmware: periodic HTTP GETs over a supervised channel.
//!
//! Two cooperative tasks run side by side, the session loop and an LED
//! blinker, pre-empted only by the notification interrupt, which drains
//! the record ring into the pending flags and returns. Every supervisor
//! call happens on the session loop.

#![no_std]
#![no_main]

extern crate alloc;

use core::cell::RefCell;
use core::mem::MaybeUninit;

use beacon::config::SessionConfig;
use beacon::flags::PendingFlags;
use beacon::host::{CorrelationTag, RxBuffer, TxBuffer};
use beacon::notify::{NotificationRecord, NotificationRing};
use beacon::session::Session;

use beacon_stm32u5::device;
use beacon_stm32u5::logging;
use beacon_stm32u5::network::Network;
use beacon_stm32u5::platform::{NOTIFICATION_SLOTS, NotificationCenter, Supervisor};

use cortex_m::interrupt::InterruptNumber;

use critical_section::Mutex;

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::interrupt::{self, InterruptExt};
use embassy_time::{Instant, Timer};

use embedded_alloc::LlffHeap as Heap;

use log::LevelFilter;

use static_cell::StaticCell;

// Correlation tag of the HTTP channel; tags 1 and 2 belong to the log
// transport.
const TAG_HTTP_CHANNEL: CorrelationTag = CorrelationTag::new(3);

const SESSION_LOOP_PAUSE_MS: u64 = 10;
const LED_PAUSE_MS: u64 = 500;
const HEAP_SIZE: usize = 16 * 1024;

#[global_allocator]
static HEAP: Heap = Heap::empty();

// Interrupt-shared state. The interrupt owns the ring cursor and raises
// flags; the session loop only ever takes the flags.
static FLAGS: PendingFlags = PendingFlags::new();
static RING: Mutex<RefCell<Option<NotificationRing<'static>>>> = Mutex::new(RefCell::new(None));

static RECORDS: StaticCell<[NotificationRecord; NOTIFICATION_SLOTS]> = StaticCell::new();
static RX: StaticCell<RxBuffer> = StaticCell::new();
static TX: StaticCell<TxBuffer> = StaticCell::new();

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

#[embassy_executor::task]
async fn blink(mut led: Output<'static>) {
    loop {
        led.toggle();
        Timer::after_millis(LED_PAUSE_MS).await;
    }
}

#[embassy_executor::task]
async fn session_loop(mut session: Session<Supervisor, Network>) {
    loop {
        let now = Instant::now().as_millis() as u32;
        session.poll(now, &FLAGS);
        Timer::after_millis(SESSION_LOOP_PAUSE_MS).await;
    }
}

// The supervisor raises this line after writing a notification record.
// Ring dispatch and flag raises only; no syscalls here, ever.
#[unsafe(no_mangle)]
extern "C" fn TIM8_BRK() {
    critical_section::with(|cs| {
        if let Some(ring) = RING.borrow_ref_mut(cs).as_mut() {
            let _ = ring.dispatch(&FLAGS);
        }
    });
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());

    {
        static HEAP_MEM: StaticCell<[MaybeUninit<u8>; HEAP_SIZE]> = StaticCell::new();
        let heap_mem = HEAP_MEM.init([MaybeUninit::uninit(); HEAP_SIZE]);
        unsafe { HEAP.init(heap_mem.as_mut_ptr() as usize, HEAP_SIZE) }
    }

    // The log transport requests the network; the HTTP session shares it.
    let network = logging::init(LevelFilter::Debug, interrupt::TIM1_BRK.number().into())
        .await
        .expect("Failed to bring up the log transport");

    device::log_device_info();

    // Register the HTTP notification ring and start its interrupt.
    let records = RECORDS.init([NotificationRecord::EMPTY; NOTIFICATION_SLOTS]);
    let irq = interrupt::TIM8_BRK;
    let (center, ring) = NotificationCenter::register(records, irq.number().into())
        .expect("Failed to register the notification center");
    critical_section::with(|cs| {
        let _ = RING.borrow_ref_mut(cs).replace(ring);
    });
    irq.unpend();
    unsafe { irq.enable() };

    let host = Supervisor::new(&center, RX.init(RxBuffer::new()), TX.init(TxBuffer::new()));
    let config = SessionConfig::new().correlation_tag(TAG_HTTP_CHANNEL);
    let session = Session::new(host, network, config);

    let led = Output::new(peripherals.PA5, Level::Low, Speed::Low);
    spawner.spawn(blink(led)).expect("Failed to spawn the LED task");
    spawner
        .spawn(session_loop(session))
        .expect("Failed to spawn the session loop");
}
