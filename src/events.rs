//! Interrupt-to-main-loop event flags
//!
//! Every interrupt source owns one flag. The handler only raises it, the main
//! loop takes (reads and clears) it. There is no queue: any number of raises
//! between two polls are observed as a single pending event.
//!
//! AVR has no compare-and-swap, so everything here is plain single-byte
//! loads and stores.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Single-slot, overwrite-on-repeat notification.
pub struct EventFlag {
    pending: AtomicBool,
}

impl EventFlag {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Mark the event as pending. Interrupt side.
    #[inline]
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Report whether the event was pending and clear it. Main loop side.
    ///
    /// A raise landing between the load and the store merges into the event
    /// being taken, which is the same coalescing as two raises before a poll.
    #[inline]
    pub fn take(&self) -> bool {
        if self.pending.load(Ordering::Acquire) {
            self.pending.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for EventFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest ADC sample plus a changed flag.
///
/// The conversion-complete handler writes every sample but only raises the
/// flag when the value differs from the one the main loop last acknowledged.
pub struct SampleSlot {
    latest: AtomicU8,
    acknowledged: AtomicU8,
    changed: EventFlag,
}

impl SampleSlot {
    pub const fn new() -> Self {
        Self {
            latest: AtomicU8::new(0),
            acknowledged: AtomicU8::new(0),
            changed: EventFlag::new(),
        }
    }

    /// Store a fresh conversion result. Interrupt side.
    #[inline]
    pub fn record(&self, sample: u8) {
        self.latest.store(sample, Ordering::Relaxed);
        if sample != self.acknowledged.load(Ordering::Relaxed) {
            self.changed.raise();
        }
    }

    /// Newest sample if it changed since the last call. Main loop side.
    pub fn take(&self) -> Option<u8> {
        if !self.changed.take() {
            return None;
        }
        let sample = self.latest.load(Ordering::Relaxed);
        self.acknowledged.store(sample, Ordering::Relaxed);
        Some(sample)
    }

    /// Last value handed to the main loop.
    pub fn acknowledged(&self) -> u8 {
        self.acknowledged.load(Ordering::Relaxed)
    }
}

impl Default for SampleSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// All asynchronous inputs of the controller.
pub struct Events {
    /// Button A on INT0, step the duty cycle
    pub button_pressed: EventFlag,
    /// Button B on INT1, flip the direction
    pub direction_change: EventFlag,
    /// Potentiometer on ADC0
    pub adc: SampleSlot,
}

impl Events {
    pub const fn new() -> Self {
        Self {
            button_pressed: EventFlag::new(),
            direction_change: EventFlag::new(),
            adc: SampleSlot::new(),
        }
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared between the interrupt handlers and the main loop
pub static EVENTS: Events = Events::new();
