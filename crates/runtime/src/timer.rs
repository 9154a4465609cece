use foundation::time::Time;

/// Identity of one armed timer. Every `arm` mints a fresh handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
struct Pending<T> {
    handle: TimerHandle,
    deadline: Time,
    payload: T,
}

/// Outcome of [`TimerSlot::arm`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Armed {
    pub handle: TimerHandle,
    /// The timer that was still outstanding and got cancelled, if any.
    pub replaced: Option<TimerHandle>,
}

/// A slot holding at most one outstanding one-shot timer.
///
/// Arming always cancels whatever was pending first, so two timers from the
/// same slot can never both fire. Timers do not fire on their own: the owner
/// polls with [`TimerSlot::take_due`] from its event loop.
#[derive(Debug, Clone)]
pub struct TimerSlot<T> {
    next_handle: u64,
    pending: Option<Pending<T>>,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self {
            next_handle: 1,
            pending: None,
        }
    }
}

impl<T> TimerSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now: Time, delay_ms: u64, payload: T) -> Armed {
        let replaced = self.cancel();
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.pending = Some(Pending {
            handle,
            deadline: now.plus_millis(delay_ms),
            payload,
        });
        Armed { handle, replaced }
    }

    /// Cancels the outstanding timer. Returns its handle if one was pending.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.pending.take().map(|p| p.handle)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.pending.as_ref().map(|p| p.handle)
    }

    pub fn deadline(&self) -> Option<Time> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn payload(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.payload)
    }

    /// Fires the timer if its deadline has passed, consuming it.
    pub fn take_due(&mut self, now: Time) -> Option<(TimerHandle, T)> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| (p.handle, p.payload)),
            _ => None,
        }
    }
}
