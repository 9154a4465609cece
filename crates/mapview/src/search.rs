use catalog::{Gazetteer, GazetteerEntry, GazetteerOutcome, GazetteerQueryOptions};
use foundation::time::Time;
use runtime::TimerSlot;

/// Debounced place search over the gazetteer.
///
/// Typing only arms the debounce timer; the filter runs from [`SearchBox::poll`]
/// once the text has been stable for the configured delay.
#[derive(Debug)]
pub struct SearchBox {
    debounce_ms: u64,
    opts: GazetteerQueryOptions,
    text: String,
    timer: TimerSlot<String>,
    outcome: GazetteerOutcome,
}

impl SearchBox {
    pub fn new(debounce_ms: u64, opts: GazetteerQueryOptions) -> Self {
        Self {
            debounce_ms,
            opts,
            text: String::new(),
            timer: TimerSlot::new(),
            outcome: GazetteerOutcome::TooShort,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn outcome(&self) -> &GazetteerOutcome {
        &self.outcome
    }

    pub fn results(&self) -> &[GazetteerEntry] {
        self.outcome.entries()
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn input(&mut self, now: Time, text: &str) {
        self.text = text.to_string();
        self.timer.arm(now, self.debounce_ms, self.text.clone());
    }

    /// Runs the filter if the debounce has elapsed. Returns the fresh outcome
    /// when it ran.
    pub fn poll(&mut self, now: Time, gazetteer: &Gazetteer) -> Option<&GazetteerOutcome> {
        let (_, query) = self.timer.take_due(now)?;
        self.outcome = gazetteer.search(&query, self.opts);
        tracing::debug!(
            query = %query,
            results = self.outcome.entries().len(),
            "search: query ran"
        );
        Some(&self.outcome)
    }

    pub fn entry(&self, index: usize) -> Option<&GazetteerEntry> {
        self.results().get(index)
    }

    /// Back to the empty box, e.g. after a successful selection.
    pub fn clear(&mut self) {
        self.timer.cancel();
        self.text.clear();
        self.outcome = GazetteerOutcome::TooShort;
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }
}
