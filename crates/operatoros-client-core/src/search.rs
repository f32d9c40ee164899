use std::time::Duration;

/// Trailing-edge debounce expressed as generations.
///
/// Each input calls [`Debouncer::schedule`] and gets a ticket. The host
/// starts a timer for [`Debouncer::quiet_period`], and when it elapses it asks
/// [`Debouncer::settle`] whether that ticket is still the newest. Only the last
/// ticket of a burst settles, so a burst runs the handler once.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    generation: u64,
    settled: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

impl Debouncer {
    #[must_use]
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            generation: 0,
            settled: 0,
        }
    }

    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Cancels whatever is pending and starts a new quiet period.
    pub fn schedule(&mut self) -> DebounceTicket {
        self.generation = self.generation.wrapping_add(1);
        DebounceTicket(self.generation)
    }

    /// Returns `true` exactly once, for the newest ticket.
    pub fn settle(&mut self, ticket: DebounceTicket) -> bool {
        if ticket.0 != self.generation || self.settled == ticket.0 {
            return false;
        }
        self.settled = ticket.0;
        true
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.settled != self.generation
    }
}

/// Lower-cased query, or `None` when everything should be shown.
#[must_use]
pub fn normalize_query(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_lowercase())
    }
}

/// Whether a `.searchable` element with `text` stays visible for `query`.
#[must_use]
pub fn is_visible(text: &str, query: Option<&str>) -> bool {
    match query {
        None => true,
        Some(query) => text.to_lowercase().contains(query),
    }
}

/// Visibility for a batch of candidates, in order.
pub fn filter_visibility<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    raw_query: &str,
) -> Vec<bool> {
    let query = normalize_query(raw_query);
    texts
        .into_iter()
        .map(|text| is_visible(text, query.as_deref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_keystrokes_settles_once() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let tickets: Vec<_> = (0..5).map(|_| debouncer.schedule()).collect();

        let passes = tickets
            .iter()
            .filter(|ticket| debouncer.settle(**ticket))
            .count();
        assert_eq!(passes, 1);
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.quiet_period(), Duration::from_millis(300));
    }

    #[test]
    fn only_the_newest_ticket_settles() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let first = debouncer.schedule();
        let second = debouncer.schedule();

        assert!(!debouncer.settle(first));
        assert!(debouncer.is_pending());
        assert!(debouncer.settle(second));
        assert!(!debouncer.settle(second));
    }

    #[test]
    fn separate_bursts_each_settle() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let first = debouncer.schedule();
        assert!(debouncer.settle(first));
        let second = debouncer.schedule();
        assert!(debouncer.settle(second));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let visible = filter_visibility(["Revenue Goal", "Beekeeping plan", "GOALS 2025"], "goal");
        assert_eq!(visible, vec![true, false, true]);
    }

    #[test]
    fn empty_query_shows_everything() {
        let visible = filter_visibility(["a", "b"], "");
        assert_eq!(visible, vec![true, true]);
    }
}
