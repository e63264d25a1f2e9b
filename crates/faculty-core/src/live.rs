//! Debounced live search.
//!
//! [`LiveSearch`] turns keystrokes into occasional search requests. It is a
//! plain state machine (`Idle → Pending → Idle`) driven by caller-supplied
//! [`Instant`]s, so the UI loop owns the clock and tests can use virtual
//! time.
//!
//! Only the name field triggers live searches. Every emitted request carries
//! a sequence number from a [`Sequencer`]; a consumer that receives results
//! out of order keeps only the latest.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::filter::SearchFilter;

/// Quiet period after the last name keystroke before a search is issued.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Minimum trimmed name length that arms the debounce timer.
pub const MIN_NAME_LEN: usize = 2;

// ─── Sequencing ───────────────────────────────────────────────────────────────

/// Issues monotonically increasing request numbers.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
  issued: u64,
}

impl Sequencer {
  pub fn next(&mut self) -> u64 {
    self.issued += 1;
    self.issued
  }

  /// Whether `seq` is the most recently issued number.
  pub fn is_latest(&self, seq: u64) -> bool { seq != 0 && seq == self.issued }
}

/// A search to run, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
  pub seq:    u64,
  pub filter: SearchFilter,
}

// ─── State machine ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveState {
  Idle,
  Pending { deadline: Instant },
}

/// Search-bar state plus its debounce timer.
#[derive(Debug, Clone)]
pub struct LiveSearch {
  name:         String,
  department:   String,
  topic:        String,
  delay:        Duration,
  enabled:      bool,
  state:        LiveState,
  has_searched: bool,
  sequencer:    Sequencer,
}

impl Default for LiveSearch {
  fn default() -> Self { Self::new(DEFAULT_DELAY) }
}

impl LiveSearch {
  pub fn new(delay: Duration) -> Self {
    Self {
      name: String::new(),
      department: String::new(),
      topic: String::new(),
      delay,
      enabled: true,
      state: LiveState::Idle,
      has_searched: false,
      sequencer: Sequencer::default(),
    }
  }

  /// Turn search-as-you-type on or off. When off, only [`Self::submit`] and
  /// [`Self::clear`] issue searches.
  pub fn with_live(mut self, enabled: bool) -> Self {
    self.enabled = enabled;
    self
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn department(&self) -> &str { &self.department }

  pub fn topic(&self) -> &str { &self.topic }

  pub fn state(&self) -> LiveState { self.state }

  pub fn is_pending(&self) -> bool { matches!(self.state, LiveState::Pending { .. }) }

  /// The filter the current field contents describe.
  pub fn filter(&self) -> SearchFilter {
    SearchFilter::new(&self.name, &self.department, &self.topic)
  }

  /// Whether `seq` belongs to the newest request issued so far.
  pub fn is_latest(&self, seq: u64) -> bool { self.sequencer.is_latest(seq) }

  // ── Field edits ─────────────────────────────────────────────────────────

  /// Replace the name field.
  ///
  /// A trimmed length of at least [`MIN_NAME_LEN`] (re)starts the timer. A
  /// name cleared to nothing after an earlier search emits immediately with
  /// the remaining fields. Anything in between just cancels the timer.
  pub fn set_name(&mut self, name: &str, now: Instant) -> Option<SearchRequest> {
    if name == self.name {
      return None;
    }
    self.name = name.to_owned();
    if !self.enabled {
      return None;
    }

    let len = self.name.trim().chars().count();
    self.state = LiveState::Idle;

    if len >= MIN_NAME_LEN {
      let deadline = now + self.delay;
      trace!(?deadline, "live search armed");
      self.state = LiveState::Pending { deadline };
      None
    } else if len == 0 && self.has_searched {
      Some(self.issue(SearchFilter::new("", &self.department, &self.topic)))
    } else {
      None
    }
  }

  pub fn set_department(&mut self, department: &str) {
    self.department = department.to_owned();
  }

  pub fn set_topic(&mut self, topic: &str) { self.topic = topic.to_owned(); }

  // ── Triggers ────────────────────────────────────────────────────────────

  /// Fire the pending search if its deadline has passed.
  pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
    match self.state {
      LiveState::Pending { deadline } if now >= deadline => {
        self.state = LiveState::Idle;
        self.has_searched = true;
        Some(self.issue(self.filter()))
      }
      _ => None,
    }
  }

  /// Explicit submit: skip the debounce and search with every field.
  pub fn submit(&mut self) -> SearchRequest {
    self.state = LiveState::Idle;
    self.has_searched = true;
    self.issue(self.filter())
  }

  /// Reset every field and search with no filters.
  pub fn clear(&mut self) -> SearchRequest {
    self.name.clear();
    self.department.clear();
    self.topic.clear();
    self.state = LiveState::Idle;
    self.has_searched = false;
    self.issue(SearchFilter::default())
  }

  /// Re-run the current filter without counting as a user search (initial
  /// load, refresh after an edit).
  pub fn reload(&mut self) -> SearchRequest { self.issue(self.filter()) }

  fn issue(&mut self, filter: SearchFilter) -> SearchRequest {
    SearchRequest {
      seq: self.sequencer.next(),
      filter,
    }
  }
}
