//! Application state machine and event dispatcher.

use std::{sync::Arc, time::Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use faculty_client::ApiClient;
use faculty_core::{
  live::{LiveSearch, SearchRequest},
  profile::{EditField, ProfileForm},
  record::{FacultyId, FacultyRecord},
  router::route,
  session::Session,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::detail::{Detail, load_detail};

/// Offered when the department list cannot be fetched.
pub const FALLBACK_DEPARTMENTS: &[&str] = &[
  "Black Studies",
  "Earth Science",
  "Ecology, Evolution, and Marine Biology",
  "Economics",
  "Geography",
  "Marine Science Graduate Program",
  "Physics",
  "Electrical and Computer Engineering",
  "Anthropology",
  "Asian American Studies",
  "Computer Science",
  "English",
];

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the result list.
  FacultyList,
  /// Focus on the detail pane.
  FacultyDetail,
  /// Editing the selected profile.
  EditProfile,
}

/// Search-bar field with keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
  Topic,
  Name,
  Department,
}

impl SearchField {
  pub fn next(self) -> Self {
    match self {
      SearchField::Topic => SearchField::Name,
      SearchField::Name => SearchField::Department,
      SearchField::Department => SearchField::Topic,
    }
  }

  pub fn prev(self) -> Self {
    match self {
      SearchField::Topic => SearchField::Department,
      SearchField::Name => SearchField::Topic,
      SearchField::Department => SearchField::Name,
    }
  }
}

/// A finished search, tagged with the request it answers.
#[derive(Debug)]
pub struct SearchOutcome {
  pub seq:    u64,
  pub result: Result<Vec<FacultyRecord>, String>,
}

/// In-progress profile edit.
#[derive(Debug, Clone)]
pub struct EditState {
  pub id:    FacultyId,
  pub name:  String,
  pub form:  ProfileForm,
  pub field: EditField,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,

  /// Search-bar fields and the debounce timer.
  pub live: LiveSearch,

  /// Whether keystrokes go to the search bar.
  pub search_active: bool,

  pub focus: SearchField,

  /// Department choices, cycled with ←/→ in the department field.
  pub departments: Vec<String>,

  /// Records from the latest applied search.
  pub results: Vec<FacultyRecord>,

  /// A search has been issued and its answer has not arrived yet.
  pub searching: bool,

  /// Failure of the latest search, shown in place of the list.
  pub search_error: Option<String>,

  pub list_cursor: usize,

  pub detail: Option<Detail>,

  /// Failure loading the selected record.
  pub detail_error: Option<String>,

  pub detail_scroll: u16,

  pub edit: Option<EditState>,

  /// Signed-in identity, if any.
  pub session: Option<Session>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: Arc<ApiClient>,

  outcomes_tx: mpsc::UnboundedSender<SearchOutcome>,
  outcomes_rx: mpsc::UnboundedReceiver<SearchOutcome>,
}

impl App {
  pub fn new(client: ApiClient, live: LiveSearch, session: Option<Session>) -> Self {
    let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
    Self {
      screen: Screen::FacultyList,
      live,
      search_active: false,
      focus: SearchField::Topic,
      departments: Vec::new(),
      results: Vec::new(),
      searching: false,
      search_error: None,
      list_cursor: 0,
      detail: None,
      detail_error: None,
      detail_scroll: 0,
      edit: None,
      session,
      status_msg: String::new(),
      client: Arc::new(client),
      outcomes_tx,
      outcomes_rx,
    }
  }

  // ── Searching ─────────────────────────────────────────────────────────────

  /// Load the department list and kick off the initial unfiltered search.
  pub async fn start(&mut self) {
    self.departments = match self.client.departments().await {
      Ok(list) if !list.is_empty() => list,
      Ok(_) => FALLBACK_DEPARTMENTS.iter().map(|d| (*d).to_owned()).collect(),
      Err(e) => {
        warn!(error = %e, "department list unavailable; using built-in list");
        FALLBACK_DEPARTMENTS.iter().map(|d| (*d).to_owned()).collect()
      }
    };
    let request = self.live.reload();
    self.dispatch(request);
  }

  /// Called once per frame: fire a due live search and apply any results
  /// that have arrived.
  pub fn tick(&mut self, now: Instant) {
    if let Some(request) = self.live.poll(now) {
      self.dispatch(request);
    }
    while let Ok(outcome) = self.outcomes_rx.try_recv() {
      self.apply_outcome(outcome);
    }
  }

  /// Run `request` in the background. The answer comes back through the
  /// outcome channel.
  fn dispatch(&mut self, request: SearchRequest) {
    debug!(seq = request.seq, filter = ?request.filter, "dispatching search");
    self.searching = true;
    let client = Arc::clone(&self.client);
    let tx = self.outcomes_tx.clone();
    tokio::spawn(async move {
      let result = route(&*client, &request.filter)
        .await
        .map_err(|e| e.to_string());
      // The receiver only goes away on shutdown.
      let _ = tx.send(SearchOutcome {
        seq: request.seq,
        result,
      });
    });
  }

  /// Apply a finished search unless a newer one has been issued since.
  /// Returns whether it was applied.
  pub fn apply_outcome(&mut self, outcome: SearchOutcome) -> bool {
    if !self.live.is_latest(outcome.seq) {
      debug!(seq = outcome.seq, "discarding stale search result");
      return false;
    }
    self.searching = false;
    self.list_cursor = 0;
    match outcome.result {
      Ok(records) => {
        self.results = records;
        self.search_error = None;
      }
      Err(message) => {
        self.results.clear();
        self.search_error = Some(message);
      }
    }
    true
  }

  /// The record under the list cursor, if any.
  pub fn cursor_record(&self) -> Option<&FacultyRecord> { self.results.get(self.list_cursor) }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    // Messages last until the next keystroke.
    self.status_msg.clear();

    if self.search_active {
      self.handle_search_key(key);
      return Ok(true);
    }

    match self.screen {
      Screen::FacultyList => self.handle_list_key(key).await,
      Screen::FacultyDetail => self.handle_detail_key(key).await,
      Screen::EditProfile => {
        self.handle_edit_key(key).await;
        Ok(true)
      }
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Tab => self.focus = self.focus.next(),
      KeyCode::BackTab => self.focus = self.focus.prev(),
      KeyCode::Enter => {
        self.search_active = false;
        let request = self.live.submit();
        self.dispatch(request);
      }
      KeyCode::Esc => {
        self.search_active = false;
        let request = self.live.clear();
        self.dispatch(request);
      }
      KeyCode::Left if self.focus == SearchField::Department => self.cycle_department(-1),
      KeyCode::Right if self.focus == SearchField::Department => self.cycle_department(1),
      KeyCode::Backspace => self.edit_search_field(|text| {
        text.pop();
      }),
      KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
        self.edit_search_field(|text| text.push(c))
      }
      _ => {}
    }
  }

  /// Apply `change` to the focused text field. Name edits feed the
  /// debounce timer; the department is picked, not typed.
  fn edit_search_field(&mut self, change: impl FnOnce(&mut String)) {
    match self.focus {
      SearchField::Name => {
        let mut name = self.live.name().to_owned();
        change(&mut name);
        if let Some(request) = self.live.set_name(&name, Instant::now()) {
          self.dispatch(request);
        }
      }
      SearchField::Topic => {
        let mut topic = self.live.topic().to_owned();
        change(&mut topic);
        self.live.set_topic(&topic);
      }
      SearchField::Department => {}
    }
  }

  /// Step through "any department" followed by each known department.
  fn cycle_department(&mut self, step: isize) {
    let choices = self.departments.len() as isize + 1;
    let current = self
      .departments
      .iter()
      .position(|d| d == self.live.department())
      .map_or(0, |i| i as isize + 1);
    match (current + step).rem_euclid(choices) as usize {
      0 => self.live.set_department(""),
      i => self.live.set_department(&self.departments[i - 1]),
    }
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.list_cursor + 1 < self.results.len() {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Open detail
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_record().map(|r| r.id) {
          self.open_detail(id).await;
        }
      }

      // Search bar
      KeyCode::Char('/') => self.search_active = true,

      // Re-run the current search
      KeyCode::Char('r') => {
        let request = self.live.reload();
        self.dispatch(request);
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Back to list
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::FacultyList;
        self.detail = None;
        self.detail_error = None;
      }

      // Scroll detail
      KeyCode::Down | KeyCode::Char('j') => self.detail_scroll += 1,
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      KeyCode::Char('e') => self.begin_edit(),

      KeyCode::Char('r') => {
        if let Some(id) = self.detail.as_ref().map(|d| d.record.id) {
          self.open_detail(id).await;
        }
      }

      // Step through the list without leaving the detail pane
      KeyCode::Char(']') | KeyCode::PageDown => {
        if self.list_cursor + 1 < self.results.len() {
          self.list_cursor += 1;
          if let Some(id) = self.cursor_record().map(|r| r.id) {
            self.open_detail(id).await;
          }
        }
      }
      KeyCode::Char('[') | KeyCode::PageUp => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
          if let Some(id) = self.cursor_record().map(|r| r.id) {
            self.open_detail(id).await;
          }
        }
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_edit_key(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
      self.save_edit().await;
      return;
    }

    let Some(edit) = self.edit.as_mut() else {
      self.screen = Screen::FacultyDetail;
      return;
    };

    match key.code {
      KeyCode::Esc => {
        self.edit = None;
        self.screen = Screen::FacultyDetail;
        self.status_msg = "Edit cancelled".into();
      }
      KeyCode::Tab | KeyCode::Down => edit.field = edit.field.next(),
      KeyCode::BackTab | KeyCode::Up => edit.field = edit.field.prev(),
      // Research areas are one per line.
      KeyCode::Enter if edit.field == EditField::ResearchAreas => {
        edit.form.field_mut(edit.field).push('\n');
      }
      KeyCode::Enter => edit.field = edit.field.next(),
      KeyCode::Backspace => {
        edit.form.field_mut(edit.field).pop();
      }
      KeyCode::Char(c) => edit.form.field_mut(edit.field).push(c),
      _ => {}
    }
  }

  // ── Detail and editing ────────────────────────────────────────────────────

  /// Transition to `FacultyDetail` for `id`, loading the record fresh.
  async fn open_detail(&mut self, id: FacultyId) {
    self.screen = Screen::FacultyDetail;
    self.detail_scroll = 0;
    match load_detail(&self.client, id).await {
      Ok(detail) => {
        self.detail = Some(detail);
        self.detail_error = None;
      }
      Err(e) => {
        warn!(id, error = %e, "failed to load faculty");
        self.detail = None;
        self.detail_error = Some(format!("Could not load faculty {id}: {e}"));
      }
    }
  }

  /// Open the edit form if the signed-in user may edit the shown profile.
  fn begin_edit(&mut self) {
    let Some(detail) = &self.detail else {
      return;
    };
    match &self.session {
      None => {
        self.status_msg = "Sign in with `faculty login` to edit profiles".into();
      }
      Some(session) if !session.can_edit(&detail.record) => {
        self.status_msg = format!("{} may not edit this profile", session.email);
      }
      Some(_) => {
        self.edit = Some(EditState {
          id:    detail.record.id,
          name:  detail.record.name.clone(),
          form:  ProfileForm::from_record(&detail.record),
          field: EditField::Specialization,
        });
        self.screen = Screen::EditProfile;
        self.status_msg.clear();
      }
    }
  }

  /// Send the form. On success the profile is reloaded and the edit closed;
  /// on failure the form stays open with the server's message.
  async fn save_edit(&mut self) {
    let (Some(edit), Some(session)) = (&self.edit, &self.session) else {
      return;
    };
    let id = edit.id;
    let update = edit.form.to_update();
    if update.is_empty() {
      self.status_msg = "Nothing to save".into();
      return;
    }

    let result = self.client.update_faculty(id, &update, session).await;
    match result {
      Ok(updated) => {
        info!(id, "profile saved");
        if let Some(slot) = self.results.iter_mut().find(|r| r.id == id) {
          *slot = updated;
        }
        self.edit = None;
        self.open_detail(id).await;
        self.status_msg = "Profile saved".into();
      }
      Err(e) => {
        warn!(id, error = %e, "profile save failed");
        self.status_msg = format!("Save failed: {e}");
      }
    }
  }
}
