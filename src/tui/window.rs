//! The form screen: panels, keyboard focus, collected field values and the
//! latest result list.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ads::{Paper, QueryBackend, SearchForm};

use super::cursor::Position;
use super::error::EngineError;
use super::keymap::{Action, KeyMap};
use super::panel::{Field, Panel};

/// Outcome of handling one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    Info,
    Error,
}

/// A one-line message shown between the form and the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub style: NoticeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    pub max_results: usize,
    pub results_row: u16,
    pub exit_on_query_error: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        WindowOptions {
            max_results: 10,
            results_row: 10,
            exit_on_query_error: false,
        }
    }
}

/// What a [`DrawOp`] represents, so the renderer can pick a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawRole {
    Label,
    Field { focused: bool },
    Result,
    Notice(NoticeStyle),
}

/// One piece of text to paint at a fixed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOp {
    pub text: String,
    pub at: Position,
    /// Cells covered; fields reserve their full width even when short.
    pub width: u16,
    pub role: DrawRole,
}

pub struct Window {
    panels: Vec<Panel>,
    focus: usize,
    field_values: BTreeMap<String, String>,
    results: Vec<Paper>,
    notice: Option<Notice>,
    backend: Box<dyn QueryBackend>,
    keymap: KeyMap,
    options: WindowOptions,
}

impl Window {
    pub fn new(
        panels: Vec<Panel>,
        backend: Box<dyn QueryBackend>,
        options: WindowOptions,
    ) -> Self {
        let window = Window {
            panels,
            focus: 0,
            field_values: BTreeMap::new(),
            results: Vec::new(),
            notice: None,
            backend,
            keymap: KeyMap::default_keymap(),
            options,
        };
        for name in window.duplicate_field_names() {
            tracing::warn!("field name '{name}' is used more than once; the last field wins");
        }
        window
    }

    /// Move focus onto the first editable panel, starting from the current one.
    pub fn acquire_focus(&mut self) -> Result<(), EngineError> {
        match self.active_panel() {
            Some(panel) if panel.is_editable() => Ok(()),
            _ => self.focus_next_editable(),
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn field_values(&self) -> &BTreeMap<String, String> {
        &self.field_values
    }

    pub fn results(&self) -> &[Paper] {
        &self.results
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn active_panel(&self) -> Option<&Panel> {
        self.panels.get(self.focus)
    }

    pub fn active_panel_mut(&mut self) -> Option<&mut Panel> {
        self.panels.get_mut(self.focus)
    }

    /// Names shared by more than one field, in sorted order.
    pub fn duplicate_field_names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut dups = BTreeSet::new();
        for name in self.panels.iter().filter_map(Panel::name) {
            if !seen.insert(name) {
                dups.insert(name);
            }
        }
        dups.into_iter().collect()
    }

    // ── Focus ────────────────────────────────────────────────────────

    pub fn focus_next(&mut self) {
        if !self.panels.is_empty() {
            self.focus = (self.focus + 1) % self.panels.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.panels.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.panels.len() - 1);
        }
    }

    pub fn focus_next_editable(&mut self) -> Result<(), EngineError> {
        self.cycle_to_editable(Self::focus_next)
    }

    pub fn focus_prev_editable(&mut self) -> Result<(), EngineError> {
        self.cycle_to_editable(Self::focus_prev)
    }

    fn cycle_to_editable(&mut self, step: fn(&mut Self)) -> Result<(), EngineError> {
        for _ in 0..self.panels.len() {
            step(self);
            if self.panels[self.focus].is_editable() {
                return Ok(());
            }
        }
        Err(EngineError::NoEditablePanel)
    }

    // ── Submit ───────────────────────────────────────────────────────

    /// Snapshot every field into `field_values`, visiting fields in layout order,
    /// then put focus back where it was.
    ///
    /// Keys collected earlier are blanked first. Fields sharing a name collapse
    /// to the value of the last one on screen.
    pub fn collect_field_values(&mut self) -> Result<(), EngineError> {
        for value in self.field_values.values_mut() {
            value.clear();
        }
        let restore = self.focus;
        let collected = self.collect_one_cycle();
        self.focus = restore;
        collected
    }

    fn collect_one_cycle(&mut self) -> Result<(), EngineError> {
        // Stepping forward from the last panel lands on the first field on screen.
        self.focus = self.panels.len().saturating_sub(1);
        self.focus_next_editable()?;
        let start = self.focus;
        loop {
            if let Some(field) = self.panels[self.focus].as_field() {
                self.field_values
                    .insert(field.name().to_string(), field.text().to_string());
            }
            self.focus_next_editable()?;
            if self.focus == start {
                return Ok(());
            }
        }
    }

    /// Whether every collected value is empty.
    pub fn form_is_empty(&self) -> bool {
        self.field_values.values().all(String::is_empty)
    }

    /// Collect the form, run the query and replace the result list.
    ///
    /// On failure the previous results are kept.
    pub fn submit(&mut self) -> Result<usize> {
        self.collect_field_values()?;
        let form = SearchForm::from_fields(&self.field_values)?;
        let papers = self.backend.search(&form)?;
        self.results = papers;
        Ok(self.results.len())
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    pub fn dispatch(&mut self, key: KeyEvent) -> Status {
        let Some(action) = self.keymap.lookup(key.code, key.modifiers) else {
            if let KeyCode::Char(c) = key.code
                && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                let mut buf = [0u8; 4];
                self.edit(|f| f.insert(c.encode_utf8(&mut buf)));
            }
            return Status::Continue;
        };
        tracing::debug!("dispatch {action:?}");

        match action {
            Action::Quit => return Status::Exit,
            Action::Submit => return self.handle_submit(),
            Action::FocusNext => self.refocus(Self::focus_next_editable),
            Action::FocusPrev => self.refocus(Self::focus_prev_editable),
            Action::CursorLeft => self.with_field(Field::move_cursor_left),
            Action::CursorRight => self.with_field(Field::move_cursor_right),
            Action::CursorFirst => self.with_field(Field::move_cursor_first),
            Action::CursorLast => self.with_field(Field::move_cursor_last),
            Action::Backspace => self.edit(Field::backspace),
            Action::ClearField => self.with_field(Field::clear),
        }
        Status::Continue
    }

    fn handle_submit(&mut self) -> Status {
        if let Err(e) = self.collect_field_values() {
            tracing::error!("cannot collect form: {e}");
            return Status::Continue;
        }
        if self.form_is_empty() {
            self.notice = Some(Notice {
                text: "Fill in at least one field before searching.".to_string(),
                style: NoticeStyle::Info,
            });
            return Status::Continue;
        }

        match self.submit() {
            Ok(count) => {
                tracing::info!("search returned {count} results");
                self.notice = Some(Notice {
                    text: format!("{count} results"),
                    style: NoticeStyle::Info,
                });
                Status::Continue
            }
            Err(e) => {
                tracing::warn!("search failed: {e:#}");
                if self.options.exit_on_query_error {
                    return Status::Exit;
                }
                self.notice = Some(Notice {
                    text: format!("Search failed: {e}"),
                    style: NoticeStyle::Error,
                });
                Status::Continue
            }
        }
    }

    fn refocus(&mut self, step: fn(&mut Self) -> Result<(), EngineError>) {
        if let Err(e) = step(self) {
            tracing::error!("{e}");
        }
    }

    /// Run an infallible operation on the focused field; labels ignore it.
    fn with_field(&mut self, op: impl FnOnce(&mut Field)) {
        if let Some(field) = self.active_panel_mut().and_then(Panel::as_field_mut) {
            op(field);
        }
    }

    /// Run an edit on the focused field; labels ignore edits.
    fn edit(&mut self, op: impl FnOnce(&mut Field) -> Result<(), EngineError>) {
        let Some(field) = self.active_panel_mut().and_then(Panel::as_field_mut) else {
            return;
        };
        if let Err(e) = op(field) {
            tracing::error!("edit rejected on field '{}': {e}", field.name());
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Everything to paint, in paint order.
    pub fn render(&self) -> Vec<DrawOp> {
        let mut ops: Vec<DrawOp> = self
            .panels
            .iter()
            .enumerate()
            .map(|(i, panel)| {
                let (text, at) = panel.render();
                let role = if panel.is_editable() {
                    DrawRole::Field {
                        focused: i == self.focus,
                    }
                } else {
                    DrawRole::Label
                };
                DrawOp {
                    text: text.to_string(),
                    at,
                    width: panel.width(),
                    role,
                }
            })
            .collect();

        let results_row = self.options.results_row;
        if let Some(notice) = &self.notice {
            ops.push(text_op(
                notice.text.clone(),
                Position::new(0, results_row.saturating_sub(1)),
                DrawRole::Notice(notice.style),
            ));
        }

        for (i, paper) in self.results.iter().take(self.options.max_results).enumerate() {
            let line = format!(
                "{} {} {}",
                paper.bibcode,
                paper.available_link_types(),
                paper.title
            );
            ops.push(text_op(
                line,
                Position::new(0, results_row.saturating_add(i as u16)),
                DrawRole::Result,
            ));
        }

        ops
    }

    /// Where the terminal cursor goes: inside the focused field.
    pub fn cursor_position(&self) -> Option<Position> {
        self.active_panel()
            .and_then(Panel::as_field)
            .map(Field::cursor_screen_position)
    }
}

fn text_op(text: String, at: Position, role: DrawRole) -> DrawOp {
    let width = text.chars().count() as u16;
    DrawOp {
        text,
        at,
        width,
        role,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use anyhow::bail;

    use super::*;
    use crate::ads::LinkKind;

    /// Backend that replays a canned response and records every query.
    #[derive(Default)]
    struct StubBackend {
        papers: Option<Vec<Paper>>,
        calls: Rc<Cell<usize>>,
        last_form: Rc<RefCell<Option<SearchForm>>>,
    }

    impl QueryBackend for StubBackend {
        fn search(&self, form: &SearchForm) -> Result<Vec<Paper>> {
            self.calls.set(self.calls.get() + 1);
            *self.last_form.borrow_mut() = Some(form.clone());
            match &self.papers {
                Some(papers) => Ok(papers.clone()),
                None => bail!("connection refused"),
            }
        }

        fn fetch_supplementary(&self, _paper: &Paper, _kind: LinkKind) -> Result<String> {
            bail!("not supported")
        }

        fn fetch_bibtex(&self, _bibcode: &str) -> Result<String> {
            bail!("not supported")
        }
    }

    fn papers(n: usize) -> Vec<Paper> {
        (0..n)
            .map(|i| {
                let mut p = Paper::new(format!("2014ApJ...{i}"));
                p.title = format!("Paper {i}");
                p.set_link("A", "http://abs");
                p
            })
            .collect()
    }

    fn date_panels() -> Vec<Panel> {
        vec![
            Panel::label(0, 4, "start year:"),
            Panel::field(12, 4, 4, "start_year"),
            Panel::label(18, 4, "month:"),
            Panel::field(25, 4, 2, "end_mon"),
        ]
    }

    fn window_with(panels: Vec<Panel>, backend: StubBackend) -> Window {
        let mut w = Window::new(panels, Box::new(backend), WindowOptions::default());
        w.acquire_focus().unwrap();
        w
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(w: &mut Window, s: &str) {
        for c in s.chars() {
            assert_eq!(w.dispatch(key(KeyCode::Char(c))), Status::Continue);
        }
    }

    fn active_text(w: &Window) -> &str {
        w.active_panel().and_then(Panel::as_field).unwrap().text()
    }

    #[test]
    fn initial_focus_skips_labels() {
        let w = window_with(date_panels(), StubBackend::default());
        assert_eq!(w.focus_index(), 1);
    }

    #[test]
    fn plain_focus_wraps_both_ways() {
        let mut w = window_with(date_panels(), StubBackend::default());
        w.focus_next();
        w.focus_next();
        w.focus_next();
        assert_eq!(w.focus_index(), 0);
        w.focus_prev();
        assert_eq!(w.focus_index(), 3);
    }

    #[test]
    fn focus_next_editable_cycles_back_after_n_steps() {
        let mut w = window_with(date_panels(), StubBackend::default());
        let start = w.focus_index();
        w.focus_next_editable().unwrap();
        assert_eq!(w.focus_index(), 3);
        w.focus_next_editable().unwrap();
        assert_eq!(w.focus_index(), start);
        w.focus_prev_editable().unwrap();
        assert_eq!(w.focus_index(), 3);
    }

    #[test]
    fn focus_without_editable_panels_fails() {
        let panels = vec![Panel::label(0, 0, "a"), Panel::label(0, 1, "b")];
        let mut w = Window::new(
            panels,
            Box::new(StubBackend::default()),
            WindowOptions::default(),
        );
        assert_eq!(w.focus_next_editable(), Err(EngineError::NoEditablePanel));
        assert_eq!(w.focus_prev_editable(), Err(EngineError::NoEditablePanel));
        assert_eq!(w.acquire_focus(), Err(EngineError::NoEditablePanel));
    }

    #[test]
    fn empty_window_has_no_active_panel() {
        let mut w = Window::new(
            vec![],
            Box::new(StubBackend::default()),
            WindowOptions::default(),
        );
        assert!(w.active_panel().is_none());
        assert_eq!(w.focus_next_editable(), Err(EngineError::NoEditablePanel));
        assert_eq!(w.dispatch(key(KeyCode::Char('x'))), Status::Continue);
        assert_eq!(w.cursor_position(), None);
    }

    #[test]
    fn collect_field_values_restores_focus() {
        let mut w = window_with(date_panels(), StubBackend::default());
        type_str(&mut w, "2014");
        w.dispatch(key(KeyCode::Tab));
        type_str(&mut w, "12");
        let focus = w.focus_index();

        w.collect_field_values().unwrap();
        let expected: BTreeMap<String, String> = [("start_year", "2014"), ("end_mon", "12")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(w.field_values(), &expected);
        assert_eq!(w.focus_index(), focus);

        w.collect_field_values().unwrap();
        assert_eq!(w.field_values(), &expected);
        assert_eq!(w.focus_index(), focus);
    }

    #[test]
    fn duplicate_field_names_keep_last_value() {
        let panels = vec![
            Panel::field(0, 0, 4, "end_mon"),
            Panel::field(0, 1, 4, "end_mon"),
        ];
        let mut w = window_with(panels, StubBackend::default());
        assert_eq!(w.duplicate_field_names(), vec!["end_mon"]);
        type_str(&mut w, "1");
        w.dispatch(key(KeyCode::Tab));
        type_str(&mut w, "12");

        w.collect_field_values().unwrap();
        assert_eq!(w.field_values().len(), 1);
        assert_eq!(w.field_values()["end_mon"], "12");
    }

    #[test]
    fn typing_editing_and_motion_keys() {
        let mut w = window_with(vec![Panel::field(12, 3, 5, "author")], StubBackend::default());
        type_str(&mut w, "hi");
        assert_eq!(w.cursor_position(), Some(Position::new(14, 3)));

        w.dispatch(ctrl('a'));
        w.dispatch(key(KeyCode::Char(' ')));
        assert_eq!(active_text(&w), " hi");

        w.dispatch(key(KeyCode::End));
        w.dispatch(key(KeyCode::Left));
        w.dispatch(key(KeyCode::Backspace));
        assert_eq!(active_text(&w), " i");

        w.dispatch(key(KeyCode::Right));
        type_str(&mut w, "abcdef");
        assert_eq!(active_text(&w), " iabc");

        w.dispatch(ctrl('u'));
        assert_eq!(active_text(&w), "");
        assert_eq!(w.cursor_position(), Some(Position::new(12, 3)));
    }

    #[test]
    fn control_and_alt_chars_are_not_inserted() {
        let mut w = window_with(vec![Panel::field(0, 0, 5, "author")], StubBackend::default());
        w.dispatch(ctrl('z'));
        w.dispatch(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        w.dispatch(key(KeyCode::F(5)));
        w.dispatch(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT));
        assert_eq!(active_text(&w), "Q");
    }

    #[test]
    fn exit_keys_end_session() {
        let mut w = window_with(date_panels(), StubBackend::default());
        assert_eq!(w.dispatch(key(KeyCode::Esc)), Status::Exit);
        assert_eq!(w.dispatch(ctrl('c')), Status::Exit);
    }

    #[test]
    fn submit_replaces_results_and_sends_fields() {
        let backend = StubBackend {
            papers: Some(papers(3)),
            ..StubBackend::default()
        };
        let last_form = Rc::clone(&backend.last_form);
        let mut w = window_with(date_panels(), backend);
        type_str(&mut w, "2014");

        assert_eq!(w.dispatch(key(KeyCode::Enter)), Status::Continue);
        assert_eq!(w.results().len(), 3);
        assert_eq!(w.notice().unwrap().style, NoticeStyle::Info);
        let form = last_form.borrow().clone().unwrap();
        assert_eq!(form.get("start_year"), Some("2014"));
        assert_eq!(form.get("end_mon"), Some(""));
    }

    #[test]
    fn failed_submit_keeps_previous_results() {
        let mut w = window_with(
            date_panels(),
            StubBackend {
                papers: Some(papers(2)),
                ..StubBackend::default()
            },
        );
        type_str(&mut w, "2014");
        assert_eq!(w.submit().unwrap(), 2);

        w.backend = Box::new(StubBackend::default());
        let err = w.submit().unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(w.results().len(), 2);
        assert_eq!(w.results()[0].bibcode, "2014ApJ...0");
    }

    #[test]
    fn failed_search_is_shown_inline_and_session_continues() {
        let mut w = window_with(date_panels(), StubBackend::default());
        type_str(&mut w, "2014");
        assert_eq!(w.dispatch(key(KeyCode::Enter)), Status::Continue);
        let notice = w.notice().unwrap();
        assert_eq!(notice.style, NoticeStyle::Error);
        assert!(notice.text.contains("connection refused"));
    }

    #[test]
    fn failed_search_can_end_session_when_configured() {
        let options = WindowOptions {
            exit_on_query_error: true,
            ..WindowOptions::default()
        };
        let mut w = Window::new(date_panels(), Box::new(StubBackend::default()), options);
        w.acquire_focus().unwrap();
        type_str(&mut w, "2014");
        assert_eq!(w.dispatch(key(KeyCode::Enter)), Status::Exit);
    }

    #[test]
    fn empty_form_is_not_submitted() {
        let backend = StubBackend {
            papers: Some(papers(1)),
            ..StubBackend::default()
        };
        let calls = Rc::clone(&backend.calls);
        let mut w = window_with(date_panels(), backend);
        assert_eq!(w.dispatch(key(KeyCode::Enter)), Status::Continue);
        assert_eq!(calls.get(), 0);
        assert!(w.results().is_empty());
        assert_eq!(w.notice().unwrap().style, NoticeStyle::Info);
    }

    #[test]
    fn unknown_field_name_fails_submit() {
        let backend = StubBackend {
            papers: Some(papers(1)),
            ..StubBackend::default()
        };
        let calls = Rc::clone(&backend.calls);
        let mut w = window_with(vec![Panel::field(0, 0, 5, "colour")], backend);
        type_str(&mut w, "red");
        assert!(w.submit().is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn render_marks_focus_and_limits_results() {
        let options = WindowOptions {
            max_results: 2,
            results_row: 10,
            exit_on_query_error: false,
        };
        let mut w = Window::new(
            date_panels(),
            Box::new(StubBackend {
                papers: Some(papers(5)),
                ..StubBackend::default()
            }),
            options,
        );
        w.acquire_focus().unwrap();
        type_str(&mut w, "2014");
        w.dispatch(key(KeyCode::Enter));

        let ops = w.render();
        let field = ops.iter().find(|op| op.at == Position::new(12, 4)).unwrap();
        assert_eq!(field.role, DrawRole::Field { focused: true });
        assert_eq!(field.text, "2014");
        assert_eq!(field.width, 4);

        let results: Vec<&DrawOp> = ops.iter().filter(|op| op.role == DrawRole::Result).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "2014ApJ...0 A Paper 0");
        assert_eq!(results[1].at, Position::new(0, 11));

        let notice = ops
            .iter()
            .find(|op| matches!(op.role, DrawRole::Notice(_)))
            .unwrap();
        assert_eq!(notice.at.y, 9);
        assert_eq!(w.cursor_position(), Some(Position::new(16, 4)));
    }
}
