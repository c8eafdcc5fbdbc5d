use crossterm::event::{KeyCode, KeyModifiers};

// ── Actions ──────────────────────────────────────────────────────────

/// Every discrete action the form can perform in response to a key press.
///
/// Printable characters are not listed here: any unbound `Char` without
/// Ctrl/Alt is inserted into the focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,

    // Focus
    FocusNext,
    FocusPrev,

    // Cursor motion inside the focused field
    CursorLeft,
    CursorRight,
    CursorFirst,
    CursorLast,

    // Editing
    Backspace,
    ClearField,
}

// ── Help categories ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCategory {
    Search,
    Fields,
    Editing,
}

impl HelpCategory {
    fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Fields => "Fields",
            Self::Editing => "Editing",
        }
    }

    const ORDERED: &[Self] = &[Self::Search, Self::Fields, Self::Editing];
}

// ── Keybinding ───────────────────────────────────────────────────────

/// A single key → action mapping with metadata for the hint bar.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Human-readable key label (e.g. `"Tab/^N"`). Empty for aliases.
    pub label: &'static str,
    pub description: &'static str,
    pub category: HelpCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub label: &'static str,
    pub description: &'static str,
}

// ── KeyMap ────────────────────────────────────────────────────────────

/// Declarative registry of every binding on the search form.
pub struct KeyMap {
    pub form: Vec<KeyBinding>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::default_keymap()
    }
}

impl KeyMap {
    pub fn default_keymap() -> Self {
        Self {
            form: default_form_bindings(),
        }
    }

    pub fn lookup(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        self.form
            .iter()
            .find(|kb| kb.code == code && kb.modifiers == modifiers)
            .map(|kb| kb.action)
    }

    /// Grouped help entries in display order; aliases without a label are skipped.
    pub fn help_entries(&self) -> Vec<(&'static str, Vec<HelpEntry>)> {
        let mut out = Vec::new();

        for &cat in HelpCategory::ORDERED {
            let mut entries: Vec<HelpEntry> = Vec::new();
            for kb in &self.form {
                if kb.category == cat
                    && !kb.label.is_empty()
                    && !entries.iter().any(|e| e.label == kb.label)
                {
                    entries.push(HelpEntry {
                        label: kb.label,
                        description: kb.description,
                    });
                }
            }
            if !entries.is_empty() {
                out.push((cat.label(), entries));
            }
        }

        out
    }
}

fn bind(
    code: KeyCode,
    modifiers: KeyModifiers,
    action: Action,
    label: &'static str,
    description: &'static str,
    category: HelpCategory,
) -> KeyBinding {
    KeyBinding {
        code,
        modifiers,
        action,
        label,
        description,
        category,
    }
}

fn alias(code: KeyCode, modifiers: KeyModifiers, action: Action) -> KeyBinding {
    // Aliases never show up in help, so the category is irrelevant.
    bind(code, modifiers, action, "", "", HelpCategory::Editing)
}

#[allow(clippy::enum_glob_use)]
fn default_form_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    const NONE: KeyModifiers = KeyModifiers::NONE;
    const CTRL: KeyModifiers = KeyModifiers::CONTROL;

    vec![
        // ── Search ───────────────────────────────────────────────
        bind(KeyCode::Enter, NONE, Submit, "Enter", "search", Search),
        bind(KeyCode::Esc, NONE, Quit, "Esc", "quit", Search),
        alias(KeyCode::Char('c'), CTRL, Quit),
        // ── Fields ───────────────────────────────────────────────
        bind(KeyCode::Tab, NONE, FocusNext, "Tab/^N", "next field", Fields),
        alias(KeyCode::Char('n'), CTRL, FocusNext),
        alias(KeyCode::Down, NONE, FocusNext),
        bind(
            KeyCode::BackTab,
            KeyModifiers::SHIFT,
            FocusPrev,
            "S-Tab/^P",
            "previous field",
            Fields,
        ),
        alias(KeyCode::BackTab, NONE, FocusPrev),
        alias(KeyCode::Char('p'), CTRL, FocusPrev),
        alias(KeyCode::Up, NONE, FocusPrev),
        // ── Editing ──────────────────────────────────────────────
        bind(KeyCode::Left, NONE, CursorLeft, "←/→", "move", Editing),
        alias(KeyCode::Char('b'), CTRL, CursorLeft),
        alias(KeyCode::Right, NONE, CursorRight),
        alias(KeyCode::Char('f'), CTRL, CursorRight),
        bind(KeyCode::Char('a'), CTRL, CursorFirst, "^A/^E", "start/end", Editing),
        alias(KeyCode::Home, NONE, CursorFirst),
        alias(KeyCode::Char('e'), CTRL, CursorLast),
        alias(KeyCode::End, NONE, CursorLast),
        alias(KeyCode::Backspace, NONE, Backspace),
        alias(KeyCode::Char('h'), CTRL, Backspace),
        bind(KeyCode::Char('u'), CTRL, ClearField, "^U", "clear field", Editing),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────
