use sitefeed_types::MentionSuggestion;

use super::directory::MentionDirectory;
use super::parser;

/// Keys the composer reacts to while the suggestion panel is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerKey {
    Up,
    Down,
    Enter,
    Tab,
    Escape,
}

/// Open suggestion panel: the active trigger plus the filtered candidates.
#[derive(Debug, Clone)]
pub struct SuggestionPanel {
    /// Char index of the `@` in the buffer.
    pub trigger_start: usize,
    /// Lower-cased partial query.
    pub query: String,
    pub candidates: Vec<MentionSuggestion>,
    /// Selected index, always within `[0, candidates.len())` when
    /// candidates are non-empty.
    pub selected: usize,
    /// True until the directory has resolved; typing is never blocked.
    pub loading: bool,
}

/// Binds the mention parser and the shared directory to a text buffer.
///
/// Two states: idle (no panel) and suggesting (panel open). The UI layer
/// mirrors its input buffer in via [`set_text`](Composer::set_text) after
/// every edit and forwards navigation keys; everything else is derived.
pub struct Composer {
    text: String,
    cursor: usize,
    directory: MentionDirectory,
    roster: Option<Vec<MentionSuggestion>>,
    panel: Option<SuggestionPanel>,
    /// Bumped whenever the panel closes; stale async roster deliveries
    /// check it before touching state (see [`apply_roster`](Composer::apply_roster)).
    generation: u64,
}

impl Composer {
    pub fn new(directory: MentionDirectory) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            directory,
            roster: None,
            panel: None,
            generation: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position as a char index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn panel(&self) -> Option<&SuggestionPanel> {
        self.panel.as_ref()
    }

    pub fn is_suggesting(&self) -> bool {
        self.panel.is_some()
    }

    /// Mirror the input buffer after an edit and re-run trigger detection.
    /// Opens, updates, or closes the suggestion panel accordingly.
    pub fn set_text(&mut self, text: impl Into<String>, cursor: usize) {
        self.text = text.into();
        self.cursor = cursor.min(self.text.chars().count());

        match parser::detect_trigger(&self.text, self.cursor) {
            Some(trigger) => {
                let query_changed = self
                    .panel
                    .as_ref()
                    .map(|p| p.query != trigger.query)
                    .unwrap_or(true);

                let (candidates, loading) = match &self.roster {
                    Some(roster) => (
                        parser::filter(roster, &trigger.query)
                            .into_iter()
                            .cloned()
                            .collect::<Vec<_>>(),
                        false,
                    ),
                    None => (Vec::new(), true),
                };

                let selected = if query_changed {
                    0
                } else {
                    self.panel
                        .as_ref()
                        .map(|p| p.selected)
                        .unwrap_or(0)
                        .min(candidates.len().saturating_sub(1))
                };

                self.panel = Some(SuggestionPanel {
                    trigger_start: trigger.start,
                    query: trigger.query,
                    candidates,
                    selected,
                    loading,
                });
            }
            None => {
                if self.panel.is_some() {
                    self.close_panel();
                }
            }
        }
    }

    /// Token to pair with a later [`apply_roster`](Composer::apply_roster) call.
    pub fn refresh_token(&self) -> u64 {
        self.generation
    }

    /// Deliver a roster fetched asynchronously. Ignored when `token` is
    /// stale, i.e. the panel was dismissed (or the composer torn down and
    /// reused) while the fetch was in flight.
    pub fn apply_roster(&mut self, token: u64, roster: Vec<MentionSuggestion>) {
        if token != self.generation {
            log::debug!("discarding stale mention roster delivery");
            return;
        }
        self.roster = Some(roster);
        if let Some(panel) = &mut self.panel {
            let roster = self.roster.as_deref().unwrap_or(&[]);
            panel.candidates = parser::filter(roster, &panel.query)
                .into_iter()
                .cloned()
                .collect();
            panel.selected = panel.selected.min(panel.candidates.len().saturating_sub(1));
            panel.loading = false;
        }
    }

    /// Resolve the shared directory and feed it into the open panel.
    pub async fn refresh(&mut self) {
        let token = self.refresh_token();
        let roster = self.directory.ensure_loaded().await;
        self.apply_roster(token, roster);
    }

    /// Handle a navigation key. Returns true when the key was consumed;
    /// keys are inert while no panel is open.
    pub fn handle_key(&mut self, key: ComposerKey) -> bool {
        if self.panel.is_none() {
            return false;
        }
        match key {
            ComposerKey::Up => {
                if let Some(panel) = &mut self.panel {
                    let len = panel.candidates.len();
                    if len > 0 {
                        panel.selected = (panel.selected + len - 1) % len;
                    }
                }
                true
            }
            ComposerKey::Down => {
                if let Some(panel) = &mut self.panel {
                    let len = panel.candidates.len();
                    if len > 0 {
                        panel.selected = (panel.selected + 1) % len;
                    }
                }
                true
            }
            ComposerKey::Enter | ComposerKey::Tab => {
                self.accept_selected();
                true
            }
            ComposerKey::Escape => {
                self.dismiss();
                true
            }
        }
    }

    /// Accept the highlighted suggestion, splicing the mention into the
    /// buffer. A no-op when the candidate list is empty.
    pub fn accept_selected(&mut self) {
        let Some(panel) = &self.panel else {
            return;
        };
        let Some(chosen) = panel.candidates.get(panel.selected).cloned() else {
            return;
        };

        // Span length is what the user actually typed, not the lowercased
        // query (case folding can change char counts).
        let query_len = self.cursor - (panel.trigger_start + 1);
        let replacement =
            parser::build_replacement(&self.text, panel.trigger_start, query_len, &chosen);
        self.text = replacement.text;
        self.cursor = replacement.caret;
        self.close_panel();
    }

    /// Close the panel without accepting; also the hook for focus loss
    /// and teardown so in-flight roster deliveries are cancelled.
    pub fn dismiss(&mut self) {
        if self.panel.is_some() {
            self.close_panel();
        } else {
            // Still invalidate pending deliveries on teardown
            self.generation += 1;
        }
    }

    fn close_panel(&mut self) {
        self.panel = None;
        self.generation += 1;
    }
}
