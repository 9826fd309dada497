use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

use crate::downloader;
use crate::errors::Result;
use crate::semester::SemesterForm;
use crate::theme::Theme;
use crate::timetable::{self, Timetable};
use crate::translation::{Language, TranslationCache};

/// All state of one running timetable UI
///
/// Owned by the top-level controller; handlers borrow it for one event at a
/// time.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Session {
    pub form: SemesterForm,
    pub timetable: Option<Timetable>,
    pub theme: Theme,
    pub language: Language,
    #[serde(skip)]
    pub translations: TranslationCache,
    #[serde(skip)]
    theme_resolved: bool,
}

impl Session {
    pub fn new(theme: Theme) -> Self {
        Session {
            theme,
            ..Self::default()
        }
    }

    /// Apply the host's color scheme preference the first time it is known
    pub fn resolve_theme_preference(&mut self, prefers: Option<Theme>) {
        if self.theme_resolved {
            return;
        }
        if let Some(theme) = prefers {
            self.theme = theme;
        }
        self.theme_resolved = true;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle();
        self.theme_resolved = true;
        self.theme
    }

    /// Replace the timetable with a freshly generated one
    pub fn generate_timetable<R: Rng + ?Sized>(&mut self, max_attempts: u32, rng: &mut R) -> &Timetable {
        let generated = timetable::generate_weekly(&self.form.subjects, max_attempts, rng);
        self.timetable.insert(generated)
    }

    /// XLSX bytes of the current timetable, `None` before the first generation
    pub fn export_xlsx(&self, sheet_name: &str) -> Result<Option<Vec<u8>>> {
        self.timetable
            .as_ref()
            .map(|t| downloader::to_xlsx(t, sheet_name))
            .transpose()
    }

    pub fn export_csv(&self) -> Option<String> {
        self.timetable.as_ref().map(downloader::to_csv)
    }

    /// Switch the interface language
    ///
    /// Returns `true` when translations have to be fetched for the new
    /// language. Labels of a previous language are dropped, so the page shows
    /// English until the new batch lands.
    pub fn select_language(&mut self, language: Language) -> bool {
        self.language = language;
        if self.translations.language() != language {
            self.translations.clear();
        }
        !language.is_default()
    }

    /// Store a finished translation batch
    ///
    /// The batch is dropped if the selection has moved to another language
    /// since it was requested.
    pub fn apply_translations(&mut self, language: Language, entries: HashMap<String, String>) -> bool {
        if self.language != language || language.is_default() {
            return false;
        }
        self.translations.replace(language, entries);
        true
    }

    /// Display text for a UI label in the current language
    pub fn label<'a>(&'a self, text: &'a str) -> &'a str {
        if self.translations.language() != self.language {
            return text;
        }
        self.translations.label(text)
    }
}
