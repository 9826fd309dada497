/*!
# Timetable Generator

A single-page timetable builder served from Rust.

## Overview

The user fills in semester details and a list of subjects (name, teacher and
a `theory:tutorial:practical` credits string). On request the application
spreads each subject's theory sessions over a Monday to Saturday grid of seven
daily slots, shows the grid, and exports it as an Excel workbook. Interface
labels can be machine translated to Kannada or Hindi, and the page has a
light and a dark theme.

## Architecture

### Frontend Layer
- **Technologies**: HTML rendered with handlebars, a few lines of inline JS
- **Pages**: landing screen (`/`) and the form with the generated grid (`/form`)

### Backend Layer
- **Technologies**: Rust, axum, tokio
- **Core Components**:
  - Form State Holder - semester details and the appendable subject list
  - Timetable Generator - randomized, collision-dropping placement
  - Translation Adapter - concurrent label translation through a text-generation API
  - Export Adapter - XLSX and CSV serialization of the grid

All state lives in one [`session::Session`] owned by the server; nothing is
persisted between runs.

## Modules

- **semester**: SemesterInfo, Subject and the form operations
- **timetable**: fixed days and slots, grid type and the generator
- **translation**: languages, UI labels, text-generation client and cache
- **downloader**: export rows, XLSX and CSV
- **theme**: light/dark mode
- **session**: the application state tying the above together
- **config**: TOML configuration with defaults
- **errors**: crate error type
- **app**: routing and handlers (feature `web`)
*/

pub mod config;
pub mod downloader;
pub mod errors;
pub mod semester;
pub mod session;
pub mod theme;
pub mod timetable;
pub mod translation;

#[cfg(feature = "web")]
pub mod app;

pub use config::AppConfig;
pub use errors::{Result, TimetableError};
pub use semester::{SemesterField, SemesterForm, SemesterInfo, Subject, SubjectField};
pub use session::Session;
pub use theme::Theme;
pub use timetable::{DAYS, TIME_SLOTS, Timetable};
pub use translation::{Language, TextGenerator, TranslationCache, UI_LABELS};
