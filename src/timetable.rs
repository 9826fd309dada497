use rand::Rng;
use serde::Serialize;

use crate::semester::Subject;

/// Teaching days of the week, in display order
pub const DAYS: [&str; 6] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Time slots of a teaching day, in display order
pub const TIME_SLOTS: [&str; 7] = [
    "9:00-9:55",
    "9:55-10:50",
    "11:05-12:00",
    "12:00-12:55",
    "13:45-14:40",
    "14:40-15:35",
    "15:35-16:30",
];

/// Day x slot grid of placement labels
///
/// Cells are stored row-major (one row per day) and every (day, slot) pair
/// always has a value, the empty string meaning a free slot. The grid is
/// only built through `empty`, so `cells` always holds `days * slots` entries.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Timetable {
    days: Vec<String>,
    slots: Vec<String>,
    cells: Vec<String>,
}

/// One cell of a day, ready for display
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct SlotEntry {
    pub time: String,
    pub subject: String,
}

/// One row of the rendered grid
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct DaySchedule {
    pub day: String,
    pub slots: Vec<SlotEntry>,
}

impl Timetable {
    /// Create a grid where every (day, slot) cell is empty
    pub fn empty(days: &[&str], slots: &[&str]) -> Self {
        Timetable {
            days: days.iter().map(|d| d.to_string()).collect(),
            slots: slots.iter().map(|s| s.to_string()).collect(),
            cells: vec![String::new(); days.len() * slots.len()],
        }
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Labels in row-major order, one row per day
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    fn index(&self, day: usize, slot: usize) -> usize {
        day * self.slots.len() + slot
    }

    /// Label at the given day and slot names, `None` if either is unknown
    pub fn get(&self, day: &str, slot: &str) -> Option<&str> {
        let d = self.days.iter().position(|x| x == day)?;
        let s = self.slots.iter().position(|x| x == slot)?;
        Some(self.cells[self.index(d, s)].as_str())
    }

    /// Write `label` into an empty cell; an occupied cell keeps its label
    ///
    /// Returns whether the label was written.
    fn place(&mut self, day: usize, slot: usize, label: &str) -> bool {
        let idx = self.index(day, slot);
        if self.cells[idx].is_empty() {
            self.cells[idx] = label.to_string();
            true
        } else {
            false
        }
    }

    /// Number of non-empty cells
    pub fn placed_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Grid as nested rows, day-major then slot-minor
    pub fn schedule(&self) -> Vec<DaySchedule> {
        self.days
            .iter()
            .enumerate()
            .map(|(d, day)| DaySchedule {
                day: day.clone(),
                slots: self
                    .slots
                    .iter()
                    .enumerate()
                    .map(|(s, time)| SlotEntry {
                        time: time.clone(),
                        subject: self.cells[self.index(d, s)].clone(),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Number of theory sessions requested by a credits string
///
/// Only the component before the first colon is read, as a number. Empty
/// text and negative values count as zero, a fractional value is rounded up
/// (`2.5` asks for three attempts) and text that is not a number gives `None`.
///
/// # Examples
/// ```
/// use timetable::timetable::theory_count;
///
/// assert_eq!(theory_count("3:1:0"), Some(3));
/// assert_eq!(theory_count(""), Some(0));
/// assert_eq!(theory_count("2.5:0:0"), Some(3));
/// assert_eq!(theory_count("three:1:0"), None);
/// ```
pub fn theory_count(credits: &str) -> Option<u32> {
    let theory = credits.split(':').next().unwrap_or("").trim();
    if theory.is_empty() {
        return Some(0);
    }
    let count: f64 = theory.parse().ok()?;
    if count.is_nan() {
        return None;
    }
    // Float to int casts saturate: negatives become 0, huge values u32::MAX
    Some(count.ceil() as u32)
}

/// Label written into a cell for a theory session of `subject`
pub fn placement_label(subject: &Subject) -> String {
    format!("{} (Theory) - {}", subject.name, subject.teacher)
}

/// Randomly place each subject's theory sessions on the grid
///
/// For every subject, `theory_count` attempts are made (bounded by
/// `max_attempts`). Each attempt draws a day and a slot uniformly from `rng`
/// and writes the subject's label only if that cell is still empty. A
/// colliding attempt is dropped without retry, so a subject may end up with
/// fewer cells than requested, and the first writer of a cell keeps it.
///
/// # Arguments
/// * `subjects` - Subjects in form order
/// * `days` - Day names making up the grid rows
/// * `slots` - Slot labels making up the grid columns
/// * `max_attempts` - Upper bound on attempts for a single subject
/// * `rng` - Random source; pass a seeded generator for reproducible grids
///
/// # Returns
/// * `Timetable` - The populated grid, complete for every (day, slot) pair
pub fn generate<R: Rng + ?Sized>(
    subjects: &[Subject],
    days: &[&str],
    slots: &[&str],
    max_attempts: u32,
    rng: &mut R,
) -> Timetable {
    let mut timetable = Timetable::empty(days, slots);
    if days.is_empty() || slots.is_empty() {
        return timetable;
    }

    for subject in subjects {
        let attempts = theory_count(&subject.credits).unwrap_or(0).min(max_attempts);
        if attempts == 0 {
            continue;
        }

        let label = placement_label(subject);
        for _ in 0..attempts {
            let day = rng.gen_range(0..days.len());
            let slot = rng.gen_range(0..slots.len());
            timetable.place(day, slot, &label);
        }
    }

    timetable
}

/// `generate` over the fixed Monday-Saturday week and its seven slots
pub fn generate_weekly<R: Rng + ?Sized>(
    subjects: &[Subject],
    max_attempts: u32,
    rng: &mut R,
) -> Timetable {
    generate(subjects, &DAYS, &TIME_SLOTS, max_attempts, rng)
}
