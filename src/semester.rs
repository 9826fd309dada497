use serde::{Deserialize, Serialize};

/// Semester metadata entered at the top of the form
///
/// Every field is kept as free text; dates are not checked for ordering and
/// the student count is not parsed.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SemesterInfo {
    pub semester: String,
    pub term_start: String,
    pub term_end: String,
    pub room_number: String,
    pub num_students: String,
}

/// One subject row of the form
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Subject {
    pub name: String,
    pub teacher: String,
    /// Expected as `theory:tutorial:practical`
    pub credits: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SemesterField {
    Semester,
    TermStart,
    TermEnd,
    RoomNumber,
    NumStudents,
}

impl SemesterField {
    /// Parse the input name used by the form
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "semester" => Some(SemesterField::Semester),
            "termStart" => Some(SemesterField::TermStart),
            "termEnd" => Some(SemesterField::TermEnd),
            "roomNumber" => Some(SemesterField::RoomNumber),
            "numStudents" => Some(SemesterField::NumStudents),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubjectField {
    Name,
    Teacher,
    Credits,
}

impl SubjectField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(SubjectField::Name),
            "teacher" => Some(SubjectField::Teacher),
            "credits" => Some(SubjectField::Credits),
            _ => None,
        }
    }
}

/// Mutable form state: semester details plus the ordered subject list
///
/// Subjects are only ever appended, so an index handed out by a previous
/// render stays valid for the rest of the session.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct SemesterForm {
    pub info: SemesterInfo,
    pub subjects: Vec<Subject>,
}

impl Default for SemesterForm {
    fn default() -> Self {
        SemesterForm {
            info: SemesterInfo::default(),
            subjects: vec![Subject::default()],
        }
    }
}

impl SemesterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_field(&mut self, field: SemesterField, value: &str) {
        let slot = match field {
            SemesterField::Semester => &mut self.info.semester,
            SemesterField::TermStart => &mut self.info.term_start,
            SemesterField::TermEnd => &mut self.info.term_end,
            SemesterField::RoomNumber => &mut self.info.room_number,
            SemesterField::NumStudents => &mut self.info.num_students,
        };
        *slot = value.to_string();
    }

    /// Replace one field of the subject at `index`
    ///
    /// Returns `false` and leaves the form untouched when `index` is out of
    /// range.
    pub fn update_subject_field(&mut self, index: usize, field: SubjectField, value: &str) -> bool {
        let Some(subject) = self.subjects.get_mut(index) else {
            return false;
        };

        let slot = match field {
            SubjectField::Name => &mut subject.name,
            SubjectField::Teacher => &mut subject.teacher,
            SubjectField::Credits => &mut subject.credits,
        };
        *slot = value.to_string();
        true
    }

    pub fn append_subject(&mut self) {
        self.subjects.push(Subject::default());
    }
}
