// Record categories
//
// The fixed vocabulary of record sources the classifier may choose from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named bucket of patient record data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MedicalRecord,
    ImageRecord,
    LabRecord,
}

impl Category {
    /// Every category, in prompt order
    pub const ALL: [Category; 3] = [
        Category::MedicalRecord,
        Category::ImageRecord,
        Category::LabRecord,
    ];

    /// Canonical label used in prompts, config keys and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MedicalRecord => "medical_record",
            Category::ImageRecord => "image_record",
            Category::LabRecord => "lab_record",
        }
    }

    /// What the category holds, as explained to the classifier
    pub fn description(&self) -> &'static str {
        match self {
            Category::MedicalRecord => "general information about the patient's medical history",
            Category::ImageRecord => "records of medical imaging (such as MRIs or X-rays)",
            Category::LabRecord => "laboratory test results (such as blood or urine tests)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label that does not name any known category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown record category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownCategory(label.to_string()))
    }
}
