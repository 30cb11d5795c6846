use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which part of a topic a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Plans,
    Tasks,
    Docs,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Plans => "plans",
            Section::Tasks => "tasks",
            Section::Docs => "docs",
        }
    }
}

/// Accepts exactly the lowercase names serde uses
impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plans" => Ok(Section::Plans),
            "tasks" => Ok(Section::Tasks),
            "docs" => Ok(Section::Docs),
            other => Err(format!("unknown file section '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub topic_id: i64,
    pub name: String,
    pub section: Section,
    pub linked: bool,
}

/// Files of one topic grouped by section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionedFiles {
    pub plans: Vec<FileRecord>,
    pub tasks: Vec<FileRecord>,
    pub docs: Vec<FileRecord>,
}

impl SectionedFiles {
    pub fn push(&mut self, file: FileRecord) {
        match file.section {
            Section::Plans => self.plans.push(file),
            Section::Tasks => self.tasks.push(file),
            Section::Docs => self.docs.push(file),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRequest {
    pub topic_id: i64,
    pub name: String,
    pub section: Section,
}

/// Ids of everything created alongside a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedFile {
    pub file_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_file_id: Option<i64>,
}

/// A linked file with the display metadata of its topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedFile {
    pub id: i64,
    pub topic_id: i64,
    pub name: String,
    pub section: Section,
    pub topic_name: String,
    pub topic_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLinkedRequest {
    pub linked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_parsing_matches_serde() {
        for section in [Section::Plans, Section::Tasks, Section::Docs] {
            assert_eq!(section.as_str().parse::<Section>(), Ok(section));
            let json = serde_json::to_string(&section).unwrap();
            assert_eq!(json, format!("\"{}\"", section.as_str()));
        }

        assert!("Plans".parse::<Section>().is_err());
        assert!(serde_json::from_str::<Section>("\"Plans\"").is_err());
        assert!("misc".parse::<Section>().is_err());
    }
}
