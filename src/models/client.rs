use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Load in kg; `None` when not prescribed
    pub load: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub weight: f64,
    pub waist: Option<f64>,
    pub arm: Option<f64>,
}

/// A trainee managed by an instructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub name: String,
    pub goal: String,
    /// Plans in the order they were first created
    #[serde(default)]
    pub workouts: IndexMap<String, Vec<ExerciseEntry>>,
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_student: Option<String>,
}

impl Client {
    pub fn plan(&self, name: &str) -> Option<&[ExerciseEntry]> {
        self.workouts.get(name).map(Vec::as_slice)
    }

    pub fn plan_names(&self) -> Vec<String> {
        self.workouts.keys().cloned().collect()
    }

    /// The requested plan if it exists, otherwise the first one
    pub fn selected_plan(&self, requested: Option<&str>) -> Option<&str> {
        requested
            .map(normalize_plan_name)
            .and_then(|wanted| self.workouts.get_key_value(&wanted).map(|(k, _)| k.as_str()))
            .or_else(|| self.workouts.keys().next().map(String::as_str))
    }

    pub fn is_linked_to(&self, identifier: &str) -> bool {
        self.linked_student.as_deref() == Some(identifier)
    }
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub goal: String,
    pub owner_instructor: Option<String>,
    pub linked_student: Option<String>,
}

/// Row shown in client listings
#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub id: u64,
    pub name: String,
    pub goal: String,
    pub plan_count: usize,
    pub progress_count: usize,
    pub owner_instructor: Option<String>,
    pub linked_student: Option<String>,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            goal: client.goal.clone(),
            plan_count: client.workouts.len(),
            progress_count: client.progress.len(),
            owner_instructor: client.owner_instructor.clone(),
            linked_student: client.linked_student.clone(),
        }
    }
}

/// "jANE  doe" -> "Jane Doe"
pub fn normalize_client_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_plan_name(name: &str) -> String {
    name.trim().to_uppercase()
}
