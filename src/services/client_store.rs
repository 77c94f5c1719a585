use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::auth::AppError;
use crate::models::{
    find_exercise, normalize_client_name, normalize_plan_name, Client, ExerciseEntry, NewClient,
    ProgressEntry,
};
use crate::storage::{load_document, save_document, JsonFile, Snapshot, StorageError};

const DOCUMENT: &str = "clients";

fn first_client_id() -> u64 {
    1
}

/// On-disk shape of the clients document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientsDocument {
    #[serde(default)]
    pub clients: BTreeMap<u64, Client>,
    #[serde(default = "first_client_id")]
    pub next_client_id: u64,
}

impl Default for ClientsDocument {
    fn default() -> Self {
        Self {
            clients: BTreeMap::new(),
            next_client_id: first_client_id(),
        }
    }
}

impl ClientsDocument {
    /// Keep the counter ahead of every stored id, even after a hand-edited file
    fn repair_counter(&mut self) {
        if let Some(max_id) = self.clients.keys().next_back() {
            if self.next_client_id <= *max_id {
                warn!(
                    "next_client_id {} is not past stored id {}; advancing",
                    self.next_client_id, max_id
                );
                self.next_client_id = max_id + 1;
            }
        }
    }

    fn client_mut(&mut self, id: u64) -> Result<&mut Client, AppError> {
        self.clients
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Client {} not found", id)))
    }
}

/// Trainee records with their plans and progress history
pub struct ClientStore {
    document: RwLock<ClientsDocument>,
    snapshot: Box<dyn Snapshot>,
}

impl std::fmt::Debug for ClientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientStore").finish_non_exhaustive()
    }
}

impl ClientStore {
    pub fn open(snapshot: Box<dyn Snapshot>) -> Result<Self, StorageError> {
        let mut document: ClientsDocument =
            load_document(snapshot.as_ref(), DOCUMENT)?.unwrap_or_default();
        document.repair_counter();
        info!(
            "Loaded {} clients (next id {})",
            document.clients.len(),
            document.next_client_id
        );

        Ok(Self {
            document: RwLock::new(document),
            snapshot,
        })
    }

    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open(Box::new(JsonFile::new(path.as_ref())))
    }

    pub async fn create(&self, request: NewClient) -> Result<Client, AppError> {
        let name = normalize_client_name(&request.name);
        let goal = request.goal.trim().to_string();
        if name.is_empty() || goal.is_empty() {
            return Err(AppError::validation("Name and goal are required"));
        }

        let mut document = self.document.write().await;
        if let Some(student) = request.linked_student.as_deref() {
            if let Some(other) = document.clients.values().find(|c| c.is_linked_to(student)) {
                return Err(AppError::validation(format!(
                    "Student '{}' is already linked to client {}",
                    student, other.id
                )));
            }
        }

        let mut staged = document.clone();
        let client = Client {
            id: staged.next_client_id,
            name,
            goal,
            workouts: IndexMap::new(),
            progress: Vec::new(),
            owner_instructor: request.owner_instructor,
            linked_student: request.linked_student,
        };
        staged.clients.insert(client.id, client.clone());
        staged.next_client_id += 1;

        self.commit(&mut document, staged)?;
        info!("Registered client {} ({})", client.id, client.name);
        Ok(client)
    }

    pub async fn get(&self, id: u64) -> Option<Client> {
        self.document.read().await.clients.get(&id).cloned()
    }

    pub async fn list(&self) -> Vec<Client> {
        self.document.read().await.clients.values().cloned().collect()
    }

    pub async fn find_by_student(&self, identifier: &str) -> Option<Client> {
        self.document
            .read()
            .await
            .clients
            .values()
            .find(|client| client.is_linked_to(identifier))
            .cloned()
    }

    /// Identifiers of students already linked to some client
    pub async fn linked_students(&self) -> BTreeSet<String> {
        self.document
            .read()
            .await
            .clients
            .values()
            .filter_map(|client| client.linked_student.clone())
            .collect()
    }

    /// Permanently remove a client with all its plans and progress
    pub async fn delete(&self, id: u64) -> Result<Client, AppError> {
        let mut document = self.document.write().await;
        let mut staged = document.clone();
        let removed = staged
            .clients
            .remove(&id)
            .ok_or_else(|| AppError::not_found(format!("Client {} not found", id)))?;

        self.commit(&mut document, staged)?;
        info!("Removed client {} ({})", id, removed.name);
        Ok(removed)
    }

    /// Append to a plan, creating it on first use
    pub async fn add_exercise(
        &self,
        client_id: u64,
        plan: &str,
        exercise: ExerciseEntry,
    ) -> Result<ExerciseEntry, AppError> {
        let plan = normalize_plan_name(plan);
        if plan.is_empty() {
            return Err(AppError::validation("Plan name is required"));
        }
        let exercise = validate_exercise(exercise)?;

        let mut document = self.document.write().await;
        let mut staged = document.clone();
        staged
            .client_mut(client_id)?
            .workouts
            .entry(plan.clone())
            .or_default()
            .push(exercise.clone());

        self.commit(&mut document, staged)?;
        info!("Added {} to plan {} of client {}", exercise.name, plan, client_id);
        Ok(exercise)
    }

    /// Remove by position; an emptied plan disappears
    pub async fn remove_exercise(
        &self,
        client_id: u64,
        plan: &str,
        index: usize,
    ) -> Result<ExerciseEntry, AppError> {
        let plan = normalize_plan_name(plan);

        let mut document = self.document.write().await;
        let mut staged = document.clone();
        let client = staged.client_mut(client_id)?;
        let entries = client
            .workouts
            .get_mut(&plan)
            .ok_or_else(|| AppError::not_found(format!("Plan '{}' not found", plan)))?;
        if index >= entries.len() {
            return Err(AppError::not_found(format!(
                "Plan '{}' has no exercise at position {}",
                plan, index
            )));
        }

        let removed = entries.remove(index);
        if entries.is_empty() {
            client.workouts.shift_remove(&plan);
        }

        self.commit(&mut document, staged)?;
        info!("Removed {} from plan {} of client {}", removed.name, plan, client_id);
        Ok(removed)
    }

    pub async fn add_progress(&self, client_id: u64, entry: ProgressEntry) -> Result<(), AppError> {
        if !(entry.weight.is_finite() && entry.weight > 0.0) {
            return Err(AppError::validation("Weight must be a positive number"));
        }

        let mut document = self.document.write().await;
        let mut staged = document.clone();
        staged.client_mut(client_id)?.progress.push(entry);

        self.commit(&mut document, staged)?;
        info!("Recorded progress for client {}", client_id);
        Ok(())
    }

    /// Removes every entry recorded on `date`; returns how many went
    pub async fn remove_progress(&self, client_id: u64, date: NaiveDate) -> Result<usize, AppError> {
        let mut document = self.document.write().await;
        let mut staged = document.clone();
        let client = staged.client_mut(client_id)?;

        let before = client.progress.len();
        client.progress.retain(|entry| entry.date != date);
        let removed = before - client.progress.len();
        if removed == 0 {
            return Err(AppError::not_found(format!(
                "No progress recorded on {}",
                date
            )));
        }

        self.commit(&mut document, staged)?;
        info!("Removed {} progress entries of client {} on {}", removed, client_id, date);
        Ok(removed)
    }

    /// Drop owner/student links that point at a removed account
    pub async fn unlink_account(&self, identifier: &str) -> Result<usize, AppError> {
        let mut document = self.document.write().await;
        let mut staged = document.clone();

        let mut touched = 0;
        for client in staged.clients.values_mut() {
            let mut changed = false;
            if client.linked_student.as_deref() == Some(identifier) {
                client.linked_student = None;
                changed = true;
            }
            if client.owner_instructor.as_deref() == Some(identifier) {
                client.owner_instructor = None;
                changed = true;
            }
            if changed {
                touched += 1;
            }
        }

        if touched > 0 {
            self.commit(&mut document, staged)?;
            info!("Unlinked {} from {} clients", identifier, touched);
        }
        Ok(touched)
    }

    fn commit(
        &self,
        current: &mut ClientsDocument,
        staged: ClientsDocument,
    ) -> Result<(), AppError> {
        save_document(self.snapshot.as_ref(), DOCUMENT, &staged)?;
        *current = staged;
        Ok(())
    }
}

fn validate_exercise(exercise: ExerciseEntry) -> Result<ExerciseEntry, AppError> {
    let catalog_entry = find_exercise(&exercise.name).ok_or_else(|| {
        AppError::validation(format!("'{}' is not in the exercise catalog", exercise.name))
    })?;
    if exercise.sets == 0 || exercise.reps == 0 {
        return Err(AppError::validation("Sets and reps must be at least 1"));
    }
    if let Some(load) = exercise.load {
        if !load.is_finite() || load < 0.0 {
            return Err(AppError::validation("Load must be zero or more"));
        }
    }

    Ok(ExerciseEntry {
        name: catalog_entry.name.to_string(),
        ..exercise
    })
}
