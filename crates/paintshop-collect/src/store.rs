//! Directory-per-task result store.
//!
//! Layout:
//!
//! ```text
//! <root>/<experiment>/<task-name>/params.json
//!                                /result.json
//!                                /<artifacts>
//! ```
//!
//! A task is complete once `result.json` exists. Results are written to a
//! temporary file and renamed into place, so an interrupted run never
//! leaves a partial result behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CollectError, CollectResult};
use crate::task::{Task, experiment_of};

const PARAMS_FILE: &str = "params.json";
const RESULT_FILE: &str = "result.json";

/// Envelope written around every stored result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord<R> {
    /// Task name.
    pub task: String,
    /// When the result was saved.
    pub recorded_at: DateTime<Utc>,
    /// Version of the toolkit that produced the record.
    pub version: String,
    /// The result itself.
    pub result: R,
}

/// Summary of a stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    /// Task name.
    pub name: String,
    /// Whether `result.json` exists.
    pub complete: bool,
}

/// File-backed task store.
#[derive(Debug, Clone)]
pub struct TaskStore {
    root: PathBuf,
}

impl TaskStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> CollectResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a task.
    pub fn task_dir<P: Serialize>(&self, task: &Task<P>) -> CollectResult<PathBuf> {
        Ok(self.root.join(task.experiment()).join(task.name()?))
    }

    fn dir_by_name(&self, task_name: &str) -> PathBuf {
        self.root.join(experiment_of(task_name)).join(task_name)
    }

    /// Create the task directory and write `params.json`.
    ///
    /// Idempotent for identical parameters; a stored file with different
    /// parameters is [`CollectError::ParamsMismatch`].
    pub fn prepare<P: Serialize>(&self, task: &Task<P>) -> CollectResult<PathBuf> {
        let dir = self.task_dir(task)?;
        let params = task.params_value()?;
        let path = dir.join(PARAMS_FILE);

        match fs::read_to_string(&path) {
            Ok(content) => {
                // Compare after a text round trip so float parsing applies to both sides.
                let stored: serde_json::Value = serde_json::from_str(&content)?;
                let expected: serde_json::Value =
                    serde_json::from_str(&serde_json::to_string(&params)?)?;
                if stored != expected {
                    return Err(CollectError::ParamsMismatch(task.name()?));
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&dir)?;
                write_atomic(&path, serde_json::to_string_pretty(&params)?.as_bytes())?;
                tracing::debug!(task = %dir.display(), "prepared task");
            }
            Err(e) => return Err(CollectError::Io(e)),
        }

        Ok(dir)
    }

    /// True once a result has been saved.
    pub fn is_complete<P: Serialize>(&self, task: &Task<P>) -> CollectResult<bool> {
        Ok(self.task_dir(task)?.join(RESULT_FILE).is_file())
    }

    /// Save a result, replacing any previous one.
    pub fn save_result<P: Serialize, R: Serialize>(
        &self,
        task: &Task<P>,
        result: &R,
    ) -> CollectResult<()> {
        let dir = self.prepare(task)?;
        let record = ResultRecord {
            task: task.name()?,
            recorded_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            result,
        };
        let json = serde_json::to_string_pretty(&record)?;
        write_atomic(&dir.join(RESULT_FILE), json.as_bytes())?;
        tracing::info!(task = %record.task, "saved result");
        Ok(())
    }

    /// Load a saved result.
    pub fn load_result<P: Serialize, R: DeserializeOwned>(
        &self,
        task: &Task<P>,
    ) -> CollectResult<Option<ResultRecord<R>>> {
        let path = self.task_dir(task)?.join(RESULT_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CollectError::Io(e)),
        }
    }

    /// Return the stored result, or compute, save and return it.
    pub fn run_or_load<P, R, F>(&self, task: &Task<P>, compute: F) -> CollectResult<R>
    where
        P: Serialize,
        R: Serialize + DeserializeOwned,
        F: FnOnce(&P) -> CollectResult<R>,
    {
        self.prepare(task)?;
        if let Some(record) = self.load_result::<P, R>(task)? {
            tracing::info!(task = %record.task, "result already stored, skipping");
            return Ok(record.result);
        }
        let result = compute(task.params())?;
        self.save_result(task, &result)?;
        Ok(result)
    }

    /// Write an extra file next to the task's result.
    pub fn write_artifact<P: Serialize>(
        &self,
        task: &Task<P>,
        file_name: &str,
        contents: impl AsRef<[u8]>,
    ) -> CollectResult<PathBuf> {
        check_artifact_name(file_name)?;
        let dir = self.prepare(task)?;
        let path = dir.join(file_name);
        write_atomic(&path, contents.as_ref())?;
        Ok(path)
    }

    /// Parameters of a stored task, looked up by name.
    pub fn load_task<P: Serialize + DeserializeOwned>(
        &self,
        task_name: &str,
    ) -> CollectResult<Option<Task<P>>> {
        if task_name.is_empty() || task_name.starts_with('.') || task_name.contains(['/', '\\']) {
            return Err(CollectError::InvalidParams(format!(
                "'{task_name}' is not a task name"
            )));
        }
        let path = self.dir_by_name(task_name).join(PARAMS_FILE);
        let params: P = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CollectError::Io(e)),
        };
        let task = Task::new(experiment_of(task_name), params)?;
        if task.name()? != task_name {
            return Err(CollectError::InvalidParams(format!(
                "{path:?} does not produce the task name '{task_name}'",
            )));
        }
        Ok(Some(task))
    }

    /// Experiments present in the store, sorted.
    pub fn experiments(&self) -> CollectResult<Vec<String>> {
        sorted_subdirs(&self.root)
    }

    /// Tasks of one experiment, sorted by name.
    pub fn list(&self, experiment: &str) -> CollectResult<Vec<TaskEntry>> {
        let dir = self.root.join(experiment);
        Ok(sorted_subdirs(&dir)?
            .into_iter()
            .map(|name| {
                let complete = dir.join(&name).join(RESULT_FILE).is_file();
                TaskEntry { name, complete }
            })
            .collect())
    }
}

fn check_artifact_name(file_name: &str) -> CollectResult<()> {
    let plain = !file_name.is_empty()
        && !file_name.starts_with('.')
        && !file_name.contains(['/', '\\'])
        && file_name != PARAMS_FILE
        && file_name != RESULT_FILE;
    if plain {
        Ok(())
    } else {
        Err(CollectError::InvalidParams(format!(
            "'{file_name}' is not a valid artifact name"
        )))
    }
}

fn sorted_subdirs(dir: &Path) -> CollectResult<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CollectError::Io(e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if !name.starts_with('.') => names.push(name),
            Ok(_) => {}
            Err(name) => tracing::warn!("Skipping non-UTF-8 entry {:?}", name),
        }
    }
    names.sort();
    Ok(names)
}

/// Write via a uniquely named sibling and rename over the target.
fn write_atomic(path: &Path, contents: &[u8]) -> CollectResult<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CollectError::InvalidParams(format!("{path:?} has no file name")))?;
    let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
