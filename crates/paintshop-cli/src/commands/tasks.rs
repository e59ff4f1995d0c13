//! Task commands: prepare, ingest and list checkpointed QAOA tasks.
//!
//! `prepare` writes one task per grid point with its OpenQASM 3 circuit.
//! Circuits run elsewhere; `ingest` scores the returned counts and stores
//! the result, after which the task counts as complete.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use paintshop_collect::{CollectConfig, Task, TaskStore};
use paintshop_core::{
    Counts, Evaluation, QaoaParams, QaoaRunner, Sequence, analyze_counts, emit_qasm3, solver,
};

use super::common::load_sequence;
use crate::StoreArgs;

/// Parameters identifying one QAOA task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaoaTaskParams {
    /// Sequence fingerprint.
    pub instance: String,
    pub gamma: f64,
    pub beta: f64,
    pub coupling_strength: f64,
    pub shots: u32,
}

fn open_store(args: &StoreArgs) -> Result<(CollectConfig, TaskStore)> {
    let mut config =
        CollectConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = &args.dir {
        config.data_dir = dir.clone();
    }
    let store = TaskStore::open(&config.data_dir).with_context(|| {
        format!("Failed to open data directory: {}", config.data_dir.display())
    })?;
    Ok((config, store))
}

/// Execute `tasks prepare`.
pub fn execute_prepare(sequence: &str, args: &StoreArgs) -> Result<()> {
    let sequence = load_sequence(sequence)?;
    let (config, store) = open_store(args)?;
    let runner = QaoaRunner::new(sequence.clone())
        .with_coupling_strength(config.coupling_strength)
        .with_shots(config.shots);
    let points = config.grid.grid_search().points();
    let instance = sequence.fingerprint();
    let sequence_json = serde_json::to_string(&sequence)?;

    let progress = ProgressBar::new(points.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );

    let mut prepared = 0usize;
    let mut skipped = 0usize;
    for [gamma, beta] in points {
        let task = Task::new(
            config.experiment.as_str(),
            QaoaTaskParams {
                instance: instance.clone(),
                gamma,
                beta,
                coupling_strength: config.coupling_strength,
                shots: config.shots,
            },
        )?;
        progress.set_message(format!("γ={gamma:.3} β={beta:.3}"));

        if store.is_complete(&task)? {
            tracing::info!(task = %task.name()?, "already complete, skipping");
            skipped += 1;
        } else {
            let circuit = runner.circuit(QaoaParams::new(gamma, beta))?;
            store.write_artifact(&task, "circuit.qasm", emit_qasm3(&circuit))?;
            store.write_artifact(&task, "sequence.json", &sequence_json)?;
            prepared += 1;
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!(
        "{} Prepared {} tasks ({} already complete) in {}",
        style("✓").green().bold(),
        style(prepared).yellow(),
        skipped,
        style(store.root().join(&config.experiment).display()).cyan()
    );

    Ok(())
}

/// Execute `tasks ingest`.
pub fn execute_ingest(
    sequence: &str,
    task_name: &str,
    counts_path: &Path,
    force: bool,
    args: &StoreArgs,
) -> Result<()> {
    let sequence = load_sequence(sequence)?;
    let (_, store) = open_store(args)?;

    let task: Task<QaoaTaskParams> = store
        .load_task(task_name)?
        .with_context(|| format!("Unknown task: {task_name}"))?;
    let params = task.params();
    if params.instance != sequence.fingerprint() {
        anyhow::bail!(
            "Task {task_name} was prepared for instance {}, not {}",
            params.instance,
            sequence.fingerprint()
        );
    }

    if store.is_complete(&task)? && !force {
        println!(
            "{} {} already has a result (use --force to overwrite)",
            style("→").cyan().bold(),
            style(task_name).dim()
        );
        return Ok(());
    }

    let content = fs::read_to_string(counts_path)
        .with_context(|| format!("Failed to read counts: {}", counts_path.display()))?;
    let counts: Counts =
        serde_json::from_str(&content).context("Counts must map bitstrings to integers")?;
    let shots = counts.total_shots()?;
    if shots != u64::from(params.shots) {
        tracing::warn!(
            expected = params.shots,
            found = shots,
            "shot count differs from the task"
        );
    }

    let analysis = analyze_counts(&sequence, &counts)?;
    let evaluation = Evaluation {
        params: QaoaParams::new(params.gamma, params.beta),
        counts,
        analysis,
    };
    store.save_result(&task, &evaluation)?;

    print_evaluation(&sequence, &evaluation)?;
    Ok(())
}

fn print_evaluation(sequence: &Sequence, evaluation: &Evaluation) -> Result<()> {
    let analysis = &evaluation.analysis;
    println!(
        "{} Recorded {} shots: mean {:.3} color changes, best {}",
        style("✓").green().bold(),
        analysis.shots,
        style(analysis.mean_changes).yellow(),
        style(analysis.best.changes).yellow().bold()
    );

    let greedy = solver::greedy(sequence)?;
    println!("  greedy baseline: {}", greedy.changes);
    if sequence.num_cars() <= solver::MAX_EXHAUSTIVE_CARS {
        let optimum = solver::exhaustive(sequence)?;
        println!(
            "  optimum:         {} ({:.1}% of shots)",
            optimum.changes,
            analysis.fraction_at_most(optimum.changes) * 100.0
        );
    }
    Ok(())
}

/// Execute `tasks list`.
pub fn execute_list(args: &StoreArgs) -> Result<()> {
    let (_, store) = open_store(args)?;
    let experiments = store.experiments()?;

    if experiments.is_empty() {
        println!("No tasks in {}", style(store.root().display()).cyan());
        return Ok(());
    }

    for experiment in experiments {
        let entries = store.list(&experiment)?;
        let complete = entries.iter().filter(|e| e.complete).count();
        println!(
            "{} ({}/{} complete)",
            style(&experiment).cyan().bold(),
            complete,
            entries.len()
        );
        for entry in entries {
            let mark = if entry.complete {
                style("✓").green()
            } else {
                style("·").dim()
            };
            println!("  {mark} {}", entry.name);
        }
    }

    Ok(())
}
