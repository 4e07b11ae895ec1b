//! Run command implementation
//!
//! Processes one question in-process and emits the finished context as
//! pretty JSON, either on stdout or into a file.

use super::output::{Mark, Output};
use crate::{
    agents::AgentRegistry,
    orchestrator::Orchestrator,
    store::HubStore,
    types::{AppError, Context, Result, RunState, RunStatus},
    utils::toml_config::HubConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Options for the run command
pub struct RunOptions {
    /// Question text
    pub question: String,
    /// Destination file for the context JSON; stdout when unset
    pub output: Option<PathBuf>,
    /// Use mock agents even when provider keys are present
    pub mock: bool,
}

/// Process the question and write the resulting context.
pub async fn run(config: HubConfig, options: RunOptions, output: &Output) -> Result<Context> {
    let question = options.question.trim();
    if question.is_empty() {
        return Err(AppError::InvalidInput(
            "Question text must not be empty".to_string(),
        ));
    }

    let registry = AgentRegistry::new(Arc::new(config));
    let agents = registry.build(!options.mock).await;
    let store = Arc::new(HubStore::new());
    let created = store.create_question(question);

    // Progress lines would corrupt JSON written to stdout.
    let show_progress = options.output.is_some();
    if show_progress {
        output.section(&format!("Processing: {}", created.text));
        for agent in &agents {
            output.panel_member(agent.name(), agent.model());
        }
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<RunStatus>();
    let printer = {
        let output = *output;
        tokio::spawn(async move {
            let mut last_label = "";
            while let Some(status) = rx.recv().await {
                let label = status.label();
                if show_progress && label != last_label {
                    output.progress(&status);
                    last_label = label;
                }
            }
        })
    };

    let final_status = {
        let orchestrator = Orchestrator::new(store.clone()).with_observer(tx);
        orchestrator
            .run(&created.id, &agents, !options.mock)
            .await?
    };
    let _ = printer.await;

    if final_status.state == RunState::Failed {
        return Err(AppError::Internal(
            final_status
                .error
                .unwrap_or_else(|| "Run failed".to_string()),
        ));
    }

    let context = store
        .get_context(&created.id)
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", created.id)))?;
    let json = serde_json::to_string_pretty(&context)
        .map_err(|e| AppError::Internal(format!("Failed to serialize context: {}", e)))?;

    match &options.output {
        Some(path) => {
            tokio::fs::write(path, json).await.map_err(|e| {
                AppError::Internal(format!("Failed to write {}: {}", path.display(), e))
            })?;
            output.line(
                Mark::Done,
                &format!("Context written to {}", path.display()),
            );
        }
        None => println!("{}", json),
    }

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stage;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_mock_run_writes_complete_context() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("context.json");
        let options = RunOptions {
            question: "Is fusion power viable?".to_string(),
            output: Some(path.clone()),
            mock: true,
        };

        let context = run(HubConfig::default(), options, &Output::no_color())
            .await
            .unwrap();

        for stage in Stage::ALL {
            assert!(context.stage_len(stage) > 0, "{} is empty", stage);
        }
        let written: Context =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.question_id, context.question_id);
        assert_eq!(written.responses.len(), 3);
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let options = RunOptions {
            question: "   ".to_string(),
            output: None,
            mock: true,
        };
        let err = run(HubConfig::default(), options, &Output::no_color())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
