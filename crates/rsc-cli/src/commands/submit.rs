use std::path::PathBuf;

use anyhow::Context;
use rsc_core::naming::extension_of;
use rsc_portal::{Portal, SubmitOutcome, Submission};
use rsc_sync::PushOutcome;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SubmitArgs;
use crate::output::output;
use crate::score;

#[derive(Debug, Serialize)]
struct SubmitResponse {
    status: &'static str,
    class: String,
    admission_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sync: Option<PushOutcome>,
}

/// Handle `rsc submit`.
pub async fn handle(args: &SubmitArgs, portal: &Portal, flags: &GlobalFlags) -> anyhow::Result<()> {
    let class = super::parse_class(&args.class)?;

    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("'{}' has no file name", args.file.display()))?;
    let extension = extension_of(file_name)
        .with_context(|| format!("'{file_name}' has no extension"))?;
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let score = match args.score {
        Some(score) => score,
        None => {
            let general = &portal.config().general;
            f64::from(score::draw(general.min_score, general.max_score)?)
        }
    };

    let outcome = portal
        .submit(Submission {
            full_name: &args.name,
            admission_no: &args.admission_no,
            class: &class,
            score,
            bytes: &bytes,
            extension,
        })
        .await
        .map_err(|error| {
            let hint = if error.is_retriable() {
                "submission not saved; close the program holding the file and retry"
            } else {
                "submission not saved"
            };
            anyhow::Error::new(error).context(hint)
        })?;

    let response = match outcome {
        SubmitOutcome::Accepted {
            record,
            artifact,
            sync,
        } => {
            if let PushOutcome::Failed { message } = &sync {
                tracing::warn!(%message, "submission saved locally; remote sync failed");
            }
            SubmitResponse {
                status: "accepted",
                class: class.to_string(),
                admission_no: record.admission_no,
                score: record.score,
                artifact: Some(artifact),
                sync: Some(sync),
            }
        }
        SubmitOutcome::AlreadySubmitted => SubmitResponse {
            status: "already_submitted",
            class: class.to_string(),
            admission_no: args.admission_no.trim().to_string(),
            score: None,
            artifact: None,
            sync: None,
        },
    };

    output(&response, flags)
}
