//! Evaluation harness: re-asks the oracle and scores against gold answers.
//!
//! Consumes `{narrative, question, options, answer}` from case records; the
//! oracle's reply is split at the literal `ANSWER:` marker into reasoning
//! and final choice, and accuracy is exact-match over the choice.

use std::io::Write as _;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::{DatasetError, FallwerkResult};
use crate::oracle::{Oracle, OracleError, render_prompt};
use crate::schema::WorkflowOutput;

/// Split marker between the model's reasoning and its final choice.
const ANSWER_MARKER: &str = "ANSWER:";

/// Prompt used to answer a generated case from its narrative alone.
pub const EVALUATION_PROMPT: &str = r#"
You are a tax expert in Germany. Given a story, answer the question at the end.

{examples}

STORY:
{narrative}

QUESTION:
{question}

Pick one of the following choices: {options}.
You must pick one option.
{cot}
Finally, the last thing you generate should be "ANSWER: (your answer here)".
"#;

const COT_INSTRUCTION: &str = "Explain your reasoning step by step before you answer.";

/// A solved case used as a few-shot demonstration.
#[derive(Debug, Clone)]
pub struct FewShotExample {
    pub narrative: String,
    pub question: String,
    pub answer: String,
}

/// Baseline evaluation workflow: one oracle call per example.
pub struct EvalWorkflow<'a> {
    oracle: &'a dyn Oracle,
    cot: bool,
    few_shot: Vec<FewShotExample>,
}

impl<'a> EvalWorkflow<'a> {
    pub fn new(oracle: &'a dyn Oracle, cot: bool) -> Self {
        Self {
            oracle,
            cot,
            few_shot: Vec::new(),
        }
    }

    /// Prepend the given solved cases to every prompt.
    pub fn with_few_shot(mut self, examples: Vec<FewShotExample>) -> Self {
        self.few_shot = examples;
        self
    }

    /// Run the workflow on one example record.
    pub fn run(&self, example: &Value) -> Result<WorkflowOutput, OracleError> {
        let narrative = example["narrative"].as_str().unwrap_or_default();
        let question = example["question"].as_str().unwrap_or_default();
        let options = example["options"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        let cot = if self.cot { COT_INSTRUCTION } else { "" };
        let examples_block = self.examples_block();

        let prompt = render_prompt(
            EVALUATION_PROMPT,
            &[
                ("examples", examples_block.as_str()),
                ("narrative", narrative),
                ("question", question),
                ("options", options.as_str()),
                ("cot", cot),
            ],
        );

        let reply = self.oracle.complete(&prompt)?;
        let content = reply.text.trim();

        let (reasoning, predicted_answer) = match content.find(ANSWER_MARKER) {
            Some(idx) => (
                content[..idx].trim().to_string(),
                content[idx + ANSWER_MARKER.len()..].trim().to_string(),
            ),
            // No marker: everything is reasoning, the choice is missing.
            None => (content.to_string(), String::new()),
        };

        let mut token_usage = serde_json::Map::new();
        if let Some(usage) = reply.usage {
            token_usage.insert("prompt_tokens".into(), usage.prompt_tokens.into());
            token_usage.insert("completion_tokens".into(), usage.completion_tokens.into());
        }

        Ok(WorkflowOutput {
            predicted_answer,
            reasoning,
            token_usage,
        })
    }

    fn examples_block(&self) -> String {
        if self.few_shot.is_empty() {
            return String::new();
        }
        let blocks: Vec<String> = self
            .few_shot
            .iter()
            .map(|ex| {
                format!(
                    "STORY:\n{}\n\nQUESTION:\n{}\n\n\"ANSWER: {}\".",
                    ex.narrative, ex.question, ex.answer
                )
            })
            .collect();
        format!("Here are examples:\n\n{}", blocks.join("\n"))
    }
}

/// Outcome of one evaluation run.
#[derive(Debug, Clone, Copy)]
pub struct EvalReport {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
}

/// Load examples from a `.json` array or a `.jsonl` file.
pub fn load_dataset(path: &Path) -> Result<Vec<Value>, DatasetError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: display.clone(),
        source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| DatasetError::Parse {
            path: display,
            message: e.to_string(),
        }),
        Some("jsonl") => content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| DatasetError::Parse {
                    path: display.clone(),
                    message: e.to_string(),
                })
            })
            .collect(),
        _ => Err(DatasetError::UnsupportedFormat { path: display }),
    }
}

/// Evaluate a dataset, writing each example with its prediction to
/// `output_path` as JSONL, and return the accuracy summary.
pub fn run_evaluation(
    dataset: &Path,
    output_path: &Path,
    workflow: &EvalWorkflow<'_>,
) -> FallwerkResult<EvalReport> {
    let mut examples = load_dataset(dataset)?;
    info!(count = examples.len(), dataset = %dataset.display(), "loaded examples");

    let mut correct = 0;
    for example in examples.iter_mut() {
        let output = workflow.run(example)?;
        if example["answer"].as_str() == Some(output.predicted_answer.as_str()) {
            correct += 1;
        }
        example["prediction"] = serde_json::json!({
            "predicted_answer": output.predicted_answer,
            "reasoning": output.reasoning,
            "token_usage": output.token_usage,
        });
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| DatasetError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }
    let mut file =
        std::fs::File::create(output_path).map_err(|source| DatasetError::Io {
            path: output_path.display().to_string(),
            source,
        })?;
    for example in &examples {
        let line = serde_json::to_string(example).map_err(|e| DatasetError::Serialize {
            message: e.to_string(),
        })?;
        writeln!(file, "{line}").map_err(|source| DatasetError::Io {
            path: output_path.display().to_string(),
            source,
        })?;
    }

    let total = examples.len();
    let accuracy = if total > 0 {
        correct as f64 / total as f64
    } else {
        0.0
    };

    info!(total, correct, accuracy, "evaluation complete");
    Ok(EvalReport {
        total,
        correct,
        accuracy,
    })
}

#[cfg(test)]
mod tests {
    use crate::oracle::OracleReply;

    use super::*;

    struct FixedOracle(&'static str);

    impl Oracle for FixedOracle {
        fn complete(&self, _prompt: &str) -> Result<OracleReply, OracleError> {
            Ok(OracleReply::text_only(self.0))
        }
    }

    fn example() -> Value {
        serde_json::json!({
            "narrative": "We got married last year.",
            "question": "Which option?",
            "options": ["joint", "individual"],
            "answer": "joint",
        })
    }

    #[test]
    fn splits_reply_at_answer_marker() {
        let oracle = FixedOracle("The incomes differ a lot.\nANSWER: joint");
        let workflow = EvalWorkflow::new(&oracle, true);
        let output = workflow.run(&example()).unwrap();
        assert_eq!(output.predicted_answer, "joint");
        assert_eq!(output.reasoning, "The incomes differ a lot.");
    }

    #[test]
    fn missing_marker_yields_empty_prediction() {
        let oracle = FixedOracle("I cannot decide.");
        let workflow = EvalWorkflow::new(&oracle, false);
        let output = workflow.run(&example()).unwrap();
        assert_eq!(output.predicted_answer, "");
        assert_eq!(output.reasoning, "I cannot decide.");
    }

    #[test]
    fn few_shot_blocks_render_into_prompt() {
        struct CapturePrompt(std::cell::RefCell<String>);
        impl Oracle for CapturePrompt {
            fn complete(&self, prompt: &str) -> Result<OracleReply, OracleError> {
                *self.0.borrow_mut() = prompt.to_string();
                Ok(OracleReply::text_only("ANSWER: joint"))
            }
        }

        let oracle = CapturePrompt(std::cell::RefCell::new(String::new()));
        let workflow = EvalWorkflow::new(&oracle, false).with_few_shot(vec![FewShotExample {
            narrative: "Demo story.".into(),
            question: "Demo question?".into(),
            answer: "joint".into(),
        }]);
        workflow.run(&example()).unwrap();

        let prompt = oracle.0.borrow();
        assert!(prompt.contains("Here are examples:"));
        assert!(prompt.contains("Demo story."));
        assert!(prompt.contains("joint, individual"));
    }

    #[test]
    fn run_evaluation_scores_and_writes_predictions() {
        let dir = tempfile::TempDir::new().unwrap();
        let dataset = dir.path().join("cases.jsonl");
        std::fs::write(
            &dataset,
            format!("{}\n{}\n", example(), example()),
        )
        .unwrap();

        let oracle = FixedOracle("Because of splitting.\nANSWER: joint");
        let workflow = EvalWorkflow::new(&oracle, true);
        let output = dir.path().join("results.jsonl");
        let report = run_evaluation(&dataset, &output, &workflow).unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.correct, 2);
        assert_eq!(report.accuracy, 1.0);

        let written = std::fs::read_to_string(&output).unwrap();
        let first: Value = serde_json::from_str(written.lines().next().unwrap()).unwrap();
        assert_eq!(first["prediction"]["predicted_answer"], "joint");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cases.csv");
        std::fs::write(&path, "narrative,answer\n").unwrap();
        assert!(matches!(
            load_dataset(&path),
            Err(DatasetError::UnsupportedFormat { .. })
        ));
    }
}
