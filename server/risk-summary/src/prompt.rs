//! Chat payload for the risk summary.

use metric_risk::{MetricRecord, ThresholdTable};

use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::types::{ChatMessage, ChatRequest};

const SYSTEM_PREAMBLE: &str = "You are a helpful assistant.";

const ANALYSIS_INSTRUCTION: &str = "Analyze the following blood metrics data and give your \
insights for each patient according to the risk thresholds provided. \
Identify the patient with the highest risk.";

const OUTPUT_INSTRUCTION: &str = "Just give your overview of how the health of each record \
looks and the highest risk patient, no need to give any extra text or information.";

/// User message: instruction, records as JSON, threshold context, output constraint.
pub fn user_prompt(
  records: &[MetricRecord],
  thresholds: &ThresholdTable,
) -> Result<String, SummaryError> {
  let data = serde_json::to_string(records)?;
  Ok(format!(
    "{ANALYSIS_INSTRUCTION}\n\nData:\n{data}\n\n\
     Risk thresholds:\n{thresholds}\n\n{OUTPUT_INSTRUCTION}"
  ))
}

pub fn build_request(
  records: &[MetricRecord],
  thresholds: &ThresholdTable,
  config: &SummaryConfig,
) -> Result<ChatRequest, SummaryError> {
  Ok(ChatRequest {
    model: config.model.clone(),
    messages: vec![
      ChatMessage::system(SYSTEM_PREAMBLE),
      ChatMessage::user(user_prompt(records, thresholds)?),
    ],
    max_tokens: config.max_tokens,
  })
}
