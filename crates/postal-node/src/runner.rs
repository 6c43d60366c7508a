//! JSON-lines replay of action requests.
//!
//! Each non-blank input line is one `ActionRequest`:
//!
//! ```text
//! {"sender":"3N...admin...","timestamp":1792238400000,"action":"init"}
//! {"sender":"3N...user...","timestamp":1792238401000,"params":[{"key":"action","type":"string","value":"register"},{"key":"name","type":"string","value":"Ivan"}]}
//! ```
//!
//! Lines starting with `#` are comments. Every executed line produces one JSON
//! result line on the output.

use anyhow::{Context, Result};
use postal_contract::{
    ActionOutcome, ActionRequest, ErrorKind, LedgerError, PostalContractService, StateBackend,
};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Totals for one replay.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Requests executed.
    pub executed: u64,
    /// Requests that succeeded.
    pub succeeded: u64,
    /// Requests rejected by the contract.
    pub rejected: u64,
}

/// One output line.
#[derive(Debug, Serialize)]
struct ReplayLine<'a> {
    line: usize,
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<ActionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RejectedAction>,
}

#[derive(Debug, Serialize)]
struct RejectedAction {
    kind: ErrorKind,
    message: String,
}

impl From<&LedgerError> for RejectedAction {
    fn from(err: &LedgerError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Replay every request in `input` and write one result line per request.
///
/// A malformed request line aborts the replay; a rejected action does not.
pub async fn replay<B, R, W>(
    service: &PostalContractService<B>,
    input: R,
    mut output: W,
) -> Result<ReplayReport>
where
    B: StateBackend + 'static,
    R: BufRead,
    W: Write,
{
    let mut report = ReplayReport::default();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let request: ActionRequest = serde_json::from_str(trimmed)
            .with_context(|| format!("Malformed action request on line {line_no}"))?;
        let action = request.action.clone();
        debug!(line = line_no, action = %action, "Replaying request");

        report.executed += 1;
        let result = service.execute(request).await;
        let record = match &result {
            Ok(outcome) => {
                report.succeeded += 1;
                ReplayLine {
                    line: line_no,
                    action: &action,
                    outcome: Some(outcome.clone()),
                    error: None,
                }
            }
            Err(err) => {
                report.rejected += 1;
                ReplayLine {
                    line: line_no,
                    action: &action,
                    outcome: None,
                    error: Some(RejectedAction::from(err)),
                }
            }
        };

        serde_json::to_writer(&mut output, &record).context("Failed to write result")?;
        writeln!(output).context("Failed to write result")?;
    }

    output.flush().context("Failed to flush output")?;
    info!(
        executed = report.executed,
        succeeded = report.succeeded,
        rejected = report.rejected,
        "Replay finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use postal_contract::{ContractConfig, InMemoryStateBackend};
    use serde_json::Value;

    const SCRIPT: &str = r#"
# genesis
{"sender":"3N...admin...","timestamp":1792238400000,"action":"init"}
{"sender":"3Nnew","timestamp":1792238401000,"params":[{"key":"action","type":"string","value":"register"},{"key":"name","type":"string","value":"Ivan"}]}
{"sender":"3Nnew","timestamp":1792238402000,"action":"register","params":[{"key":"name","type":"string","value":"Ivan"}]}
{"sender":"3Nnew","timestamp":1792238403000,"action":"getUserInfo","params":[{"key":"address","type":"string","value":"3Nnew"}]}
"#;

    fn service() -> PostalContractService<InMemoryStateBackend> {
        PostalContractService::new(InMemoryStateBackend::new(), ContractConfig::default()).unwrap()
    }

    fn output_lines(buf: &[u8]) -> Vec<Value> {
        std::str::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_replay_reports_each_request() {
        let service = service();
        let mut out = Vec::new();

        let report = replay(&service, SCRIPT.as_bytes(), &mut out).await.unwrap();

        assert_eq!(
            report,
            ReplayReport {
                executed: 4,
                succeeded: 3,
                rejected: 1,
            }
        );

        let lines = output_lines(&out);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["action"], "init");
        assert_eq!(lines[2]["error"]["kind"], "already_exists");
        assert_eq!(lines[3]["outcome"]["record"]["name"], "Ivan");
    }

    #[tokio::test]
    async fn test_malformed_line_aborts() {
        let service = service();
        let mut out = Vec::new();
        let input = "{\"sender\":\"3Nx\",\"timestamp\":1,\"action\":\"init\"}\nnot json\n";

        let err = replay(&service, input.as_bytes(), &mut out).await.unwrap_err();
        assert!(err.to_string().contains("line 2"));
        // The first line ran before the failure
        assert_eq!(output_lines(&out).len(), 1);
    }
}
