use std::io::Write;

use anyhow::Context;
use tracing::{debug, error, info, info_span, Instrument};
use transcript_parser::{parse_transcript, AuditResult};

use crate::config::{ParseArgs, RunArgs, RunConfig, UserConfig};
use crate::usecase::{check_min_mark, remove_first_line, AuditFetcher, ReportWriter};

/// `uat run`: upload the scenario, save the transcript, parse and check it.
///
/// Returns whether the audit is accepted.
pub async fn run(args: RunArgs) -> anyhow::Result<bool> {
    let file = match args.config.as_deref() {
        Some(path) => UserConfig::load(path)?,
        None => UserConfig::default(),
    };
    let config = RunConfig::resolve(args, file)?;
    let span = info_span!("audit", auditor = %config.auditor);
    run_audit(&config).instrument(span).await
}

async fn run_audit(config: &RunConfig) -> anyhow::Result<bool> {
    let fetcher = AuditFetcher::new(config.auditor_url.clone())?;
    info!("initiating {} at {}", config.auditor, fetcher.url());
    let response = fetcher.fetch(&config.scenario).await?;
    let transcript = remove_first_line(&response);

    let writer = ReportWriter::new(&config.out);
    let transcript_path = writer.write_transcript(transcript).await?;

    debug!("parsing audit");
    let result = parse_transcript(transcript).with_context(|| {
        format!(
            "could not interpret the audit transcript saved at {}",
            transcript_path.display()
        )
    })?;
    writer.write_result(&result).await?;

    let accepted = accept(config.check_min_mark, &result);
    info!("audit {} finished, quitting", result.audit_id);
    Ok(accepted)
}

/// `uat parse`: parse a transcript file and emit its JSON form.
pub async fn parse(args: ParseArgs) -> anyhow::Result<bool> {
    let text = tokio::fs::read_to_string(&args.transcript)
        .await
        .with_context(|| format!("could not read transcript {}", args.transcript.display()))?;
    let result = parse_transcript(&text)
        .with_context(|| format!("could not interpret transcript {}", args.transcript.display()))?;

    let json = serde_json::to_string_pretty(&result).context("could not serialize audit result")?;
    match &args.json {
        Some(path) => {
            tokio::fs::write(path, &json)
                .await
                .with_context(|| format!("could not write {}", path.display()))?;
            info!("wrote audit {} to {}", result.audit_id, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("could not write to stdout")?;
        }
    }

    Ok(accept(args.check_min_mark, &result))
}

/// A crashed audit is never accepted; otherwise only a configured minimum
/// mark can reject it.
fn accept(min_mark: Option<f64>, result: &AuditResult) -> bool {
    match min_mark {
        Some(min_mark) => check_min_mark(min_mark, result).is_success(),
        None if result.is_error() => {
            error!(
                "audit {} failed:\n{}",
                result.audit_id,
                result.stack_trace().unwrap_or_default()
            );
            false
        }
        None => true,
    }
}
