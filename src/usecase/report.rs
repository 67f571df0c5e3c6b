use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;
use transcript_parser::AuditResult;

const TRANSCRIPT_FILE: &str = "accessibilityResult.txt";
const RESULT_FILE: &str = "accessibilityResult.json";

/// Writes audit reports into one output folder.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    out: PathBuf,
}

impl ReportWriter {
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self { out: out.into() }
    }

    pub fn transcript_path(&self) -> PathBuf {
        self.out.join(TRANSCRIPT_FILE)
    }

    pub fn result_path(&self) -> PathBuf {
        self.out.join(RESULT_FILE)
    }

    /// Save the raw transcript, before any parsing happens.
    pub async fn write_transcript(&self, transcript: &str) -> anyhow::Result<PathBuf> {
        let path = self.transcript_path();
        self.write(&path, transcript.as_bytes()).await?;
        info!("created accessibility report at {}", path.display());
        Ok(path)
    }

    /// Save the parsed result as pretty-printed JSON.
    pub async fn write_result(&self, result: &AuditResult) -> anyhow::Result<PathBuf> {
        let path = self.result_path();
        let json = serde_json::to_vec_pretty(result).context("could not serialize audit result")?;
        self.write(&path, &json).await?;
        info!("created accessibility result at {}", path.display());
        Ok(path)
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.out)
            .await
            .with_context(|| format!("could not create report folder {}", self.out.display()))?;
        tokio::fs::write(path, contents)
            .await
            .with_context(|| format!("error when trying to create report file at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use transcript_parser::parse_transcript;

    const TRANSCRIPT: &str = "Audit terminated with success at 2016-10-10 09:20:29.0\n\
                              Audit Id : 32\n\
                              java.lang.NullPointerException\n\
                              crash (id+message): 32 java.lang.NullPointerException\n";

    #[tokio::test]
    async fn test_write_transcript_creates_folder() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path().join("report"));

        let path = writer.write_transcript(TRANSCRIPT).await.unwrap();
        assert_eq!(path, dir.path().join("report").join("accessibilityResult.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), TRANSCRIPT);
    }

    #[tokio::test]
    async fn test_write_result_as_json() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path());
        let result = parse_transcript(TRANSCRIPT).unwrap();

        let path = writer.write_result(&result).await.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["auditId"], 32);
        assert_eq!(json["error"], true);
        assert_eq!(json["stackTrace"], "java.lang.NullPointerException");
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let writer = ReportWriter::new(&blocker);
        assert!(writer.write_transcript(TRANSCRIPT).await.is_err());
    }
}
