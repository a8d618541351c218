//! Append-only JSON log of completion exchanges, one file per event.

use crate::error::SessionLogError;
use crate::types::AnalysisItem;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Initial,
    Analyses,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Initial => "initial",
            LogKind::Analyses => "analyses",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry<'a> {
    pub client: IpAddr,
    pub question: &'a str,
    pub response: &'a str,
    pub kind: LogKind,
    pub analyses: Option<&'a [AnalysisItem]>,
}

// Key names are part of the on-disk format, including `reponse`.
#[derive(Serialize)]
struct LogRecord<'a> {
    ip: String,
    date: String,
    question: &'a str,
    reponse: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    analyses: Option<&'a [AnalysisItem]>,
}

#[derive(Debug, Clone)]
pub struct SessionLogger {
    dir: PathBuf,
}

impl SessionLogger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn log_now(&self, entry: &LogEntry<'_>) -> Result<PathBuf, SessionLogError> {
        self.log(entry, Local::now().naive_local()).await
    }

    /// Write `entry` stamped with `at`. An existing file with the same name is
    /// overwritten.
    pub async fn log(
        &self,
        entry: &LogEntry<'_>,
        at: NaiveDateTime,
    ) -> Result<PathBuf, SessionLogError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SessionLogError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;

        let client = canonical_ip(entry.client);
        let date = at.format(TIMESTAMP_FORMAT).to_string();
        let path = self.dir.join(file_name(&date, client, entry.kind));

        let record = LogRecord {
            ip: client.to_string(),
            date,
            question: entry.question,
            reponse: entry.response,
            analyses: match entry.kind {
                LogKind::Analyses => entry.analyses,
                LogKind::Initial => None,
            },
        };

        let payload = to_pretty_json(&record)?;
        tokio::fs::write(&path, payload)
            .await
            .map_err(|source| SessionLogError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), kind = entry.kind.as_str(), "session log written");
        Ok(path)
    }
}

/// `<YYYYMMDDHHmmss>_<address>_<kind>.json` with `.` and `:` in the address
/// replaced by `_`.
pub fn file_name(date: &str, client: IpAddr, kind: LogKind) -> String {
    let address = client.to_string().replace(['.', ':'], "_");
    format!("{date}_{address}_{}.json", kind.as_str())
}

fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_canonical(),
        v4 => v4,
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, SessionLogError> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}
