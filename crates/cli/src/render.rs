//! Output rendering for status records.

use std::io::{self, Write};

use metadata::PortableStat;
use offload::{OffloadError, StatOp};
#[cfg(feature = "json")]
use offload::Syscall;

/// How records are written to stdout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// One `name=value` line per operand, fields in their stable order.
    #[default]
    Text,
    /// One JSON object per operand and line.
    #[cfg(feature = "json")]
    Json,
}

impl OutputFormat {
    /// The JSON format, when this build includes it.
    pub const fn json() -> Option<Self> {
        #[cfg(feature = "json")]
        let format = Some(Self::Json);
        #[cfg(not(feature = "json"))]
        let format = None;
        format
    }

    /// Whether failed operands also get a record on stdout.
    pub const fn reports_failures(self) -> bool {
        match self {
            Self::Text => false,
            #[cfg(feature = "json")]
            Self::Json => true,
        }
    }
}

#[cfg(feature = "json")]
const fn syscall_of(op: &StatOp) -> Syscall {
    match op {
        StatOp::Stat(_) => Syscall::Stat,
        StatOp::Lstat(_) => Syscall::Lstat,
        StatOp::Fstat(_) => Syscall::Fstat,
    }
}

/// Renders one record as a text line, without the trailing newline.
pub(crate) fn text_line(label: &str, status: &PortableStat) -> String {
    format!(
        "{label}: dev={} ino={} kind={} perm={:04o} nlink={} uid={} gid={} rdev={} size={} atime={:.9} mtime={:.9} ctime={:.9}",
        status.dev,
        status.ino,
        status.kind,
        status.perm,
        status.nlink,
        status.uid,
        status.gid,
        status.rdev,
        status.size.value(),
        status.atime,
        status.mtime,
        status.ctime,
    )
}

#[cfg_attr(not(feature = "json"), allow(unused_variables))]
pub(crate) fn write_status<W: Write>(
    out: &mut W,
    format: OutputFormat,
    label: &str,
    op: &StatOp,
    status: &PortableStat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", text_line(label, status)),
        #[cfg(feature = "json")]
        OutputFormat::Json => {
            let record = serde_json::json!({
                "operand": label,
                "syscall": syscall_of(op).name(),
                "status": status,
            });
            writeln!(out, "{record}")
        }
    }
}

/// Text output reports failures on stderr only; `out` gets nothing.
#[cfg_attr(not(feature = "json"), allow(unused_variables))]
pub(crate) fn write_failure<W: Write>(
    out: &mut W,
    format: OutputFormat,
    label: &str,
    op: &StatOp,
    error: &OffloadError,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => Ok(()),
        #[cfg(feature = "json")]
        OutputFormat::Json => {
            let code = error.as_syscall().map(offload::StatError::code);
            let record = serde_json::json!({
                "operand": label,
                "syscall": syscall_of(op).name(),
                "error": {
                    "code": code,
                    "message": error.to_string(),
                },
            });
            writeln!(out, "{record}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadata::{FileKind, FileSize, SizeWidth};

    fn sample() -> PortableStat {
        PortableStat {
            dev: 1,
            ino: 2,
            kind: FileKind::Fifo,
            perm: 0o644,
            nlink: 1,
            uid: 0,
            gid: 0,
            rdev: 0,
            size: FileSize::new(12, SizeWidth::Narrow),
            atime: 10.5,
            mtime: 11.0,
            ctime: 12.25,
        }
    }

    #[test]
    fn text_line_lists_fields_in_order() {
        let line = text_line("pipe", &sample());
        assert_eq!(
            line,
            "pipe: dev=1 ino=2 kind=fifo perm=0644 nlink=1 uid=0 gid=0 rdev=0 size=12 \
             atime=10.500000000 mtime=11.000000000 ctime=12.250000000"
        );
    }

    #[test]
    fn text_status_is_one_line() {
        let mut out = Vec::new();
        write_status(
            &mut out,
            OutputFormat::Text,
            "pipe",
            &StatOp::Lstat("pipe".into()),
            &sample(),
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n", text_line("pipe", &sample()))
        );
    }

    #[test]
    fn text_format_skips_failures() {
        let mut out = Vec::new();
        let error = OffloadError::PoolShutdown;
        write_failure(&mut out, OutputFormat::Text, "x", &StatOp::Fstat(1), &error).unwrap();
        assert!(out.is_empty());
        assert!(!OutputFormat::Text.reports_failures());
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_record_nests_status() {
        let mut out = Vec::new();
        write_status(
            &mut out,
            OutputFormat::Json,
            "fd:3",
            &StatOp::Fstat(3),
            &sample(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["operand"], "fd:3");
        assert_eq!(value["syscall"], "fstat");
        assert_eq!(value["status"]["kind"], "fifo");
        assert_eq!(value["status"]["size"], 12);
        assert_eq!(value["status"]["perm"], 0o644);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_failure_carries_errno() {
        let mut out = Vec::new();
        let error = OffloadError::from(offload::StatError::with_path(
            Syscall::Stat,
            2,
            "/missing",
        ));
        write_failure(
            &mut out,
            OutputFormat::Json,
            "/missing",
            &StatOp::Stat("/missing".into()),
            &error,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["error"]["code"], 2);
        assert!(
            value["error"]["message"]
                .as_str()
                .unwrap()
                .starts_with("stat '/missing'")
        );
    }
}
