//! 消息格式化 - 把变更集合转换成文本

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::{RepoId, UpdateSet};

/// 时间戳统一使用 RFC 3339（UTC，秒精度）
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// 日志渠道的单行格式：`<id>\t: <timestamp>`
pub fn log_line(repo: &RepoId, updated_at: &DateTime<Utc>) -> String {
    format!("{}\t: {}", repo, format_timestamp(updated_at))
}

/// Webhook 渠道的单行格式
pub fn update_line(repo: &RepoId, updated_at: &DateTime<Utc>) -> String {
    format!("Repo {} was updated at {}", repo, format_timestamp(updated_at))
}

/// Webhook 消息正文，每个仓库一行，按仓库标识排序
pub fn format_updates(updates: &UpdateSet) -> String {
    updates
        .iter()
        .map(|(repo, updated_at)| update_line(repo, updated_at))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_log_line() {
        let repo = RepoId::new("owner/name").unwrap();
        assert_eq!(log_line(&repo, &ts()), "owner/name\t: 2015-03-01T12:30:00Z");
    }

    #[test]
    fn test_format_updates_sorted_one_line_each() {
        let updates = UpdateSet::from([
            (RepoId::new("zeta/z").unwrap(), ts()),
            (RepoId::new("alpha/a").unwrap(), ts()),
        ]);

        assert_eq!(
            format_updates(&updates),
            "Repo alpha/a was updated at 2015-03-01T12:30:00Z\n\
             Repo zeta/z was updated at 2015-03-01T12:30:00Z"
        );
    }

    #[test]
    fn test_format_updates_empty() {
        assert_eq!(format_updates(&UpdateSet::new()), "");
    }
}
