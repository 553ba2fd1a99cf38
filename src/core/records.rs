//! Control-character separated record formats.
//!
//! Commands whose output carries free text (subjects, author names, ref names) are
//! asked to emit fields separated by `0x1F` (unit separator) and records terminated
//! by `0x1E` (record separator). Neither byte can appear in a commit subject, so no
//! quoting is needed. The format strings and their parsers live side by side here.
//!
//! # Public API
//! - [`FIELD_SEP`], [`RECORD_SEP`]: the separators
//! - [`split_records`]: generic splitter that drops short records
//! - [`parse_date`], [`sentinel_date`]: tolerant ISO-8601 parsing
//! - `*_FORMAT` constants with matching `parse_*` functions for log, refs, tags,
//!   stashes, reflog and commit details
//!
//! None of the parsers fail: a record that cannot be read is logged and skipped.

use crate::core::git_status::GitStatus;
use crate::core::state::{
    BranchInfo, ChangedFile, CommitDetail, ParsedCommit, ReflogEntry, StashEntry, TagInfo,
    Timestamp,
};
use chrono::DateTime;
use std::path::PathBuf;

pub const FIELD_SEP: char = '\x1f';
pub const RECORD_SEP: char = '\x1e';

/// `git log --format`: hash, parents, author, author date, subject, decorations
pub const LOG_FORMAT: &str = "%H%x1f%P%x1f%an%x1f%aI%x1f%s%x1f%D%x1e";

/// `git for-each-ref --format`: full ref, short name, object, upstream, committer date
pub const REF_FORMAT: &str =
    "%(refname)%1f%(refname:short)%1f%(objectname)%1f%(upstream:short)%1f%(committerdate:iso-strict)%1e";

/// `git for-each-ref refs/tags --format`: name, object, peeled object, creator date
pub const TAG_FORMAT: &str =
    "%(refname:short)%1f%(objectname)%1f%(*objectname)%1f%(creatordate:iso-strict)%1e";

/// `git stash list --format`: hash, selector, subject, date
pub const STASH_FORMAT: &str = "%H%x1f%gd%x1f%gs%x1f%aI%x1e";

/// `git reflog show --format`: hash, selector, reflog subject, committer date
pub const REFLOG_FORMAT: &str = "%H%x1f%gD%x1f%gs%x1f%cI%x1e";

/// `git show -s --format`: full commit metadata with the raw body last
pub const DETAIL_FORMAT: &str = "%H%x1f%P%x1f%an%x1f%ae%x1f%aI%x1f%cn%x1f%cI%x1f%B%x1e";

/// The date substituted when git hands us something unparsable
pub fn sentinel_date() -> Timestamp {
    DateTime::<chrono::Utc>::MIN_UTC.fixed_offset()
}

/// Parse a strict ISO-8601 date (fractional seconds allowed), falling back to the sentinel
pub fn parse_date(text: &str) -> Timestamp {
    let text = text.trim();
    match DateTime::parse_from_rfc3339(text) {
        Ok(date) => date,
        Err(e) => {
            if !text.is_empty() {
                log::trace!("unparsable date {text:?}: {e}");
            }
            sentinel_date()
        }
    }
}

/// Split output into records of at least `min_fields` fields.
///
/// Newlines git adds between records are stripped from the front of each record.
/// Records with fewer fields are dropped; extra fields are kept.
pub fn split_records(output: &str, min_fields: usize) -> Vec<Vec<&str>> {
    output
        .split(RECORD_SEP)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .filter_map(|record| {
            let fields: Vec<&str> = record.split(FIELD_SEP).collect();
            if fields.len() < min_fields {
                log::trace!(
                    "dropping record with {} of {} fields: {:?}",
                    fields.len(),
                    min_fields,
                    record
                );
                None
            } else {
                Some(fields)
            }
        })
        .collect()
}

/// Split the `%D` list into individual decorations.
///
/// `HEAD -> main` yields `HEAD` and `main`; `tag: v1` and `refs/stash` are kept as is.
pub fn parse_decorations(text: &str) -> Vec<String> {
    let mut decorations = Vec::new();
    for part in text.split(", ").map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once(" -> ") {
            Some((head, target)) => {
                decorations.push(head.to_string());
                decorations.push(target.to_string());
            }
            None => decorations.push(part.to_string()),
        }
    }
    decorations
}

fn is_hash(text: &str) -> bool {
    text.len() >= 4 && text.bytes().all(|b| b.is_ascii_hexdigit())
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn parse_log(output: &str) -> Vec<ParsedCommit> {
    split_records(output, 6)
        .into_iter()
        .filter_map(|f| {
            if !is_hash(f[0]) {
                log::trace!("dropping log record with bad hash {:?}", f[0]);
                return None;
            }
            Some(ParsedCommit {
                hash: f[0].to_string(),
                parents: f[1].split_whitespace().map(str::to_string).collect(),
                author: f[2].to_string(),
                date: parse_date(f[3]),
                subject: f[4].to_string(),
                decorations: parse_decorations(f[5]),
            })
        })
        .collect()
}

/// Parse branches from `for-each-ref refs/heads refs/remotes`; other namespaces are skipped
pub fn parse_refs(output: &str) -> Vec<BranchInfo> {
    split_records(output, 5)
        .into_iter()
        .filter_map(|f| {
            let full_ref = f[0].trim();
            let is_remote = if full_ref.starts_with("refs/heads/") {
                false
            } else if full_ref.starts_with("refs/remotes/") {
                true
            } else {
                log::trace!("skipping ref outside branch namespaces: {full_ref}");
                return None;
            };
            Some(BranchInfo {
                name: f[1].to_string(),
                full_ref: full_ref.to_string(),
                head: f[2].to_string(),
                upstream: non_empty(f[3]),
                committer_date: parse_date(f[4]),
                is_remote,
            })
        })
        .collect()
}

pub fn parse_tags(output: &str) -> Vec<TagInfo> {
    split_records(output, 4)
        .into_iter()
        .map(|f| {
            let peeled = non_empty(f[2]);
            TagInfo {
                name: f[0].trim().to_string(),
                annotated: peeled.is_some(),
                target: peeled.unwrap_or_else(|| f[1].to_string()),
                date: parse_date(f[3]),
            }
        })
        .collect()
}

/// Index of a `stash@{n}` selector
fn stash_index(selector: &str) -> Option<usize> {
    selector
        .strip_prefix("stash@{")?
        .strip_suffix('}')?
        .parse()
        .ok()
}

pub fn parse_stashes(output: &str) -> Vec<StashEntry> {
    split_records(output, 4)
        .into_iter()
        .filter_map(|f| {
            let selector = f[1].trim();
            let index = stash_index(selector)?;
            Some(StashEntry {
                index,
                selector: selector.to_string(),
                hash: f[0].to_string(),
                subject: f[2].to_string(),
                date: parse_date(f[3]),
            })
        })
        .collect()
}

pub fn parse_reflog(output: &str) -> Vec<ReflogEntry> {
    split_records(output, 4)
        .into_iter()
        .map(|f| ReflogEntry {
            hash: f[0].to_string(),
            selector: f[1].to_string(),
            subject: f[2].to_string(),
            date: parse_date(f[3]),
        })
        .collect()
}

/// Parse `diff-tree --name-status -z` output.
///
/// Entries are NUL separated: a status token followed by one path, or by two paths
/// for renames and copies (`R100`, `C75`).
pub fn parse_name_status(output: &str) -> Vec<ChangedFile> {
    let mut files = Vec::new();
    let mut fields = output.split('\0').filter(|f| !f.is_empty());
    while let Some(token) = fields.next() {
        let token = token.trim();
        let Some(status) = token.chars().next().and_then(GitStatus::from_code) else {
            log::trace!("skipping unknown name-status token {token:?}");
            continue;
        };
        let entry = if matches!(status, GitStatus::Renamed | GitStatus::Copied) {
            match (fields.next(), fields.next()) {
                (Some(from), Some(to)) => ChangedFile {
                    status,
                    path: PathBuf::from(to),
                    original_path: Some(PathBuf::from(from)),
                },
                _ => break,
            }
        } else {
            match fields.next() {
                Some(path) => ChangedFile {
                    status,
                    path: PathBuf::from(path),
                    original_path: None,
                },
                None => break,
            }
        };
        files.push(entry);
    }
    files
}

/// Parse the `show -s` header record; `files` is left empty for the caller to fill
pub fn parse_commit_detail(output: &str) -> Option<CommitDetail> {
    let fields = split_records(output, 8).into_iter().next()?;
    if !is_hash(fields[0]) {
        return None;
    }
    Some(CommitDetail {
        hash: fields[0].to_string(),
        parents: fields[1].split_whitespace().map(str::to_string).collect(),
        author_name: fields[2].to_string(),
        author_email: fields[3].to_string(),
        author_date: parse_date(fields[4]),
        committer_name: fields[5].to_string(),
        committer_date: parse_date(fields[6]),
        message: fields[7].trim_end().to_string(),
        files: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const H1: &str = "1111111111111111111111111111111111111111";
    const H2: &str = "2222222222222222222222222222222222222222";
    const H3: &str = "3333333333333333333333333333333333333333";

    fn log_record(hash: &str, parents: &str, subject: &str, deco: &str) -> String {
        format!(
            "{hash}\x1f{parents}\x1fAda\x1f2024-03-01T10:00:00+01:00\x1f{subject}\x1f{deco}\x1e\n"
        )
    }

    #[test]
    fn test_parse_log_records() {
        let output = format!(
            "{}{}",
            log_record(H1, &format!("{H2} {H3}"), "Merge branch", "HEAD -> main, tag: v1"),
            log_record(H2, H3, "Second, with comma", "")
        );
        let commits = parse_log(&output);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].parents, vec![H2.to_string(), H3.to_string()]);
        assert_eq!(commits[0].decorations, vec!["HEAD", "main", "tag: v1"]);
        assert!(commits[0].is_head());
        assert_eq!(commits[1].subject, "Second, with comma");
        assert!(commits[1].decorations.is_empty());
        assert_eq!(commits[1].date.to_rfc3339(), "2024-03-01T10:00:00+01:00");
    }

    #[test]
    fn test_short_records_are_dropped() {
        let output = format!("{H1}\x1f{H2}\x1fonly three\x1e\n{}", log_record(H2, "", "root", ""));
        let commits = parse_log(&output);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].hash, H2);
        assert!(commits[0].parents.is_empty());
    }

    #[test]
    fn test_bad_date_uses_sentinel() {
        let output = format!("{H1}\x1f\x1fAda\x1fyesterday\x1fsubject\x1f\x1e");
        let commits = parse_log(&output);
        assert_eq!(commits[0].date, sentinel_date());
    }

    #[test]
    fn test_parse_date_fractional_seconds() {
        let date = parse_date("2024-03-01T10:00:00.250Z");
        assert_eq!(date.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_decorations_stash_and_detached() {
        assert_eq!(parse_decorations("HEAD"), vec!["HEAD"]);
        assert_eq!(parse_decorations("refs/stash"), vec!["refs/stash"]);
        assert_eq!(
            parse_decorations("HEAD -> feature/x, origin/feature/x"),
            vec!["HEAD", "feature/x", "origin/feature/x"]
        );
    }

    #[test]
    fn test_parse_refs() {
        let output = format!(
            "refs/heads/main\x1fmain\x1f{H1}\x1forigin/main\x1f2024-01-01T00:00:00Z\x1e\n\
             refs/remotes/origin/main\x1forigin/main\x1f{H1}\x1f\x1f2024-01-01T00:00:00Z\x1e\n\
             refs/tags/v1\x1fv1\x1f{H2}\x1f\x1f2024-01-01T00:00:00Z\x1e\n"
        );
        let refs = parse_refs(&output);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].upstream.as_deref(), Some("origin/main"));
        assert!(!refs[0].is_remote);
        assert!(refs[1].is_remote);
        assert_eq!(refs[1].upstream, None);
    }

    #[test]
    fn test_parse_tags_prefers_peeled() {
        let output = format!(
            "v1\x1f{H1}\x1f{H2}\x1f2024-01-01T00:00:00Z\x1e\nlight\x1f{H3}\x1f\x1f2024-01-01T00:00:00Z\x1e\n"
        );
        let tags = parse_tags(&output);
        assert_eq!(tags[0].target, H2);
        assert!(tags[0].annotated);
        assert_eq!(tags[1].target, H3);
        assert!(!tags[1].annotated);
    }

    #[test]
    fn test_parse_stashes() {
        let output = format!(
            "{H1}\x1fstash@{{0}}\x1fWIP on main: abc\x1f2024-01-01T00:00:00Z\x1e\n\
             {H2}\x1fbogus\x1fdropped\x1f2024-01-01T00:00:00Z\x1e\n"
        );
        let stashes = parse_stashes(&output);
        assert_eq!(stashes.len(), 1);
        assert_eq!(stashes[0].index, 0);
        assert_eq!(stashes[0].selector, "stash@{0}");
    }

    #[test]
    fn test_parse_reflog() {
        let output = format!("{H1}\x1fHEAD@{{0}}\x1fcommit: add x\x1f2024-01-01T00:00:00Z\x1e\n");
        let entries = parse_reflog(&output);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].selector, "HEAD@{0}");
        assert_eq!(entries[0].subject, "commit: add x");
    }

    #[test]
    fn test_parse_name_status_with_rename() {
        let output = "M\0src/lib.rs\0R100\0old.txt\0new.txt\0A\0added.txt\0";
        let files = parse_name_status(output);
        assert_eq!(files.len(), 3);
        assert_eq!(files[1].status, GitStatus::Renamed);
        assert_eq!(files[1].path, PathBuf::from("new.txt"));
        assert_eq!(files[1].original_path, Some(PathBuf::from("old.txt")));
        assert_eq!(files[2].status, GitStatus::Added);
    }

    #[test]
    fn test_parse_commit_detail() {
        let output = format!(
            "{H1}\x1f{H2}\x1fAda\x1fada@example.com\x1f2024-01-01T00:00:00Z\x1fBob\x1f2024-01-02T00:00:00Z\x1fSubject\n\nBody text\n\x1e\n"
        );
        let detail = parse_commit_detail(&output).expect("detail");
        assert_eq!(detail.parents, vec![H2.to_string()]);
        assert_eq!(detail.committer_name, "Bob");
        assert_eq!(detail.message, "Subject\n\nBody text");
    }
}
