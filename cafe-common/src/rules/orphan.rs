//! Orphan-file batch validation
//!
//! An orphan file is a media object that exists with the storage provider
//! but is referenced by no domain record. Reconciliation jobs report them in
//! batches of four parallel lists; a batch is accepted whole or not at all.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. parallel lists share one length
//! 2. no URL repeats within the batch
//! 3. every file type and domain resolves strictly
//! 4. at most [`MAX_ORPHAN_BATCH`] entries
//! 5. no URL already has a live (not hard-deleted) history record

use crate::error::RuleViolation;
use crate::types::{FileDomain, FileType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum entries accepted in one orphan-file batch
pub const MAX_ORPHAN_BATCH: usize = 10;

/// Answers whether URLs already have live orphan-file history
pub trait ExistingUrlChecker {
    /// First URL of `urls` that is already recorded, if any
    fn first_recorded<'a>(&self, urls: &'a [String]) -> Option<&'a str>;
}

/// A set of already-recorded URLs, typically fetched inside the caller's
/// transaction
impl ExistingUrlChecker for HashSet<String> {
    fn first_recorded<'a>(&self, urls: &'a [String]) -> Option<&'a str> {
        urls.iter().find(|url| self.contains(*url)).map(String::as_str)
    }
}

/// Per-URL predicate
impl<F> ExistingUrlChecker for F
where
    F: Fn(&str) -> bool,
{
    fn first_recorded<'a>(&self, urls: &'a [String]) -> Option<&'a str> {
        urls.iter().map(String::as_str).find(|&url| self(url))
    }
}

/// History row to be persisted for one orphan file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrphanFileHistory {
    pub file_name: String,
    pub file_type: FileType,
    pub domain: FileDomain,
    pub url: String,
    pub is_hard_deleted: bool,
}

/// Validate a reported batch and build its history rows
pub fn validate_and_build_orphan_batch<C>(
    file_names: &[String],
    file_types: &[String],
    domains: &[String],
    urls: &[String],
    existing: &C,
) -> Result<Vec<NewOrphanFileHistory>, RuleViolation>
where
    C: ExistingUrlChecker + ?Sized,
{
    let len = urls.len();
    if file_names.len() != len || file_types.len() != len || domains.len() != len {
        return Err(RuleViolation::MismatchedOrphanFields {
            file_names: file_names.len(),
            file_types: file_types.len(),
            domains: domains.len(),
            urls: len,
        });
    }

    let mut seen = HashSet::with_capacity(len);
    if let Some(url) = urls.iter().find(|url| !seen.insert(url.as_str())) {
        return Err(RuleViolation::DuplicateRequestFile { url: url.clone() });
    }

    let mut resolved = Vec::with_capacity(len);
    for (file_type, domain) in file_types.iter().zip(domains) {
        let file_type = FileType::parse(file_type)
            .ok_or_else(|| RuleViolation::IllegalFileType(file_type.clone()))?;
        let domain =
            FileDomain::parse(domain).ok_or_else(|| RuleViolation::IllegalDomain(domain.clone()))?;
        resolved.push((file_type, domain));
    }

    if len > MAX_ORPHAN_BATCH {
        return Err(RuleViolation::TooManyOrphanFiles {
            count: len,
            max: MAX_ORPHAN_BATCH,
        });
    }

    if let Some(url) = existing.first_recorded(urls) {
        return Err(RuleViolation::DuplicateOrphanFile {
            url: url.to_string(),
        });
    }

    Ok(file_names
        .iter()
        .zip(urls)
        .zip(resolved)
        .map(|((file_name, url), (file_type, domain))| NewOrphanFileHistory {
            file_name: file_name.clone(),
            file_type,
            domain,
            url: url.clone(),
            is_hard_deleted: false,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Batch {
        file_names: Vec<String>,
        file_types: Vec<String>,
        domains: Vec<String>,
        urls: Vec<String>,
    }

    impl Batch {
        fn valid(n: usize) -> Self {
            Self {
                file_names: (0..n).map(|i| format!("file-{i}.png")).collect(),
                file_types: vec!["image".to_string(); n],
                domains: vec!["review".to_string(); n],
                urls: (0..n).map(|i| format!("https://cdn.example/review/file-{i}.png")).collect(),
            }
        }

        fn run<C: ExistingUrlChecker + ?Sized>(
            &self,
            existing: &C,
        ) -> Result<Vec<NewOrphanFileHistory>, RuleViolation> {
            validate_and_build_orphan_batch(
                &self.file_names,
                &self.file_types,
                &self.domains,
                &self.urls,
                existing,
            )
        }
    }

    fn nothing_recorded() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_valid_batch_builds_live_records() {
        let mut batch = Batch::valid(2);
        batch.file_types[1] = "videos".to_string();
        batch.domains[1] = "members".to_string();

        let records = batch.run(&nothing_recorded()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_type, FileType::Image);
        assert_eq!(records[0].domain, FileDomain::Review);
        assert_eq!(records[1].file_type, FileType::Video);
        assert_eq!(records[1].domain, FileDomain::Member);
        assert_eq!(records[1].file_name, "file-1.png");
        assert!(records.iter().all(|r| !r.is_hard_deleted));
    }

    #[test]
    fn test_duplicate_url_in_batch_rejected_before_anything_else() {
        let mut batch = Batch::valid(12);
        batch.urls[5] = batch.urls[2].clone();
        batch.file_types[0] = "illegalType".to_string();
        batch.domains[1] = "illegalDomain".to_string();

        let err = batch.run(&nothing_recorded()).unwrap_err();
        assert_eq!(
            err,
            RuleViolation::DuplicateRequestFile {
                url: batch.urls[2].clone()
            }
        );
    }

    #[test]
    fn test_illegal_file_type_rejected() {
        let mut batch = Batch::valid(3);
        batch.file_types[1] = "illegalType".to_string();

        let err = batch.run(&nothing_recorded()).unwrap_err();
        assert_eq!(err, RuleViolation::IllegalFileType("illegalType".to_string()));
    }

    #[test]
    fn test_illegal_domain_rejected() {
        let mut batch = Batch::valid(3);
        batch.domains[2] = "Review".to_string();

        let err = batch.run(&nothing_recorded()).unwrap_err();
        assert_eq!(err, RuleViolation::IllegalDomain("Review".to_string()));
    }

    #[test]
    fn test_illegal_type_reported_before_batch_size() {
        let mut batch = Batch::valid(11);
        batch.file_types[10] = "gif".to_string();

        let err = batch.run(&nothing_recorded()).unwrap_err();
        assert_eq!(err, RuleViolation::IllegalFileType("gif".to_string()));
    }

    #[test]
    fn test_ten_entries_accepted() {
        assert_eq!(Batch::valid(10).run(&nothing_recorded()).unwrap().len(), 10);
    }

    #[test]
    fn test_eleven_entries_rejected() {
        let err = Batch::valid(11).run(&nothing_recorded()).unwrap_err();
        assert_eq!(err, RuleViolation::TooManyOrphanFiles { count: 11, max: 10 });
    }

    #[test]
    fn test_recorded_url_rejected() {
        let batch = Batch::valid(3);
        let recorded: HashSet<String> = [batch.urls[1].clone()].into_iter().collect();

        let err = batch.run(&recorded).unwrap_err();
        assert_eq!(
            err,
            RuleViolation::DuplicateOrphanFile {
                url: batch.urls[1].clone()
            }
        );
    }

    #[test]
    fn test_closure_checker() {
        let batch = Batch::valid(2);
        let target = batch.urls[0].clone();
        let checker = move |url: &str| url == target;

        assert_eq!(checker.first_recorded(&batch.urls), Some(batch.urls[0].as_str()));
        assert!(matches!(
            batch.run(&checker),
            Err(RuleViolation::DuplicateOrphanFile { .. })
        ));
    }

    #[test]
    fn test_size_checked_before_storage() {
        let batch = Batch::valid(11);
        let everything = |_: &str| true;

        assert!(matches!(
            batch.run(&everything),
            Err(RuleViolation::TooManyOrphanFiles { .. })
        ));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let mut batch = Batch::valid(3);
        batch.domains.pop();

        let err = batch.run(&nothing_recorded()).unwrap_err();
        assert_eq!(
            err,
            RuleViolation::MismatchedOrphanFields {
                file_names: 3,
                file_types: 3,
                domains: 2,
                urls: 3,
            }
        );
    }

    #[test]
    fn test_empty_batch_is_empty() {
        assert!(Batch::valid(0).run(&nothing_recorded()).unwrap().is_empty());
    }
}
