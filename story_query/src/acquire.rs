//! Data acquisition - reading both resources and building the catalog.
//!
//! The primary story resource is required; any failure there aborts
//! loading. The auxiliary link resource is optional: if it cannot be read
//! or parsed the catalog is built anyway with every link field absent.

use std::path::Path;

use serde_json::Value;
use story_catalog::{DataSources, Story, WikisourceLink};

use crate::catalog::Catalog;
use crate::error::{AcquisitionError, DegradedJoin};

/// What became of the auxiliary resource.
enum Auxiliary<'a> {
    Loaded(&'a [u8]),
    Failed(DegradedJoin),
}

/// Decode the primary payload into stories.
pub fn parse_stories(bytes: &[u8]) -> Result<Vec<Story>, AcquisitionError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Array(records) = value else {
        return Err(AcquisitionError::NotAnArray);
    };
    records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            Story::from_json(record).map_err(|source| AcquisitionError::InvalidRecord { position, source })
        })
        .collect()
}

/// Decode the auxiliary payload row by row. Only a payload that is not a
/// JSON array is rejected; rows without a usable `index` are skipped.
pub fn parse_links(bytes: &[u8]) -> Result<Vec<WikisourceLink>, DegradedJoin> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| DegradedJoin::Malformed(e.to_string()))?;
    let Value::Array(rows) = value else {
        return Err(DegradedJoin::Malformed("link data must be a JSON array".to_string()));
    };
    let links: Vec<WikisourceLink> = rows.iter().filter_map(WikisourceLink::from_json).collect();
    if links.len() < rows.len() {
        tracing::debug!(skipped = rows.len() - links.len(), "link rows without an integer index");
    }
    Ok(links)
}

fn assemble(primary: &[u8], auxiliary: Auxiliary<'_>) -> Result<Catalog, AcquisitionError> {
    let stories = parse_stories(primary)?;
    let links = match auxiliary {
        Auxiliary::Loaded(bytes) => parse_links(bytes),
        Auxiliary::Failed(reason) => Err(reason),
    };
    Ok(match links {
        Ok(links) => Catalog::new(stories, &links),
        Err(reason) => Catalog::degraded(stories, reason),
    })
}

/// Build a catalog from raw payloads. A missing or malformed auxiliary
/// payload degrades the join; a malformed primary payload is an error.
pub fn load_and_join(primary: &[u8], auxiliary: Option<&[u8]>) -> Result<Catalog, AcquisitionError> {
    let auxiliary = match auxiliary {
        Some(bytes) => Auxiliary::Loaded(bytes),
        None => Auxiliary::Failed(DegradedJoin::NotProvided),
    };
    assemble(primary, auxiliary)
}

/// Read both resources concurrently and build the catalog.
pub async fn acquire(sources: &DataSources) -> Result<Catalog, AcquisitionError> {
    let (primary, auxiliary) = tokio::join!(
        tokio::fs::read(&sources.stories),
        tokio::fs::read(&sources.wikisource),
    );

    match (primary, auxiliary) {
        (Ok(primary), Ok(auxiliary)) => assemble(&primary, Auxiliary::Loaded(&auxiliary)),
        (Ok(primary), Err(err)) => {
            let reason = DegradedJoin::Unreachable(describe(&sources.wikisource, &err));
            assemble(&primary, Auxiliary::Failed(reason))
        }
        // Links alone are useless without stories to attach them to.
        (Err(source), _) => Err(AcquisitionError::Unreachable {
            path: sources.stories.clone(),
            source,
        }),
    }
}

/// Blocking wrapper around [`acquire`] for synchronous callers.
pub fn acquire_blocking(sources: &DataSources) -> Result<Catalog, AcquisitionError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AcquisitionError::Runtime)?;
    runtime.block_on(acquire(sources))
}

fn describe(path: &Path, err: &std::io::Error) -> String {
    format!("{}: {}", path.display(), err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JoinStatus;
    use story_catalog::RecordError;

    const STORIES: &str = r#"[
        {"index": 1, "title": "The Open Window", "rating_story": 5, "darkness_level": 2, "theme_hoax_practical_joke": true},
        {"index": 2, "title": "Tobermory", "rating_story": 4, "darkness_level": 3}
    ]"#;

    const LINKS: &str = r#"[
        {"index": 1, "wikisource_url": "https://en.wikisource.org/wiki/The_Open_Window", "wikisource_title": "The Open Window"}
    ]"#;

    #[test]
    fn test_load_and_join_complete() {
        let catalog = load_and_join(STORIES.as_bytes(), Some(LINKS.as_bytes())).unwrap();
        assert_eq!(catalog.join_status(), &JoinStatus::Complete);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.stories()[0].has_wikisource());
        assert!(!catalog.stories()[1].has_wikisource());
        assert_eq!(catalog.theme_keys(), ["theme_hoax_practical_joke"]);
    }

    #[test]
    fn test_load_and_join_without_links() {
        let catalog = load_and_join(STORIES.as_bytes(), None).unwrap();
        assert_eq!(
            catalog.join_status(),
            &JoinStatus::Degraded(DegradedJoin::NotProvided)
        );
        assert!(catalog.stories().iter().all(|s| s.wikisource_url.is_none()));
    }

    #[test]
    fn test_malformed_links_degrade() {
        let catalog = load_and_join(STORIES.as_bytes(), Some(&b"{not json"[..])).unwrap();
        assert!(matches!(
            catalog.join_status(),
            JoinStatus::Degraded(DegradedJoin::Malformed(_))
        ));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_bad_link_row_keeps_the_others() {
        let links = r#"[
            {"index": 1, "wikisource_url": "https://w/1", "wikisource_title": "The Open Window"},
            {"index": null, "wikisource_url": "https://w/x"},
            {"index": 2, "wikisource_url": false, "wikisource_title": 7}
        ]"#;
        let catalog = load_and_join(STORIES.as_bytes(), Some(links.as_bytes())).unwrap();
        assert_eq!(catalog.join_status(), &JoinStatus::Complete);
        assert_eq!(catalog.stories()[0].wikisource_url.as_deref(), Some("https://w/1"));
        assert_eq!(catalog.stories()[1].wikisource_url, None);
        assert_eq!(catalog.stories()[1].wikisource_title, None);
    }

    #[test]
    fn test_links_not_an_array_degrade() {
        let catalog = load_and_join(STORIES.as_bytes(), Some(br#"{"index": 1}"#.as_slice())).unwrap();
        assert!(matches!(
            catalog.join_status(),
            JoinStatus::Degraded(DegradedJoin::Malformed(_))
        ));
    }

    #[test]
    fn test_malformed_primary_is_fatal() {
        assert!(matches!(
            load_and_join(b"[{", Some(LINKS.as_bytes())),
            Err(AcquisitionError::Malformed(_))
        ));
        assert!(matches!(
            load_and_join(b"{\"index\": 1}", None),
            Err(AcquisitionError::NotAnArray)
        ));
        assert!(matches!(
            load_and_join(br#"[{"index": 1}, {"title": "no index"}]"#, None),
            Err(AcquisitionError::InvalidRecord {
                position: 1,
                source: RecordError::MissingIndex
            })
        ));
    }

    fn write_sources(dir: &Path, links: Option<&str>) -> DataSources {
        let sources = DataSources {
            stories: dir.join("stories.json"),
            wikisource: dir.join("wikisource_urls.json"),
        };
        std::fs::write(&sources.stories, STORIES).unwrap();
        if let Some(links) = links {
            std::fs::write(&sources.wikisource, links).unwrap();
        }
        sources
    }

    #[tokio::test]
    async fn test_acquire_both_present() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), Some(LINKS));
        let catalog = acquire(&sources).await.unwrap();
        assert_eq!(catalog.join_status(), &JoinStatus::Complete);
        assert!(catalog.stories()[0].has_wikisource());
    }

    #[tokio::test]
    async fn test_acquire_links_missing() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), None);
        let catalog = acquire(&sources).await.unwrap();
        assert!(matches!(
            catalog.join_status(),
            JoinStatus::Degraded(DegradedJoin::Unreachable(_))
        ));
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_acquire_stories_missing() {
        let dir = tempfile::tempdir().unwrap();
        let sources = DataSources {
            stories: dir.path().join("absent.json"),
            wikisource: dir.path().join("also_absent.json"),
        };
        let err = acquire(&sources).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::Unreachable { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[tokio::test]
    async fn test_acquire_only_links_present_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let sources = DataSources {
            stories: dir.path().join("absent.json"),
            wikisource: dir.path().join("wikisource_urls.json"),
        };
        std::fs::write(&sources.wikisource, LINKS).unwrap();
        assert!(matches!(
            acquire(&sources).await,
            Err(AcquisitionError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_acquire_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), Some(LINKS));
        let catalog = acquire_blocking(&sources).unwrap();
        assert_eq!(catalog.len(), 2);
    }
}
