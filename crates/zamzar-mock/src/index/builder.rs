use super::{IndexError, PagedResponse, Paging};
use crate::catalog::{CatalogError, FixtureCatalog};
use crate::config::{IndexConfig, ResourceConfig};
use crate::metrics;
use crate::pagination::PageCoordinates;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, error};

/// Builds paged list responses for one resource type
pub struct IndexBuilder<'a> {
    catalog: &'a FixtureCatalog,
    resource: &'a ResourceConfig,
    index: &'a IndexConfig,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(
        catalog: &'a FixtureCatalog,
        resource: &'a ResourceConfig,
        index: &'a IndexConfig,
    ) -> Self {
        Self {
            catalog,
            resource,
            index,
        }
    }

    /// Compound names to render, one per identifier, in list order.
    ///
    /// Lifecycle suffixes are replaced by the index snapshot.
    pub fn snapshots(&self) -> Result<Vec<String>, IndexError> {
        let mut compounds: Vec<String> = self
            .catalog
            .list_identifiers(self.resource, true)?
            .into_iter()
            .collect();

        let ordering = &self.resource.ordering;
        compounds.sort_by(|a, b| {
            let (id_a, id_b) = (
                self.resource.base_identifier(a),
                self.resource.base_identifier(b),
            );
            ordering.compare(id_a, id_b).then_with(|| a.cmp(b))
        });

        let mut emitted = HashSet::new();
        let mut resolved = Vec::with_capacity(compounds.len());
        for compound in &compounds {
            let (id, suffix) = self.resource.split_compound(compound);
            if !emitted.insert(id.to_string()) {
                continue;
            }
            resolved.push(match suffix {
                Some(_) => format!("{}.{}", id, self.index.index_snapshot()),
                None => compound.clone(),
            });
        }
        Ok(resolved)
    }

    /// Every record that passes the index filter, in list order
    pub fn records(&self) -> Result<Vec<Value>, IndexError> {
        let mut records = Vec::new();
        for compound in self.snapshots()? {
            let record = match self.catalog.parse(self.resource, &compound) {
                Ok(record) => record,
                Err(CatalogError::NotFound(path)) => {
                    error!("Index {} has no snapshot {}", self.index.path, path);
                    return Err(IndexError::MissingSnapshot { path });
                }
                Err(e) => return Err(e.into()),
            };
            if self.index.filter.matches(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// One page of the listing
    pub fn build(&self, coordinates: &PageCoordinates) -> Result<PagedResponse, IndexError> {
        let records = self.records()?;
        let field = self.resource.ordering.field.as_str();
        let page = coordinates.apply_to(&records, field)?;

        debug!(
            "Index {} ({}) {}: {} of {} records",
            self.index.path,
            self.index.filter,
            coordinates,
            page.len(),
            records.len()
        );
        metrics::record_index_page(&self.index.path);

        Ok(PagedResponse {
            paging: Paging {
                total_count: records.len(),
                first: page.first().and_then(|r| r.get(field)).cloned(),
                last: page.last().and_then(|r| r.get(field)).cloned(),
                limit: coordinates.limit(),
            },
            data: page.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemorySource;
    use crate::config::{default_indexes, default_resources, Lifecycle};
    use crate::index::RecordFilter;
    use crate::pagination::{Anchor, OrderingSpec, PaginationError};
    use assert_json_diff::assert_json_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn resource(name: &str) -> ResourceConfig {
        default_resources()
            .into_iter()
            .find(|r| r.name == name)
            .unwrap()
    }

    fn index(path: &str) -> IndexConfig {
        default_indexes()
            .into_iter()
            .find(|i| i.path == path)
            .unwrap()
    }

    fn job(id: u32, status: &str) -> String {
        json!({"id": id, "status": status}).to_string()
    }

    fn jobs_catalog() -> FixtureCatalog {
        let source = InMemorySource::new()
            .with("jobs/1.initialising.json", job(1, "initialising"))
            .with("jobs/1.converting.json", job(1, "converting"))
            .with("jobs/1.completed.json", job(1, "successful"))
            .with("jobs/1.cancelled.json", job(1, "cancelled"))
            .with("jobs/2.initialising.json", job(2, "initialising"))
            .with("jobs/2.completed.json", job(2, "failed"))
            .with("jobs/10.initialising.json", job(10, "initialising"))
            .with("jobs/10.completed.json", job(10, "successful"));
        FixtureCatalog::new(Arc::new(source))
    }

    fn ids(response: &PagedResponse, field: &str) -> Vec<Value> {
        response.data.iter().map(|r| r[field].clone()).collect()
    }

    #[test]
    fn test_one_entry_per_identifier_in_numeric_order() {
        let catalog = jobs_catalog();
        let jobs = resource("jobs");
        let index = index("jobs");
        let builder = IndexBuilder::new(&catalog, &jobs, &index);

        assert_eq!(
            builder.snapshots().unwrap(),
            vec!["10.initialising", "2.initialising", "1.initialising"]
        );

        let response = builder.build(&PageCoordinates::default()).unwrap();
        assert_eq!(ids(&response, "id"), vec![json!(10), json!(2), json!(1)]);
        assert!(response.data.iter().all(|r| r["status"] == "initialising"));
    }

    #[test]
    fn test_filtered_index_counts_only_matches() {
        let catalog = jobs_catalog();
        let jobs = resource("jobs");
        let index = index("jobs/successful");
        let response = IndexBuilder::new(&catalog, &jobs, &index)
            .build(&PageCoordinates::default())
            .unwrap();

        assert_json_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "data": [
                    {"id": 10, "status": "successful"},
                    {"id": 1, "status": "successful"}
                ],
                "paging": {"total_count": 2, "first": 10, "last": 1, "limit": 50}
            })
        );
    }

    #[test]
    fn test_anchor_outside_filtered_records() {
        let catalog = jobs_catalog();
        let jobs = resource("jobs");
        let index = index("jobs/successful");
        let err = IndexBuilder::new(&catalog, &jobs, &index)
            .build(&PageCoordinates::with_anchor(Anchor::after("2")))
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::Pagination(PaginationError::AnchorNotFound(ref id)) if id == "2"
        ));
    }

    #[test]
    fn test_empty_page_omits_first_and_last() {
        let catalog = jobs_catalog();
        let jobs = resource("jobs");
        let index = index("jobs");
        let response = IndexBuilder::new(&catalog, &jobs, &index)
            .build(&PageCoordinates::with_anchor(Anchor::after("1")))
            .unwrap();

        assert!(response.data.is_empty());
        assert_json_eq!(
            serde_json::to_value(&response.paging).unwrap(),
            json!({"total_count": 3, "limit": 50})
        );
    }

    #[test]
    fn test_static_resource_with_dotted_names() {
        let source = InMemorySource::new()
            .with("formats/png.json", r#"{"name": "png"}"#)
            .with("formats/tar.gz.json", r#"{"name": "tar.gz"}"#)
            .with("formats/7z.json", r#"{"name": "7z"}"#);
        let catalog = FixtureCatalog::new(Arc::new(source));
        let formats = resource("formats");
        let index = index("formats");

        let response = IndexBuilder::new(&catalog, &formats, &index)
            .build(&PageCoordinates::new(Some(Anchor::after("7z")), Some(1)))
            .unwrap();
        assert_eq!(ids(&response, "name"), vec![json!("png")]);
        assert_eq!(response.paging.total_count, 3);
        assert_eq!(response.paging.first, Some(json!("png")));
    }

    #[test]
    fn test_sentinel_file_not_listed() {
        let source = InMemorySource::new()
            .with("files/0.json", r#"{"id": 0}"#)
            .with("files/1.json", r#"{"id": 1}"#)
            .with("files/2.json", r#"{"id": 2}"#);
        let catalog = FixtureCatalog::new(Arc::new(source));
        let files = resource("files");
        let index = index("files");

        let response = IndexBuilder::new(&catalog, &files, &index)
            .build(&PageCoordinates::default())
            .unwrap();
        assert_eq!(ids(&response, "id"), vec![json!(2), json!(1)]);
    }

    #[test]
    fn test_corrupt_fixture_fails_the_listing() {
        let source = InMemorySource::new()
            .with("files/1.json", r#"{"id": 1}"#)
            .with("files/2.json", "{ id: 2");
        let catalog = FixtureCatalog::new(Arc::new(source));
        let files = resource("files");
        let index = index("files");

        let err = IndexBuilder::new(&catalog, &files, &index)
            .build(&PageCoordinates::default())
            .unwrap_err();
        assert!(matches!(err, IndexError::Catalog(CatalogError::Corrupt { .. })));
    }

    #[test]
    fn test_missing_index_snapshot_fails_the_listing() {
        let source = InMemorySource::new()
            .with("jobs/1.initialising.json", job(1, "initialising"))
            .with("jobs/1.completed.json", job(1, "successful"))
            .with("jobs/2.initialising.json", job(2, "initialising"));
        let catalog = FixtureCatalog::new(Arc::new(source));
        let jobs = resource("jobs");
        let index = index("jobs/successful");

        let err = IndexBuilder::new(&catalog, &jobs, &index)
            .build(&PageCoordinates::default())
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::MissingSnapshot { ref path } if path.contains("2.completed")
        ));
    }

    #[test]
    fn test_numeric_ascending_scenario() {
        let source = InMemorySource::new();
        for id in 1..=100 {
            source.insert(format!("items/{id}.json"), json!({ "id": id }).to_string());
        }
        let catalog = FixtureCatalog::new(Arc::new(source));
        let items = ResourceConfig::new(
            "items",
            OrderingSpec::new(
                "id",
                crate::pagination::Direction::Ascending,
                crate::pagination::ComparisonKind::Numeric,
            ),
            Lifecycle::Static,
        );
        let index = IndexConfig::new("items", "items").with_filter(RecordFilter::AlwaysTrue);

        let response = IndexBuilder::new(&catalog, &items, &index)
            .build(&PageCoordinates::new(Some(Anchor::after("9")), Some(10)))
            .unwrap();
        assert_eq!(response.data.len(), 10);
        assert_eq!(response.paging.first, Some(json!(10)));
        assert_eq!(response.paging.last, Some(json!(19)));
        assert_eq!(response.paging.total_count, 100);
        assert_eq!(response.paging.limit, 10);
    }
}
