use std::collections::{BTreeSet, HashMap};

use log::debug;
use serde::Serialize;

use issuedigest_core::config::SummaryConfig;
use issuedigest_core::issue::{IssueCollection, IssueKind, IssueRecord};

pub mod human;
pub mod json;

/// Records sharing one issue type, in input order.
#[derive(Debug, Clone)]
pub struct IssueGroup<'a> {
    pub kind: IssueKind,
    pub records: Vec<&'a IssueRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GroupHighlight {
    /// Only the first `preview` names of the sorted distinct set are kept.
    AffectedTables { total: usize, preview: Vec<String> },
    SampleDetail { detail: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub issue_type: IssueKind,
    pub count: usize,
    pub highlight: GroupHighlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub total: usize,
    pub groups: Vec<GroupSummary>,
}

/// Partitions the collection by issue type, keeping first-seen order of types.
pub fn group_issues(collection: &IssueCollection) -> Vec<IssueGroup<'_>> {
    let mut groups: Vec<IssueGroup<'_>> = Vec::new();
    let mut index: HashMap<IssueKind, usize> = HashMap::new();

    for record in collection {
        let kind = record.kind();
        match index.get(&kind).copied() {
            Some(position) => groups[position].records.push(record),
            None => {
                index.insert(kind.clone(), groups.len());
                groups.push(IssueGroup {
                    kind,
                    records: vec![record],
                });
            }
        }
    }

    groups
}

impl IssueGroup<'_> {
    /// Sorted, de-duplicated `metadata.name` values across the group.
    pub fn affected_tables(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .filter_map(|record| record.metadata_name())
            .collect()
    }

    pub fn summarize(&self, options: &SummaryConfig) -> GroupSummary {
        let highlight = if self.kind.is_named(&options.table_listing_issue) {
            let tables = self.affected_tables();
            GroupHighlight::AffectedTables {
                total: tables.len(),
                preview: tables
                    .into_iter()
                    .take(options.table_preview_limit)
                    .map(str::to_string)
                    .collect(),
            }
        } else {
            GroupHighlight::SampleDetail {
                detail: self
                    .records
                    .first()
                    .and_then(|record| record.detail())
                    .map(|detail| detail.into_owned()),
            }
        };

        GroupSummary {
            issue_type: self.kind.clone(),
            count: self.records.len(),
            highlight,
        }
    }
}

impl IssueSummary {
    pub fn from_collection(collection: &IssueCollection, options: &SummaryConfig) -> Self {
        let groups: Vec<GroupSummary> = group_issues(collection)
            .iter()
            .map(|group| group.summarize(options))
            .collect();
        debug!(
            "summarized {} issues into {} groups",
            collection.len(),
            groups.len()
        );
        Self {
            total: collection.len(),
            groups,
        }
    }

    pub fn human_summary(&self) -> String {
        human::render_text(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(json: &str) -> IssueCollection {
        IssueCollection::from_json_str(json).unwrap()
    }

    fn rls_issue(table: &str) -> String {
        format!(
            r#"{{"name":"policy_exists_rls_disabled","detail":"Table public.{table} has policies","metadata":{{"name":"{table}","schema":"public"}}}}"#
        )
    }

    #[test]
    fn test_group_order_follows_first_occurrence() {
        let issues = collection(
            r#"[{"name":"b"},{"name":"a"},{"name":"b"},{"name":"c"},{"name":"a"}]"#,
        );

        let groups = group_issues(&issues);
        let kinds: Vec<_> = groups.iter().map(|group| group.kind.to_string()).collect();
        let sizes: Vec<_> = groups.iter().map(|group| group.records.len()).collect();

        assert_eq!(kinds, vec!["b", "a", "c"]);
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_grouping_is_lossless() {
        let issues = collection(
            r#"[{"name":"x"},{"detail":"no name"},{"name":"y"},{"name":"x"},{"name":null}]"#,
        );

        let groups = group_issues(&issues);
        let total: usize = groups.iter().map(|group| group.records.len()).sum();

        assert_eq!(total, issues.len());
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].kind, IssueKind::Missing);
        assert_eq!(groups[1].records.len(), 2);
    }

    #[test]
    fn test_groups_by_name_value_not_text() {
        let issues = collection(r#"[{"name":42},{"name":"42"},{"name":"null"},{}]"#);

        let groups = group_issues(&issues);
        let kinds: Vec<_> = groups.iter().map(|group| group.kind.clone()).collect();

        assert_eq!(
            kinds,
            vec![
                IssueKind::Other(serde_json::Value::from(42)),
                IssueKind::Named("42".to_string()),
                IssueKind::Named("null".to_string()),
                IssueKind::Missing,
            ]
        );
        assert!(groups.iter().all(|group| group.records.len() == 1));
    }

    #[test]
    fn test_sample_detail_uses_first_record() {
        let issues = collection(
            r#"[{"name":"a","detail":"x"},{"name":"a","detail":"y"},{"name":"b","detail":"z"}]"#,
        );

        let summary = IssueSummary::from_collection(&issues, &SummaryConfig::default());

        assert_eq!(summary.total, 3);
        assert_eq!(
            summary.groups,
            vec![
                GroupSummary {
                    issue_type: IssueKind::Named("a".to_string()),
                    count: 2,
                    highlight: GroupHighlight::SampleDetail {
                        detail: Some("x".to_string())
                    },
                },
                GroupSummary {
                    issue_type: IssueKind::Named("b".to_string()),
                    count: 1,
                    highlight: GroupHighlight::SampleDetail {
                        detail: Some("z".to_string())
                    },
                },
            ]
        );
    }

    #[test]
    fn test_missing_first_detail_is_none() {
        let issues = collection(r#"[{"name":"a"},{"name":"a","detail":"later"}]"#);

        let summary = IssueSummary::from_collection(&issues, &SummaryConfig::default());

        assert_eq!(
            summary.groups[0].highlight,
            GroupHighlight::SampleDetail { detail: None }
        );
    }

    #[test]
    fn test_affected_tables_are_distinct_sorted_and_capped() {
        let tables = [
            "orders", "users", "audit", "orders", "payments", "gifts", "coins", "streams",
            "bans", "wallets", "ledger", "zones", "badges",
        ];
        let mut entries: Vec<String> = tables.iter().map(|table| rls_issue(table)).collect();
        entries.push(r#"{"name":"policy_exists_rls_disabled"}"#.to_string());
        entries.push(r#"{"name":"policy_exists_rls_disabled","metadata":{}}"#.to_string());
        let issues = collection(&format!("[{}]", entries.join(",")));

        let summary = IssueSummary::from_collection(&issues, &SummaryConfig::default());
        let group = &summary.groups[0];

        assert_eq!(group.count, 15);
        assert_eq!(
            group.highlight,
            GroupHighlight::AffectedTables {
                total: 12,
                preview: vec![
                    "audit", "badges", "bans", "coins", "gifts", "ledger", "orders",
                    "payments", "streams", "users",
                ]
                .into_iter()
                .map(str::to_string)
                .collect(),
            }
        );
    }

    #[test]
    fn test_affected_tables_below_limit() {
        let issues = collection(&format!("[{},{}]", rls_issue("users"), rls_issue("orders")));

        let summary = IssueSummary::from_collection(&issues, &SummaryConfig::default());

        assert_eq!(
            summary.groups[0].highlight,
            GroupHighlight::AffectedTables {
                total: 2,
                preview: vec!["orders".to_string(), "users".to_string()],
            }
        );
    }

    #[test]
    fn test_table_listing_issue_is_configurable() {
        let issues = collection(
            r#"[{"name":"rls_disabled_in_public","detail":"d","metadata":{"name":"t1"}}]"#,
        );
        let options = SummaryConfig {
            table_listing_issue: "rls_disabled_in_public".to_string(),
            table_preview_limit: 10,
        };

        let summary = IssueSummary::from_collection(&issues, &options);

        assert!(matches!(
            summary.groups[0].highlight,
            GroupHighlight::AffectedTables { total: 1, .. }
        ));
    }

    #[test]
    fn test_empty_collection() {
        let summary =
            IssueSummary::from_collection(&IssueCollection::default(), &SummaryConfig::default());
        assert_eq!(summary.total, 0);
        assert!(summary.groups.is_empty());
    }
}
