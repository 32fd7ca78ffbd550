// src/analyzer/report.rs
// The outcome of analyzing one page. Field names are the JSON keys.

use serde::{Deserialize, Serialize};

use super::headings::HeadingsCount;
use crate::probe::ProbeStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksCount {
    pub internal: usize,
    pub external: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub html_version: String,
    pub page_title: String,
    pub headings_count: HeadingsCount,
    pub links_count: LinksCount,
    /// Links whose probe failed or did not answer 2xx
    pub inaccessible_links_count: usize,
    pub has_login_form: bool,
    /// `cancelled` means inaccessible_links_count only covers finished probes
    pub probe_status: ProbeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_json_shape() {
        let report = Report {
            html_version: "HTML 5".to_string(),
            page_title: "Detective".to_string(),
            headings_count: HeadingsCount {
                h1: 1,
                ..HeadingsCount::default()
            },
            links_count: LinksCount {
                internal: 2,
                external: 1,
            },
            inaccessible_links_count: 1,
            has_login_form: false,
            probe_status: ProbeStatus::Complete,
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "html_version": "HTML 5",
                "page_title": "Detective",
                "headings_count": {"h1": 1, "h2": 0, "h3": 0, "h4": 0, "h5": 0, "h6": 0},
                "links_count": {"internal": 2, "external": 1},
                "inaccessible_links_count": 1,
                "has_login_form": false,
                "probe_status": "complete"
            })
        );
    }
}
