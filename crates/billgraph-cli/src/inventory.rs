//! Bill inventory client.
//!
//! Talks to the deepbills API: one JSON list of every (bill, version) pair,
//! then one fetch per bill whose JSON payload carries the bill XML in
//! `billbody`. The list endpoint is reliable; the per-bill endpoint times
//! out under load, so bill fetches retry a few times before giving up.

use anyhow::{anyhow, Context, Result};
use billgraph_ingest_xml::BillIdentity;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::thread;
use std::time::{Duration, Instant};

pub const BILL_LIST_URL: &str = "http://deepbills.cato.org/api/1/bills";
pub const BILL_API_URL: &str = "http://deepbills.cato.org/api/1/bill";

const HTTP_READ_TIMEOUT: Duration = Duration::from_secs(300);
const BILL_RETRY_COUNT: u32 = 5;
const BILL_RETRY_INTERVAL: Duration = Duration::from_secs(3);

/// One (bill, version) row of the inventory list.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryEntry {
    pub congress: u32,
    #[serde(rename = "billtype")]
    pub bill_type: String,
    #[serde(rename = "billnumber")]
    pub bill_number: u32,
    #[serde(rename = "billversion")]
    pub version: String,
    #[serde(rename = "commitdate")]
    pub commit_date: String,
}

impl InventoryEntry {
    pub fn identity(&self) -> BillIdentity {
        BillIdentity {
            congress: self.congress,
            bill_type: self.bill_type.clone(),
            bill_number: self.bill_number,
            version: self.version.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BillPayload {
    billbody: String,
}

/// Blocking inventory/bill client.
pub struct Inventory {
    client: reqwest::blocking::Client,
    list_url: String,
    bill_url: String,
}

impl Inventory {
    pub fn new() -> Result<Self> {
        Self::with_urls(BILL_LIST_URL.to_string(), BILL_API_URL.to_string())
    }

    /// Point the client somewhere else (tests, mirrors).
    pub fn with_urls(list_url: String, bill_url: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_READ_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            list_url,
            bill_url,
        })
    }

    /// Fetch the full inventory list.
    pub fn fetch_entries(&self) -> Result<Vec<InventoryEntry>> {
        let entries: Vec<InventoryEntry> = self
            .client
            .get(&self.list_url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("fetching bill list from {}", self.list_url))?
            .json()
            .context("decoding bill list")?;
        Ok(entries)
    }

    /// Fetch one bill's XML, retrying transient failures.
    pub fn fetch_bill_xml(&self, identity: &BillIdentity) -> Result<String> {
        let start = Instant::now();
        let mut last_err = None;
        for attempt in 1..=BILL_RETRY_COUNT {
            let sent = self
                .client
                .get(&self.bill_url)
                .query(&[
                    ("billnumber", identity.bill_number.to_string()),
                    ("billversion", identity.version.clone()),
                    ("congress", identity.congress.to_string()),
                    ("billtype", identity.bill_type.clone()),
                ])
                .send()
                .and_then(|r| r.error_for_status());
            match sent {
                Ok(response) => {
                    // A failing upstream sometimes answers with an HTML error
                    // page instead of JSON; that is not worth a retry.
                    let payload: BillPayload = response
                        .json()
                        .with_context(|| format!("decoding bill {}", identity.bill_number))?;
                    tracing::info!(
                        bill = identity.bill_number,
                        tries = attempt,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "fetched bill"
                    );
                    return Ok(payload.billbody);
                }
                Err(err) => {
                    tracing::debug!(bill = identity.bill_number, attempt, %err, "bill fetch failed");
                    last_err = Some(err);
                    if attempt < BILL_RETRY_COUNT {
                        thread::sleep(BILL_RETRY_INTERVAL);
                    }
                }
            }
        }
        Err(anyhow!(
            "bill fetch failed for bill number {} after {} tries: {}",
            identity.bill_number,
            BILL_RETRY_COUNT,
            last_err.map(|e| e.to_string()).unwrap_or_default()
        ))
    }
}

/// Reduce the inventory to the most recent version of each bill.
///
/// The list arrives roughly sorted by bill number and commit date, but that
/// is upstream behavior, not contract, so it is re-sorted here. With
/// `exclude_intros`, versions tagged `i*` do not participate at all (an
/// earlier non-introduction version of the same bill survives).
pub fn latest_versions(
    mut entries: Vec<InventoryEntry>,
    exclude_intros: bool,
) -> Vec<InventoryEntry> {
    entries.sort_by_key(|e| (e.bill_number, parse_commit_date(&e.commit_date)));

    let mut out: Vec<InventoryEntry> = Vec::new();
    for entry in entries {
        if exclude_intros && entry.version.starts_with('i') {
            continue;
        }
        if out.last().is_some_and(|prev| prev.bill_number == entry.bill_number) {
            out.pop();
        }
        out.push(entry);
    }
    out
}

fn parse_commit_date(s: &str) -> i64 {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return dt.and_utc().timestamp();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return dt.and_utc().timestamp();
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return dt.and_utc().timestamp();
        }
    }
    tracing::debug!(commit_date = s, "unparseable commit date");
    0
}

/// Number of the sitting Congress: sessions start in odd years, two years
/// apiece, first Congress in 1789.
pub fn current_congress() -> u32 {
    let year = Utc::now().year();
    let year = if year % 2 == 0 { year - 1 } else { year };
    ((year - 1787) / 2) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(number: u32, version: &str, commit_date: &str) -> InventoryEntry {
        InventoryEntry {
            congress: 113,
            bill_type: "hr".to_string(),
            bill_number: number,
            version: version.to_string(),
            commit_date: commit_date.to_string(),
        }
    }

    #[test]
    fn keeps_only_the_most_recent_version_per_bill() {
        let entries = vec![
            entry(12, "ih", "2013-02-01T09:00:00"),
            entry(12, "rfs", "2013-06-11T09:00:00"),
            entry(12, "eh", "2013-05-08T14:15:22"),
            entry(7, "ih", "2013-01-15T12:00:00"),
        ];
        let latest = latest_versions(entries, false);
        let picked: Vec<(u32, &str)> = latest
            .iter()
            .map(|e| (e.bill_number, e.version.as_str()))
            .collect();
        assert_eq!(picked, vec![(7, "ih"), (12, "rfs")]);
    }

    #[test]
    fn excluding_intros_falls_back_to_earlier_versions() {
        let entries = vec![
            entry(3, "eh", "2013-03-01T00:00:00"),
            entry(3, "ih2", "2013-04-01T00:00:00"),
            entry(4, "ih", "2013-04-01T00:00:00"),
        ];
        let latest = latest_versions(entries, true);
        let picked: Vec<(u32, &str)> = latest
            .iter()
            .map(|e| (e.bill_number, e.version.as_str()))
            .collect();
        // Bill 3's newest version is an introduction, so the engrossed
        // version wins; bill 4 has nothing left.
        assert_eq!(picked, vec![(3, "eh")]);
    }

    #[test]
    fn commit_dates_parse_in_common_shapes() {
        assert!(parse_commit_date("2013-05-08T14:15:22") > 0);
        assert!(parse_commit_date("2013-05-08 14:15:22") > 0);
        assert!(parse_commit_date("2013-05-08") > 0);
        assert_eq!(parse_commit_date("whenever"), 0);
        assert!(
            parse_commit_date("2013-05-08T14:15:22") > parse_commit_date("2013-05-08T14:15:21")
        );
    }

    #[test]
    fn inventory_entries_deserialize_from_list_json() {
        let json = r#"[{"congress":113,"billtype":"hr","billnumber":1120,
            "billversion":"ih","commitdate":"2013-03-14T10:02:27"}]"#;
        let entries: Vec<InventoryEntry> = serde_json::from_str(json).expect("decoded");
        assert_eq!(entries[0].bill_number, 1120);
        assert_eq!(entries[0].identity().bill_type, "hr");
    }
}
