//! Shared records and test setup

use impress_dedup::BibliographicRecord;

/// Route `tracing` output through the test harness. Honors `RUST_LOG`.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A record with only a title
#[allow(dead_code)]
pub fn titled(id: &str, title: &str) -> BibliographicRecord {
    BibliographicRecord::new(id, title, "pubmed")
}

/// A record identified only by DOI, so pairs score exactly 1.0 or 0.0
#[allow(dead_code)]
pub fn doi_only(id: &str, doi: &str) -> BibliographicRecord {
    BibliographicRecord::new(id, "", "scopus").with_doi(doi)
}

/// A record identified only by PMID
#[allow(dead_code)]
pub fn pmid_only(id: &str, pmid: &str) -> BibliographicRecord {
    BibliographicRecord::new(id, "", "embase").with_pmid(pmid)
}

/// The same trial as exported by three databases
#[allow(dead_code)]
pub fn telemedicine_exports() -> Vec<BibliographicRecord> {
    vec![
        BibliographicRecord::new("pubmed-1", "Effects of Telemedicine on Rural Care", "pubmed")
            .with_authors(["Jane Doe", "John Smith"])
            .with_pmid("31415926")
            .with_publication_date("2021-03-15"),
        BibliographicRecord::new("embase-7", "EFFECTS OF TELEMEDICINE ON RURAL CARE", "embase")
            .with_authors(["Doe, J.", "Smith, John"])
            .with_journal("Journal of Rural Health")
            .with_doi("10.1/ABC")
            .with_abstract("Telemedicine improved access to specialist care."),
        BibliographicRecord::new("scopus-3", "Effects of telemedicine on rural care.", "scopus")
            .with_doi("10.1/abc")
            .with_pmid("31415926")
            .with_abstract(
                "Telemedicine improved access to specialist care in rural communities.",
            ),
    ]
}
