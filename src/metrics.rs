//! One-time metrics registration: describe every series once via a
//! `OnceCell` so it shows up with a description on first emission.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("collect_headlines_total", "Headlines pulled from source collectors.");
        describe_counter!("collect_errors_total", "Source collector fetch/parse errors.");
        describe_counter!("search_queries_total", "Search queries issued.");
        describe_counter!("search_failures_total", "Search queries that failed or timed out.");
        describe_counter!("candidates_extracted_total", "Candidate articles recovered from search responses.");
        describe_counter!("candidates_filtered_total", "Candidates rejected by a hard filter.");
        describe_counter!("related_free_emitted_total", "relatedFree records attached to output headlines.");
        describe_histogram!("pipeline_stage_ms", "Wall-clock time per pipeline stage, in milliseconds.");
    });
}

pub fn record_stage_ms(stage: &'static str, millis: f64) {
    histogram!("pipeline_stage_ms", "stage" => stage).record(millis);
}

pub fn incr_collect_headlines(n: u64) {
    counter!("collect_headlines_total").increment(n);
}

pub fn incr_collect_errors() {
    counter!("collect_errors_total").increment(1);
}

pub fn incr_search_queries(n: u64) {
    counter!("search_queries_total").increment(n);
}

pub fn incr_search_failures() {
    counter!("search_failures_total").increment(1);
}

pub fn incr_candidates_extracted(n: u64) {
    counter!("candidates_extracted_total").increment(n);
}

pub fn incr_candidates_filtered(n: u64) {
    counter!("candidates_filtered_total").increment(n);
}

pub fn incr_related_free_emitted(n: u64) {
    counter!("related_free_emitted_total").increment(n);
}
