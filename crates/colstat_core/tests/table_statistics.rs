use std::sync::Arc;

use chrono::{DateTime, Utc};
use colstat_core::arrays::datatype::DataType;
use colstat_core::catalog::memory::MemoryHistogramStore;
use colstat_core::catalog::{ColumnRef, TableStatistics};
use colstat_core::config::estimator::{EmptyBucketFraction, EstimatorConfig};
use colstat_core::sarg::{Endpoint, Literal, SearchRange, SearchRangeSequence};
use colstat_core::statistics::estimate::HistogramEstimator;

const STORE_JSON: &str = r#"[
    {
        "column": {"table": "orders", "column": "status"},
        "histogram": {
            "analyze_time": "2024-03-01T00:00:00Z",
            "distinct_value_count": 4,
            "percentage_sampled": 100,
            "bucket_count": 2,
            "rows_per_bucket": 500,
            "rows_last_bucket": 500,
            "buckets": [
                {"starting_value": "failed", "sampled_distinct_count": 2},
                {"starting_value": "pending", "sampled_distinct_count": 2}
            ]
        }
    },
    {
        "column": {"table": "orders", "column": "status"},
        "histogram": {
            "analyze_time": "2024-06-01T00:00:00Z",
            "distinct_value_count": 8,
            "percentage_sampled": 50,
            "bucket_count": 2,
            "rows_per_bucket": 500,
            "rows_last_bucket": 250,
            "buckets": [
                {"starting_value": "cancelled", "sampled_distinct_count": 2},
                {"starting_value": "pending", "sampled_distinct_count": 2}
            ]
        }
    }
]"#;

fn text(s: &str) -> Literal {
    Literal::new(DataType::Utf8, s)
}

fn analyzed(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[test]
fn latest_and_point_in_time_estimates() {
    logutil::init_test();

    let store = Arc::new(MemoryHistogramStore::load_json(STORE_JSON).unwrap());
    let column = ColumnRef::new("orders", "status");
    let ranges = SearchRangeSequence::new(vec![SearchRange::point(text("failed"))]);

    // Latest stats: ndv 8 over 4 sampled values, correction of 2.
    let latest = TableStatistics::new(store.clone()).with_row_count(750);
    let stats = latest.column_statistics(&column, Some(&ranges)).unwrap();
    // "failed" lands in the first bucket of 4 estimated values.
    assert!((stats.selectivity().unwrap() - 0.125).abs() < 1e-9);
    assert!((stats.cardinality().unwrap() - 1.0).abs() < 1e-9);

    let rows = latest.estimated_row_count(&column, Some(&ranges)).unwrap();
    assert!((rows.unwrap() - 93.75).abs() < 1e-9);

    // Earlier stats: "failed" starts the first bucket of 2 values.
    let earlier = TableStatistics::new(store.clone()).with_as_of(analyzed("2024-04-01T00:00:00Z"));
    let stats = earlier.column_statistics(&column, Some(&ranges)).unwrap();
    assert!((stats.selectivity().unwrap() - 0.25).abs() < 1e-9);

    // Before any stats were collected.
    let before = TableStatistics::new(store).with_as_of(analyzed("2024-01-01T00:00:00Z"));
    let stats = before.column_statistics(&column, Some(&ranges)).unwrap();
    assert_eq!(None, stats.selectivity());
    assert_eq!(None, stats.cardinality());
}

#[test]
fn estimator_config_applies() {
    logutil::init_test();

    let store = Arc::new(MemoryHistogramStore::load_json(STORE_JSON).unwrap());
    let column = ColumnRef::new("orders", "status");
    let ranges = SearchRangeSequence::new(vec![SearchRange::new(
        Endpoint::closed(text("a")),
        Endpoint::open(text("b")),
    )]);

    // Range falls before the first bucket.
    let stats = TableStatistics::new(store.clone())
        .column_statistics(&column, Some(&ranges))
        .unwrap();
    assert_eq!(Some(0.0), stats.selectivity());
    assert_eq!(Some(0.0), stats.cardinality());

    let estimator = HistogramEstimator::new(EstimatorConfig {
        empty_bucket_fraction: EmptyBucketFraction::Unknown,
    });
    let stats = TableStatistics::new(store)
        .with_estimator(estimator)
        .column_statistics(&column, Some(&ranges))
        .unwrap();
    assert_eq!(None, stats.selectivity());
}
