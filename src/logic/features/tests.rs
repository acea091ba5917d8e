//! Integration Tests for Feature Extraction
//!
//! Tables built the way each normalizer builds them, checked against the
//! exact feature values.

#[cfg(test)]
mod integration_tests {
    use crate::logic::features::{extract_features, FEATURE_COUNT};
    use crate::logic::ingest::{delimited, json, Cell, Table};

    fn csv_table(body: &str) -> Table {
        let header = "startTime,endTime,uplinkVolume,downlinkVolume,accessType\n";
        delimited::parse_delimited(format!("{}{}", header, body).as_bytes()).unwrap()
    }

    #[test]
    fn test_single_row_values() {
        let table = csv_table("2019-06-10 14:05:00,2019-06-10 14:35:30,1200,3400,4G\n");
        let m = extract_features(&table).unwrap();

        assert_eq!(m.nrows(), 1);
        assert_eq!(
            m.vector(0).unwrap().values,
            [1830.0, 1200.0, 3400.0, 14.0, 3.0]
        );
    }

    #[test]
    fn test_row_order_preserved() {
        let table = csv_table(
            "2019-06-10 01:00:00,2019-06-10 01:01:00,100,100,2G\n\
             2019-06-10 02:00:00,2019-06-10 02:02:00,200,200,3G\n\
             2019-06-10 03:00:00,2019-06-10 03:03:00,300,300,5G\n",
        );
        let m = extract_features(&table).unwrap();

        for i in 0..3 {
            let v = m.vector(i).unwrap();
            assert_eq!(v.hour_of_day(), (i + 1) as f64);
            assert_eq!(v.duration(), 60.0 * (i + 1) as f64);
        }
        assert_eq!(m.vector(2).unwrap().access_type_encoded(), 4.0);
    }

    #[test]
    fn test_empty_table_gives_empty_matrix() {
        let m = extract_features(&csv_table("")).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.as_array().ncols(), FEATURE_COUNT);
    }

    #[test]
    fn test_negative_duration_is_kept() {
        let table = csv_table("2019-06-10 14:00:00,2019-06-10 13:59:00,10,10,4G\n");
        let v = extract_features(&table).unwrap().vector(0).unwrap();
        assert_eq!(v.duration(), -60.0);
    }

    #[test]
    fn test_far_apart_years_extract_finite_duration() {
        let table = csv_table("-200000-01-01 00:00:00,+200000-01-01 00:00:00,100,100,4G\n");
        let v = extract_features(&table).unwrap().vector(0).unwrap();
        assert!(v.duration().is_finite());
        assert!(v.duration() > 1.26e13);
    }

    #[test]
    fn test_unparseable_timestamp_fails_batch() {
        let table = csv_table(
            "2019-06-10 14:00:00,2019-06-10 14:01:00,10,10,4G\n\
             not-a-time,2019-06-10 14:01:00,10,10,4G\n",
        );
        let err = extract_features(&table).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("startTime"));
    }

    #[test]
    fn test_empty_timestamp_fails_batch() {
        let table = csv_table("2019-06-10 14:00:00,,10,10,4G\n");
        assert!(extract_features(&table).unwrap_err().is_parse());
    }

    #[test]
    fn test_non_numeric_volume_is_validation_error() {
        let table = csv_table("2019-06-10 14:00:00,2019-06-10 14:01:00,lots,10,4G\n");
        let err = extract_features(&table).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("uplinkVolume"));
    }

    #[test]
    fn test_missing_volume_is_validation_error() {
        let table = csv_table("2019-06-10 14:00:00,2019-06-10 14:01:00,10,,4G\n");
        let err = extract_features(&table).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("downlinkVolume"));
    }

    #[test]
    fn test_unmapped_and_missing_access_type_encode_to_zero() {
        let table = csv_table(
            "2019-06-10 14:00:00,2019-06-10 14:01:00,10,10,LTE\n\
             2019-06-10 14:00:00,2019-06-10 14:01:00,10,10,\n\
             2019-06-10 14:00:00,2019-06-10 14:01:00,10,10,Unknown\n",
        );
        let m = extract_features(&table).unwrap();
        assert_eq!(m.vector(0).unwrap().access_type_encoded(), 0.0);
        assert_eq!(m.vector(1).unwrap().access_type_encoded(), 0.0);
        assert_eq!(m.vector(2).unwrap().access_type_encoded(), -1.0);
    }

    #[test]
    fn test_missing_required_column() {
        let table = delimited::parse_delimited(b"startTime,endTime\n").unwrap();
        assert!(extract_features(&table).unwrap_err().is_validation());
    }

    #[test]
    fn test_json_and_csv_features_match() {
        let csv = csv_table("2019-06-10T14:05:00Z,2019-06-10T14:35:30Z,1200,3400,4G\n");
        let json = json::parse_json_array(
            br#"[{"startTime": "2019-06-10T14:05:00Z", "endTime": "2019-06-10T14:35:30Z",
                  "uplinkVolume": 1200, "downlinkVolume": 3400, "accessType": "4G"}]"#,
        )
        .unwrap();

        assert_eq!(extract_features(&csv).unwrap(), extract_features(&json).unwrap());
    }

    #[test]
    fn test_numeric_timestamp_cell_is_parse_error() {
        let mut table = Table::new(
            ["startTime", "endTime", "uplinkVolume", "downlinkVolume", "accessType"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        table
            .push_row(vec![
                Cell::Number(1546300800.0),
                Cell::from("2019-01-01 00:00:00"),
                Cell::Number(1.0),
                Cell::Number(1.0),
                Cell::from("4G"),
            ])
            .unwrap();
        assert!(extract_features(&table).unwrap_err().is_parse());
    }
}
