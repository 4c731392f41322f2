use polars::prelude::*;
use sensor_insights_core::config::DEFAULT_TIMESTAMP_FORMAT;
use sensor_insights_core::loader::load_readings_from_bytes;
use sensor_insights_core::pivot::{hour_columns, pivot_location_hour, PivotCell};

const HEADER: &str = "sensor_id,location,timestamp,temperature,humidity,sensor_type";

const SCENARIO: &str = "sensor_id,location,timestamp,temperature,humidity,sensor_type
s1,locA,2024-01-01 10:00:00,20.0,50,TypeA
s1,locA,2024-01-01 10:30:00,40.0,55,TypeA
s2,locB,2024-01-01 11:00:00,25.0,60,TypeB
";

#[test]
fn scenario_pivot_cells_and_global_max() -> anyhow::Result<()> {
    let df = load_readings_from_bytes(SCENARIO.as_bytes())?;
    let analysis = pivot_location_hour(&df, DEFAULT_TIMESTAMP_FORMAT)?;
    let table = &analysis.table;

    assert_eq!(table.height(), 2);
    assert_eq!(table.width(), 25);

    let locations: Vec<&str> = table.column("location")?.str()?.into_no_null_iter().collect();
    assert_eq!(locations, vec!["locA", "locB"]);

    assert_eq!(table.column("10")?.f64()?.get(0), Some(30.0));
    assert_eq!(table.column("10")?.f64()?.get(1), None);
    assert_eq!(table.column("11")?.f64()?.get(0), None);
    assert_eq!(table.column("11")?.f64()?.get(1), Some(25.0));

    for hour in hour_columns() {
        if hour == "10" || hour == "11" {
            continue;
        }
        assert_eq!(table.column(&hour)?.null_count(), 2, "hour {hour} should be empty");
    }

    assert_eq!(
        analysis.hottest_cell,
        Some(PivotCell {
            location: Some("locA".to_string()),
            hour: 10,
            avg_temp: 30.0,
        })
    );
    Ok(())
}

#[test]
fn always_emits_twenty_four_hour_columns() -> anyhow::Result<()> {
    let csv = format!("{HEADER}\ns1,Lab,2024-06-01 23:59:59,21.0,40,T\n");
    let df = load_readings_from_bytes(csv.as_bytes())?;
    let table = pivot_location_hour(&df, DEFAULT_TIMESTAMP_FORMAT)?.table;

    let names: Vec<String> = table
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut expected = vec!["location".to_string()];
    expected.extend(hour_columns());
    assert_eq!(names, expected);
    assert_eq!(table.column("23")?.f64()?.get(0), Some(21.0));
    Ok(())
}

#[test]
fn locations_without_a_valid_hour_still_get_a_row() -> anyhow::Result<()> {
    let csv = format!(
        "{HEADER}\n\
         s1,Lab,2024-06-01 08:00:00,21.0,40,T\n\
         s2,Roof,not a time,35.0,40,T\n"
    );
    let df = load_readings_from_bytes(csv.as_bytes())?;
    let analysis = pivot_location_hour(&df, DEFAULT_TIMESTAMP_FORMAT)?;

    assert_eq!(analysis.table.height(), 2);
    let roof = analysis
        .table
        .column("location")?
        .str()?
        .into_no_null_iter()
        .position(|location| location == "Roof")
        .expect("Roof row");
    for hour in hour_columns() {
        assert_eq!(analysis.table.column(&hour)?.f64()?.get(roof), None);
    }
    assert_eq!(
        analysis.hottest_cell.map(|cell| cell.location),
        Some(Some("Lab".to_string()))
    );
    Ok(())
}

#[test]
fn global_max_tie_prefers_location_then_hour() -> anyhow::Result<()> {
    let csv = format!(
        "{HEADER}\n\
         s1,Beta,2024-06-01 03:00:00,30.0,40,T\n\
         s2,Alpha,2024-06-01 17:00:00,30.0,40,T\n\
         s3,Alpha,2024-06-01 05:00:00,30.0,40,T\n\
         s4,Alpha,2024-06-01 06:00:00,12.0,40,T\n"
    );
    let df = load_readings_from_bytes(csv.as_bytes())?;
    let analysis = pivot_location_hour(&df, DEFAULT_TIMESTAMP_FORMAT)?;

    assert_eq!(
        analysis.hottest_cell,
        Some(PivotCell {
            location: Some("Alpha".to_string()),
            hour: 5,
            avg_temp: 30.0,
        })
    );
    assert_eq!(analysis.long_form.height(), 4);
    Ok(())
}

#[test]
fn empty_readings_keep_the_hour_columns() -> anyhow::Result<()> {
    let df = df![
        "location" => Vec::<String>::new(),
        "timestamp" => Vec::<String>::new(),
        "temperature" => Vec::<Option<f64>>::new()
    ]?;
    let analysis = pivot_location_hour(&df, DEFAULT_TIMESTAMP_FORMAT)?;

    assert_eq!(analysis.table.height(), 0);
    assert_eq!(analysis.table.width(), 25);
    assert_eq!(analysis.hottest_cell, None);
    Ok(())
}
