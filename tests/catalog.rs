use std::fs;
use std::path::Path;

use eno_trace::{
    filter_runs, get_metrics, list_runs, parse_series, select_runs, AxisCategory, FilterCriteria,
    RunCatalog,
};
use tempfile::tempdir;

fn write_run(root: &Path, name: &str, journal: Option<&str>, files: &[(&str, &str)]) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    if let Some(journal) = journal {
        fs::write(dir.join("journal.txt"), journal).unwrap();
    }
    for (file, body) in files {
        fs::write(dir.join(file), body).unwrap();
    }
}

const PRESSURE: &str =
    "Time\tPressure(bar)\n00:00:00.000\t10.0\n00:00:01.000\tabc\n00:00:02.000\t12.5\n";
const FLOW: &str = "Time\tFlow(uL/min)\n00:00:00.000\t1.0\n00:00:00.500\t1.5\n\n";
const JOURNAL: &str =
    "Procedure.Name: 200 SPD\nProcedure.Samplename: QC01\nProcedure.Vialposition: S1-A1\n";

#[test]
fn data_root_scan_end_to_end() {
    let root = tempdir().unwrap();
    write_run(
        root.path(),
        "200-SPD_2025-12-11_12-27-48",
        Some(JOURNAL),
        &[
            ("Pump-HP_Pressure.txt", PRESSURE),
            ("Pump-HP_Actual-flow.txt", FLOW),
            ("Pump-LP_Pressure.txt", PRESSURE),
        ],
    );
    write_run(
        root.path(),
        "Whisper40_2025-12-12_08-00-00",
        None,
        &[("Pump-HP_Pressure.txt", PRESSURE)],
    );

    let runs = list_runs(Some(root.path()));
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].sample(), "QC01");
    assert_eq!(runs[1].sample(), "");
    assert_eq!(runs[1].date_time(), "2025-12-12 08:00:00");

    let metrics = get_metrics(Some(root.path()), &runs[0].name);
    let hp: Vec<&str> = metrics["Pump-HP"].iter().map(|m| m.name.as_str()).collect();
    assert_eq!(hp, ["Actual-flow", "Pressure"]);
    assert_eq!(metrics["Pump-LP"].len(), 1);

    let path = root.path().join(&runs[0].name).join("Pump-HP_Pressure.txt");
    let series = parse_series(&path).unwrap();
    assert_eq!(series.metric_info, "Pressure(bar)");
    assert_eq!(series.times, vec![0.0, 2.0]);
    assert_eq!(series.values, vec![10.0, 12.5]);

    for m in &metrics["Pump-HP"] {
        let expected = if m.name == "Actual-flow" {
            AxisCategory::Flow
        } else {
            AxisCategory::Pressure
        };
        assert_eq!(AxisCategory::classify(&m.filename), expected);
    }
}

#[test]
fn filtering_then_default_selection() {
    let root = tempdir().unwrap();
    for (name, sample) in [
        ("a_2025-01-01_00-00-00", "QC01"),
        ("b_2025-01-02_00-00-00", "HeLa"),
    ] {
        let journal = format!("Procedure.Samplename: {sample}\n");
        write_run(root.path(), name, Some(&journal), &[]);
    }
    let runs = list_runs(Some(root.path()));

    let criteria = FilterCriteria {
        sample: "HELA".into(),
        ..Default::default()
    };
    let hela = filter_runs(&runs, &criteria);
    assert_eq!(select_runs(&hela, &[]), ["b_2025-01-02_00-00-00"]);

    let criteria = FilterCriteria {
        name: "a_".into(),
        sample: "hela".into(),
        ..Default::default()
    };
    let none = filter_runs(&runs, &criteria);
    assert!(none.is_empty());
    assert!(select_runs(&none, &[]).is_empty());
}

#[test]
fn rescans_are_idempotent_and_see_new_runs() {
    let root = tempdir().unwrap();
    write_run(
        root.path(),
        "a_2025-01-01_00-00-00",
        None,
        &[("Pump-HP_Pressure.txt", PRESSURE)],
    );
    let catalog = RunCatalog::new(Some(root.path().to_path_buf()));

    assert_eq!(catalog.runs(), catalog.runs());
    assert_eq!(
        catalog.series("a_2025-01-01_00-00-00", "Pump-HP_Pressure.txt"),
        catalog.series("a_2025-01-01_00-00-00", "Pump-HP_Pressure.txt")
    );

    write_run(root.path(), "b_2025-01-02_00-00-00", None, &[]);
    assert_eq!(catalog.runs().len(), 2);
}
