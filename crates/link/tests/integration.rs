use std::path::PathBuf;

use proptest::prelude::*;

use triforce_link::config::{ColumnsConfig, NormalizeConfig};
use triforce_link::engine::{load_input, run, LinkContext};
use triforce_link::model::{EntsoRecord, GppdRecord, LinkInput, PlattsRecord};
use triforce_link::normalize::{normalize_names, DEFAULT_THRESHOLD};
use triforce_link::{write_mapping, LinkConfig, LinkReport};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn load_fixtures() -> LinkInput {
    load_input(
        &ColumnsConfig::default(),
        &fixture("entso.csv"),
        &fixture("platts.csv"),
        &fixture("gppd.csv"),
    )
    .unwrap()
}

fn mapping_csv(report: &LinkReport) -> String {
    let mut buf = Vec::new();
    write_mapping(&report.records, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

// -------------------------------------------------------------------------
// Fixture runs
// -------------------------------------------------------------------------

#[test]
fn fixtures_without_normalization() {
    let report = run(&NormalizeConfig::default(), load_fixtures());
    let s = &report.summary;

    assert_eq!(s.entso_rows, 9);
    assert_eq!(s.platts_rows, 8);
    assert_eq!(s.gppd_rows, 7);
    assert_eq!(s.bridge_rows, 6);
    assert_eq!(s.joined_rows, 11, "both Drax units fan out over two Platts units");
    assert_eq!(s.phase1_gppd_matches, 7);
    assert_eq!(s.phase1_platts_matches, 7);
    assert_eq!(s.phase2_gppd_filled, 1, "Boxberg via its Platts unit");
    assert_eq!(s.phase2_platts_filled, 1, "Niederaussem via its GPPD plant");
    assert_eq!(s.unresolved_gppd, 1);
    assert_eq!(s.unresolved_platts, 1);
    assert_eq!(s.fully_resolved, 8);

    assert_eq!(mapping_csv(&report), fixture("expected_mapping.csv"));
}

#[test]
fn fixtures_with_normalization() {
    let normalize = NormalizeConfig { enabled: true, threshold: DEFAULT_THRESHOLD };
    let report = run(&normalize, load_fixtures());
    let s = &report.summary;

    assert_eq!(s.platts_names_rewritten, 5);
    assert_eq!(s.gppd_names_rewritten, 3);
    // NIEDERAUSSEM now matches on text, so the bridge has nothing left to fill for it.
    assert_eq!(s.phase1_platts_matches, 8);
    assert_eq!(s.phase2_platts_filled, 0);

    assert_eq!(mapping_csv(&report), fixture("expected_mapping.csv"));
}

#[test]
fn runs_are_deterministic() {
    let a = run(&NormalizeConfig::default(), load_fixtures());
    let b = run(&NormalizeConfig::default(), load_fixtures());
    assert_eq!(a.records, b.records);
    assert_eq!(a.summary, b.summary);
}

#[test]
fn report_serializes() {
    let report = run(&NormalizeConfig::default(), load_fixtures());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["summary"]["unresolved_gppd"], 1);
    assert_eq!(json["records"][8]["unit_id"], "32WKOZLODUY5");
    assert!(json["records"][8]["gppd_plant_id"].is_null());
    assert_eq!(json["meta"]["threshold"], 90);
}

#[test]
fn custom_column_names_from_config() {
    let config = LinkConfig::from_toml(
        r#"
[columns.entso]
unit_id = "eic_code"
unit_capacity = "mw"

[columns.gppd]
plant_id = "wepp_id"
"#,
    )
    .unwrap();
    let entso = "eic_code,plant_name,country,fuel_type,mw\nE1,Drax,United Kingdom,Coal,645\n";
    let platts = "unit_id,plant_id,plant_name,country,fuel_type\nP1,77,Drax 1,United Kingdom,Coal\n";
    let gppd = "wepp_id,name,country_long,primary_fuel\n77,Drax,United Kingdom,Coal\n";

    let input = load_input(&config.columns, entso, platts, gppd).unwrap();
    let report = run(&config.normalize, input);
    assert_eq!(report.records[0].unit_capacity, Some(645.0));
    assert_eq!(report.records[0].gppd_plant_id.as_deref(), Some("77"));
    assert_eq!(report.records[0].platts_unit_id.as_deref(), Some("P1"));
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn text_mismatch_is_not_rescued_by_bridge() {
    // Platts and GPPD share plant 7, but the ENTSO unit matches neither by text.
    // Phase 2 only extends rows that matched something in phase 1.
    let entso = "unit_id,plant_name,country,fuel_type,unit_capacity\nE1,Omega,Elsewhere,Gas,100\n";
    let platts = "unit_id,plant_id,plant_name,country,fuel_type\nP1,7,Alpha,Testland,Gas\n";
    let gppd = "gppd_idnr,name,country_long,primary_fuel\n7,Alpha,Testland,Gas\n";

    let report = run(
        &NormalizeConfig::default(),
        load_input(&ColumnsConfig::default(), entso, platts, gppd).unwrap(),
    );
    assert_eq!(report.summary.bridge_rows, 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].gppd_plant_id, None);
    assert_eq!(report.records[0].platts_unit_id, None);
    assert_eq!(mapping_csv(&report), "entso_unit_id,platts_unit_id,gppd_plant_id\nE1,,\n");
}

#[test]
fn empty_secondary_tables_leave_everything_null() {
    let entso = "unit_id,plant_name,country,fuel_type,unit_capacity\nE1,Drax,UK,Coal,1\nE2,Eemshaven,NL,Gas,2\n";
    let platts = "unit_id,plant_id,plant_name,country,fuel_type\n";
    let gppd = "gppd_idnr,name,country_long,primary_fuel\n";

    let normalize = NormalizeConfig { enabled: true, ..Default::default() };
    let report = run(&normalize, load_input(&ColumnsConfig::default(), entso, platts, gppd).unwrap());
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.summary.unresolved_gppd, 2);
    assert_eq!(report.summary.unresolved_platts, 2);
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

fn word() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Alpha", "Alpha Station", "ALPHA", "Beta", "Beta North", "Gamma", ""])
        .prop_map(String::from)
}

fn country() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Testland", "Republic of Testland", "Otherland"]).prop_map(String::from)
}

fn fuel() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Gas", "Coal"]).prop_map(String::from)
}

prop_compose! {
    fn link_input()(
        entso in prop::collection::vec((word(), country(), fuel()), 0..8),
        platts in prop::collection::vec(
            (prop::option::of(0u8..5), word(), country(), fuel()),
            0..8,
        ),
        gppd in prop::collection::vec((word(), country(), fuel()), 0..6)
    ) -> LinkInput {
        LinkInput {
            entso: entso
                .into_iter()
                .enumerate()
                .map(|(i, (plant_name, country, fuel_type))| EntsoRecord {
                    unit_id: format!("E{i}"),
                    plant_name,
                    country,
                    fuel_type,
                    unit_capacity: None,
                })
                .collect(),
            platts: platts
                .into_iter()
                .enumerate()
                .map(|(i, (plant, plant_name, country, fuel_type))| PlattsRecord {
                    unit_id: format!("P{i}"),
                    plant_id: plant.map(|p| p.to_string()),
                    plant_name,
                    country,
                    fuel_type,
                })
                .collect(),
            gppd: gppd
                .into_iter()
                .enumerate()
                .map(|(i, (plant_name, country, fuel_type))| GppdRecord {
                    plant_id: i.to_string(),
                    plant_name,
                    country,
                    fuel_type,
                })
                .collect(),
        }
    }
}

proptest! {
    #[test]
    fn one_output_row_per_entso_unit(input in link_input(), normalize in any::<bool>()) {
        let unit_ids: Vec<String> = input.entso.iter().map(|r| r.unit_id.clone()).collect();
        let config = NormalizeConfig { enabled: normalize, ..Default::default() };
        let report = run(&config, input);
        let out: Vec<String> = report.records.iter().map(|r| r.unit_id.clone()).collect();
        prop_assert_eq!(out, unit_ids);
    }

    #[test]
    fn bridge_never_overwrites_text_matches(input in link_input()) {
        let mut ctx = LinkContext::new(input);
        ctx.resolve_by_text();
        let phase1 = ctx.resolved.clone();
        ctx.resolve_by_bridge();

        prop_assert_eq!(phase1.len(), ctx.resolved.len());
        for (before, after) in phase1.iter().zip(&ctx.resolved) {
            prop_assert_eq!(&before.unit_id, &after.unit_id);
            if before.gppd_plant_id.is_some() {
                prop_assert_eq!(&before.gppd_plant_id, &after.gppd_plant_id);
            }
            if before.platts_unit_id.is_some() {
                prop_assert_eq!(&before.platts_unit_id, &after.platts_unit_id);
            }
        }
    }

    #[test]
    fn normalization_is_idempotent(input in link_input()) {
        let reference: Vec<&str> = input.entso.iter().map(|r| r.plant_name.as_str()).collect();
        let mut gppd = input.gppd.clone();
        normalize_names(&reference, &mut gppd, DEFAULT_THRESHOLD);
        let once = gppd.clone();
        let rewritten = normalize_names(&reference, &mut gppd, DEFAULT_THRESHOLD);
        prop_assert_eq!(rewritten, 0);
        prop_assert_eq!(gppd, once);
    }
}
