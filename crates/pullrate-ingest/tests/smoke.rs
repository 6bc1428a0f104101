use std::fs;
use std::path::{Path, PathBuf};

use pullrate_core::{CompactCardRecord, Rarity, load_sets_table};
use pullrate_ingest::config::IngestConfig;
use pullrate_ingest::filter::SkipReason;
use pullrate_ingest::pipeline::{PipelineError, PipelineRunner};
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/default-cards-sample.json")
}

fn load_config(input: &Path, output_dir: &Path) -> IngestConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
input: "{input}"
outputs:
  cards_ndjson: "{cards}"
  sets_json: "{sets}"
  sets_dir: "{sets_dir}"
progress:
  interval: 5
logging:
  enable_structured: false
"#,
        input = input.display(),
        cards = output_dir.join("{run_id}/processed-cards.ndjson").display(),
        sets = output_dir.join("{run_id}/sets.json").display(),
        sets_dir = output_dir.join("{run_id}/sets").display()
    );

    let mut cfg: IngestConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn sample_snapshot_produces_stable_artifacts() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(&fixture_path(), dir.path());
    let runner = PipelineRunner::new(config).expect("runner created");
    let summary = runner.run().expect("ingest completes");

    let counters = &summary.counters;
    assert_eq!(counters.read, 12);
    assert_eq!(counters.kept, 6);
    assert_eq!(counters.skipped, 6);
    assert_eq!(counters.duplicates, 1);
    assert_eq!(counters.incomplete, 1);
    for reason in [
        SkipReason::Malformed,
        SkipReason::Language,
        SkipReason::Digital,
        SkipReason::NotInBoosters,
        SkipReason::ExcludedLayout,
        SkipReason::Rarity,
    ] {
        assert_eq!(counters.skip_reasons.get(&reason), Some(&1), "{reason:?}");
    }
    assert_eq!(summary.sets, 2);
    assert_eq!(summary.set_files_written, 2);
    assert_eq!(
        summary.cards_path,
        dir.path().join("test_smoke/processed-cards.ndjson")
    );

    let ndjson = fs::read_to_string(&summary.cards_path).expect("ndjson readable");
    let ids: Vec<String> = ndjson
        .lines()
        .map(|line| {
            let card: CompactCardRecord = serde_json::from_str(line).expect("line decodes");
            card.id.expect("fixture cards carry ids")
        })
        .collect();
    assert_eq!(ids, ["a1", "a2", "l1", "m1", "c1", "x1"]);
    assert_eq!(summary.cards_bytes, ndjson.len() as u64);

    let mut hasher = Sha256::new();
    hasher.update(ndjson.as_bytes());
    let actual = hex::encode(hasher.finalize());
    assert_eq!(
        actual, "8701e6650798a11b1ae2f3767c95866823a1406f5ea8ad143c83ba4396e2d18f",
        "NDJSON output hash changed; update expected value if intentional"
    );

    let sets = load_sets_table(fs::File::open(&summary.sets_path).expect("sets table exists"))
        .expect("sets table decodes");
    assert_eq!(sets.len(), 2);
    let m21 = &sets["m21"];
    assert_eq!(m21.name, "Core Set 2021");
    assert_eq!(
        (m21.total, m21.common_land, m21.common, m21.uncommon, m21.rare, m21.mythic),
        (3, 1, 0, 0, 1, 1)
    );
    let dmu = &sets["dmu"];
    assert_eq!((dmu.total, dmu.common), (1, 1));
    assert!(sets.values().all(|set| set.is_consistent()));

    let m21_cards: std::collections::BTreeMap<String, CompactCardRecord> = serde_json::from_str(
        &fs::read_to_string(summary.sets_dir.join("m21.json")).expect("m21 table exists"),
    )
    .expect("m21 table decodes");
    let keys: Vec<_> = m21_cards.keys().map(String::as_str).collect();
    assert_eq!(keys, ["o-a", "o-forest", "o-m"]);
    assert_eq!(m21_cards["o-a"].id.as_deref(), Some("a1"));
    assert_eq!(m21_cards["o-m"].rarity, Rarity::Mythic);
    assert!(summary.sets_dir.join("dmu.json").exists());
}

#[test]
fn truncated_snapshot_discards_partial_output() {
    let dir = tempdir().expect("temp dir");
    let full = fs::read(fixture_path()).expect("fixture readable");
    let truncated = dir.path().join("truncated.json");
    fs::write(&truncated, &full[..full.len() / 2]).expect("write truncated input");

    let config = load_config(&truncated, dir.path());
    let runner = PipelineRunner::new(config).expect("runner created");
    let cards_path = runner.outputs().cards_ndjson.clone();
    let sets_path = runner.outputs().sets_json.clone();

    let err = runner.run().expect_err("truncated input is fatal");
    assert!(matches!(err, PipelineError::Stream(_)), "{err}");
    assert!(!cards_path.exists(), "partial card stream left behind");
    assert!(!sets_path.exists());
}

#[test]
fn missing_input_fails_without_touching_outputs() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(&dir.path().join("absent.json"), dir.path());
    let runner = PipelineRunner::new(config).expect("runner created");

    let err = runner.run().expect_err("missing input");
    assert!(matches!(err, PipelineError::File { .. }), "{err}");
    assert!(!dir.path().join("test_smoke").exists());
}

#[test]
fn unsafe_set_code_aborts_before_writing_tables() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("input.json");
    fs::write(
        &input,
        r#"[{"id":"z","lang":"en","rarity":"rare","set":"../up","set_name":"Escape"}]"#,
    )
    .expect("write input");

    let config = load_config(&input, dir.path());
    let runner = PipelineRunner::new(config).expect("runner created");
    let err = runner.run().expect_err("unsafe code");
    assert!(matches!(err, PipelineError::UnsafeSetCode { ref code } if code == "../up"));
    assert!(!runner.outputs().sets_json.exists());
}
