use std::fs;
use std::path::PathBuf;

use float_eq::assert_float_eq;
use iris_btp::batch::{score_comparisons, transform_directory, TEMPLATE_SUFFIX};
use iris_btp_common::{io, BloomFilterParams};

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("iris-btp-e2e-{}-{}", name, std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn small_params() -> BloomFilterParams {
    BloomFilterParams {
        block_height: 2,
        block_width: 2,
        ..Default::default()
    }
}

fn write_db(dir: &PathBuf) {
    fs::write(dir.join("a.txt"), "01\n10\n11\n00\n").unwrap();
    // same subject as a
    fs::write(dir.join("b.txt"), "01\n10\n11\n00\n").unwrap();
    // different subject
    fs::write(dir.join("c.txt"), "11\n11\n10\n01\n").unwrap();
    fs::write(dir.join("zero.txt"), "00\n00\n00\n00\n").unwrap();
}

#[test]
fn transform_then_score_end_to_end() {
    let db = test_dir("db");
    let templates = test_dir("templates");
    let lists = test_dir("lists");
    write_db(&db);
    // malformed sample: must be reported, must not abort the batch
    fs::write(db.join("bad.txt"), "0x\n").unwrap();

    let reports = transform_directory(&db, &templates, &small_params()).unwrap();
    assert_eq!(reports.len(), 5);
    assert_eq!(reports.iter().filter(|r| r.is_failure()).count(), 1);
    let failed = reports.iter().find(|r| r.is_failure()).unwrap();
    assert_eq!(failed.id, "bad");

    // a 4x2 code with 2x2 blocks: two blocks of 4-bit filters
    let template = io::read_template(&templates.join(format!("a{}", TEMPLATE_SUFFIX))).unwrap();
    assert_eq!(template.num_blocks(), 2);
    assert_eq!(template.filter_len(), 4);

    // the all-zero code maps every block to the zero-pattern bit
    let zero = io::read_template(&templates.join(format!("zero{}", TEMPLATE_SUFFIX))).unwrap();
    for filter in zero.filters() {
        assert_eq!(filter.count_ones(), 1);
        assert!(filter.contains(0));
    }

    // three-line mated list with one unresolvable identifier in the middle
    let mated = lists.join("mated.txt");
    fs::write(
        &mated,
        format!(
            "a{s} b{s}\na{s} missing{s}\na{s} c{s}\n",
            s = TEMPLATE_SUFFIX
        ),
    )
    .unwrap();
    let score_file = lists.join("mated_scores.txt");
    let reports = score_comparisons(&templates, &mated, &score_file).unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports.iter().filter(|r| r.is_failure()).count(), 1);

    // two successful scores, in list order: identical templates first
    let scores = fs::read_to_string(&score_file)
        .unwrap()
        .lines()
        .map(|l| l.parse::<f64>().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(scores.len(), 2);
    assert_float_eq!(scores[0], 0.0, abs <= 0.0);
    assert!(scores[1] > 0.0 && scores[1] <= 1.0);
}

#[test]
fn xor_keyed_runs_stay_comparable_but_unlinkable() {
    let db = test_dir("keyed-db");
    // a larger mated pair, so that a key fusion that leaves the whole
    // template unchanged is out of the question
    let code = "01101001\n11010010\n00111100\n10100101\n01011010\n11100011\n00010111\n10001110\n";
    fs::write(db.join("a.txt"), code).unwrap();
    fs::write(db.join("b.txt"), code).unwrap();

    let plain_dir = test_dir("keyed-plain");
    transform_directory(&db, &plain_dir, &small_params()).unwrap();

    let mut params = small_params();
    params.n_xor_keys = 2;
    params.key_seed = Some(9);
    let keyed_dir = test_dir("keyed-templates");
    let reports = transform_directory(&db, &keyed_dir, &params).unwrap();
    assert!(reports.iter().all(|r| !r.is_failure()));

    let a_name = format!("a{}", TEMPLATE_SUFFIX);
    let keyed_a = io::read_template(&keyed_dir.join(&a_name)).unwrap();
    let keyed_b = io::read_template(&keyed_dir.join(format!("b{}", TEMPLATE_SUFFIX))).unwrap();
    let plain_a = io::read_template(&plain_dir.join(&a_name)).unwrap();

    // identical samples fused with the run's keys still match exactly
    assert_float_eq!(
        iris_btp::scoring::score(&keyed_a, &keyed_b).unwrap(),
        0.0,
        abs <= 0.0
    );
    // but the keyed enrolment is a different template than the plain one
    assert_ne!(keyed_a, plain_a);
}

#[test]
fn permuted_runs_keep_mated_scores() {
    let db = test_dir("perm-db");
    write_db(&db);

    let mut params = small_params();
    params.permutation_seed = Some(5);
    let templates = test_dir("perm-templates");
    transform_directory(&db, &templates, &params).unwrap();

    let lists = test_dir("perm-lists");
    let mated = lists.join("mated.txt");
    fs::write(&mated, format!("a{s} b{s}\n", s = TEMPLATE_SUFFIX)).unwrap();
    let score_file = lists.join("scores.txt");
    let reports = score_comparisons(&templates, &mated, &score_file).unwrap();
    assert!(reports.iter().all(|r| !r.is_failure()));

    let scores = fs::read_to_string(&score_file).unwrap();
    assert_float_eq!(
        scores.lines().next().unwrap().parse::<f64>().unwrap(),
        0.0,
        abs <= 0.0
    );
}

#[test]
fn oversized_blocks_abort_the_whole_run() {
    let db = test_dir("abort-db");
    write_db(&db);

    let params = BloomFilterParams {
        block_height: 16,
        block_width: 2,
        ..Default::default()
    };
    let templates = test_dir("abort-templates");
    assert!(transform_directory(&db, &templates, &params).is_err());
}
