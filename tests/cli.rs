/// End-to-end tests driving the ruHiC binary on small BAM fixtures
use assert_cmd::Command;
use noodles::bam;
use noodles::core::Position;
use noodles::sam;
use noodles::sam::alignment::io::Write as SamWrite;
use noodles::sam::alignment::record::cigar::op::{Kind, Op};
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::record_buf::{Cigar, RecordBuf};
use noodles::sam::header::record::value::{map::ReferenceSequence, Map};
use predicates::prelude::*;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One alignment of a fixture read pair
struct Aln {
    name: &'static str,
    first: bool,
    tid: usize,
    pos: usize,
    reverse: bool,
    ops: Vec<Op>,
}

fn aln(name: &'static str, first: bool, tid: usize, pos: usize, reverse: bool, len: usize) -> Aln {
    Aln {
        name,
        first,
        tid,
        pos,
        reverse,
        ops: vec![Op::new(Kind::Match, len)],
    }
}

fn to_record(a: &Aln) -> RecordBuf {
    let mut flags = Flags::SEGMENTED;
    flags |= if a.first {
        Flags::FIRST_SEGMENT
    } else {
        Flags::LAST_SEGMENT
    };
    if a.reverse {
        flags |= Flags::REVERSE_COMPLEMENTED;
    }

    let mut record = RecordBuf::default();
    record.name_mut().replace(a.name.into());
    *record.flags_mut() = flags;
    *record.reference_sequence_id_mut() = Some(a.tid);
    *record.alignment_start_mut() = Position::new(a.pos);
    *record.mapping_quality_mut() = MappingQuality::new(60);
    *record.cigar_mut() = Cigar::from(a.ops.clone());
    record
}

/// Helper to write a BAM with chr1 (200 bp) and chr2 (500 bp)
fn create_test_bam(dir: &TempDir, alignments: &[Aln]) -> PathBuf {
    let path = dir.path().join("reads.bam");
    let header = sam::Header::builder()
        .add_reference_sequence(
            "chr1",
            Map::<ReferenceSequence>::new(NonZeroUsize::new(200).unwrap()),
        )
        .add_reference_sequence(
            "chr2",
            Map::<ReferenceSequence>::new(NonZeroUsize::new(500).unwrap()),
        )
        .build();

    let mut writer = bam::io::Writer::new(fs::File::create(&path).unwrap());
    writer.write_header(&header).unwrap();
    for a in alignments {
        writer.write_alignment_record(&header, &to_record(a)).unwrap();
    }
    writer.finish(&header).unwrap();
    path
}

/// Helper to write the fragment BED: chr1 [1-100], [101-200]; chr2 [1-500]
fn create_test_fragments(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("frags.bed");
    fs::write(&path, "chr1\t0\t100\nchr1\t100\t200\nchr2\t0\t500\n").unwrap();
    path
}

fn fixture() -> Vec<Aln> {
    vec![
        // Contact across chr1 fragments
        aln("a_valid", true, 0, 50, false, 10),
        aln("a_valid", false, 0, 141, true, 10),
        // Dangling end on chr1 fragment 0
        aln("b_dangling", true, 0, 10, false, 20),
        aln("b_dangling", false, 0, 71, true, 20),
        // Trans contact
        aln("c_trans", true, 1, 300, true, 20),
        aln("c_trans", false, 0, 20, false, 20),
        // Singleton
        aln("d_single", true, 1, 100, false, 20),
    ]
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn test_fragment_mode_end_to_end() {
    let tmpdir = TempDir::new().unwrap();
    let bam_path = create_test_bam(&tmpdir, &fixture());
    let bed_path = create_test_fragments(&tmpdir);
    let out_dir = tmpdir.path().join("out");
    let prefix = format!("{}/lib_", out_dir.display());

    Command::cargo_bin("ruHiC")
        .unwrap()
        .arg("--bamFile")
        .arg(&bam_path)
        .arg("--fragmentFile")
        .arg(&bed_path)
        .arg("--outPrefix")
        .arg(&prefix)
        .arg("--storage")
        .arg("1")
        .assert()
        .success();

    assert_eq!(
        read_lines(&out_dir.join("lib_0_0")),
        vec!["2\t1\t141\t50\t-10\t10"]
    );
    assert_eq!(
        read_lines(&out_dir.join("lib_1_0")),
        vec!["1\t1\t300\t20\t-20\t20"]
    );
    assert!(!out_dir.join("lib_1_1").exists());

    let summary = fs::read_to_string(out_dir.join("lib_summary.tsv")).unwrap();
    assert!(summary.contains("total\t3\n"));
    assert!(summary.contains("mapped\t3\n"));
    assert!(summary.contains("dangling\t1\n"));
    assert!(summary.contains("singles\t1\n"));
    assert!(summary.contains("chr2\tchr1\t"));
}

#[test]
fn test_binless_mode_uses_bam_header() {
    let tmpdir = TempDir::new().unwrap();
    let bam_path = create_test_bam(&tmpdir, &fixture());
    let prefix = format!("{}/", tmpdir.path().display());

    Command::cargo_bin("ruHiC")
        .unwrap()
        .arg("--runMode")
        .arg("binless")
        .arg("--bamFile")
        .arg(&bam_path)
        .arg("--outPrefix")
        .arg(&prefix)
        .assert()
        .success();

    // No dangling-end detection without fragments: both chr1 pairs are written
    let lines = read_lines(&tmpdir.path().join("0_0"));
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.starts_with("1\t1\t")));
}

#[test]
fn test_missing_fragment_file_fails() {
    let tmpdir = TempDir::new().unwrap();
    let bam_path = create_test_bam(&tmpdir, &fixture());

    Command::cargo_bin("ruHiC")
        .unwrap()
        .arg("--bamFile")
        .arg(&bam_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fragmentFile"));
}

#[test]
fn test_unknown_chromosome_fails() {
    let tmpdir = TempDir::new().unwrap();
    let bam_path = create_test_bam(&tmpdir, &fixture());
    let bed_path = tmpdir.path().join("frags.bed");
    fs::write(&bed_path, "chr1\t0\t100\nchr1\t100\t200\n").unwrap();

    Command::cargo_bin("ruHiC")
        .unwrap()
        .arg("--bamFile")
        .arg(&bam_path)
        .arg("--fragmentFile")
        .arg(&bed_path)
        .arg("--outPrefix")
        .arg(format!("{}/", tmpdir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("chr2"));
}

#[test]
fn test_missing_bam_fails() {
    let tmpdir = TempDir::new().unwrap();
    let bed_path = create_test_fragments(&tmpdir);

    Command::cargo_bin("ruHiC")
        .unwrap()
        .arg("--bamFile")
        .arg(tmpdir.path().join("absent.bam"))
        .arg("--fragmentFile")
        .arg(&bed_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.bam"));
}
