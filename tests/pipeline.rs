//! End-to-end runs against a real workspace on disk.
//!
//! Templates and photos are written as PNG files into a temp directory, the
//! config comes from a `cards.toml` in that directory, and both pipeline
//! operations run with the filesystem loader and writer.

use image::{Rgba, RgbaImage};
use member_cards::config::load_config;
use member_cards::members::parse_members;
use member_cards::pipeline::CardPipeline;
use member_cards::types::{MemberRecord, Side};
use member_cards::workspace::{ResetScope, Workspace};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
[card]
width = 160
height = 100

[front]
photo = { x = 5, y = 5, width = 30, height = 40 }
name = [50, 60]
role = [50, 85]
text = { size = 12 }
placeholder = { label_position = [8, 25], text = { size = 6 } }

[back]
tax_id = [90, 15]
birth_date = [10, 15]
baptism_date = [10, 40]
congregation = [90, 40]
valid_until = [10, 65]
text = { size = 10 }
"#;

const MEMBERS: &str = r#"[
    {"name": "Ana Souza", "tax_id": 1234567890, "role": "Deacon",
     "birth_date": 32874, "congregation": "Central", "valid_until": 46022},
    {"name": "Bia", "photo_ref": "bia.png"},
    {"name": "Caio"}
]"#;

fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(path)
        .unwrap();
}

/// A workspace with config and both templates; photo only for Bia.
fn setup() -> (TempDir, CardPipeline<member_cards::imaging::FsAssetLoader, member_cards::document::FsDocumentWriter>) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("cards.toml"), CONFIG).unwrap();
    let config = load_config(tmp.path()).unwrap();
    assert_eq!(config.card.width, 160);

    let ws = Workspace::new(tmp.path(), &config.paths);
    write_png(&ws.template_path(Side::Front), 160, 100, [240, 200, 200, 255]);
    // Back template at twice the card size; it gets scaled down
    write_png(&ws.template_path(Side::Back), 320, 200, [200, 200, 240, 255]);
    write_png(&ws.photos_dir().join("bia.png"), 12, 16, [20, 120, 20, 255]);

    let pipeline = CardPipeline::open(tmp.path(), config);
    (tmp, pipeline)
}

/// Check the file is a PDF and return its page count.
fn pdf_pages(path: &Path) -> usize {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"%PDF"), "{} is not a PDF", path.display());
    lopdf::Document::load_mem(&bytes).unwrap().get_pages().len()
}

#[test]
fn individual_cards_for_every_member() {
    let (tmp, pipeline) = setup();
    let members = parse_members(MEMBERS).unwrap();

    let report = pipeline.generate_all_cards(&members).unwrap();
    assert_eq!(report.success_count(), 3);
    assert_eq!(report.failure_count(), 0);

    let cards = tmp.path().join("cards");
    for file in ["Ana_Souza.pdf", "Bia.pdf", "Caio.pdf"] {
        assert_eq!(pdf_pages(&cards.join(file)), 2, "{file}");
    }
    // No temp files left behind
    let count = fs::read_dir(&cards).unwrap().count();
    assert_eq!(count, 3);
}

#[test]
fn batch_holds_two_pages_per_member() {
    let (_tmp, pipeline) = setup();
    let members = parse_members(MEMBERS).unwrap();

    let report = pipeline.generate_batch_pdf(&members).unwrap().unwrap();
    assert_eq!(report.page_count, 6);
    assert_eq!(report.pages[0].side, Side::Front);
    assert_eq!(report.pages[5].member, "Caio");
    assert_eq!(report.pages[5].side, Side::Back);
    assert_eq!(report.path, pipeline.workspace().batch_path());
    assert_eq!(pdf_pages(&report.path), report.page_count);
}

#[test]
fn empty_member_list_writes_no_batch() {
    let (_tmp, pipeline) = setup();
    assert!(pipeline.generate_batch_pdf(&[]).unwrap().is_none());
    assert!(!pipeline.workspace().batch_path().exists());

    let report = pipeline.generate_all_cards(&[]).unwrap();
    assert_eq!(report.success_count(), 0);
}

#[test]
fn missing_template_fails_every_member_but_not_the_run() {
    let (_tmp, pipeline) = setup();
    fs::remove_file(pipeline.workspace().template_path(Side::Front)).unwrap();
    let members = parse_members(MEMBERS).unwrap();

    let cards = pipeline.generate_all_cards(&members).unwrap();
    assert_eq!(cards.success_count(), 0);
    assert_eq!(cards.failure_count(), 3);
    assert!(!pipeline.workspace().card_path(&members[0]).exists());

    let batch = pipeline.generate_batch_pdf(&members).unwrap().unwrap();
    assert_eq!(batch.page_count, 0);
    assert_eq!(batch.tally.failure_count(), 3);
    assert_eq!(pdf_pages(&batch.path), 0);
}

#[test]
fn missing_photo_still_produces_card() {
    let (_tmp, pipeline) = setup();
    let member = MemberRecord::new("Nobody Here");
    let report = pipeline.generate_all_cards(&[member.clone()]).unwrap();
    assert_eq!(report.successes, vec![pipeline.workspace().card_path(&member)]);
}

#[test]
fn rerun_overwrites_same_paths() {
    let (tmp, pipeline) = setup();
    let members = parse_members(MEMBERS).unwrap();

    let first = pipeline.generate_all_cards(&members).unwrap();
    pipeline.generate_batch_pdf(&members).unwrap();
    let second = pipeline.generate_all_cards(&members).unwrap();
    pipeline.generate_batch_pdf(&members).unwrap();

    assert_eq!(first.successes, second.successes);
    let status = Workspace::new(tmp.path(), &load_config(tmp.path()).unwrap().paths)
        .status()
        .unwrap();
    assert_eq!(status.card_count, 3);
    assert!(status.batch_exists);
    assert_eq!(status.photo_count, 1);
}

#[test]
fn reset_removes_generated_documents() {
    let (_tmp, pipeline) = setup();
    let members = parse_members(MEMBERS).unwrap();
    pipeline.generate_all_cards(&members).unwrap();
    pipeline.generate_batch_pdf(&members).unwrap();

    let removed = pipeline.workspace().reset(ResetScope::Output).unwrap();
    assert_eq!(removed.len(), 4);
    let status = pipeline.workspace().status().unwrap();
    assert_eq!(status.card_count, 0);
    assert!(!status.batch_exists);
    assert!(status.front_template && status.back_template);
}
