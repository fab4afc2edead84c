//! Cross-library flows the CLI strings together.
//!
//! ## Running
//!
//! ```bash
//! cargo test -p devbox-e2e --test toolbox_flows
//! ```

use chrono::{Datelike, NaiveDate};
use devbox_codec::{digest, DigestAlgorithm, Encoding, StreamingDigest};
use devbox_convert::qr::{decode_image, render_png};
use devbox_convert::regex::test as regex_test;
use devbox_convert::{json, Color, QrOptions, RegexFlags, RegexTemplate};
use devbox_idcard::{generate_batch, validate_at, Gender, GenerateOptions, LegacyIdNumber};
use devbox_store::{FileStore, History, KeyValueStore, Tool};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::AsyncReadExt;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

#[test]
fn generated_numbers_validate_and_land_in_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    let options = GenerateOptions {
        area: Some("3301".to_string()),
        start_year: 1990,
        end_year: 1999,
        gender: Some(Gender::Female),
    };
    let numbers = generate_batch(&options, 5, &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(numbers.len(), 5);

    {
        let mut store = FileStore::open(&path).unwrap();
        let mut history = History::new(&mut store, 3);
        for id in &numbers {
            let report = validate_at(id.as_str(), today());
            assert!(report.valid, "{} rejected: {:?}", id, report.reason);

            let info = report.info.unwrap();
            assert_eq!(info.gender, Gender::Female);
            assert!(info.area_code.starts_with("3301"));
            assert_eq!(info.province.as_deref(), Some("浙江省"));
            assert!((1990..=1999).contains(&info.birth_date.unwrap().year()));

            history.record(Tool::IdCard, "generate", id.as_str()).unwrap();
        }
    }

    let mut reopened = FileStore::open(&path).unwrap();
    let history = History::new(&mut reopened, 3);
    let entries = history.list(Tool::IdCard).unwrap();
    let outputs: Vec<_> = entries.iter().map(|e| e.output.as_str()).collect();
    let expected: Vec<_> = numbers.iter().rev().take(3).map(|id| id.as_str()).collect();
    assert_eq!(outputs, expected);
}

#[test]
fn legacy_upgrade_validates_as_standard() {
    let legacy = LegacyIdNumber::parse("110101900101001").unwrap();
    let upgraded = legacy.upgrade().unwrap();
    assert_eq!(upgraded.as_str().len(), 18);
    assert!(upgraded.as_str().starts_with("11010119900101001"));

    let report = validate_at(upgraded.as_str(), today());
    assert!(report.valid);
    assert_eq!(report.info.unwrap().age, Some(35));
}

#[test]
fn encodings_chain_back_to_the_original() {
    let original = "devbox 工具箱 <ok> & done";
    let mut text = original.to_string();
    for encoding in Encoding::ALL {
        text = encoding.encode(&text);
    }
    for encoding in Encoding::ALL.into_iter().rev() {
        text = encoding.decode(&text).unwrap();
    }
    assert_eq!(text, original);
}

#[tokio::test]
async fn streamed_file_digest_matches_one_shot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blob.bin");
    let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    tokio::fs::write(&path, &data).await.unwrap();

    let mut file = tokio::fs::File::open(&path).await.unwrap();
    let mut hasher = StreamingDigest::new(DigestAlgorithm::Sha256);
    let mut buf = vec![0u8; 8 * 1024];
    loop {
        let n = file.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    assert_eq!(hasher.bytes_processed(), data.len() as u64);
    assert_eq!(hasher.finalize(), digest(DigestAlgorithm::Sha256, &data));
}

#[test]
fn qr_payload_survives_render_and_scan() {
    let color = Color::parse("rgb(255, 136, 0)").unwrap().report();
    let png = render_png(&color.hex, &QrOptions::default()).unwrap();
    let payloads = decode_image(&png).unwrap();
    assert_eq!(payloads[0].content, "#ff8800");
}

#[test]
fn json_and_regex_tools_agree_on_document_content() {
    let doc = r#"{"contacts": ["a@example.com", "not-an-email", "b.c@example.org"]}"#;
    let pretty = json::format(doc, 2, true).unwrap();
    assert_eq!(json::validate(&pretty).unwrap().depth, 2);

    let value: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    let emails: Vec<_> = value["contacts"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .filter(|s| {
            regex_test(RegexTemplate::Email.pattern(), RegexFlags::default(), s)
                .unwrap()
                .is_match
        })
        .collect();
    assert_eq!(emails, vec!["a@example.com", "b.c@example.org"]);
}

#[test]
fn history_is_shared_per_file_but_separate_per_tool() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut store = FileStore::open(&path).unwrap();
    {
        let mut history = History::new(&mut store, 10);
        history.record(Tool::Encode, "hi", "aGk=").unwrap();
        history.record(Tool::Decode, "aGk=", "hi").unwrap();
        assert_eq!(history.clear(Tool::Encode).unwrap(), 1);
    }
    assert_eq!(store.keys().unwrap(), vec!["history.decode".to_string()]);

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(parsed.get("history.decode").is_some());
}
