use std::collections::BTreeMap;

use kanji_lang_japanese::{KanjidicEntry, ReferenceLoader};
use kanji_wanikani::{KanjiSubjectRecord, RadicalRecord};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::temp_config;
use crate::sources::{SourceCache, clear_cache};

async fn mount_keisei(server: &MockServer) {
    for (file, body) in [
        (
            "/kanji.json",
            json!({"花": {"type": "comp_phonetic", "semantic": "艹", "phonetic": "化"}}),
        ),
        ("/phonetic.json", json!({"化": {"readings": ["カ"]}})),
        ("/wk_kanji.json", json!({"花": {"meaning": "Flower", "onyomi": "か"}})),
    ] {
        Mock::given(method("GET"))
            .and(path(file))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn downloads_and_caches_reference_tables() {
    let server = MockServer::start().await;
    mount_keisei(&server).await;
    Mock::given(method("GET"))
        .and(path("/dead/kradfile-u"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/kradfile-u"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# header\n花 : 化 艹\n"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = temp_config(&dir);
    config.sources.kanji_db_url = format!("{}/kanji.json", server.uri());
    config.sources.phonetic_db_url = format!("{}/phonetic.json", server.uri());
    config.sources.wk_kanji_db_url = format!("{}/wk_kanji.json", server.uri());
    config.sources.kradfile_urls = vec![
        format!("{}/dead/kradfile-u", server.uri()),
        format!("{}/kradfile-u", server.uri()),
    ];
    config.sources.kanjidic_path = None;
    config.wanikani.api_key = None;

    SourceCache::new(&config).unwrap().ensure_all().await.unwrap();

    for name in ["kanji_db", "phonetic_db", "wk_kanji_db", "kradfile"] {
        assert!(config.paths.cache_file(name).exists(), "{} not cached", name);
    }
    let kradfile: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(config.paths.cache_file("kradfile")).unwrap())
            .unwrap();
    assert_eq!(kradfile["花"], json!(["化", "艹"]));

    assert_eq!(clear_cache(&config.paths.cache_dir).unwrap(), 4);
    assert!(!config.paths.cache_file("kanji_db").exists());
}

#[tokio::test]
async fn missing_keisei_table_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = temp_config(&dir);
    config.sources.kanji_db_url = format!("{}/kanji.json", server.uri());

    assert!(SourceCache::new(&config).unwrap().ensure_all().await.is_err());
}

#[test]
fn kanjidic_export_is_parsed_into_cache() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("kanjidic2.json");
    std::fs::write(
        &export,
        r#"{"characters": [{"literal": "亜", "readingMeaning": {"groups": [
            {"readings": [{"type": "ja_on", "value": "ア"}], "meanings": [{"lang": "en", "value": "Asia"}]}
        ]}}]}"#,
    )
    .unwrap();

    let mut config = temp_config(&dir);
    config.sources.kanjidic_path = Some(export);
    SourceCache::new(&config).unwrap().ensure_kanjidic().unwrap();

    let cached: BTreeMap<String, KanjidicEntry> =
        ReferenceLoader::load_table(&config.paths.cache_file("kanjidic"), "KANJIDIC").unwrap();
    assert_eq!(cached["亜"].onyomi, vec!["あ"]);
    assert_eq!(cached["亜"].meanings, vec!["Asia"]);
}

#[tokio::test]
async fn wanikani_radicals_are_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subjects"))
        .and(query_param("types", "radical"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "data": {"characters": "艹", "level": 1, "slug": "flowers",
                                   "meanings": [{"meaning": "Flowers", "primary": true}]}},
                {"id": 2, "data": {"characters": "化", "level": 3, "slug": "change",
                                   "meanings": [{"meaning": "Change", "primary": true}]}}
            ],
            "pages": {"next_url": null}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/subjects"))
        .and(query_param("types", "kanji"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 10, "data": {"characters": "花", "level": 5, "slug": "花",
                                    "meanings": [{"meaning": "Flower", "primary": true}],
                                    "readings": [{"reading": "か", "type": "onyomi", "primary": true}],
                                    "component_subject_ids": [1, 2]}}
            ],
            "pages": {"next_url": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = temp_config(&dir);
    config.wanikani.api_url = server.uri();
    config.wanikani.api_key = Some("token".to_string());

    SourceCache::new(&config).unwrap().ensure_wanikani().await.unwrap();

    let radicals: BTreeMap<String, RadicalRecord> =
        ReferenceLoader::load_table(&config.paths.cache_file("wk_radicals"), "radicals").unwrap();
    assert_eq!(radicals["艹"].name, "Flowers");
    let subjects: BTreeMap<String, KanjiSubjectRecord> = ReferenceLoader::load_table(
        &config.paths.cache_file("wk_kanji_subjects"),
        "subjects",
    )
    .unwrap();
    assert_eq!(subjects["花"].component_radicals, vec!["艹", "化"]);
}
