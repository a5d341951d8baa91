//! Integration tests for the translation pipeline
//!
//! These tests drive the full chunk -> provider chain -> aggregate workflow
//! against mocked Google Translate and MyMemory endpoints.

use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use bosnian_translate::providers::mymemory::DEFAULT_MYMEMORY_EMAIL;
use bosnian_translate::{
    config::Config, document::ExtractorRegistry, Language, TranslateError, TranslationMode,
    TranslationPipeline,
};

// ==================== Test Helpers ====================

const GOOGLE_PATH: &str = "/translate_a/single";
const MYMEMORY_PATH: &str = "/get";

/// Config pointing both providers at the mock server, with no backoff
fn create_test_config(server: &MockServer, max_attempts: u32) -> Config {
    Config {
        google_translate_url: format!("{}{}", server.uri(), GOOGLE_PATH),
        mymemory_url: format!("{}{}", server.uri(), MYMEMORY_PATH),
        request_timeout_secs: 5,
        max_attempts,
        base_delay_ms: 0,
        ..Config::default()
    }
}

fn create_pipeline(config: &Config, mode: TranslationMode) -> TranslationPipeline {
    let client = config.http_client().expect("Failed to build client");
    TranslationPipeline::from_config(config, client, mode)
}

fn google_body(translated: &str) -> serde_json::Value {
    json!([[[translated, "source", null, null, 10]], null, "en"])
}

fn mymemory_body(translated: &str) -> serde_json::Value {
    json!({
        "responseData": { "translatedText": translated, "match": 0.85 },
        "responseStatus": 200,
        "responseDetails": ""
    })
}

async fn mock_google(server: &MockServer, q: &str, translated: &str) {
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .and(query_param("q", q))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_body(translated)))
        .mount(server)
        .await;
}

async fn mock_google_down(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(server)
        .await;
}

// ==================== Workflow Tests ====================

#[tokio::test]
async fn test_paragraphs_translated_in_order() {
    let server = MockServer::start().await;

    mock_google(&server, "Good morning.", "Dobro jutro.").await;
    mock_google(&server, "How are you today?", "Kako ste danas?").await;
    mock_google(&server, "See you soon.", "Vidimo se uskoro.").await;

    let config = create_test_config(&server, 1);
    let pipeline = create_pipeline(&config, TranslationMode::Interactive);

    let translated = pipeline
        .translate_text(
            "Good morning.\n\nHow are you today?\n\nSee you soon.",
            Language::ENGLISH,
            Language::BOSNIAN,
        )
        .await
        .expect("Translation should succeed");

    assert_eq!(
        translated,
        "Dobro jutro.\n\nKako ste danas?\n\nVidimo se uskoro."
    );
}

#[tokio::test]
async fn test_google_request_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .and(query_param("client", "gtx"))
        .and(query_param("sl", "bs"))
        .and(query_param("tl", "zh-CN"))
        .and(query_param("dt", "t"))
        .and(query_param("q", "Hvala"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_body("谢谢")))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 1);
    let pipeline = create_pipeline(&config, TranslationMode::Interactive);

    let translated = pipeline
        .translate_text("Hvala", Language::BOSNIAN, Language::CHINESE)
        .await
        .expect("Translation should succeed");

    assert_eq!(translated, "谢谢");
}

#[tokio::test]
async fn test_falls_back_to_mymemory_when_google_fails() {
    let server = MockServer::start().await;

    mock_google_down(&server).await;
    Mock::given(method("GET"))
        .and(path(MYMEMORY_PATH))
        .and(query_param("q", "Thank you"))
        .and(query_param("langpair", "en|bs"))
        .and(query_param("de", DEFAULT_MYMEMORY_EMAIL))
        .and(query_param("mt", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mymemory_body("Hvala vam")))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 3);
    let pipeline = create_pipeline(&config, TranslationMode::Interactive);

    let translated = pipeline
        .translate_text("Thank you", Language::ENGLISH, Language::BOSNIAN)
        .await
        .expect("Fallback should succeed");

    assert_eq!(translated, "Hvala vam");
}

#[tokio::test]
async fn test_all_providers_down_aborts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(MYMEMORY_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 2);
    let pipeline = create_pipeline(&config, TranslationMode::Interactive);

    let err = pipeline
        .translate_text("Hello", Language::ENGLISH, Language::BOSNIAN)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TranslateError::QualityThresholdExceeded {
            failed: 1,
            total: 1
        }
    ));
}

#[tokio::test]
async fn test_partial_failure_keeps_placeholder() {
    let server = MockServer::start().await;

    // Only the third paragraph fails on Google; MyMemory is down throughout
    Mock::given(method("GET"))
        .and(path(GOOGLE_PATH))
        .and(query_param("q", "Something the services cannot handle at all."))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(MYMEMORY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    mock_google(&server, "One.", "Jedan.").await;
    mock_google(&server, "Two.", "Dva.").await;
    mock_google(&server, "Four.", "Četiri.").await;

    let config = create_test_config(&server, 1);
    let pipeline = create_pipeline(&config, TranslationMode::Interactive);

    let translated = pipeline
        .translate_text(
            "One.\n\nTwo.\n\nSomething the services cannot handle at all.\n\nFour.",
            Language::ENGLISH,
            Language::BOSNIAN,
        )
        .await
        .expect("25% failures is under the threshold");

    assert_eq!(
        translated,
        "Jedan.\n\nDva.\n\n[Failed to translate: \"Something the services cannot ...\"]\n\nČetiri."
    );
}

#[tokio::test]
async fn test_mymemory_body_status_counts_as_failure() {
    let server = MockServer::start().await;

    mock_google_down(&server).await;
    Mock::given(method("GET"))
        .and(path(MYMEMORY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": { "translatedText": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY" },
            "responseStatus": 429,
            "responseDetails": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY"
        })))
        .mount(&server)
        .await;

    let config = create_test_config(&server, 1);
    let pipeline = create_pipeline(&config, TranslationMode::Interactive);

    let result = pipeline
        .translate_text("Hello", Language::ENGLISH, Language::BOSNIAN)
        .await;

    assert!(matches!(
        result,
        Err(TranslateError::QualityThresholdExceeded { .. })
    ));
}

// ==================== Input Validation Tests ====================

#[tokio::test]
async fn test_empty_input_makes_no_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_body("x")))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 1);
    let pipeline = create_pipeline(&config, TranslationMode::Interactive);

    let err = pipeline
        .translate_text(" \n\t ", Language::ENGLISH, Language::BOSNIAN)
        .await
        .unwrap_err();

    assert!(matches!(err, TranslateError::EmptyInput));
}

#[tokio::test]
async fn test_same_language_makes_no_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_body("x")))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 1);
    let pipeline = create_pipeline(&config, TranslationMode::Interactive);

    let translated = pipeline
        .translate_text("  Dobar dan  ", Language::BOSNIAN, Language::BOSNIAN)
        .await
        .unwrap();

    assert_eq!(translated, "Dobar dan");
}

// ==================== Document Tests ====================

#[tokio::test]
async fn test_document_translated_in_batch_mode() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    // Two short paragraphs; batch mode still splits on paragraphs
    let doc_path = temp_dir.path().join("lesson.md");
    std::fs::write(
        &doc_path,
        "\u{feff}Lesson one.\r\n\r\nThe cat sleeps on the warm windowsill.",
    )
    .expect("Failed to write document");

    mock_google(&server, "Lesson one.", "Lekcija prva.").await;
    mock_google(
        &server,
        "The cat sleeps on the warm windowsill.",
        "Mačka spava na toploj prozorskoj dasci.",
    )
    .await;

    let text = ExtractorRegistry::default()
        .extract_file(&doc_path)
        .expect("Extraction should succeed");

    let config = create_test_config(&server, 1);
    let pipeline = create_pipeline(&config, TranslationMode::Batch);
    assert_eq!(pipeline.options().max_chunk_size, config.batch_chunk_size);

    let translated = pipeline
        .translate_text(&text, Language::ENGLISH, Language::BOSNIAN)
        .await
        .expect("Translation should succeed");

    assert_eq!(
        translated,
        "Lekcija prva.\n\nMačka spava na toploj prozorskoj dasci."
    );
}
