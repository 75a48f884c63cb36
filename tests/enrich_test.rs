use async_trait::async_trait;
use exhibit_enrich::commands::{enrich_with_env, EnrichOptions};
use exhibit_enrich::config::{LlmOverrides, API_KEY_VAR, BASE_URL_VAR};
use exhibit_enrich::{
    DescriptionGenerator, EnrichError, EnrichSummary, Enricher, GenerationError, GenerationParams,
    PromptProfile,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

struct FixedGenerator {
    reply: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl DescriptionGenerator for FixedGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_enrich_file_with_stub() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.json");
    let output = dir.path().join("data_updated.json");
    fs::write(
        &input,
        r#"[{"name":"Clay Pot","era":"Jomon Period","theme":"Daily Life"},{"name":"X"}]"#,
    )
    .unwrap();

    let generator = FixedGenerator {
        reply: "  A sample description.  ",
        calls: AtomicUsize::new(0),
    };
    let enricher = Enricher::new(generator, PromptProfile::concise());
    let summary = enricher.run(&input, &output).await.unwrap();

    assert_eq!(
        summary,
        EnrichSummary {
            total: 2,
            updated: 1,
            skipped: 1,
            failed: 0
        }
    );
    assert_eq!(
        read_json(&output),
        json!([
            {
                "name": "Clay Pot",
                "era": "Jomon Period",
                "theme": "Daily Life",
                "description": "A sample description."
            },
            {"name": "X"}
        ])
    );
    // The input file is never rewritten.
    assert_eq!(
        read_json(&input),
        json!([{"name":"Clay Pot","era":"Jomon Period","theme":"Daily Life"},{"name":"X"}])
    );
}

fn options(dir: &Path) -> EnrichOptions {
    EnrichOptions {
        input: dir.join("data.json"),
        output: dir.join("data_updated.json"),
        profile: "curator".to_string(),
        template: None,
        temperature: None,
        llm: LlmOverrides::default(),
    }
}

#[tokio::test]
async fn test_no_credential_means_no_work() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("data.json"), r#"[{"name":"A","era":"B","theme":"C"}]"#).unwrap();
    let url = server.url();

    let err = enrich_with_env(options(dir.path()), |key| {
        (key == BASE_URL_VAR).then(|| url.clone())
    })
    .await
    .unwrap_err();

    assert!(matches!(err, EnrichError::MissingCredential));
    assert!(!dir.path().join("data_updated.json").exists());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_end_to_end_against_mock_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(mockito::Matcher::Regex("Haniwa".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"\n円筒埴輪は古墳の墳丘に並べられました。\n"}}]}"#)
        .expect(1)
        .create_async()
        .await;
    let limited = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::Regex("Dogu".to_string()))
        .with_status(429)
        .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("data.json"),
        r#"[
  {"name": "Dogu", "era": "Jomon", "theme": "Prayer", "description": "keep me"},
  {"name": "Haniwa", "era": "Kofun", "theme": "Burial"},
  {"name": "Mirror", "era": "Kofun"}
]"#,
    )
    .unwrap();
    let url = server.url();

    let summary = enrich_with_env(options(dir.path()), |key| match key {
        k if k == API_KEY_VAR => Some("sk-test".to_string()),
        k if k == BASE_URL_VAR => Some(url.clone()),
        _ => None,
    })
    .await
    .unwrap();

    assert_eq!(
        summary,
        EnrichSummary {
            total: 3,
            updated: 1,
            skipped: 1,
            failed: 1
        }
    );
    assert_eq!(
        read_json(&dir.path().join("data_updated.json")),
        json!([
            {"name": "Dogu", "era": "Jomon", "theme": "Prayer", "description": "keep me"},
            {
                "name": "Haniwa",
                "era": "Kofun",
                "theme": "Burial",
                "description": "円筒埴輪は古墳の墳丘に並べられました。"
            },
            {"name": "Mirror", "era": "Kofun"}
        ])
    );
    ok.assert_async().await;
    limited.assert_async().await;
}
