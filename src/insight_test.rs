use super::*;

#[test]
fn normalise_collapses_whitespace() {
    assert_eq!(normalise_query("  how   is\n the\tSU7? "), Some("how is the SU7?".to_string()));
    assert_eq!(normalise_query(" \n\t "), None);
    assert_eq!(normalise_query(""), None);
}

#[test]
fn canned_answer_echoes_query_per_category() {
    let phone = canned_answer(Category::Phone, "battery?");
    let car = canned_answer(Category::Car, "battery?");
    assert!(phone.contains("\"battery?\""));
    assert!(car.contains("\"battery?\""));
    assert_ne!(phone, car);
    assert!(phone.ends_with(DISCLAIMER));
    assert!(phone.contains("4. "));
}

#[test]
fn every_category_has_examples() {
    for category in Category::ALL {
        assert!(example_queries(category).iter().all(|query| !query.is_empty()));
    }
}

#[tokio::test]
async fn blank_query_skips_the_responder() {
    let responder = InstrumentedInsightResponder::new(
        Arc::new(MockInsightResponder::new(Duration::ZERO)),
        "mock".to_string(),
        "test".to_string(),
    );
    assert_eq!(responder.ask(Category::Device, "   ").await, None);

    let answer = responder.ask(Category::Device, "noise  levels").await.expect("answer");
    assert!(answer.contains("\"noise levels\""));
}

#[tokio::test]
async fn unknown_provider_falls_back_to_canned_answer() {
    let settings = Settings::from_vars(vec![
        ("INSIGHT_PROVIDER".to_string(), "OpenAI".to_string()),
        ("INSIGHT_LATENCY_MS".to_string(), "0".to_string()),
    ])
    .expect("settings");
    let responder = build_insight_responder(&settings);
    assert_eq!(responder.provider, "openai");

    let answer = responder.ask(Category::Car, " range  in winter? ").await.expect("answer");
    assert_eq!(answer, canned_answer(Category::Car, "range in winter?"));
}

#[tokio::test]
async fn remote_responder_delegates_to_its_fallback() {
    let remote = RemoteInsightResponder {
        provider: "anthropic".to_string(),
        fallback: MockInsightResponder::new(Duration::ZERO),
    };
    let answer = remote.respond(Category::Phone, "heat?").await;
    assert_eq!(answer, canned_answer(Category::Phone, "heat?"));
}
