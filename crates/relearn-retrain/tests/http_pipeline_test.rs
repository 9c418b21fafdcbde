//! End-to-end tests over real HTTP against a local mock server.

use mockito::Matcher;
use relearn_http::ReqwestTransport;
use relearn_retrain::{
    EndpointUpdater, PollConfig, RequestStage, RetrainError, RetrainPipeline, RetrainService, Retrainer,
    ScoreRequest, ScoringClient, StorageAccount, StringTable, UpdateOutcome,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn api_version() -> Matcher {
    Matcher::UrlEncoded("api-version".into(), "2.0".into())
}

#[tokio::test]
async fn test_retrain_and_update_over_http() {
    let mut server = mockito::Server::new_async().await;

    let submit = server
        .mock("POST", "/jobs")
        .match_query(api_version())
        .match_header("authorization", "Bearer retrain-key")
        .match_body(Matcher::PartialJson(json!({
            "Inputs": {"input2": {"RelativeLocation": "container/data.csv"}},
            "Outputs": {"output2": {"RelativeLocation": "container-learnings/data_outputresults.ilearner"}},
            "GlobalParameters": {}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#""job-http""#)
        .create_async()
        .await;

    let start = server
        .mock("POST", "/jobs/job-http/start")
        .match_query(api_version())
        .match_header("authorization", "Bearer retrain-key")
        .with_status(200)
        .create_async()
        .await;

    let status = server
        .mock("GET", "/jobs/job-http")
        .match_query(api_version())
        .match_header("authorization", "Bearer retrain-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "StatusCode": "Finished",
                "Results": {
                    "output1": {
                        "ConnectionString": null,
                        "RelativeLocation": "container-learnings/data_scores.csv",
                        "BaseLocation": "https://acct.blob.core.windows.net/",
                        "SasBlobToken": "?sig=csv"
                    },
                    "output2": {
                        "ConnectionString": null,
                        "RelativeLocation": "container-learnings/data_outputresults.ilearner",
                        "BaseLocation": "https://acct.blob.core.windows.net/",
                        "SasBlobToken": "?sig=model"
                    }
                },
                "Details": null
            })
            .to_string(),
        )
        .create_async()
        .await;

    let patch = server
        .mock("PATCH", "/endpoints/update")
        .match_header("authorization", "Bearer endpoint-key")
        .match_body(Matcher::Json(json!({
            "Resources": [{
                "Name": "Trained Model",
                "Location": {
                    "BaseLocation": "https://acct.blob.core.windows.net/",
                    "RelativeLocation": "container-learnings/data_outputresults.ilearner",
                    "SasBlobToken": "?sig=model"
                }
            }]
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let transport = Arc::new(ReqwestTransport::new());
    let service = RetrainService::new(format!("{}/jobs", server.url()), "retrain-key", transport.clone());
    let updater = EndpointUpdater::new(format!("{}/endpoints/update", server.url()), "endpoint-key", transport);
    let pipeline = RetrainPipeline::new(Retrainer::new(service, PollConfig::default()), updater, "Trained Model");

    let account = StorageAccount::new("acct", "account-key");
    let input = account.blob("container", "data.csv");
    let output = account.blob("container-learnings", "data_outputresults.ilearner");

    let report = pipeline.run(&input, &output).await.unwrap();
    assert_eq!(report.retrain_message, "Job job-http finished!");
    assert_eq!(
        report.outcomes,
        vec![UpdateOutcome::Updated { relative_location: "container-learnings/data_outputresults.ilearner".into() }]
    );

    submit.assert_async().await;
    start.assert_async().await;
    status.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test]
async fn test_scoring_success_returns_body() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"{"Results": {"output1": {"type": "table", "value": {"Values": [["1", "0.92"]]}}}}"#;
    let mock = server
        .mock("POST", "/score/execute")
        .match_query(Matcher::AllOf(vec![
            api_version(),
            Matcher::UrlEncoded("details".into(), "true".into()),
        ]))
        .match_header("authorization", "Bearer scoring-key")
        .match_body(Matcher::PartialJson(json!({"Inputs": {"input1": {"ColumnNames": ["age"]}}})))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = ScoringClient::new(format!("{}/score", server.url()), "scoring-key", Arc::new(ReqwestTransport::new()));
    let request = ScoreRequest {
        inputs: HashMap::from([(
            "input1".to_string(),
            StringTable { column_names: vec!["age".into()], values: vec![vec!["42".into()]] },
        )]),
        global_parameters: HashMap::new(),
    };

    let response = client.request_score(&request).await.unwrap();
    assert_eq!(response.message, "Request executed successfully.");
    assert_eq!(response.body, body);
    assert!(response.json().unwrap()["Results"]["output1"].is_object());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_scoring_failure_is_formatted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/score/execute")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("x-ms-request-id", "req-1")
        .with_body("Unauthorized")
        .create_async()
        .await;

    let client = ScoringClient::new(format!("{}/score", server.url()), "wrong", Arc::new(ReqwestTransport::new()));
    let err = client.request_score(&ScoreRequest::default()).await.unwrap_err();

    match err {
        RetrainError::Http { stage, status, message } => {
            assert_eq!(stage, RequestStage::Score);
            assert_eq!(status, 401);
            assert!(message.starts_with("The request failed with status code: 401 Unauthorized"));
            assert!(message.contains("x-ms-request-id: req-1"));
            assert!(message.ends_with("Unauthorized"));
        }
        other => panic!("Expected Http error, got {:?}", other),
    }

    mock.assert_async().await;
}
