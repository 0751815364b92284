use std::path::PathBuf;
use uuid::Uuid;
use vox_protocol::*;

#[test]
fn test_submit_request_deserialization_from_json() {
    // Sample body based on the public API contract
    let json_str = r#"
{
    "user_id": "user-42",
    "video_path": "input/interview.mp4",
    "source_language": "zh",
    "target_language": "en",
    "synthesis_engine": "gptsovits",
    "subtitle_mode": "external"
}
"#;

    let request: SubmitRequest =
        serde_json::from_str(json_str).expect("Failed to deserialize SubmitRequest");

    assert_eq!(request.user_id, "user-42");
    assert_eq!(request.video_path, PathBuf::from("input/interview.mp4"));
    assert_eq!(request.source_language, "zh");
    assert_eq!(request.target_language, "en");
    assert_eq!(request.synthesis_engine, "gptsovits");
    assert_eq!(request.subtitle_mode, SubtitleMode::External);
}

#[test]
fn test_job_status_serialization() {
    let status = JobStatus::Running;
    let json = serde_json::to_value(status).expect("Failed to serialize JobStatus");

    assert_eq!(json, "RUNNING");

    let deserialized: JobStatus =
        serde_json::from_value(json).expect("Failed to deserialize JobStatus");
    assert_eq!(deserialized, JobStatus::Running);
}

#[test]
fn test_job_record_roundtrip() {
    let record = JobRecord::new(
        "user-1",
        vec![
            "separation".to_string(),
            "transcription".to_string(),
            "translation".to_string(),
            "synthesis".to_string(),
            "mux".to_string(),
        ],
        JobConfig {
            video_path: PathBuf::from("input/talk.mp4"),
            source_language: "auto".to_string(),
            target_language: "ja".to_string(),
            synthesis_engine: "indextts".to_string(),
            subtitle_mode: SubtitleMode::Embed,
        },
    );

    let json = serde_json::to_string(&record).expect("Failed to serialize JobRecord");
    let deserialized: JobRecord =
        serde_json::from_str(&json).expect("Failed to deserialize JobRecord");

    assert_eq!(deserialized.job_id, record.job_id);
    assert_eq!(deserialized.user_id, record.user_id);
    assert_eq!(deserialized.stages.len(), 5);
    assert_eq!(deserialized.status, JobStatus::Queued);
    assert_eq!(deserialized.created_at, record.created_at);
}

#[test]
fn test_status_response_json_shape() {
    let response = StatusResponse {
        job_id: Uuid::new_v4(),
        status: JobStatus::Failed,
        progress: 40,
        current_stage: Some("translation".to_string()),
        message: "translation stage failed".to_string(),
        result: None,
        error: Some("translation stage failed: exit status 1".to_string()),
    };

    let value = serde_json::to_value(&response).expect("Failed to serialize StatusResponse");

    assert_eq!(value["status"], "FAILED");
    assert_eq!(value["progress"], 40);
    assert_eq!(value["current_stage"], "translation");
    // result is absent rather than null when unset
    assert!(value.get("result").is_none());
    assert!(value["error"].as_str().is_some());
}

#[test]
fn test_ok_response_shape() {
    let json = serde_json::to_string(&OkResponse::ok()).expect("Failed to serialize OkResponse");
    assert_eq!(json, r#"{"ok":true}"#);
}
