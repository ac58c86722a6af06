//! Conversion client against a mock speech endpoint

mod common;

use common::MockServerFixture;
use speak_it::error::{SERVER_FALLBACK_MESSAGE, TRANSPORT_MESSAGE};
use speak_it::{AudioFormat, AudioPayload, ConversionClient, ConversionRequest, Converter, Error, ResponseMode};

#[tokio::test]
async fn posts_text_and_voice_and_returns_audio() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_audio(
            Some(serde_json::json!({
                "text": "Hello world",
                "selectedVoiceId": "Pw7NjARk1Tw61eca5OiP"
            })),
            b"ID3\x03fake-mp3",
        )
        .await;

    let payload = fixture
        .client()
        .convert_text(" Hello world ", Some("Pw7NjARk1Tw61eca5OiP"))
        .await
        .expect("conversion succeeds");

    mock.assert_async().await;
    match payload {
        AudioPayload::Audio { data, format } => {
            assert_eq!(&data[..], b"ID3\x03fake-mp3");
            assert_eq!(format, AudioFormat::Mp3);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[tokio::test]
async fn server_error_message_is_extracted() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json(500, r#"{"error":"boom"}"#).await;

    let err = fixture
        .client()
        .convert(&ConversionRequest::new("hi", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Server { status: 500, .. }));
    assert_eq!(err.user_message(), "boom");
}

#[tokio::test]
async fn unparseable_error_body_uses_fallback() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_plain(502, "<html>Bad Gateway</html>").await;

    let err = fixture.client().convert_text("hi", None).await.unwrap_err();
    assert_eq!(err.user_message(), SERVER_FALLBACK_MESSAGE);
}

#[tokio::test]
async fn single_attempt_per_call() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", common::ENDPOINT)
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"busy"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = fixture.client().convert_text("hi", None).await.unwrap_err();
    assert_eq!(err.user_message(), "busy");
    mock.assert_async().await;
}

#[tokio::test]
async fn audio_url_variant() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(200, r#"{"audioUrl":"https://cdn.example.com/a.mp3"}"#)
        .await;

    let payload = fixture
        .client_with_mode(ResponseMode::AudioUrl)
        .convert_text("hi", None)
        .await
        .unwrap();
    assert_eq!(payload, AudioPayload::Url("https://cdn.example.com/a.mp3".into()));
}

#[tokio::test]
async fn malformed_success_body_is_transport_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json(200, "{not json").await;

    let err = fixture.client().convert_text("hi", None).await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert_eq!(err.user_message(), TRANSPORT_MESSAGE);
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    // Bind then drop a listener to get a port nobody is serving.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ConversionClient::builder()
        .base_url(format!("http://127.0.0.1:{}", port))
        .timeout_secs(2)
        .build()
        .unwrap();

    let err = client.convert_text("hi", None).await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert_eq!(err.user_message(), TRANSPORT_MESSAGE);
}

#[tokio::test]
async fn alternate_endpoint_path() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/api/convert")
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(b"abc")
        .create_async()
        .await;

    let client = ConversionClient::builder()
        .base_url(&fixture.base_url)
        .endpoint_path("/api/convert")
        .build()
        .unwrap();
    assert!(client.convert_text("hi", None).await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn json_content_type_is_matched_case_insensitively() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("POST", common::ENDPOINT)
        .with_status(200)
        .with_header("content-type", "Application/JSON; charset=utf-8")
        .with_body(r#"{"audioUrl":"https://cdn.example.com/b.mp3"}"#)
        .create_async()
        .await;

    // Binary mode still reads a JSON success body as the audio URL variant.
    let payload = fixture.client().convert_text("hi", None).await.unwrap();
    assert_eq!(payload, AudioPayload::Url("https://cdn.example.com/b.mp3".into()));
}

#[tokio::test]
async fn truncated_error_body_reports_server_failure() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        // Drain the whole request (its JSON body ends with `}`) before answering.
        while !request.ends_with(b"}") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        // Promise 100 bytes, send one, hang up.
        socket
            .write_all(
                b"HTTP/1.1 500 Internal Server Error\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = ConversionClient::builder()
        .base_url(format!("http://{}", addr))
        .timeout_secs(5)
        .build()
        .unwrap();
    let err = client.convert_text("hi", None).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, Error::Server { status: 500, message: None }));
    assert_eq!(err.user_message(), SERVER_FALLBACK_MESSAGE);
}
