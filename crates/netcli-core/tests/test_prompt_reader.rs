mod common;

use common::ScriptedTransport;
use netcli_core::transport::telnet;
use netcli_core::{NetcliError, PromptReader};
use regex::Regex;
use std::time::Duration;

fn reader(chunks: &[&str]) -> (PromptReader, common::WriteLog) {
    let (transport, writes) = ScriptedTransport::new(chunks);
    let reader = PromptReader::new(
        Box::new(transport),
        "192.0.2.9",
        Regex::new(r">|\#").unwrap(),
        Duration::from_millis(500),
    );
    (reader, writes)
}

#[tokio::test]
async fn accumulates_chunks_until_the_pattern_matches() {
    let (mut reader, _writes) = reader(&["Rout", "er", ">"]);
    let pattern = Regex::new(r"Router>").unwrap();

    let output = reader.read_until_patterns(&[pattern.clone()], None).await.unwrap();
    assert_eq!(output, "Router>");
    // The returned buffer ends in a region satisfying the pattern
    assert_eq!(pattern.find(&output).unwrap().end(), output.len());
}

#[tokio::test]
async fn any_pattern_in_the_set_terminates_the_read() {
    let (mut reader, _writes) = reader(&["Destination filename [startup-config]? "]);
    let patterns = [
        Regex::new(r"Router>").unwrap(),
        Regex::new(r"\[startup-config\]\?").unwrap(),
    ];

    let output = reader.read_until_patterns(&patterns, None).await.unwrap();
    assert!(output.contains("startup-config"));
}

#[tokio::test]
async fn prompt_reads_fall_back_to_delimiters_before_resolution() {
    let (mut reader, _writes) = reader(&["login banner\r\nswitch>"]);
    let output = reader.read_until_prompt(None).await.unwrap();
    assert!(output.ends_with("switch>"));
}

#[tokio::test]
async fn prompt_or_pattern_prefers_the_base_pattern() {
    let (mut reader, _writes) = reader(&["copy done\r\nRouter#"]);
    reader.set_base_prompt("Router");
    reader.set_base_pattern(Regex::new(r"Router[>#]").unwrap());

    let extra = [Regex::new(r"\[confirm\]").unwrap()];
    let output = reader.read_until_prompt_or_patterns(&extra, None).await.unwrap();
    assert!(output.ends_with("Router#"));
}

#[tokio::test]
async fn timeout_discards_the_partial_buffer() {
    let (mut reader, _writes) = reader(&["partial output without a prompt"]);
    let pattern = Regex::new(r"Router>").unwrap();

    let err = reader
        .read_until_patterns(&[pattern], Some(Duration::from_millis(50)))
        .await
        .unwrap_err();
    match err {
        NetcliError::TimeoutError { host, action } => {
            assert_eq!(host, "192.0.2.9");
            assert!(action.contains("Router>"));
        }
        other => panic!("expected timeout error, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_utf8_is_replaced_not_fatal() {
    let raw_transport = ScriptedTransportRaw::new(vec![vec![0xff, 0xfe], b"Router>".to_vec()]);
    let mut reader = PromptReader::new(
        Box::new(raw_transport),
        "192.0.2.9",
        Regex::new(r">").unwrap(),
        Duration::from_millis(500),
    );
    let output = reader
        .read_until_patterns(&[Regex::new(r"Router>").unwrap()], None)
        .await
        .unwrap();
    assert!(output.ends_with("Router>"));
    assert!(output.starts_with('\u{fffd}'));
}

/// Byte-level variant of the scripted transport for non-UTF-8 chunks.
struct ScriptedTransportRaw {
    reads: std::collections::VecDeque<Vec<u8>>,
}

impl ScriptedTransportRaw {
    fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            reads: chunks.into(),
        }
    }
}

#[async_trait::async_trait]
impl netcli_core::Transport for ScriptedTransportRaw {
    async fn send(&mut self, _data: &[u8]) -> Result<(), NetcliError> {
        Ok(())
    }

    async fn read(&mut self, _max: usize) -> Result<Vec<u8>, NetcliError> {
        match self.reads.pop_front() {
            Some(chunk) => Ok(chunk),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> Result<(), NetcliError> {
        Ok(())
    }
}

#[tokio::test]
async fn telnet_login_answers_the_dialogue() {
    let (mut reader, writes) = reader(&["Username: ", "Password: ", "\r\nswitch>"]);
    telnet::login(&mut reader, "admin", "pass").await.unwrap();

    let writes = writes.lock().unwrap();
    assert_eq!(*writes, vec!["admin\n", "pass\n", "\n"]);
}

#[tokio::test]
async fn telnet_login_rejection_is_an_authentication_error() {
    let (mut reader, _writes) = reader(&["Username: ", "Password: ", "Login invalid\r\n"]);
    let err = telnet::login(&mut reader, "admin", "wrong").await.unwrap_err();
    match err {
        NetcliError::AuthenticationError { host, .. } => assert_eq!(host, "192.0.2.9"),
        other => panic!("expected authentication error, got {:?}", other),
    }
}
