#![allow(dead_code)]

use async_trait::async_trait;
use netcli_core::{DeviceSession, NetcliError, SessionConfig, Transport};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type WriteLog = Arc<Mutex<Vec<String>>>;

/// Transport replaying a fixed sequence of read chunks and recording every
/// write. Once the script is exhausted, reads suspend forever so timeout
/// behaviour can be exercised.
pub struct ScriptedTransport {
    reads: VecDeque<Vec<u8>>,
    writes: WriteLog,
}

impl ScriptedTransport {
    pub fn new(chunks: &[&str]) -> (Self, WriteLog) {
        let writes: WriteLog = Arc::new(Mutex::new(Vec::new()));
        let transport = Self {
            reads: chunks.iter().map(|c| c.as_bytes().to_vec()).collect(),
            writes: writes.clone(),
        };
        (transport, writes)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&mut self, data: &[u8]) -> Result<(), NetcliError> {
        self.writes
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(data).into_owned());
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

pub fn test_config() -> SessionConfig {
    SessionConfig::builder()
        .host("192.0.2.1")
        .username("admin")
        .password("pass")
        .secret("enablepass")
        .timeout(Duration::from_millis(500))
        .build()
}

pub fn session(device_type: &str) -> DeviceSession {
    netcli_core::create(device_type, test_config()).unwrap()
}

/// Build a session of the given type and run the connect pipeline over a
/// scripted transport.
pub async fn connected_session(device_type: &str, chunks: &[&str]) -> (DeviceSession, WriteLog) {
    let mut session = session(device_type);
    let (transport, writes) = ScriptedTransport::new(chunks);
    session
        .connect_over(Box::new(transport))
        .await
        .expect("connect should succeed against the scripted transport");
    (session, writes)
}

pub fn wrote(writes: &WriteLog, expected: &str) -> bool {
    writes.lock().unwrap().iter().any(|w| w == expected)
}
