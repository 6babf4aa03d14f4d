use crate::error::NetcliError;
use crate::transport::Transport;
use regex::Regex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

// Upper bound on a single transport read, matching typical device output bursts
const MAX_READ: usize = 65535;

/// Reads from a [`Transport`] into an accumulating buffer and returns the
/// buffer once one of the supplied patterns matches.
///
/// The reader also carries the resolved base prompt and base pattern for the
/// session; until resolution has run, prompt reads fall back to the
/// platform's delimiter pattern.
pub struct PromptReader {
    transport: Box<dyn Transport>,
    host: String,
    base_prompt: String,
    base_pattern: Option<Regex>,
    fallback_pattern: Regex,
    timeout: Duration,
}

impl PromptReader {
    pub fn new(
        transport: Box<dyn Transport>,
        host: impl Into<String>,
        fallback_pattern: Regex,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            host: host.into(),
            base_prompt: String::new(),
            base_pattern: None,
            fallback_pattern,
            timeout,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn base_prompt(&self) -> &str {
        &self.base_prompt
    }

    pub fn set_base_prompt(&mut self, prompt: &str) {
        debug!(target: "PromptReader::set_base_prompt", "Setting base prompt to: {}", prompt);
        self.base_prompt = prompt.to_string();
    }

    pub fn base_pattern(&self) -> Option<&Regex> {
        self.base_pattern.as_ref()
    }

    pub fn set_base_pattern(&mut self, pattern: Regex) {
        debug!(target: "PromptReader::set_base_pattern", "Setting base pattern to: {}", pattern);
        self.base_pattern = Some(pattern);
    }

    /// The delimiter pattern used before the base pattern is resolved.
    pub fn fallback_pattern(&self) -> &Regex {
        &self.fallback_pattern
    }

    /// Write a chunk of text to the device.
    pub async fn send(&mut self, data: &str) -> Result<(), NetcliError> {
        debug!(target: "PromptReader::send", "Writing to channel: {:?}", data);
        self.transport.send(data.as_bytes()).await
    }

    /// Read until one of `patterns` matches the accumulated buffer.
    ///
    /// Patterns are tried in list order and the first match wins. The whole
    /// operation is bounded by a single overall deadline; on expiry the
    /// partial buffer is discarded and a timeout error is returned. Bytes
    /// are decoded as UTF-8 with invalid sequences replaced.
    pub async fn read_until_patterns(
        &mut self,
        patterns: &[Regex],
        timeout: Option<Duration>,
    ) -> Result<String, NetcliError> {
        let timeout = timeout.unwrap_or(self.timeout);
        let deadline = Instant::now() + timeout;
        let mut buffer: Vec<u8> = Vec::new();

        debug!(target: "PromptReader::read_until_patterns", "Reading until one of {} patterns, timeout {:?}", patterns.len(), timeout);

        loop {
            let chunk = match tokio::time::timeout_at(deadline, self.transport.read(MAX_READ)).await
            {
                Ok(result) => result?,
                Err(_) => {
                    let described: Vec<&str> = patterns.iter().map(|p| p.as_str()).collect();
                    debug!(target: "PromptReader::read_until_patterns", "Timeout reached waiting for {:?}", described);
                    return Err(NetcliError::timeout(
                        &self.host,
                        format!("pattern not detected: {:?} in output", described),
                    ));
                }
            };

            buffer.extend_from_slice(&chunk);
            let text = String::from_utf8_lossy(&buffer);

            for pattern in patterns {
                if pattern.is_match(&text) {
                    debug!(target: "PromptReader::read_until_patterns", "Pattern {} matched after {} bytes", pattern, buffer.len());
                    return Ok(text.into_owned());
                }
            }
        }
    }

    /// Read up to and including the session prompt.
    pub async fn read_until_prompt(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<String, NetcliError> {
        let pattern = self.prompt_pattern();
        self.read_until_patterns(&[pattern], timeout).await
    }

    /// Read until the session prompt or any of `extra` matches, with the
    /// prompt tried first.
    pub async fn read_until_prompt_or_patterns(
        &mut self,
        extra: &[Regex],
        timeout: Option<Duration>,
    ) -> Result<String, NetcliError> {
        let mut patterns = Vec::with_capacity(extra.len() + 1);
        patterns.push(self.prompt_pattern());
        patterns.extend(extra.iter().cloned());
        self.read_until_patterns(&patterns, timeout).await
    }

    /// Read until any prompt delimiter character is seen. Used to drain
    /// banners and for prompt discovery.
    pub async fn read_until_delimiters(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<String, NetcliError> {
        let pattern = self.fallback_pattern.clone();
        self.read_until_patterns(&[pattern], timeout).await
    }

    fn prompt_pattern(&self) -> Regex {
        self.base_pattern
            .clone()
            .unwrap_or_else(|| self.fallback_pattern.clone())
    }

    /// Close the underlying transport.
    pub async fn close(&mut self) -> Result<(), NetcliError> {
        self.transport.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct OneShot(Option<Vec<u8>>);

    #[async_trait]
    impl Transport for OneShot {
        async fn send(&mut self, _data: &[u8]) -> Result<(), NetcliError> {
            Ok(())
        }

        async fn read(&mut self, _max: usize) -> Result<Vec<u8>, NetcliError> {
            match self.0.take() {
                Some(chunk) => Ok(chunk),
                None => std::future::pending().await,
            }
        }

        async fn close(&mut self) -> Result<(), NetcliError> {
            Ok(())
        }
    }

    #[test]
    fn each_call_starts_with_an_empty_buffer() {
        tokio_test::block_on(async {
            let mut reader = PromptReader::new(
                Box::new(OneShot(Some(b"Router>".to_vec()))),
                "198.51.100.1",
                Regex::new(r">").unwrap(),
                Duration::from_millis(50),
            );
            let first = reader.read_until_prompt(None).await.unwrap();
            assert_eq!(first, "Router>");

            // Nothing is carried over from the previous call
            let err = reader.read_until_prompt(None).await.unwrap_err();
            assert!(matches!(err, NetcliError::TimeoutError { .. }));
        });
    }
}
