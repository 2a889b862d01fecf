fn main() {
    println!("Run `cargo test -p pipeline-tests` to execute pipeline integration tests.");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use logship_engine::{
        Config, ConfigPatch, Console, Level, LogError, Logger,
    };
    use logship_record::LogRecord;
    use logship_store::{FileStore, LogStore};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Fake collector: accepts one request, sends the given status, and
    /// delivers the request body on the channel. `delay` holds the
    /// response back to keep a flush in flight.
    async fn fake_collector(
        status_line: &'static str,
        delay: Duration,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(async move {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };

            // Read headers, then the content-length-delimited body.
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            let body = loop {
                let n = sock.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    return;
                }
                raw.extend_from_slice(&buf[..n]);
                if let Some(split) = find_header_end(&raw) {
                    let headers = String::from_utf8_lossy(&raw[..split]).to_string();
                    let expected = content_length(&headers);
                    let mut body = raw[split + 4..].to_vec();
                    while body.len() < expected {
                        let n = sock.read(&mut buf).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        body.extend_from_slice(&buf[..n]);
                    }
                    break body;
                }
            };

            tokio::time::sleep(delay).await;
            let response =
                format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            let _ = sock.write_all(response.as_bytes()).await;
            let _ = sock.shutdown().await;
            let _ = tx.send(String::from_utf8_lossy(&body).to_string()).await;
        });

        (format!("http://{addr}/logs"), rx)
    }

    fn find_header_end(raw: &[u8]) -> Option<usize> {
        raw.windows(4).position(|w| w == b"\r\n\r\n")
    }

    fn content_length(headers: &str) -> usize {
        headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse().ok())?
            })
            .unwrap_or(0)
    }

    fn pipeline_config(endpoint: String) -> Config {
        Config {
            remote_endpoint_url: endpoint,
            min_severity_level: Level::Debug,
            echo_to_console: false,
            clear_buffer_after_send: true,
            persist_logs: true,
            persistence_key: "pipeline".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn capture_persist_flush_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let (endpoint, mut rx) = fake_collector("HTTP/1.1 200 OK", Duration::ZERO).await;

        let store = LogStore::new(Arc::new(FileStore::new(dir.path())));
        let logger = Logger::with_store(pipeline_config(endpoint), store).unwrap();

        // Route "console" output through the engine.
        struct NullConsole;
        impl Console for NullConsole {
            fn write(&self, _: Level, _: &[serde_json::Value]) {}
        }
        let handle = logger.install_capture(Arc::new(NullConsole)).unwrap();
        let console = handle.console();

        console.write(Level::Log, &[json!("foo"), json!("bar")]);
        logger.warn("direct call");

        assert_eq!(logger.logs().len(), 2);
        assert!(dir.path().join("pipeline.json").exists());

        let sent = logger.flush().await.unwrap();
        assert_eq!(sent, 2);

        // Collector saw the whole buffer as a JSON sequence.
        let body = rx.recv().await.unwrap();
        let payload: Vec<LogRecord> = serde_json::from_str(&body).unwrap();
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[0].entries[0].message, "foo");
        assert_eq!(payload[0].entries[1].message, "bar");
        assert_eq!(payload[1].message, "direct call");
        assert_eq!(payload[1].severity, Level::Warn);

        // clearBufferAfterSend wiped both buffer and store.
        assert!(logger.logs().is_empty());
        assert_eq!(logger.persisted_logs(), None);
    }

    #[tokio::test]
    async fn flush_success_without_clear_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let (endpoint, _rx) = fake_collector("HTTP/1.1 200 OK", Duration::ZERO).await;

        let mut config = pipeline_config(endpoint);
        config.clear_buffer_after_send = false;
        let store = LogStore::new(Arc::new(FileStore::new(dir.path())));
        let logger = Logger::with_store(config, store).unwrap();

        logger.log("kept");
        logger.flush().await.unwrap();

        assert_eq!(logger.logs().len(), 1);
        assert_eq!(logger.persisted_logs().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_flush_leaves_buffer_and_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let (endpoint, _rx) =
            fake_collector("HTTP/1.1 500 Internal Server Error", Duration::ZERO).await;

        let store = LogStore::new(Arc::new(FileStore::new(dir.path())));
        let logger = Logger::with_store(pipeline_config(endpoint), store).unwrap();

        logger.error("important");
        assert!(logger.flush().await.is_err());

        assert_eq!(logger.logs().len(), 1);
        assert_eq!(logger.persisted_logs().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_flush_is_rejected() {
        let (endpoint, mut rx) =
            fake_collector("HTTP/1.1 200 OK", Duration::from_millis(300)).await;

        let logger = Logger::new(pipeline_config(endpoint)).unwrap();
        logger.log("slow payload");

        let racing = logger.clone();
        let first = tokio::spawn(async move { racing.flush().await });

        // Let the first flush reach the collector before racing it.
        tokio::time::sleep(Duration::from_millis(100)).await;
        match logger.flush().await {
            Err(LogError::FlushInFlight) => {}
            other => panic!("expected FlushInFlight, got {other:?}"),
        }

        assert_eq!(first.await.unwrap().unwrap(), 1);
        assert!(rx.recv().await.is_some());

        // Guard released: a later flush runs again (empty buffer here).
        assert_eq!(logger.flush().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn persisted_logs_survive_a_new_engine() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(Arc::new(FileStore::new(dir.path())));

        {
            let logger =
                Logger::with_store(pipeline_config(String::new()), store.clone()).unwrap();
            logger.log("before reload");
            logger.error("also before");
        }

        // A fresh engine over the same store sees the full history.
        let logger = Logger::with_store(pipeline_config(String::new()), store).unwrap();
        assert!(logger.logs().is_empty());
        let recovered = logger.persisted_logs().unwrap();
        assert_eq!(recovered.len(), 2);
        assert_eq!(recovered[0].message, "before reload");
    }

    #[tokio::test]
    async fn runtime_reconfiguration_applies_to_new_records_only() {
        let logger = Logger::new(pipeline_config(String::new())).unwrap();

        logger.debug("verbose era");
        logger.set_config(ConfigPatch {
            min_severity_level: Some(Level::Error),
            ..Default::default()
        });
        logger.debug("quiet era");
        logger.error("still heard");

        let messages: Vec<String> = logger.logs().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["verbose era", "still heard"]);
    }
}
