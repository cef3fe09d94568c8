//! Basic integration tests
use polymarket_mcp::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    fn config(path: std::path::PathBuf) -> ServerConfig {
        ServerConfig {
            database_path: path,
            framing: FramingPolicy::PerChunk,
        }
    }

    #[test]
    fn test_server_registers_all_tools() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = PolymarketServer::new(config(temp_file.path().to_path_buf()))
            .expect("Failed to create server");

        assert_eq!(server.dispatcher().registry().len(), 7);
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        {
            let server = PolymarketServer::new(config(db_path.clone()))
                .expect("Failed to create first server");
            let response = server
                .dispatcher()
                .handle(r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"add_market","arguments":{"title":"Persisted market"}}}"#)
                .await
                .expect("expected a response");
            assert!(!response.is_error());
        }

        let server = PolymarketServer::new(config(db_path))
            .expect("Failed to create second server");
        let storage = server.storage().lock().unwrap();
        let markets = storage.list_markets().unwrap();
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].title, "Persisted market");
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");

        let _: &dyn MarketStorage = &storage;
    }

    #[test]
    fn test_server_info() {
        let info = server_info();
        assert_eq!(info.name, SERVER_NAME);
        assert_eq!(info.version, "1.0.0");
    }
}
