//! Basic unit tests to verify core functionality
use polymarket_mcp::mcp::framer::split_frames;
use polymarket_mcp::mcp::protocol::{error_codes, Method};
use polymarket_mcp::mcp::DispatchError;
use polymarket_mcp::*;
use serde_json::json;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_market_creation() {
        let market = NewMarket::new(
            "Test Market".to_string(),
            Some("A test market".to_string()),
            None,
        );

        assert!(market.is_ok());
        assert_eq!(market.unwrap().title, "Test Market");
    }

    #[test]
    fn test_market_data_creation() {
        let data = NewMarketData::new(MarketId(1), 0.55, Some(10.0)).unwrap();
        assert_eq!(data.market_id, MarketId(1));
        assert_eq!(data.price, 0.55);
    }

    #[test]
    fn test_storage_creation() {
        let storage = SqliteStorage::in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_frames_split_on_newlines() {
        let frames: Vec<&str> = split_frames("a\n\n b \n").collect();
        assert_eq!(frames, vec!["a", "b"]);
    }

    #[test]
    fn test_error_taxonomy_codes() {
        assert_eq!(DispatchError::ParseFailure.code(), error_codes::PARSE_ERROR);
        assert_eq!(DispatchError::UnknownMethod(Some("x".into())).code(), error_codes::METHOD_NOT_FOUND);
        assert_eq!(DispatchError::UnknownTool("x".into()).code(), error_codes::INTERNAL_ERROR);
        assert_eq!(DispatchError::HandlerFailure("x".into()).code(), error_codes::INTERNAL_ERROR);
    }

    #[test]
    fn test_unknown_method_parse() {
        assert_eq!(Method::parse("sampling/createMessage"), Method::Unknown("sampling/createMessage".into()));
    }

    #[test]
    fn test_response_envelope_has_one_of_result_or_error() {
        let ok = JsonRpcResponse::success(json!(1), json!({}));
        assert!(ok.result.is_some() && ok.error.is_none());

        let err = DispatchError::UnknownTool("t".into()).into_response(json!(1));
        assert!(err.result.is_none() && err.error.is_some());
    }
}
