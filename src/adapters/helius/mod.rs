pub mod helius_client;

#[cfg(test)]
mod tests {
    use crate::adapters::helius::helius_client::HeliusClientAdapter;
    use crate::config::ApiConfig;
    use crate::core::domain::query::{TransactionQuery, TransactionSource, TransactionType};
    use std::time::Duration;

    fn test_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            api_key: "test-key".to_string(),
            request_timeout: Duration::from_secs(5),
            page_limit: None,
            unhealthy_after_n_errors: 3,
        }
    }

    #[test]
    fn test_base_url_carries_version_and_api_key() {
        let adapter =
            HeliusClientAdapter::new(&test_config("https://api.helius.xyz/")).unwrap();
        let url = adapter.endpoint_url(&["transactions"], None).unwrap();

        assert_eq!(url.as_str(), "https://api.helius.xyz/v0/transactions?api-key=test-key");
    }

    #[test]
    fn test_history_url_includes_address_and_query_pairs() {
        let adapter =
            HeliusClientAdapter::new(&test_config("https://api.helius.xyz")).unwrap();
        let query = TransactionQuery {
            tx_type: Some(TransactionType::Transfer),
            source: Some(TransactionSource::SystemProgram),
            before: Some("sig-a".to_string()),
            ..TransactionQuery::default()
        };

        let url = adapter
            .endpoint_url(&["addresses", "some-address", "transactions"], Some(&query))
            .unwrap();

        assert_eq!(url.path(), "/v0/addresses/some-address/transactions");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("api-key".to_string(), "test-key".to_string()),
                ("type".to_string(), "transfer".to_string()),
                ("source".to_string(), "system_program".to_string()),
                ("before".to_string(), "sig-a".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_base_url_is_a_config_error() {
        let result = HeliusClientAdapter::new(&test_config("not a url"));
        assert!(result.is_err());
    }
}
