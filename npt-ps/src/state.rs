//! Shared application state for the paper search service

use npt_common::config::Config;
use npt_common::solr::SolrClient;

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub client: SolrClient,
}

impl AppState {
    pub fn from_config(config: &Config) -> AppState {
        AppState {
            client: SolrClient::new(&config.solr_url),
        }
    }
}
