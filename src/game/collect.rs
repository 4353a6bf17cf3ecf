use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use super::request::validate_request;
use super::service::request_deviation_graph;
use super::wire::{DeviationRequest, DeviationResponse};

/// Where deviation graph data comes from.
#[derive(Clone, Debug)]
pub enum GraphSource {
    Service {
        url: String,
        request: DeviationRequest,
        timeout: Duration,
    },
    File(PathBuf),
}

impl GraphSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Service { url, request, .. } => {
                format!("{url} ({} profiles)", request.payoff_matrix.len())
            }
            Self::File(path) => path.display().to_string(),
        }
    }
}

pub fn collect_deviation_graph(source: &GraphSource) -> Result<DeviationResponse> {
    let response = match source {
        GraphSource::Service {
            url,
            request,
            timeout,
        } => {
            validate_request(request).context("refusing to send an invalid payoff request")?;
            request_deviation_graph(url, request, *timeout)?
        }
        GraphSource::File(path) => read_response_file(path)?,
    };

    info!(
        "received deviation graph: {} nodes, {} edges, {} equilibria",
        response.nodes.len(),
        response.edges.len(),
        response.nash_nodes.len()
    );
    Ok(response)
}

fn read_response_file(path: &Path) -> Result<DeviationResponse> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read response file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid deviation graph JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::process;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("deviation-graph-{}-{name}", process::id()))
    }

    #[test]
    fn reads_response_from_file() {
        let path = temp_path("response.json");
        fs::write(
            &path,
            r#"{"nodes":[{"id":1,"profileKey":"C,C","payoffs":{"0":3,"1":3}}],"edges":[],"nashNodes":[1]}"#,
        )
        .unwrap();

        let response = collect_deviation_graph(&GraphSource::File(path.clone())).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(response.nodes.len(), 1);
        assert_eq!(response.nash_nodes.len(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_path("does-not-exist.json");
        let error = collect_deviation_graph(&GraphSource::File(path.clone())).unwrap_err();
        assert!(format!("{error:#}").contains("does-not-exist.json"));
    }

    #[test]
    fn malformed_json_is_a_load_failure() {
        let path = temp_path("malformed.json");
        fs::write(&path, "{\"nodes\": [").unwrap();
        let result = collect_deviation_graph(&GraphSource::File(path.clone()));
        fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn invalid_request_is_never_sent() {
        let source = GraphSource::Service {
            url: "http://127.0.0.1:9".to_owned(),
            request: DeviationRequest::default(),
            timeout: Duration::from_millis(50),
        };
        let error = collect_deviation_graph(&source).unwrap_err();
        assert!(error.to_string().contains("invalid payoff request"));
    }
}
