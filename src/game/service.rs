use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::debug;

use super::wire::{DeviationRequest, DeviationResponse};

const BEST_RESPONSE_ROUTE: &str = "/analyze/best_response";

pub(super) fn endpoint(base_url: &str) -> String {
    format!("{}{BEST_RESPONSE_ROUTE}", base_url.trim_end_matches('/'))
}

pub(super) fn request_deviation_graph(
    base_url: &str,
    request: &DeviationRequest,
    timeout: Duration,
) -> Result<DeviationResponse> {
    let url = endpoint(base_url);
    debug!("posting {} profiles to {url}", request.payoff_matrix.len());

    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    let response = match agent.post(&url).send_json(request) {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let detail = response.into_string().unwrap_or_default();
            return Err(anyhow!("service at {url} answered {code}: {detail}"));
        }
        Err(error) => {
            return Err(error).with_context(|| format!("failed to reach service at {url}"));
        }
    };

    response
        .into_json::<DeviationResponse>()
        .with_context(|| format!("invalid deviation graph JSON from {url}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            endpoint("http://127.0.0.1:8000/"),
            "http://127.0.0.1:8000/analyze/best_response"
        );
        assert_eq!(
            endpoint("http://localhost:8000"),
            "http://localhost:8000/analyze/best_response"
        );
    }

    #[test]
    fn unreachable_service_is_an_error() {
        let error = request_deviation_graph(
            "http://127.0.0.1:9",
            &DeviationRequest::default(),
            Duration::from_millis(200),
        )
        .unwrap_err();
        assert!(format!("{error:#}").contains("failed to reach service"));
    }
}
