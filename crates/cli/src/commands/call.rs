//! Issue a single API call and print the JSON result.

use firstpromoter_client::{FirstPromoterClient, RequestSpec};

/// GET an endpoint with optional `key=value` query pairs.
pub async fn get(
    client: &FirstPromoterClient,
    endpoint: &str,
    query: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut spec = RequestSpec::get(endpoint);
    for pair in query {
        let (key, value) = split_pair(pair)?;
        spec = spec.with_query(key, value);
    }
    run(client, spec).await
}

/// POST to an endpoint with an optional JSON body.
pub async fn post(
    client: &FirstPromoterClient,
    endpoint: &str,
    data: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    run(client, with_body(RequestSpec::post(endpoint), data)?).await
}

/// PUT to an endpoint with an optional JSON body.
pub async fn put(
    client: &FirstPromoterClient,
    endpoint: &str,
    data: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    run(client, with_body(RequestSpec::put(endpoint), data)?).await
}

/// DELETE an endpoint.
pub async fn delete(
    client: &FirstPromoterClient,
    endpoint: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run(client, RequestSpec::delete(endpoint)).await
}

async fn run(
    client: &FirstPromoterClient,
    spec: RequestSpec,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = client.execute(spec).await?;
    print_json(&serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn with_body(
    spec: RequestSpec,
    data: Option<&str>,
) -> Result<RequestSpec, Box<dyn std::error::Error>> {
    match data {
        Some(raw) => {
            let body: serde_json::Value = serde_json::from_str(raw)
                .map_err(|e| format!("--data is not valid JSON: {e}"))?;
            Ok(spec.with_body(body))
        }
        None => Ok(spec),
    }
}

fn split_pair(pair: &str) -> Result<(&str, &str), Box<dyn std::error::Error>> {
    pair.split_once('=')
        .ok_or_else(|| format!("query parameter must be key=value, got: {pair}").into())
}

// The JSON result is the command's output, not a diagnostic.
#[allow(clippy::print_stdout)]
fn print_json(rendered: &str) {
    println!("{rendered}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pair() {
        let (key, value) = split_pair("page=2").expect("valid pair");
        assert_eq!(key, "page");
        assert_eq!(value, "2");

        // Values may themselves contain '='
        let (key, value) = split_pair("filters[q]=a=b").expect("valid pair");
        assert_eq!(key, "filters[q]");
        assert_eq!(value, "a=b");

        assert!(split_pair("no-separator").is_err());
    }

    #[test]
    fn test_with_body_rejects_invalid_json() {
        let spec = RequestSpec::post("promoters");
        assert!(with_body(spec, Some("{not json")).is_err());
    }

    #[test]
    fn test_with_body_none_leaves_spec_unchanged() {
        let spec = with_body(RequestSpec::post("promoters"), None).expect("no body");
        assert!(spec.body.is_none());
    }
}
