//! Statsbeat integration tests

#[cfg(test)]
mod tests {
    use crate::common::{CapturingTransport, EnvelopeAssertions};
    use aitelemetry_selfmon::config::{Config, SenderConfig, StatsbeatConfig};
    use aitelemetry_selfmon::core::sender::{Envelope, HttpSender, Transport};
    use aitelemetry_selfmon::core::statsbeat::{
        STATSBEAT_EU_IKEY, STATSBEAT_IKEY, Statsbeat, properties,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CIKEY: &str = "1aa11111-bbbb-1ccc-8ddd-eeeeffff3333";
    const ENDPOINT: &str = "https://dc.services.visualstudio.com/v2/track";

    fn statsbeat(customer_endpoint: &str) -> (Statsbeat, Arc<CapturingTransport>) {
        let transport = Arc::new(CapturingTransport::default());
        let statsbeat = Statsbeat::with_transport(
            &StatsbeatConfig::default(),
            CIKEY,
            customer_endpoint,
            transport.clone(),
        );
        (statsbeat, transport)
    }

    async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<wiremock::Request> {
        for _ in 0..100 {
            let requests = server.received_requests().await.unwrap_or_default();
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        server.received_requests().await.unwrap_or_default()
    }

    /// Durations 1000 and 500 average to 750
    #[test]
    fn test_track_duration() {
        let (statsbeat, transport) = statsbeat(ENDPOINT);
        statsbeat.count_request(ENDPOINT, 1000.0, true);
        statsbeat.count_request(ENDPOINT, 500.0, false);
        statsbeat.flush();

        assert_eq!(transport.trigger_count(), 1);
        let envelopes = transport.envelopes();
        assert_eq!(envelopes.len(), 1);

        let item = &envelopes[0];
        item.assert_statsbeat_item(STATSBEAT_IKEY);
        item.assert_labels(CIKEY, ENDPOINT);
        item.assert_property(properties::REQUEST_DURATION, "750");
        item.assert_property(properties::REQUEST_SUCCESS, "1");
        item.assert_property(properties::REQUEST_FAILURE, "1");

        assert!(statsbeat.bucket(ENDPOINT).is_none());
    }

    /// All counter kinds are reported
    #[test]
    fn test_track_counts() {
        let (statsbeat, transport) = statsbeat(ENDPOINT);
        for success in [true, true, true, true, false, false, false] {
            statsbeat.count_request(ENDPOINT, 1.0, success);
        }
        statsbeat.count_retry(ENDPOINT);
        statsbeat.count_retry(ENDPOINT);
        statsbeat.count_throttle(ENDPOINT);
        statsbeat.count_exception(ENDPOINT);
        statsbeat.flush();

        let item = &transport.envelopes()[0];
        item.assert_statsbeat_item(STATSBEAT_IKEY);
        item.assert_labels(CIKEY, ENDPOINT);
        item.assert_property(properties::REQUEST_DURATION, "1");
        item.assert_property(properties::REQUEST_SUCCESS, "4");
        item.assert_property(properties::REQUEST_FAILURE, "3");
        item.assert_property(properties::RETRY_COUNT, "2");
        item.assert_property(properties::THROTTLE_COUNT, "1");
        item.assert_property(properties::EXCEPTION_COUNT, "1");
    }

    #[test]
    fn test_eu_customer() {
        let (statsbeat, transport) =
            statsbeat("https://francecentral-1.in.applicationinsights.azure.com/v2/track");
        statsbeat.count_retry(ENDPOINT);
        statsbeat.flush();

        transport.envelopes()[0].assert_statsbeat_item(STATSBEAT_EU_IKEY);
    }

    #[test]
    fn test_disabled_from_config() {
        let mut config = Config::default();
        config.statsbeat.disable_statsbeat = true;

        let statsbeat = Statsbeat::from_config(&config).unwrap();
        statsbeat.count_request(ENDPOINT, 1.0, true);
        assert!(statsbeat.bucket(ENDPOINT).is_none());
        assert_eq!(statsbeat.flush(), 0);
    }

    /// Customer traffic is counted, statsbeat's own traffic is not
    #[tokio::test]
    async fn test_statsbeat_traffic_is_not_measured() {
        let ingestion = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&ingestion)
            .await;

        let statsbeat_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&statsbeat_server)
            .await;

        let customer_endpoint = format!("{}/v2/track", ingestion.uri());
        let statsbeat_endpoint = format!("{}/v2/track", statsbeat_server.uri());

        let config = StatsbeatConfig {
            statsbeat_endpoint: Some(statsbeat_endpoint.clone()),
            ..Default::default()
        };
        let statsbeat = Arc::new(Statsbeat::new(&config, CIKEY, &customer_endpoint).unwrap());

        let sender = HttpSender::new(
            SenderConfig::for_endpoint(customer_endpoint.clone()),
            Some(statsbeat.clone()),
        )
        .unwrap();
        sender.enqueue(Envelope::metric(CIKEY, vec![], Default::default()));
        sender.send_now().await.unwrap();

        let bucket = statsbeat.bucket(&customer_endpoint).unwrap();
        assert_eq!(bucket.request_count, 1);
        assert_eq!(bucket.success_count, 1);

        assert_eq!(statsbeat.flush(), 1);
        let requests = wait_for_requests(&statsbeat_server, 1).await;
        assert_eq!(requests.len(), 1);

        let body: Vec<Envelope> = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body.len(), 1);
        body[0].assert_statsbeat_item(STATSBEAT_IKEY);
        body[0].assert_labels(CIKEY, &customer_endpoint);
        body[0].assert_property(properties::REQUEST_SUCCESS, "1");

        // The delivery above went through statsbeat's private sender
        assert!(statsbeat.bucket(&statsbeat_endpoint).is_none());
        assert!(statsbeat.bucket(&customer_endpoint).is_none());
        assert_eq!(statsbeat.flush(), 0);
    }
}
