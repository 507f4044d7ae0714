//! HTTP behaviour of the trust-list client against a mock server.

use tsl_client::{ClientError, TslClient, DEFAULT_USER_AGENT};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn trust_list_xml(container_url: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<tsl:TrustServiceStatusList xmlns:tsl="http://uri.etsi.org/02231/v2#">
  <tsl:TrustServiceProviderList>
    <tsl:TrustServiceProvider>
      <tsl:TSPInformation>
        <tsl:TSPName><tsl:Name xml:lang="en">Mock Provider</tsl:Name></tsl:TSPName>
        <tsl:TSPInformationURI>
          <tsl:URI xml:lang="fr">{container_url}</tsl:URI>
        </tsl:TSPInformationURI>
      </tsl:TSPInformation>
    </tsl:TrustServiceProvider>
  </tsl:TrustServiceProviderList>
</tsl:TrustServiceStatusList>"#
    )
}

#[tokio::test]
async fn test_trust_list_and_container_download() {
    let server = MockServer::start().await;
    let container_url = format!("{}/files/MOCK01.der", server.uri());

    Mock::given(method("GET"))
        .and(path("/tsl_signed.xml"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(trust_list_xml(&container_url)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/MOCK01.der"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"--End".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = TslClient::new().unwrap();
    let list = client
        .trust_list(&format!("{}/tsl_signed.xml", server.uri()))
        .await
        .unwrap();

    assert_eq!(list.len(), 1);
    let entry = &list.entries[0];
    assert_eq!(entry.display_name(), "Mock Provider");
    assert_eq!(entry.information_uri.as_deref(), Some(container_url.as_str()));

    let container = client.container(&container_url).await.unwrap();
    assert_eq!(container.filename, "MOCK01.der");
    assert_eq!(container.bytes, b"--End".to_vec());
}

#[tokio::test]
async fn test_error_status_is_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/GONE.der"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = TslClient::new().unwrap();
    let err = client
        .container(&format!("{}/files/GONE.der", server.uri()))
        .await
        .unwrap_err();

    assert!(err.is_fetch_error());
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_malformed_trust_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<tsl:TrustServiceStatusList"))
        .mount(&server)
        .await;

    let client = TslClient::new().unwrap();
    let err = client
        .trust_list(&format!("{}/broken.xml", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::XmlParse(_)));
}

#[tokio::test]
async fn test_unreachable_host() {
    let client = TslClient::builder()
        .timeout(std::time::Duration::from_secs(2))
        .build()
        .unwrap();
    let err = client.fetch("http://127.0.0.1:9/unreachable").await.unwrap_err();
    assert!(matches!(err, ClientError::Http { .. }));
}
