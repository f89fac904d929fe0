//! Raw file downloads

use crate::ApiClient;
use crate::error::{ClientError, Result};
use std::path::Path;
use tracing::debug;
use url::Url;

impl ApiClient {
    /// Download the file at `location` into `destination`
    ///
    /// The response body is written verbatim, whatever the response status,
    /// and replaces any existing file at `destination`.
    ///
    /// # Arguments
    /// * `location` - Absolute URL of the file
    /// * `destination` - File path to write
    ///
    /// # Returns
    /// The number of bytes written
    pub async fn download(&self, location: &Url, destination: &Path) -> Result<u64> {
        debug!("GET {}", location);

        let response = self
            .client
            .get(location.clone())
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        tokio::fs::write(destination, &body)
            .await
            .map_err(|source| ClientError::Io {
                path: destination.to_path_buf(),
                source,
            })?;

        debug!(
            "Wrote {} bytes from {} ({}) to {}",
            body.len(),
            location,
            status,
            destination.display()
        );

        Ok(body.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::unreachable_server;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_writes_body_verbatim() {
        let mock_server = MockServer::start().await;
        let body: Vec<u8> = (0..=255u8).chain(b"G28\nG1 X10 Y10\n".iter().copied()).collect();

        Mock::given(method("GET"))
            .and(path("/files/a.gcode"))
            .and(header("Authorization", "Bearer key"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("a.gcode");
        let location = Url::parse(&format!("{}/files/a.gcode", mock_server.uri())).unwrap();

        let client = ApiClient::new(mock_server.uri(), "key").unwrap();
        let written = client.download(&location, &destination).await.unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&destination).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("new"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("a.gcode");
        std::fs::write(&destination, "a much longer previous file").unwrap();
        let location = Url::parse(&format!("{}/a.gcode", mock_server.uri())).unwrap();

        let client = ApiClient::new(mock_server.uri(), "key").unwrap();
        client.download(&location, &destination).await.unwrap();

        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_download_saves_error_bodies() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("missing.gcode");
        let location = Url::parse(&format!("{}/missing.gcode", mock_server.uri())).unwrap();

        let client = ApiClient::new(mock_server.uri(), "key").unwrap();
        client.download(&location, &destination).await.unwrap();

        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "Not Found");
    }

    #[tokio::test]
    async fn test_download_into_missing_directory_is_io_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("G28"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("nope").join("a.gcode");
        let location = Url::parse(&format!("{}/a.gcode", mock_server.uri())).unwrap();

        let client = ApiClient::new(mock_server.uri(), "key").unwrap();
        let err = client.download(&location, &destination).await.unwrap_err();

        assert!(matches!(err, ClientError::Io { ref path, .. } if path == &destination));
    }

    #[tokio::test]
    async fn test_download_connection_failure_is_transport_error() {
        let server = unreachable_server();
        let location = Url::parse(&format!("{}/a.gcode", server)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("a.gcode");

        let client = ApiClient::new(server, "key").unwrap();
        let err = client.download(&location, &destination).await.unwrap_err();

        assert!(err.is_transport());
        assert!(!destination.exists());
    }
}
