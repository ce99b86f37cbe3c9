use async_trait::async_trait;

/// Blob store that hands back a publicly retrievable URL for every upload.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, path: &str, content_type: &str, data: Vec<u8>) -> anyhow::Result<String>;
}

/// Bucket storage speaking the Supabase storage REST dialect.
pub struct HttpObjectStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: Option<String>,
}

impl HttpObjectStorage {
    pub fn new(base_url: &str, bucket: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            bucket: bucket.to_owned(),
            api_key,
        }
    }

    fn upload_url(&self, path: &str) -> String {
        format!("{}/object/{}/{path}", self.base_url, self.bucket)
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/object/public/{}/{path}", self.base_url, self.bucket)
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(&self, path: &str, content_type: &str, data: Vec<u8>) -> anyhow::Result<String> {
        let mut request = self
            .client
            .post(self.upload_url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }
        request.send().await?.error_for_status()?;
        Ok(self.public_url(path))
    }
}

pub fn content_type_for(file_name: &str) -> &'static str {
    match file_extension(file_name).to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

pub fn file_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => extension,
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_point_into_the_bucket() {
        let storage = HttpObjectStorage::new("https://storage.example.com/", "event-files", None);
        assert_eq!(
            storage.upload_url("submissions/1_2.pdf"),
            "https://storage.example.com/object/event-files/submissions/1_2.pdf"
        );
        assert_eq!(
            storage.public_url("submissions/1_2.pdf"),
            "https://storage.example.com/object/public/event-files/submissions/1_2.pdf"
        );
    }

    #[test]
    fn extension_and_content_type() {
        assert_eq!(file_extension("deck.final.PPTX"), "PPTX");
        assert_eq!(file_extension("README"), "bin");
        assert_eq!(file_extension(".hidden"), "bin");
        assert_eq!(content_type_for("slides.pdf"), "application/pdf");
        assert_eq!(content_type_for("archive"), "application/octet-stream");
    }
}
