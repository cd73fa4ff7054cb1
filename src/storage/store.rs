//! Object storage access (S3, GCS, Azure, local filesystem)

use super::glob::Glob;
use crate::config::Credentials;
use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt;
use std::sync::Arc;

/// A storage root: an object store plus a key prefix inside it
#[derive(Clone)]
pub struct Storage {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Root URL for logging, without trailing slash
    root: String,
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Storage {
    /// Parse a root URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` or `s3a://bucket/path/` - AWS S3
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `file:///path/`, `/local/path/` or `./path/` - Local filesystem
    ///
    /// Local roots are created when `create_local` is set, which is what
    /// output roots need; input roots must already exist.
    pub fn parse(url: &str, credentials: &Credentials, create_local: bool) -> Result<Self> {
        let mut storage = Self::parse_url(url, credentials, create_local)?;
        storage.root = url.trim_end_matches('/').to_string();
        Ok(storage)
    }

    fn parse_url(url: &str, credentials: &Credentials, create_local: bool) -> Result<Self> {
        if let Some(rest) = url.strip_prefix("s3://") {
            Self::parse_s3(rest, credentials)
        } else if let Some(rest) = url.strip_prefix("s3a://") {
            Self::parse_s3(rest, credentials)
        } else if let Some(rest) = url.strip_prefix("gs://") {
            Self::parse_gcs(rest)
        } else if let Some(rest) = url.strip_prefix("az://") {
            Self::parse_azure(rest)
        } else {
            Self::parse_local(url, create_local)
        }
    }

    /// Wrap an existing object store (used by tests and embedders)
    pub fn from_store(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_matches('/').to_string();
        Self {
            store,
            root: format!("memory://{prefix}"),
            prefix,
        }
    }

    /// Parse S3 URL body (`bucket/prefix`)
    ///
    /// Explicit credentials win over the standard `AWS_*` environment
    /// variables picked up by `from_env()`.
    fn parse_s3(without_scheme: &str, credentials: &Credentials) -> Result<Self> {
        let (bucket, prefix) = split_bucket(without_scheme);

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(key_id) = &credentials.aws_access_key_id {
            builder = builder.with_access_key_id(key_id);
        }
        if let Some(secret) = &credentials.aws_secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }
        if let Some(token) = &credentials.aws_session_token {
            builder = builder.with_token(token);
        }
        if let Some(region) = &credentials.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &credentials.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            root: String::new(),
        })
    }

    /// Parse GCS URL body
    fn parse_gcs(without_scheme: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket(without_scheme);

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            root: String::new(),
        })
    }

    /// Parse Azure Blob URL body
    fn parse_azure(without_scheme: &str) -> Result<Self> {
        let (container, prefix) = split_bucket(without_scheme);

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            root: String::new(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str, create: bool) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        if create {
            std::fs::create_dir_all(path)
                .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;
        } else if !std::path::Path::new(path).is_dir() {
            return Err(Error::FileNotFound {
                path: path.to_string(),
            });
        }

        // Deleting the last file in a directory removes the directory too,
        // so dropped partitions leave nothing behind
        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?
            .with_automatic_cleanup(true);

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            root: String::new(),
        })
    }

    /// Resolve a key relative to this root into an object path
    fn object_path(&self, key: &str) -> Result<ObjectPath> {
        let key = key.trim_matches('/');
        let full = match (self.prefix.is_empty(), key.is_empty()) {
            (true, _) => key.to_string(),
            (false, true) => self.prefix.clone(),
            (false, false) => format!("{}/{key}", self.prefix),
        };
        ObjectPath::parse(&full).map_err(|e| Error::output(format!("Invalid object path {full}: {e}")))
    }

    /// Strip the root prefix from an object path
    fn relative_key(&self, location: &ObjectPath) -> String {
        let full = location.as_ref();
        if self.prefix.is_empty() {
            return full.to_string();
        }
        full.strip_prefix(&self.prefix)
            .map_or(full, |rest| rest.trim_start_matches('/'))
            .to_string()
    }

    /// The root URL this storage was opened with
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Render a key under this root as a URL for logging
    pub fn display_key(&self, key: &str) -> String {
        let key = key.trim_matches('/');
        if key.is_empty() {
            self.root.clone()
        } else {
            format!("{}/{key}", self.root)
        }
    }

    /// List all keys under `dir` (recursively), relative to the root
    pub async fn list(&self, dir: &str) -> Result<Vec<String>> {
        let path = self.object_path(dir)?;
        let prefix = if path.as_ref().is_empty() {
            None
        } else {
            Some(&path)
        };

        let metas: Vec<_> = self.store.list(prefix).try_collect().await?;
        let mut keys: Vec<String> = metas
            .iter()
            .map(|meta| self.relative_key(&meta.location))
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// List keys matching a glob pattern, in sorted order
    pub async fn glob(&self, glob: &Glob) -> Result<Vec<String>> {
        let keys = self.list(&glob.literal_prefix()).await?;
        Ok(keys.into_iter().filter(|key| glob.is_match(key)).collect())
    }

    /// Read a whole object
    pub async fn read(&self, key: &str) -> Result<Bytes> {
        let path = self.object_path(key)?;
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| Error::read(self.display_key(key), e.to_string()))?;
        result
            .bytes()
            .await
            .map_err(|e| Error::read(self.display_key(key), e.to_string()))
    }

    /// Write bytes to a key, returning the full URL of the object
    pub async fn write(&self, key: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(key)?;

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::output(format!("Failed to write {path}: {e}")))?;

        Ok(self.display_key(key))
    }

    /// Delete every object under `dir`, returning how many were removed
    pub async fn delete_dir(&self, dir: &str) -> Result<usize> {
        let keys = self.list(dir).await?;
        for key in &keys {
            let path = self.object_path(key)?;
            self.store
                .delete(&path)
                .await
                .map_err(|e| Error::output(format!("Failed to delete {path}: {e}")))?;
        }
        Ok(keys.len())
    }
}

/// Split `bucket/some/prefix/` into `("bucket", "some/prefix")`
fn split_bucket(without_scheme: &str) -> (&str, String) {
    match without_scheme.find('/') {
        Some(idx) => (
            &without_scheme[..idx],
            without_scheme[idx + 1..].trim_matches('/').to_string(),
        ),
        None => (without_scheme, String::new()),
    }
}
