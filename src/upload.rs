//! Multipart form parsing and uploaded file storage.

use crate::{setting, AppState, Error, Result};
use actix_multipart::Multipart;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::TryStreamExt;
use rand::RngCore;
use std::{collections::HashMap, future::Future, path::PathBuf, pin::Pin, str::FromStr};
use tracing::{debug, warn};

/// Upload folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// unit photos
    Unit,
    /// tenant identity documents
    Identity,
    /// payment receipts
    Receipt,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unit => "properti",
            Category::Identity => "ktp",
            Category::Receipt => "kwitansi",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// client side file name
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Lowercase alphanumeric extension of the client file name.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        let ext: String = ext
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }
}

/// Stores uploaded files on the local disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    url_prefix: String,
}

impl FileStore {
    pub fn new(setting: &setting::Upload) -> Self {
        Self {
            dir: setting.dir.clone(),
            url_prefix: setting.url_prefix.trim_end_matches('/').to_owned(),
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Write the file and return its public path.
    pub async fn save(&self, category: Category, file: &UploadedFile) -> Result<String> {
        let name = file_name(file.extension().as_deref());
        let dir = self.dir.join(category.as_str());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&name), &file.data).await?;
        debug!("Saved upload {}/{}", category.as_str(), name);
        Ok(format!("{}/{}/{}", self.url_prefix, category.as_str(), name))
    }

    /// Best effort removal of a file returned by `save`.
    pub async fn remove(&self, path: &str) {
        let Some(rel) = path.strip_prefix(&self.url_prefix) else {
            return;
        };
        let rel = rel.trim_start_matches('/');
        if rel.is_empty() || rel.split('/').any(|p| p == "..") {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.dir.join(rel)).await {
            warn!("Failed to remove upload {}: {}", path, e);
        }
    }
}

fn file_name(ext: Option<&str>) -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    match ext {
        Some(ext) => format!("{}-{}.{}", stamp, hex::encode(bytes), ext),
        None => format!("{}-{}", stamp, hex::encode(bytes)),
    }
}

/// A parsed `multipart/form-data` body. Files are kept in memory until a
/// handler decides to store them.
#[derive(Debug, Default)]
pub struct Form {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl Form {
    pub async fn parse(mut multipart: Multipart, max_size: usize) -> Result<Self> {
        let mut form = Form::default();
        while let Some(mut field) = multipart.try_next().await.map_err(form_error)? {
            let (name, filename) = {
                let cd = field.content_disposition();
                (
                    cd.get_name().unwrap_or_default().to_owned(),
                    cd.get_filename().map(ToOwned::to_owned),
                )
            };

            let mut data = Vec::new();
            while let Some(chunk) = field.try_next().await.map_err(form_error)? {
                if data.len() + chunk.len() > max_size {
                    return Err(Error::Validation(format!(
                        "Field {} exceeds {} bytes",
                        name, max_size
                    )));
                }
                data.extend_from_slice(&chunk);
            }

            match filename {
                Some(filename) => {
                    // browsers send an empty part for an untouched file input
                    if !filename.is_empty() && !data.is_empty() {
                        form.files.insert(name, UploadedFile { filename, data });
                    }
                }
                None => {
                    let value = String::from_utf8(data).map_err(|_| {
                        Error::Validation(format!("Field {} is not valid text", name))
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    /// Trimmed text field, `None` when missing or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    /// Parse a text field. Blank counts as missing.
    pub fn parse_field<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.text(name) {
            Some(v) => v
                .parse()
                .map(Some)
                .map_err(|_| Error::Validation(format!("Nilai {} tidak valid: {}", name, v))),
            None => Ok(None),
        }
    }

    #[cfg(test)]
    fn with_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}

fn form_error(e: actix_multipart::MultipartError) -> Error {
    Error::Validation(format!("Failed to parse form: {}", e))
}

impl FromRequest for Form {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Form>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let max_size = req
            .app_data::<web::Data<AppState>>()
            .map(|s| s.setting.upload.max_size)
            .unwrap_or_else(|| setting::Upload::default().max_size);
        let multipart = Multipart::new(req.headers(), payload.take());
        Box::pin(async move { Form::parse(multipart, max_size).await })
    }
}
