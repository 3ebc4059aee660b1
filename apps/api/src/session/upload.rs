use axum::extract::Multipart;
use tracing::debug;

use crate::errors::AppError;
use crate::models::artifact::FilePayload;
use crate::store::{AssignTarget, StoreError};

/// Fields of the artefact upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<FilePayload>,
    pub assign_to: Option<String>,
    pub new_section_label: String,
}

impl UploadForm {
    /// Splits the form into the payload and its destination. A form with
    /// neither file nor destination reports the missing file first.
    pub fn into_parts(self) -> Result<(Option<FilePayload>, AssignTarget), AppError> {
        match self.assign_to {
            Some(assign_to) => {
                let target = AssignTarget::parse(&assign_to, &self.new_section_label);
                Ok((self.file, target))
            }
            None if self.file.is_none() => Err(StoreError::MissingInput.into()),
            None => Err(AppError::Validation("assign_to is required".to_string())),
        }
    }
}

pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers submit an empty, unnamed part when no file was picked.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.file = Some(FilePayload {
                    name: if file_name.is_empty() {
                        "upload".to_string()
                    } else {
                        file_name
                    },
                    mime,
                    bytes,
                });
            }
            "assign_to" => form.assign_to = Some(field.text().await?),
            "new_section_label" => form.new_section_label = field.text().await?,
            other => debug!("Ignoring unknown upload field '{other}'"),
        }
    }

    Ok(form)
}
