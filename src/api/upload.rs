//! 文件上传接口
//!
//! 类型与大小在本地先校验，不合格的文件不会发出请求。

use crate::error::{AppResult, ValidationError};
use crate::infrastructure::{HttpClient, RequestOptions, UploadFile};
use serde_json::Value;

const MB: usize = 1024 * 1024;

pub const QUESTION_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];
pub const QUESTION_IMAGE_MAX: usize = 5 * MB;
pub const AVATAR_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];
pub const AVATAR_MAX: usize = 2 * MB;

#[derive(Clone)]
pub struct UploadApi {
    http: HttpClient,
}

impl UploadApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn question_image(&self, question_id: u32, file: UploadFile) -> AppResult<Value> {
        validate_question_image(&file)?;
        Ok(self
            .http
            .upload(
                "/upload/question-image",
                file,
                &[("questionId", question_id.to_string())],
                RequestOptions::default(),
            )
            .await?)
    }

    pub async fn avatar(&self, file: UploadFile) -> AppResult<Value> {
        validate_avatar(&file)?;
        Ok(self
            .http
            .upload("/upload/avatar", file, &[], RequestOptions::default())
            .await?)
    }

    pub async fn delete_question_image(&self, question_id: u32) -> AppResult<Value> {
        Ok(self
            .http
            .delete(
                &format!("/upload/question-image/{}", question_id),
                None,
                RequestOptions::default(),
            )
            .await?)
    }

    pub async fn delete_avatar(&self) -> AppResult<Value> {
        Ok(self
            .http
            .delete("/upload/avatar", None, RequestOptions::default())
            .await?)
    }

    /// 图片地址：绝对地址原样返回，相对路径拼上后端地址
    pub fn image_url(&self, path: &str) -> String {
        image_url(self.http.base_url(), path)
    }
}

pub fn image_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}{}", base_url, path)
    }
}

pub fn validate_question_image(file: &UploadFile) -> Result<(), ValidationError> {
    if file.bytes.is_empty() {
        return Err(ValidationError::Invalid("请选择文件".to_string()));
    }
    if !QUESTION_IMAGE_TYPES.contains(&file.mime.as_str()) {
        return Err(ValidationError::Invalid(
            "只支持 JPG, PNG, GIF 格式的图片".to_string(),
        ));
    }
    if file.size() > QUESTION_IMAGE_MAX {
        return Err(ValidationError::Invalid("图片大小不能超过 5MB".to_string()));
    }
    Ok(())
}

pub fn validate_avatar(file: &UploadFile) -> Result<(), ValidationError> {
    if file.bytes.is_empty() {
        return Err(ValidationError::Invalid("请选择头像文件".to_string()));
    }
    if !AVATAR_TYPES.contains(&file.mime.as_str()) {
        return Err(ValidationError::Invalid("只支持 JPG, PNG 格式的头像".to_string()));
    }
    if file.size() > AVATAR_MAX {
        return Err(ValidationError::Invalid("头像大小不能超过 2MB".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_image_limits() {
        let gif = UploadFile::new("a.gif", "image/gif", vec![0; 10]);
        assert!(validate_question_image(&gif).is_ok());

        let big = UploadFile::new("a.png", "image/png", vec![0; QUESTION_IMAGE_MAX + 1]);
        assert_eq!(
            validate_question_image(&big).unwrap_err().to_string(),
            "图片大小不能超过 5MB"
        );

        let bmp = UploadFile::new("a.bmp", "image/bmp", vec![0; 10]);
        assert!(validate_question_image(&bmp).is_err());
    }

    #[test]
    fn avatar_rejects_gif_and_large_files() {
        let gif = UploadFile::new("a.gif", "image/gif", vec![0; 10]);
        assert!(validate_avatar(&gif).is_err());

        let exact = UploadFile::new("a.jpg", "image/jpeg", vec![0; AVATAR_MAX]);
        assert!(validate_avatar(&exact).is_ok());

        let big = UploadFile::new("a.jpg", "image/jpeg", vec![0; AVATAR_MAX + 1]);
        assert!(validate_avatar(&big).is_err());
    }

    #[test]
    fn image_url_prefixes_relative_paths() {
        assert_eq!(image_url("http://h/api", "/img/1.png"), "http://h/api/img/1.png");
        assert_eq!(image_url("http://h/api", "https://cdn/x.png"), "https://cdn/x.png");
        assert_eq!(image_url("http://h/api", ""), "");
    }
}
