// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use base64::Engine;
use chrono::Utc;
use uuid::Uuid;

/// 允许上传的图片类型及其扩展名
pub const ALLOWED_CONTENT_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/heic", "heic"),
];

pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// 图片类型对应的扩展名，不支持的类型返回 None
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let content_type = content_type.trim().to_lowercase();
    ALLOWED_CONTENT_TYPES
        .iter()
        .find(|(ct, _)| *ct == content_type)
        .map(|(_, ext)| *ext)
}

/// 根据对象键的扩展名推断图片类型
pub fn content_type_for_key(key: &str) -> &'static str {
    let ext = key.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// 用户上传目录前缀
pub fn user_prefix(user_id: Uuid) -> String {
    format!("uploads/{}/", user_id)
}

/// 生成上传对象键：`uploads/{user_id}/scan_{时间}_{8位十六进制}.{ext}`
pub fn upload_key(user_id: Uuid, ext: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!(
        "{}scan_{}_{}.{}",
        user_prefix(user_id),
        Utc::now().format("%Y%m%d_%H%M%S"),
        &hex[..8],
        ext
    )
}

/// 解码 base64 图片
///
/// 支持 `data:<mime>;base64,` 前缀，返回图片字节和类型
pub fn decode_base64_image(input: &str) -> Result<(Vec<u8>, String), base64::DecodeError> {
    let input = input.trim();
    let (content_type, data) = match input.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((meta, data)) => {
                let mime = meta.split(';').next().unwrap_or_default().trim();
                let mime = if mime.is_empty() { DEFAULT_CONTENT_TYPE } else { mime };
                (mime.to_lowercase(), data)
            }
            None => (DEFAULT_CONTENT_TYPE.to_string(), rest),
        },
        None => (DEFAULT_CONTENT_TYPE.to_string(), input),
    };

    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(cleaned)?;
    Ok((bytes, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_allowed_types() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("IMAGE/PNG"), Some("png"));
        assert_eq!(extension_for("image/gif"), None);
    }

    #[test]
    fn test_upload_key_layout() {
        let user_id = Uuid::new_v4();
        let key = upload_key(user_id, "png");
        assert!(key.starts_with(&user_prefix(user_id)));
        assert!(key.ends_with(".png"));
        let file = key.rsplit('/').next().unwrap();
        // scan_YYYYmmdd_HHMMSS_xxxxxxxx.png
        assert_eq!(file.len(), "scan_".len() + 15 + 1 + 8 + ".png".len());
        assert_eq!(content_type_for_key(&key), "image/png");
    }

    #[test]
    fn test_decode_base64_with_and_without_data_url() {
        let (bytes, ct) = decode_base64_image("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(ct, "image/png");

        let (bytes, ct) = decode_base64_image("aGVs\nbG8=").unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(ct, "image/jpeg");

        assert!(decode_base64_image("not base64!!").is_err());
    }
}
