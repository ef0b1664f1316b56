//! `multipart/form-data` image uploads.

use actix_web::HttpRequest;
use actix_web::http::header;
use bytes::Bytes;
use mime_guess::Mime;
use multer::Multipart;

use crate::error::ApiError;
use crate::models::media::ImageSlot;

const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A file read from a multipart field.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: Option<Mime>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Lowercased extension of the client-side file name.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The file of an image upload plus the optional gallery text fields.
#[derive(Debug, Clone)]
pub struct ImageForm {
    pub file: UploadedFile,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Read the form of an image upload. The file must sit in the field named after `slot`.
pub async fn parse_image_form(
    req: &HttpRequest,
    body: Bytes,
    slot: ImageSlot,
) -> Result<ImageForm, ApiError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidFile("Expected a multipart/form-data body".to_string()))?;
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ApiError::InvalidFile("Expected a multipart/form-data body".to_string()))?;

    let stream = futures_util::stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
    let mut multipart = Multipart::new(stream, boundary);

    let mut file = None;
    let mut name = None;
    let mut description = None;
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) if field_name == slot.field_name() => {
                let content_type = field
                    .content_type()
                    .cloned()
                    .or_else(|| mime_guess::from_path(&file_name).first());
                let bytes = field.bytes().await.map_err(malformed)?;
                file = Some(UploadedFile {
                    field_name,
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some(_) => {}
            None if field_name == "name" => name = Some(field.text().await.map_err(malformed)?),
            None if field_name == "description" => {
                description = Some(field.text().await.map_err(malformed)?)
            }
            None => {}
        }
    }

    let file = file.ok_or_else(|| {
        ApiError::MissingParameters(format!("A file is required in the '{}' field", slot.field_name()))
    })?;
    Ok(ImageForm {
        file,
        name: name.filter(|s| !s.trim().is_empty()),
        description: description.filter(|s| !s.trim().is_empty()),
    })
}

fn malformed(err: multer::Error) -> ApiError {
    ApiError::InvalidFile(format!("Malformed multipart body: {err}"))
}

/// Only `.png`, `.jpg` and `.jpeg` files up to `max_bytes` are accepted.
pub fn validate_image(file: &UploadedFile, max_bytes: usize) -> Result<(), ApiError> {
    let allowed = file
        .extension()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if !allowed {
        return Err(ApiError::InvalidFile(
            "Only .png, .jpg and .jpeg images are allowed".to_string(),
        ));
    }
    if file.size() > max_bytes {
        return Err(ApiError::InvalidFile(format!(
            "File exceeds the limit of {max_bytes} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn multipart_body(field: &str, file_name: &str, bytes: &[u8], extra: &[(&str, &str)]) -> (String, Vec<u8>) {
        let boundary = "XBOUNDARYX";
        let mut body = Vec::new();
        for (name, value) in extra {
            body.extend_from_slice(
                format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                    .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    fn file(name: &str, size: usize) -> UploadedFile {
        UploadedFile {
            field_name: "cover".to_string(),
            file_name: name.to_string(),
            content_type: mime_guess::from_path(name).first(),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn accepts_png_and_jpeg_in_any_case() {
        for name in ["a.png", "b.JPG", "c.Jpeg"] {
            assert!(validate_image(&file(name, 10), 1024).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_other_types_and_oversized_files() {
        assert!(matches!(
            validate_image(&file("anim.gif", 10), 1024),
            Err(ApiError::InvalidFile(_))
        ));
        assert!(matches!(
            validate_image(&file("noext", 10), 1024),
            Err(ApiError::InvalidFile(_))
        ));
        for name in [".png", "photo.png.", "archive.tar.jpg.gif"] {
            assert!(
                matches!(validate_image(&file(name, 10), 1024), Err(ApiError::InvalidFile(_))),
                "{name}"
            );
        }
        assert!(matches!(
            validate_image(&file("big.png", 1025), 1024),
            Err(ApiError::InvalidFile(_))
        ));
    }

    #[actix_web::test]
    async fn parses_file_and_text_fields() {
        let (content_type, body) = multipart_body(
            "gallery",
            "shot.PNG",
            b"\x89PNG",
            &[("name", "Home screen"), ("description", "")],
        );
        let req = TestRequest::default()
            .insert_header((header::CONTENT_TYPE, content_type))
            .to_http_request();

        let form = parse_image_form(&req, Bytes::from(body), ImageSlot::Gallery)
            .await
            .unwrap();

        assert_eq!(form.file.file_name, "shot.PNG");
        assert_eq!(form.file.extension().as_deref(), Some("png"));
        assert_eq!(form.file.bytes.as_ref(), b"\x89PNG");
        assert_eq!(form.name.as_deref(), Some("Home screen"));
        assert_eq!(form.description, None);
    }

    #[actix_web::test]
    async fn file_in_the_wrong_field_is_missing() {
        let (content_type, body) = multipart_body("logo", "logo.png", b"x", &[]);
        let req = TestRequest::default()
            .insert_header((header::CONTENT_TYPE, content_type))
            .to_http_request();

        let err = parse_image_form(&req, Bytes::from(body), ImageSlot::Cover)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingParameters(_)));
    }
}
