use crate::{
    config::storage::StorageConfig,
    error::{NotAnImageSnafu, S3Snafu, ShowcaseResult},
};
use snafu::{OptionExt, ResultExt};
use time::OffsetDateTime;

/// A photo straight out of the upload form.
#[derive(Debug)]
pub struct NewPhoto {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub key: String,
    pub public_url: String,
}

impl NewPhoto {
    ///sniffed from the bytes rather than trusting the browser
    pub fn image_content_type(&self) -> Option<&'static str> {
        infer::get(&self.bytes)
            .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
            .map(|kind| kind.mime_type())
    }

    pub async fn upload(
        self,
        storage: &StorageConfig,
        uploaded_at: OffsetDateTime,
    ) -> ShowcaseResult<StoredPhoto> {
        let content_type = self.image_content_type().context(NotAnImageSnafu {
            file_name: self.file_name.clone(),
        })?;
        let key = photo_key(uploaded_at, &self.file_name);

        storage
            .bucket()
            .put_object_with_content_type(&key, &self.bytes, content_type)
            .await
            .context(S3Snafu)?;
        info!(%key, %content_type, size = self.bytes.len(), "Uploaded student photo");

        Ok(StoredPhoto {
            public_url: public_url(storage.public_base(), &key),
            key,
        })
    }
}

pub async fn remove_photo(storage: &StorageConfig, key: &str) -> ShowcaseResult<()> {
    storage
        .bucket()
        .delete_object(key)
        .await
        .context(S3Snafu)?;
    Ok(())
}

/// `{unix millis}-{file name}`, so two uploads of `me.jpg` don't collide.
pub fn photo_key(uploaded_at: OffsetDateTime, file_name: &str) -> String {
    let millis = uploaded_at.unix_timestamp_nanos() / 1_000_000;
    format!("{millis}-{}", sanitise_file_name(file_name))
}

pub fn sanitise_file_name(file_name: &str) -> String {
    let last_component = file_name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = last_component
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

pub fn public_url(public_base: &str, key: &str) -> String {
    format!("{}/{key}", public_base.trim_end_matches('/'))
}

///`None` for anything we didn't upload ourselves, eg. generated avatars
pub fn key_from_public_url<'a>(public_base: &str, url: &'a str) -> Option<&'a str> {
    url.strip_prefix(public_base.trim_end_matches('/'))?
        .strip_prefix('/')
        .filter(|key| !key.is_empty() && !key.contains('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://storage.example.org/student-images";

    #[test]
    fn key_is_millis_then_name() {
        let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(photo_key(at, "grad.jpg"), "1700000000000-grad.jpg");
    }

    #[test]
    fn file_names_are_made_url_safe() {
        assert_eq!(sanitise_file_name("my photo (1).png"), "my-photo-1.png");
        assert_eq!(sanitise_file_name("C:\\Users\\me\\pic.jpeg"), "pic.jpeg");
        assert_eq!(sanitise_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitise_file_name("ፎቶ.png"), ".png");
        assert_eq!(sanitise_file_name("ፎቶ"), "photo");
        assert_eq!(sanitise_file_name(""), "photo");
        assert_eq!(sanitise_file_name(".."), "photo");
    }

    #[test]
    fn public_urls_map_back_to_keys() {
        let key = "1700000000000-grad.jpg";
        let url = public_url(BASE, key);
        assert_eq!(url, format!("{BASE}/{key}"));
        assert_eq!(key_from_public_url(BASE, &url), Some(key));
        assert_eq!(key_from_public_url(&format!("{BASE}/"), &url), Some(key));
    }

    #[test]
    fn foreign_urls_have_no_key() {
        assert_eq!(
            key_from_public_url(
                BASE,
                "https://ui-avatars.com/api/?name=Abebe%20Kassa&background=FF6B6B"
            ),
            None
        );
        assert_eq!(key_from_public_url(BASE, BASE), None);
        assert_eq!(key_from_public_url(BASE, &format!("{BASE}/")), None);
        assert_eq!(key_from_public_url(BASE, &format!("{BASE}/nested/key.png")), None);
        assert_eq!(key_from_public_url(BASE, &format!("{BASE}-other/key.png")), None);
    }

    #[test]
    fn only_images_have_a_content_type() {
        let png = NewPhoto {
            file_name: "a.png".into(),
            bytes: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0],
        };
        assert_eq!(png.image_content_type(), Some("image/png"));

        let jpeg = NewPhoto {
            file_name: "a.jpg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'],
        };
        assert_eq!(jpeg.image_content_type(), Some("image/jpeg"));

        let text = NewPhoto {
            file_name: "notes.txt".into(),
            bytes: b"just some words".to_vec(),
        };
        assert_eq!(text.image_content_type(), None);
    }
}
