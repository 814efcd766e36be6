#[cfg(test)]
mod tests {
    use std::{io::Write, path::Path};

    use seija_cli::utils;
    use seija_shared::forms;
    use tempfile::NamedTempFile;

    #[test]
    fn guess_mime_uses_the_extension() {
        assert_eq!(utils::guess_mime(Path::new("cover.JPG")), "image/jpeg");
        assert_eq!(utils::guess_mime(Path::new("poster.webp")), "image/webp");
        assert_eq!(utils::guess_mime(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn load_upload_builds_a_data_url() {
        let mut file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .expect("create temp file");
        file.write_all(b"hi").expect("write bytes");
        file.flush().expect("flush bytes");

        let upload = utils::load_upload(file.path()).expect("load upload");
        assert_eq!(upload.file, "data:image/png;base64,aGk=");
        assert!(upload.filename.ends_with(".png"));
    }

    #[test]
    fn read_content_takes_inline_or_file() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all("Bait pertama\nBait kedua".as_bytes())
            .expect("write content");
        file.flush().expect("flush content");

        let inline = utils::read_content(Some("langsung".to_string()), None).expect("inline");
        assert_eq!(inline, "langsung");

        let from_file = utils::read_content(None, Some(file.path())).expect("from file");
        assert_eq!(from_file, "Bait pertama\nBait kedua");

        assert!(utils::read_content(None, None).is_err());
    }

    #[test]
    fn field_errors_are_listed_per_field() {
        let errors = forms::validate_login("", "").expect_err("blank login is invalid");
        let described = utils::describe_field_errors(&errors);
        let lines: Vec<&str> = described.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("email: "));
        assert!(lines[1].starts_with("password: "));
    }
}
