// Multipart form parsing for upload handlers.
//
// hyper has no multipart support of its own, so the boundary and
// content-disposition plumbing is parsed by hand here. Only what the upload
// route needs: named parts, optional filenames, raw part bytes.

/// One decoded part of a multipart/form-data body.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPart {
    pub name: String,
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// Extract the boundary token from a `content-type` header value.
///
/// Returns `None` unless the media type is multipart/form-data with a
/// non-empty boundary parameter.
pub fn multipart_boundary(content_type: &str) -> Option<String> {
    let mut segments = content_type.split(';');
    let media_type = segments.next().unwrap_or("").trim();
    if !media_type.eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }

    for param in segments {
        if let Some((key, value)) = param.split_once('=') {
            if key.trim().eq_ignore_ascii_case("boundary") {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}

/// Parse a multipart body into its parts.
///
/// Parts without a content-disposition name are skipped. A malformed tail
/// (missing headers terminator or closing delimiter) ends the scan; parts
/// decoded before that point are still returned.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Vec<MultipartPart> {
    let delimiter = format!("--{boundary}");
    let close_marker = format!("\r\n--{boundary}");
    let mut parts = Vec::new();

    let mut cursor: &[u8] = match find_subsequence(body, delimiter.as_bytes()) {
        Some(i) => &body[i + delimiter.len()..],
        None => return parts,
    };

    loop {
        // "--" right after a delimiter is the closing marker
        if cursor.starts_with(b"--") {
            break;
        }
        cursor = match cursor.strip_prefix(b"\r\n") {
            Some(rest) => rest,
            None => break,
        };

        let header_end = match find_subsequence(cursor, b"\r\n\r\n") {
            Some(i) => i,
            None => break,
        };
        let headers = &cursor[..header_end];
        let after_headers = &cursor[header_end + 4..];

        // Part data runs up to the CRLF preceding the next delimiter
        let data_end = match find_subsequence(after_headers, close_marker.as_bytes()) {
            Some(i) => i,
            None => break,
        };

        if let Some((name, filename)) = parse_content_disposition(headers) {
            parts.push(MultipartPart {
                name,
                filename,
                data: after_headers[..data_end].to_vec(),
            });
        }

        cursor = &after_headers[data_end + close_marker.len()..];
    }

    parts
}

/// Find the first named part, if any.
pub fn find_part<'a>(parts: &'a [MultipartPart], name: &str) -> Option<&'a MultipartPart> {
    parts.iter().find(|p| p.name == name)
}

/// Pull `name` and `filename` out of a part's content-disposition header.
fn parse_content_disposition(headers: &[u8]) -> Option<(String, Option<String>)> {
    let text = match std::str::from_utf8(headers) {
        Ok(text) => text,
        Err(_) => return None,
    };

    for line in text.split("\r\n") {
        let (header, value) = match line.split_once(':') {
            Some(split) => split,
            None => continue,
        };
        if !header.trim().eq_ignore_ascii_case("content-disposition") {
            continue;
        }

        let mut name = None;
        let mut filename = None;
        for param in value.split(';') {
            if let Some((key, raw)) = param.split_once('=') {
                let raw = raw.trim().trim_matches('"').to_string();
                match key.trim() {
                    "name" => name = Some(raw),
                    "filename" => filename = Some(raw),
                    _ => {}
                }
            }
        }
        return name.map(|n| (n, filename));
    }

    None
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_upload_body() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"--XBOUND\r\n");
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"leaf.png\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n");
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x00, 0x0d, 0x0a, 0xff]);
        body.extend_from_slice(b"\r\n--XBOUND--\r\n");
        body
    }

    #[test]
    fn test_boundary_basic() {
        assert_eq!(
            multipart_boundary("multipart/form-data; boundary=XBOUND"),
            Some("XBOUND".to_string())
        );
    }

    #[test]
    fn test_boundary_quoted_and_cased() {
        assert_eq!(
            multipart_boundary("Multipart/Form-Data; Boundary=\"----abc123\""),
            Some("----abc123".to_string())
        );
    }

    #[test]
    fn test_boundary_rejects_other_media_types() {
        assert_eq!(multipart_boundary("application/json"), None);
        assert_eq!(multipart_boundary("multipart/form-data"), None);
        assert_eq!(multipart_boundary(""), None);
    }

    #[test]
    fn test_parse_single_file_part() {
        let body = file_upload_body();
        let parts = parse_multipart(&body, "XBOUND");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "file");
        assert_eq!(parts[0].filename.as_deref(), Some("leaf.png"));
        // Binary-safe, including embedded CR/LF bytes
        assert_eq!(
            parts[0].data,
            vec![0x89, b'P', b'N', b'G', 0x00, 0x0d, 0x0a, 0xff]
        );
    }

    #[test]
    fn test_parse_multiple_parts() {
        let body = b"--B\r\n\
            Content-Disposition: form-data; name=\"note\"\r\n\r\n\
            hello\r\n\
            --B\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"x.jpg\"\r\n\r\n\
            DATA\r\n\
            --B--\r\n";
        let parts = parse_multipart(body, "B");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "note");
        assert_eq!(parts[0].filename, None);
        assert_eq!(parts[0].data, b"hello");
        assert_eq!(find_part(&parts, "file").unwrap().data, b"DATA");
        assert!(find_part(&parts, "missing").is_none());
    }

    #[test]
    fn test_parse_empty_filename_is_preserved() {
        let body = b"--B\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"\"\r\n\r\n\
            \r\n\
            --B--\r\n";
        let parts = parse_multipart(body, "B");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].filename.as_deref(), Some(""));
        assert!(parts[0].data.is_empty());
    }

    #[test]
    fn test_parse_wrong_boundary_yields_nothing() {
        let body = file_upload_body();
        assert!(parse_multipart(&body, "OTHER").is_empty());
    }

    #[test]
    fn test_parse_truncated_body_yields_nothing() {
        // Closing delimiter never arrives, so the part cannot be terminated
        let body = b"--B\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"x\"\r\n\r\n\
            DATA";
        assert!(parse_multipart(body, "B").is_empty());
    }

    #[test]
    fn test_parse_part_without_disposition_is_skipped() {
        let body = b"--B\r\n\
            Content-Type: text/plain\r\n\r\n\
            orphan\r\n\
            --B--\r\n";
        assert!(parse_multipart(body, "B").is_empty());
    }
}
