//! Utilities to acquire streams and data from URLs.
//!
//! Loading a secondary resource (an `xi:include`d file, a referenced raster image, an
//! externally-referenced SVG document) always goes through an [`AllowedUrl`], which has
//! already checked that the resource is either a `data:` URL or lives within the directory
//! subtree of the document's base location. From there we read the bytes ourselves: `data:`
//! URLs are decoded in memory, and `file:` URLs are read with `std::fs::File`.  We do not
//! support network schemes.

use data_url::{mime::Mime, DataUrl};
use std::fmt;
use std::fs;
use std::io::Read as _;

use crate::cancellable::Cancellable;
use crate::url_resolver::AllowedUrl;

#[derive(Debug)]
pub enum IoError {
    BadDataUrl,
    Io(std::io::Error),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> IoError {
        IoError::Io(e)
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IoError::BadDataUrl => write!(f, "invalid data: URL"),
            IoError::Io(ref e) => e.fmt(f),
        }
    }
}

pub struct BinaryData {
    pub data: Vec<u8>,
    pub mime_type: Option<Mime>,
}

fn decode_data_uri(uri: &str) -> Result<BinaryData, IoError> {
    let data_url = DataUrl::process(uri).map_err(|_| IoError::BadDataUrl)?;

    let mime = data_url.mime_type();

    // data_url::mime::Mime doesn't impl Clone, so do it by hand

    let mime_type = Mime {
        type_: mime.type_.clone(),
        subtype: mime.subtype.clone(),
        parameters: mime.parameters.clone(),
    };

    let (bytes, fragment_id) = data_url.decode_to_vec().map_err(|_| IoError::BadDataUrl)?;

    // See issue #377 - per the data: URL spec
    // (https://fetch.spec.whatwg.org/#data-urls), those URLs cannot
    // have fragment identifiers.  So, just return an error if we find
    // one.  This probably indicates mis-quoted SVG data inside the
    // data: URL.
    if fragment_id.is_some() {
        return Err(IoError::BadDataUrl);
    }

    Ok(BinaryData {
        data: bytes,
        mime_type: Some(mime_type),
    })
}

/// A source of bytes for a secondary resource, abstracting over where they actually come
/// from.  Callers only ever see this through [`acquire_stream`]; the two concrete sources are
/// an in-memory buffer (for `data:` URLs) and a file on disk (for `file:` URLs).
pub trait ByteSource: std::io::Read {
    /// Closes the underlying source.  The default implementation does nothing; callers are
    /// still expected to call this explicitly once done reading, per the incremental loading
    /// contract in [`crate::handle`].
    fn close(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}

impl ByteSource for std::io::Cursor<Vec<u8>> {}

impl ByteSource for fs::File {}

/// Creates a byte source for reading.  The URL can be a `data:` URL or a `file:` URI.
pub fn acquire_stream(
    aurl: &AllowedUrl,
    cancellable: Option<&Cancellable>,
) -> Result<Box<dyn ByteSource>, IoError> {
    if let Some(c) = cancellable {
        if c.is_cancelled() {
            // Report as an I/O error; the caller maps this back to a LoadingError.
            return Err(IoError::Io(std::io::Error::new(
                std::io::ErrorKind::Interrupted,
                "cancelled",
            )));
        }
    }

    let uri = aurl.as_str();

    if uri.starts_with("data:") {
        let BinaryData { data, .. } = decode_data_uri(uri)?;
        Ok(Box::new(std::io::Cursor::new(data)))
    } else {
        let path = aurl
            .to_file_path()
            .map_err(|_| IoError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "not a file: URL")))?;
        let file = fs::File::open(path)?;
        Ok(Box::new(file))
    }
}

/// Reads the entire contents pointed to by a URL.  The URL can be a `data:` URL or a `file:`
/// URI.
pub fn acquire_data(
    aurl: &AllowedUrl,
    cancellable: Option<&Cancellable>,
) -> Result<BinaryData, IoError> {
    let uri = aurl.as_str();

    if uri.starts_with("data:") {
        Ok(decode_data_uri(uri)?)
    } else {
        let mut stream = acquire_stream(aurl, cancellable)?;
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        stream.close()?;

        Ok(BinaryData {
            data,
            mime_type: None,
        })
    }
}
