use crate::Error;

/// Convenience trait to easily convert errors to `Error::InvalidHeader`
pub trait ResultExt<T> {
    fn or_invalid_header(self, raw: &[u8]) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E> {
    fn or_invalid_header(self, raw: &[u8]) -> Result<T, Error> {
        self.or_else(|_| Err(invalid_header(raw)))
    }
}

impl<T> ResultExt<T> for Option<T> {
    fn or_invalid_header(self, raw: &[u8]) -> Result<T, Error> {
        self.ok_or_else(|| invalid_header(raw))
    }
}

fn invalid_header(raw: &[u8]) -> Error {
    Error::InvalidHeader(String::from_utf8_lossy(raw).into_owned())
}
