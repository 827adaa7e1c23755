//! C-ABI FFI bindings for cross-language integration.
//!
//! Results are returned as JSON strings so callers in C#, Python or Node.js
//! need no knowledge of the Rust types.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

use crate::export::{to_json, JsonFormat};
use crate::{DocumentKind, Error, ExtractOptions, Extractor};

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct MedscanResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The result data (null if failed). Must be freed with `medscan_free_result`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `medscan_free_result`.
    pub error: *mut c_char,
    /// Machine-readable error code (null if succeeded).
    pub error_code: *mut c_char,
}

impl MedscanResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
            error_code: ptr::null_mut(),
        }
    }

    fn error(err: &Error) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(err.to_string()).unwrap_or_default().into_raw(),
            error_code: CString::new(err.code()).unwrap_or_default().into_raw(),
        }
    }
}

unsafe fn read_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, Error> {
    if ptr.is_null() {
        return Err(Error::Config(format!("{} cannot be null", what)));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| Error::Config(format!("{} is not valid UTF-8", what)))
}

/// Extract a structured record from a PDF file.
///
/// `kind` is `"prescription"` or `"patient_details"`. On success `data`
/// holds the record as a JSON object. Engine locations are taken from the
/// `MEDSCAN_*` environment variables.
///
/// # Safety
///
/// `path` and `kind` must be valid null-terminated UTF-8 strings.
/// The returned result must be freed with `medscan_free_result`.
#[no_mangle]
pub unsafe extern "C" fn medscan_extract_file(
    path: *const c_char,
    kind: *const c_char,
) -> MedscanResult {
    let outcome = read_str(path, "path").and_then(|path| {
        read_str(kind, "kind").and_then(|kind| extract_file_internal(Path::new(path), kind))
    });

    match outcome {
        Ok(json) => MedscanResult::success(json),
        Err(e) => MedscanResult::error(&e),
    }
}

fn extract_file_internal(path: &Path, kind: &str) -> crate::Result<String> {
    let kind: DocumentKind = kind.parse()?;
    let extractor = Extractor::new(ExtractOptions::from_env()?)?;
    let extraction = extractor.extract_file(path, kind.as_str())?;
    to_json(&extraction.record, JsonFormat::Compact)
}

/// Parse already recognized text into a record, returned as JSON.
///
/// # Safety
///
/// `text` and `kind` must be valid null-terminated UTF-8 strings.
/// The returned result must be freed with `medscan_free_result`.
#[no_mangle]
pub unsafe extern "C" fn medscan_parse_text(
    text: *const c_char,
    kind: *const c_char,
) -> MedscanResult {
    let outcome = read_str(text, "text").and_then(|text| {
        read_str(kind, "kind").and_then(|kind| {
            let kind: DocumentKind = kind.parse()?;
            to_json(&crate::parse_text(kind, text), JsonFormat::Compact)
        })
    });

    match outcome {
        Ok(json) => MedscanResult::success(json),
        Err(e) => MedscanResult::error(&e),
    }
}

/// Check if a file starts with a PDF header.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn medscan_is_pdf(path: *const c_char) -> bool {
    match read_str(path, "path") {
        Ok(path) => crate::detect::sniff_pdf_file(Path::new(path)).is_ok(),
        Err(_) => false,
    }
}

/// Free a result returned by any medscan function.
///
/// # Safety
///
/// The `result` must have been returned by a medscan function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn medscan_free_result(result: MedscanResult) {
    for ptr in [result.data, result.error, result.error_code] {
        if !ptr.is_null() {
            drop(CString::from_raw(ptr));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_ffi() {
        let text = CString::new("Patient Information\nKathy Crawford (737) 988-0851").unwrap();
        let kind = CString::new("patient_details").unwrap();
        unsafe {
            let result = medscan_parse_text(text.as_ptr(), kind.as_ptr());
            assert!(result.success);
            let json = CStr::from_ptr(result.data).to_str().unwrap().to_string();
            assert!(json.contains("\"patient_phone_number\":\"(737) 988-0851\""));
            medscan_free_result(result);
        }
    }

    #[test]
    fn test_unsupported_kind_ffi() {
        let path = CString::new("/nonexistent.pdf").unwrap();
        let kind = CString::new("invoice").unwrap();
        unsafe {
            let result = medscan_extract_file(path.as_ptr(), kind.as_ptr());
            assert!(!result.success);
            assert!(result.data.is_null());
            let code = CStr::from_ptr(result.error_code).to_str().unwrap();
            assert_eq!(code, "unsupported_kind");
            medscan_free_result(result);
        }
    }

    #[test]
    fn test_null_path() {
        unsafe {
            assert!(!medscan_is_pdf(ptr::null()));
            let result = medscan_extract_file(ptr::null(), ptr::null());
            assert!(!result.success);
            medscan_free_result(result);
        }
    }
}
